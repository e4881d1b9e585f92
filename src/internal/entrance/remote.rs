use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::Client;
use tracing::{info, warn};
use url::Url;

use crate::internal::job_pool::structs::{JobPool, JobReport};
use crate::internal::listing::functions::ensure_dir_url;
use crate::internal::listing::structs::EntryKind;
use crate::internal::listing::traits::ListingSource;
use crate::internal::transfer::structs::{
    Transfer, TransferConfig, TransferError, TransferReport,
};

/// 下载单个文件到 `dir` 目录下，文件名取自 URL。
///
/// 目标文件已完整时返回 [`TransferError::AlreadyComplete`]；中断后再次调用会从断点继续。
///
/// example:
/// ```
/// use range_fetch::{download_file, transfer::{build_client, TransferConfig}};
///
/// let config = TransferConfig::default();
/// let client = build_client(&config)?;
/// let report = download_file(&client, "http://localhost:8080/a.iso", "download/", &config).await?;
/// ```
pub async fn download_file(
    client: &Client,
    url: &str,
    dir: impl AsRef<Path>,
    config: &TransferConfig,
) -> Result<TransferReport, TransferError> {
    let mut transfer =
        Transfer::prepare(client.clone(), url, dir, config.clone()).await?;
    transfer.run().await
}

/// 下载整个远程目录：逐层读取目录列表，子目录映射为本地子目录，每个文件作为任务池中的一个任务。
///
/// 最多 `max_concurrent_files` 个文件同时下载（每个文件内部仍按分块并发）。
/// 根目录读取失败直接返回错误；子目录读取失败只记录日志并跳过；单个文件失败不影响其他文件。
pub async fn download_directory(
    client: &Client,
    listing: Arc<dyn ListingSource>,
    url: &str,
    dir: impl AsRef<Path>,
    config: &TransferConfig,
    max_concurrent_files: usize,
) -> Result<Vec<JobReport>, TransferError> {
    let root = Url::parse(url)
        .map_err(|e| TransferError::InvalidUrl(format!("{}: {}", url, e)))?;
    let root = ensure_dir_url(&root);

    let mut pool = JobPool::new(max_concurrent_files);
    let mut pending: VecDeque<(Url, PathBuf)> = VecDeque::new();
    pending.push_back((root.clone(), dir.as_ref().to_path_buf()));

    while let Some((dir_url, local_dir)) = pending.pop_front() {
        let entries = match listing.list(&dir_url).await {
            Ok(entries) => entries,
            Err(e) if dir_url == root => return Err(e),
            Err(e) => {
                warn!(url = %dir_url, error = %e, "读取子目录失败，跳过");
                continue;
            }
        };

        for entry in entries {
            match entry.kind {
                EntryKind::Directory => {
                    pending.push_back((entry.url, local_dir.join(&entry.name)));
                }
                EntryKind::File => {
                    let client = client.clone();
                    let config = config.clone();
                    let target_dir = local_dir.clone();
                    let file_url = entry.url.to_string();
                    let label = file_url.clone();
                    pool.submit(label, async move {
                        download_file(&client, &file_url, target_dir, &config).await
                    })
                    .await;
                }
            }
        }
    }

    info!(jobs = pool.len(), "目录遍历完成，等待全部文件下载结束");
    Ok(pool.wait_all().await)
}
