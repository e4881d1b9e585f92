//! 传输编排：探测 → 续传检测 → 多轮「分块下载 + 合并」→ 校验大小。

pub mod block_scheduler;
pub mod block_transfer;
pub mod leftover_blocks;
pub mod merger;
pub mod progress_monitor;
pub mod range_probe;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::Client;
use tokio::fs;
use tracing::{debug, info};
use url::Url;

use crate::internal::transfer::functions::file_name::file_name_from_url;

use self::block_scheduler::{run_round, split_round};
use self::leftover_blocks::{remove_block_files, LeftoverBlocks};
use self::merger::Merger;
use self::progress_monitor::ProgressMonitor;
use self::range_probe::probe_range_support;
use super::resume_state::{detect_resume, verify_size, ResumeState};
use super::transfer_config::TransferConfig;
use super::transfer_error::TransferError;
use super::transfer_phase::{TransferPhase, TransferReport};
use super::transfer_progress::{ProgressSnapshot, SharedProgress};

/// 单个文件的分块传输。
///
/// 不实现 Clone：同一个目标文件只能有一个传输在合并。
#[derive(Debug)]
pub struct Transfer {
    client: Client,
    url: String,
    destination: PathBuf,
    /// 探测得到，构造后不再改变
    total_size: u64,
    config: TransferConfig,
    progress: Arc<SharedProgress>,
    phase: TransferPhase,
}

impl Transfer {
    /// 探测远程资源并确定目标路径 `<dir>/<URL 中的文件名>`。
    ///
    /// 服务器不支持 Range 时直接返回错误，此时不会创建任何目录或文件。
    pub async fn prepare(
        client: Client,
        url: &str,
        dir: impl AsRef<Path>,
        config: TransferConfig,
    ) -> Result<Self, TransferError> {
        let parsed = Url::parse(url)
            .map_err(|e| TransferError::InvalidUrl(format!("{}: {}", url, e)))?;

        let resource = probe_range_support(&client, url).await?;

        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .await
            .map_err(TransferError::fs(dir))?;
        let destination = dir.join(file_name_from_url(&parsed));

        Ok(Self {
            client,
            url: resource.url,
            destination,
            total_size: resource.total_size,
            config,
            progress: Arc::new(SharedProgress::new(resource.total_size)),
            phase: TransferPhase::Resuming,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn phase(&self) -> TransferPhase {
        self.phase
    }

    /// 当前进度（最终一致，仅供展示）
    pub fn progress(&self) -> ProgressSnapshot {
        self.progress.snapshot()
    }

    /// 执行传输直到目标文件达到总大小。
    ///
    /// 任一轮失败即停止并返回错误，分块文件保留在磁盘上；重新执行即可从断点继续。
    pub async fn run(&mut self) -> Result<TransferReport, TransferError> {
        let monitor = self.config.progress_interval.map(|period| {
            ProgressMonitor::spawn(
                self.destination.display().to_string(),
                Arc::clone(&self.progress),
                period,
            )
        });

        info!(url = %self.url, destination = %self.destination.display(), "开始下载");
        let result = self.drive().await;

        if let Some(m) = monitor {
            m.stop().await;
        }

        match &result {
            Ok(report) => {
                self.phase = TransferPhase::Done;
                info!(
                    destination = %report.destination.display(),
                    rounds = report.rounds,
                    "下载完成"
                );
            }
            Err(_) => self.phase = TransferPhase::Failed,
        }
        result
    }

    async fn drive(&mut self) -> Result<TransferReport, TransferError> {
        self.phase = TransferPhase::Resuming;
        let marker = self.config.block_marker.clone();
        let existing =
            match detect_resume(&self.destination, self.total_size).await? {
                ResumeState::Complete => {
                    return Err(TransferError::AlreadyComplete {
                        path: self.destination.clone(),
                    });
                }
                ResumeState::Partial(len) => len,
                ResumeState::Absent => 0,
            };

        let mut leftovers =
            LeftoverBlocks::scan(&self.destination, &marker, self.total_size).await?;
        let resumed_bytes = leftovers.rewind(existing);
        self.progress.add_reused(resumed_bytes);
        if resumed_bytes > 0 {
            info!(resumed_bytes, leftover_blocks = leftovers.len(), "从断点继续");
        }

        let mut merger = Merger::open(
            &self.destination,
            resumed_bytes,
            self.config.merge_buffer_size,
        )
        .await?;

        let mut rounds = 0;
        let mut merged_blocks = 0;
        while merger.write_offset() < self.total_size {
            rounds += 1;
            self.phase = TransferPhase::Scheduling { round: rounds };

            let span_start = merger.write_offset();
            let mut blocks = leftovers.take_chain(span_start, &self.destination, &marker);
            if blocks.is_empty() {
                let plan = self.config.policy.plan(self.total_size - span_start);
                blocks = split_round(
                    span_start,
                    self.total_size,
                    plan,
                    &self.destination,
                    &marker,
                );
                debug!(
                    round = rounds,
                    workers = plan.worker_count,
                    block_size = plan.block_size,
                    blocks = blocks.len(),
                    span_start,
                    "开始一轮分块下载"
                );
            } else {
                debug!(round = rounds, blocks = blocks.len(), span_start, "沿用上次的分块布局");
            }

            run_round(&self.client, &self.url, &blocks, &self.progress).await?;
            merger.merge_round(&blocks).await?;
            merged_blocks += blocks.len();
        }
        drop(merger);

        self.phase = TransferPhase::Verifying;
        verify_size(&self.destination, self.total_size).await?;

        let removed = remove_block_files(&self.destination, &marker).await?;
        if removed > 0 {
            debug!(removed, "已清理残留分块文件");
        }

        Ok(TransferReport {
            destination: self.destination.clone(),
            total_size: self.total_size,
            resumed_bytes,
            rounds,
            blocks: merged_blocks,
        })
    }
}
