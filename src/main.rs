use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use range_fetch::listing::HtmlIndexListing;
use range_fetch::transfer::{build_client, TransferConfig, DEFAULT_MAX_CONCURRENT_FILES};
use range_fetch::{download_directory, download_file};
use tracing_subscriber::EnvFilter;

/// 多线程分块下载，支持断点续传。
///
/// 文件被切成按字节范围的分块并发下载，每轮结束后按顺序合并进目标文件。
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 文件或目录的 URL
    #[arg(long)]
    url: String,

    /// 保存目录
    #[arg(long, default_value = "download/")]
    dir: String,

    /// 目录模式下同时下载的文件数
    #[arg(long = "work-num", default_value_t = DEFAULT_MAX_CONCURRENT_FILES)]
    work_num: usize,

    /// 按目录下载（解析目录索引页，递归下载其中的文件）
    #[arg(long = "dir-flag")]
    dir_flag: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    tracing::info!(url = %args.url, dir = %args.dir, work_num = args.work_num, dir_flag = args.dir_flag, "参数");

    let config = TransferConfig::default();
    let client = match build_client(&config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "创建 HTTP 客户端失败");
            return ExitCode::FAILURE;
        }
    };

    if args.dir_flag {
        let listing = Arc::new(HtmlIndexListing::new(client.clone()));
        let reports = match download_directory(
            &client,
            listing,
            &args.url,
            &args.dir,
            &config,
            args.work_num,
        )
        .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(url = %args.url, error = %e, "下载失败");
                return ExitCode::FAILURE;
            }
        };

        let failed = reports.iter().filter(|r| !r.is_success()).count();
        tracing::info!(total = reports.len(), failed, "目录下载结束");
        if failed > 0 {
            return ExitCode::FAILURE;
        }
    } else if let Err(e) = download_file(&client, &args.url, &args.dir, &config).await {
        tracing::error!(url = %args.url, error = %e, "下载失败");
        return ExitCode::FAILURE;
    }

    tracing::info!("download success...");
    ExitCode::SUCCESS
}
