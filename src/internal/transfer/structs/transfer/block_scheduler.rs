//! 分块调度：切出一轮的分块，全部并发下载，等待整轮结束（轮次即同步屏障）。

use std::path::Path;
use std::sync::Arc;

use futures_util::future::join_all;
use reqwest::Client;
use tracing::warn;

use super::super::block::Block;
use super::super::block_policy::BlockPlan;
use super::super::transfer_error::TransferError;
use super::super::transfer_progress::SharedProgress;
use super::block_transfer::{transfer_block, BlockOutcome};

/// 从 `span_start` 起切出最多 `plan.worker_count` 个连续、不重叠的分块。
///
/// 剩余尾巴不足一个分块时并入当前分块，避免为几个字节再开一轮。
pub fn split_round(
    span_start: u64,
    total: u64,
    plan: BlockPlan,
    destination: &Path,
    marker: &str,
) -> Vec<Block> {
    let block_size = plan.block_size.max(1);
    let mut blocks = Vec::new();
    let mut start = span_start;

    while start < total && blocks.len() < plan.worker_count {
        let mut end = start.saturating_add(block_size).min(total);
        if total - end < block_size {
            end = total;
        }
        blocks.push(Block::new(blocks.len(), start, end, destination, marker));
        start = end;
    }

    blocks
}

/// 并发下载一轮中的所有分块，并等待全部结束。
///
/// 单个分块失败不会中断其他分块；只要有失败，本轮就返回 [`TransferError::RoundFailed`]，
/// 已完成和未完成的分块文件都留在磁盘上，供下次续传。
pub async fn run_round(
    client: &Client,
    url: &str,
    blocks: &[Block],
    progress: &Arc<SharedProgress>,
) -> Result<Vec<BlockOutcome>, TransferError> {
    let handles: Vec<_> = blocks
        .iter()
        .cloned()
        .map(|block| {
            let client = client.clone();
            let url = url.to_string();
            let progress = Arc::clone(progress);
            tokio::spawn(async move {
                transfer_block(&client, &url, &block, &progress)
                    .await
                    .map_err(|e| TransferError::Block {
                        start: block.start,
                        end: block.end,
                        source: Box::new(e),
                    })
            })
        })
        .collect();

    let mut outcomes = Vec::with_capacity(blocks.len());
    let mut errors = Vec::new();

    for (block, result) in blocks.iter().zip(join_all(handles).await) {
        match result {
            Ok(Ok(outcome)) => outcomes.push(outcome),
            Ok(Err(e)) => {
                warn!(block = block.index, error = %e, "分块下载失败");
                errors.push(e);
            }
            Err(join_err) => {
                warn!(block = block.index, error = %join_err, "分块任务异常退出");
                errors.push(TransferError::TaskJoin(join_err));
            }
        }
    }

    if errors.is_empty() {
        Ok(outcomes)
    } else {
        Err(TransferError::RoundFailed(errors))
    }
}
