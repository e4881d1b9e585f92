//! 单个分块的可续传下载：检测分块文件 → 发 Range 请求 → 流式写入分块文件。

use std::io::SeekFrom;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::StreamExt;
use reqwest::header::{CONTENT_RANGE, RANGE};
use reqwest::{Client, Response, StatusCode};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tracing::debug;

use super::super::block::Block;
use super::super::resume_state::{detect_resume, ResumeState};
use super::super::transfer_error::TransferError;
use super::super::transfer_progress::SharedProgress;

/// 单个分块的下载结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockOutcome {
    /// 分块文件中原有、直接复用的字节数
    pub reused: u64,
    /// 本次从网络写入的字节数
    pub fetched: u64,
}

/// 下载一个分块到它自己的文件。
///
/// 分块文件已完整时不发请求；否则从已有长度处续传。每写入一段都会原子累加 `progress`。
pub async fn transfer_block(
    client: &Client,
    url: &str,
    block: &Block,
    progress: &Arc<SharedProgress>,
) -> Result<BlockOutcome, TransferError> {
    let len = block.len();
    let path = block.file_path.as_path();

    let local_offset = match detect_resume(path, len).await? {
        ResumeState::Complete => {
            progress.add_reused(len);
            debug!(block = block.index, path = %path.display(), "分块文件已完整，跳过");
            return Ok(BlockOutcome {
                reused: len,
                fetched: 0,
            });
        }
        ResumeState::Partial(offset) => offset,
        ResumeState::Absent => 0,
    };
    progress.add_reused(local_offset);

    let mut file = open_block_file(path, local_offset).await?;

    let range = block.range_header(local_offset);
    debug!(block = block.index, range = %range, "请求分块");
    let result = async {
        let resp = fetch_range(client, url, &range, block.start + local_offset).await?;
        stream_into(resp, &mut file, path, local_offset, len, progress).await
    }
    .await;

    // 出错时也要把已写入的数据落盘，供下次续传
    let flushed = file.flush().await.map_err(TransferError::fs(path));
    let written = result?;
    flushed?;

    Ok(BlockOutcome {
        reused: local_offset,
        fetched: written - local_offset,
    })
}

/// 打开分块文件并定位到续传位置；不存在则创建。
async fn open_block_file(
    path: &Path,
    local_offset: u64,
) -> Result<File, TransferError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .await
        .map_err(TransferError::fs(path))?;
    file.seek(SeekFrom::Start(local_offset))
        .await
        .map_err(TransferError::fs(path))?;
    Ok(file)
}

/// 发起 Range GET，并校验响应确实是所请求的范围。
///
/// 206 要求 `Content-Range` 的起点等于请求起点；200 只在请求从资源开头开始时接受
/// （响应体同样从分块起点开始）。
async fn fetch_range(
    client: &Client,
    url: &str,
    range: &str,
    request_start: u64,
) -> Result<Response, TransferError> {
    let resp = client.get(url).header(RANGE, range).send().await?;
    let status = resp.status();

    match status {
        StatusCode::PARTIAL_CONTENT => {
            let actual = resp
                .headers()
                .get(CONTENT_RANGE)
                .and_then(|v| v.to_str().ok())
                .and_then(content_range_start);
            if actual != Some(request_start) {
                return Err(TransferError::RangeMismatch {
                    url: url.to_string(),
                    requested: request_start,
                    actual,
                });
            }
            Ok(resp)
        }
        StatusCode::OK if request_start == 0 => Ok(resp),
        s if s.is_success() => Err(TransferError::UnsupportedRange {
            url: url.to_string(),
        }),
        _ => Err(TransferError::HttpStatus {
            url: url.to_string(),
            status,
        }),
    }
}

/// 解析 `Content-Range: bytes <start>-<end>/<total>` 的起点
pub fn content_range_start(value: &str) -> Option<u64> {
    let (unit, rest) = value.trim().split_once(' ')?;
    if !unit.eq_ignore_ascii_case("bytes") {
        return None;
    }
    let (start, _) = rest.trim_start().split_once('-')?;
    start.trim().parse().ok()
}

/// 把响应体写入分块文件，返回写完后的分块内偏移。
///
/// 超出分块长度的部分直接截掉，绝不写过 `end`。
async fn stream_into(
    resp: Response,
    file: &mut File,
    path: &Path,
    mut local_offset: u64,
    len: u64,
    progress: &SharedProgress,
) -> Result<u64, TransferError> {
    let mut stream = resp.bytes_stream();

    while local_offset < len {
        let Some(chunk) = stream.next().await else {
            break;
        };
        let chunk = clamp_chunk(chunk?, len - local_offset);
        if chunk.is_empty() {
            continue;
        }

        file.write_all(&chunk)
            .await
            .map_err(TransferError::fs(path))?;
        let written = chunk.len() as u64;
        local_offset += written;
        progress.add(written);
    }

    if local_offset < len {
        return Err(TransferError::IncompleteTransfer {
            path: path.to_path_buf(),
            expected: len,
            received: local_offset,
        });
    }

    Ok(local_offset)
}

/// 截断到最多 `needed` 字节
fn clamp_chunk(chunk: Bytes, needed: u64) -> Bytes {
    if chunk.len() as u64 > needed {
        chunk.slice(..needed as usize)
    } else {
        chunk
    }
}
