//! 探测远程资源：取得总大小并确认服务器支持 Range。

use reqwest::header::{ACCEPT_RANGES, CONTENT_LENGTH};
use reqwest::Client;

use super::super::transfer_error::TransferError;

/// 探测结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResource {
    pub url: String,
    pub total_size: u64,
}

/// 发起 GET 只读响应头，不读取响应体（随后直接断开）。
///
/// 响应头缺少 `Accept-Ranges: bytes` 时返回 [`TransferError::UnsupportedRange`]，不会退回单线程下载。
pub async fn probe_range_support(
    client: &Client,
    url: &str,
) -> Result<RemoteResource, TransferError> {
    let resp = client.get(url).send().await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(TransferError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }

    let headers = resp.headers();
    let accept_ranges = headers
        .get(ACCEPT_RANGES)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("bytes"));
    if !accept_ranges {
        return Err(TransferError::UnsupportedRange {
            url: url.to_string(),
        });
    }

    let total_size = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .ok_or_else(|| TransferError::UnknownContentLength {
            url: url.to_string(),
        })?;

    Ok(RemoteResource {
        url: url.to_string(),
        total_size,
    })
}
