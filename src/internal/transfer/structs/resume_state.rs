//! 断点续传检测：只根据本地文件是否存在及长度判断，不读取内容。
//!
//! 长度正确但内容损坏的文件会被当作已完成，这是已知限制。

use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;

use super::transfer_error::TransferError;

/// 本地文件相对期望大小的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeState {
    /// 文件不存在（或长度为 0），从 0 开始
    Absent,
    /// 已有长度不小于期望大小，无需再下载
    Complete,
    /// 已写入部分数据，从 `len` 处继续
    Partial(u64),
}

impl ResumeState {
    /// 续传起点；`Complete` 时返回 `None`。
    pub fn resume_offset(&self) -> Option<u64> {
        match self {
            Self::Absent => Some(0),
            Self::Partial(len) => Some(*len),
            Self::Complete => None,
        }
    }
}

/// 检测 `path` 相对 `expected` 字节的续传状态。
pub async fn detect_resume(
    path: &Path,
    expected: u64,
) -> Result<ResumeState, TransferError> {
    let metadata = match fs::metadata(path).await {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Ok(ResumeState::Absent);
        }
        Err(e) => return Err(TransferError::fs(path)(e)),
    };

    if metadata.is_dir() {
        return Err(TransferError::IsDir {
            path: path.to_path_buf(),
        });
    }

    let len = metadata.len();
    if len >= expected {
        Ok(ResumeState::Complete)
    } else if len == 0 {
        Ok(ResumeState::Absent)
    } else {
        Ok(ResumeState::Partial(len))
    }
}

/// 校验文件长度恰好为 `expected`，返回实际长度。
///
/// 过短或过长都返回 [`TransferError::SizeMismatch`]，不会把不完整的文件当作下载成功。
pub async fn verify_size(path: &Path, expected: u64) -> Result<u64, TransferError> {
    let actual = fs::metadata(path)
        .await
        .map_err(TransferError::fs(path))?
        .len();
    if actual != expected {
        return Err(TransferError::SizeMismatch {
            path: path.to_path_buf(),
            expected,
            actual,
        });
    }
    Ok(actual)
}
