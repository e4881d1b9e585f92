//! 分块：源文件中的一段连续字节，由一个任务下载到自己的本地文件。

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// 一个分块。范围为半开区间 `[start, end)`，请求头中换算为闭区间。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// 本轮内的序号，仅用于日志
    pub index: usize,
    /// 源文件中的起始偏移（含）
    pub start: u64,
    /// 源文件中的结束偏移（不含）
    pub end: u64,
    /// 分块文件路径，由目标路径与范围唯一确定，重启后可重新找到
    pub file_path: PathBuf,
}

impl Block {
    pub fn new(
        index: usize,
        start: u64,
        end: u64,
        destination: &Path,
        marker: &str,
    ) -> Self {
        Self {
            index,
            start,
            end,
            file_path: block_file_path(destination, marker, start, end),
        }
    }

    /// 分块字节数
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// 从分块内偏移 `local_offset` 开始到分块末尾的 Range 请求头。
    pub fn range_header(&self, local_offset: u64) -> String {
        format!(
            "bytes={}-{}",
            self.start + local_offset,
            self.end.saturating_sub(1)
        )
    }
}

/// 分块文件路径：`<destination>.<marker>-<start>-<end>`
pub fn block_file_path(
    destination: &Path,
    marker: &str,
    start: u64,
    end: u64,
) -> PathBuf {
    let mut name = OsString::from(destination.as_os_str());
    name.push(format!(".{}-{}-{}", marker, start, end));
    PathBuf::from(name)
}
