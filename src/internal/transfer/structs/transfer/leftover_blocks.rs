//! 残留分块文件：上次运行留下、尚未合并的 `<目标文件>.<标记>-<start>-<end>`。
//!
//! 每轮的分块布局由剩余大小决定，合并中途中断后剩余大小变了，重新切分得到的范围
//! 与磁盘上的分块文件对不上。因此调度前先按磁盘上的文件名恢复上次的布局，
//! 从写入偏移起连成一串的残留分块直接作为下一轮。

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};

use super::super::block::Block;
use super::super::transfer_error::TransferError;

/// 磁盘上的一个残留分块
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeftoverBlock {
    pub start: u64,
    pub end: u64,
    /// 文件中已有的字节数
    pub len: u64,
}

/// 目标文件旁的全部残留分块，按起点排序。
#[derive(Debug, Default)]
pub struct LeftoverBlocks {
    blocks: Vec<LeftoverBlock>,
}

impl LeftoverBlocks {
    /// 扫描目标文件所在目录。范围超出 `total` 的文件不认（远程文件可能已变化）。
    pub async fn scan(
        destination: &Path,
        marker: &str,
        total: u64,
    ) -> Result<Self, TransferError> {
        let mut blocks = Vec::new();
        for (path, start, end) in list_block_files(destination, marker).await? {
            if start >= end || end > total {
                continue;
            }
            let len = fs::metadata(&path)
                .await
                .map_err(TransferError::fs(&path))?
                .len();
            blocks.push(LeftoverBlock { start, end, len });
        }
        blocks.sort_by_key(|b| (b.start, b.end));

        if !blocks.is_empty() {
            debug!(count = blocks.len(), "发现残留分块文件");
        }
        Ok(Self { blocks })
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// 续传起点落在某个残留分块内部时（合并该分块时中断），退回到该分块起点重新合并。
    pub fn rewind(&self, offset: u64) -> u64 {
        self.blocks
            .iter()
            .find(|b| b.start < offset && offset < b.end)
            .map_or(offset, |b| b.start)
    }

    /// 取出 `offset` 之后的全部残留分块，按起点首尾相接组成下一轮。
    ///
    /// 中间缺失的范围补成新分块；同一起点有多个文件时选已有字节最多的那个，
    /// 其余（以及起点已落在 `offset` 之前的）留给 [`remove_block_files`] 清理。
    pub fn take_chain(
        &mut self,
        offset: u64,
        destination: &Path,
        marker: &str,
    ) -> Vec<Block> {
        let mut chain = Vec::new();
        let mut cursor = offset;

        loop {
            let exact = self
                .blocks
                .iter()
                .enumerate()
                .filter(|(_, b)| b.start == cursor)
                .max_by_key(|(_, b)| b.len)
                .map(|(i, _)| i);

            if let Some(pos) = exact {
                let b = self.blocks.remove(pos);
                chain.push(Block::new(chain.len(), b.start, b.end, destination, marker));
                cursor = b.end;
                continue;
            }

            // 缺口：补到下一个残留分块的起点
            let Some(next) = self
                .blocks
                .iter()
                .map(|b| b.start)
                .filter(|&start| start > cursor)
                .min()
            else {
                break;
            };
            chain.push(Block::new(chain.len(), cursor, next, destination, marker));
            cursor = next;
        }

        chain
    }
}

/// 删除目标文件旁所有属于它的分块文件，删除失败只记录日志。
pub async fn remove_block_files(
    destination: &Path,
    marker: &str,
) -> Result<usize, TransferError> {
    let mut removed = 0;
    for (path, _, _) in list_block_files(destination, marker).await? {
        match fs::remove_file(&path).await {
            Ok(()) => removed += 1,
            Err(e) => warn!(path = %path.display(), error = %e, "移除残留分块文件失败"),
        }
    }
    Ok(removed)
}

/// 从文件名 `<name>.<marker>-<start>-<end>` 中解析范围
pub fn parse_block_file_name(
    file_name: &str,
    destination_name: &str,
    marker: &str,
) -> Option<(u64, u64)> {
    let rest = file_name
        .strip_prefix(destination_name)?
        .strip_prefix('.')?
        .strip_prefix(marker)?
        .strip_prefix('-')?;
    let (start, end) = rest.split_once('-')?;
    if !start.bytes().all(|c| c.is_ascii_digit()) || !end.bytes().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((start.parse().ok()?, end.parse().ok()?))
}

async fn list_block_files(
    destination: &Path,
    marker: &str,
) -> Result<Vec<(PathBuf, u64, u64)>, TransferError> {
    let Some(name) = destination.file_name().and_then(|n| n.to_str()) else {
        return Ok(Vec::new());
    };
    let dir = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut entries = match fs::read_dir(&dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(TransferError::fs(&dir)(e)),
    };

    let mut found = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(TransferError::fs(&dir))?
    {
        let file_name: OsString = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        if let Some((start, end)) = parse_block_file_name(file_name, name, marker) {
            found.push((entry.path(), start, end));
        }
    }
    Ok(found)
}
