//! 合并：按起始偏移顺序把分块文件追加进目标文件，追加完再删除分块文件。
//!
//! 目标文件句柄只属于合并器，写入偏移也只在这里推进，整个过程单线程。

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tracing::warn;

use super::super::block::Block;
use super::super::transfer_error::TransferError;

#[derive(Debug)]
pub struct Merger {
    destination: File,
    path: PathBuf,
    write_offset: u64,
    buffer: Vec<u8>,
}

impl Merger {
    /// 打开（或创建）目标文件，从 `write_offset` 开始追加；不会截断已有内容。
    pub async fn open(
        path: &Path,
        write_offset: u64,
        buffer_size: usize,
    ) -> Result<Self, TransferError> {
        let destination = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .await
            .map_err(TransferError::fs(path))?;

        Ok(Self {
            destination,
            path: path.to_path_buf(),
            write_offset,
            buffer: vec![0; buffer_size.max(1)],
        })
    }

    /// 下一次追加的绝对偏移
    pub fn write_offset(&self) -> u64 {
        self.write_offset
    }

    /// 合并一轮的分块，返回本轮追加的字节数。
    ///
    /// 每个分块的起点必须正好等于当前写入偏移，否则返回 [`TransferError::MergeOffset`]。
    pub async fn merge_round(
        &mut self,
        blocks: &[Block],
    ) -> Result<u64, TransferError> {
        let mut ordered: Vec<&Block> = blocks.iter().collect();
        ordered.sort_by_key(|b| b.start);

        let mut merged = 0;
        for block in ordered {
            merged += self.append_block(block).await?;

            if let Err(e) = fs::remove_file(&block.file_path).await {
                warn!(path = %block.file_path.display(), error = %e, "移除分块文件失败");
            }
        }

        self.destination
            .flush()
            .await
            .map_err(TransferError::fs(&self.path))?;
        Ok(merged)
    }

    /// 流式复制一个分块文件的前 `block.len()` 字节到目标文件。
    async fn append_block(&mut self, block: &Block) -> Result<u64, TransferError> {
        if block.start != self.write_offset {
            return Err(TransferError::MergeOffset {
                expected: self.write_offset,
                actual: block.start,
            });
        }

        let src_path = block.file_path.as_path();
        let mut src = File::open(src_path)
            .await
            .map_err(TransferError::fs(src_path))?;

        self.destination
            .seek(SeekFrom::Start(self.write_offset))
            .await
            .map_err(TransferError::fs(&self.path))?;

        let len = block.len();
        let mut copied = 0u64;
        while copied < len {
            let want = (len - copied).min(self.buffer.len() as u64) as usize;
            let n = src
                .read(&mut self.buffer[..want])
                .await
                .map_err(TransferError::fs(src_path))?;
            if n == 0 {
                break;
            }
            self.destination
                .write_all(&self.buffer[..n])
                .await
                .map_err(TransferError::fs(&self.path))?;
            copied += n as u64;
            self.write_offset += n as u64;
        }

        if copied < len {
            return Err(TransferError::IncompleteTransfer {
                path: src_path.to_path_buf(),
                expected: len,
                received: copied,
            });
        }

        Ok(copied)
    }
}
