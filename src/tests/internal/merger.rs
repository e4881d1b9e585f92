use std::path::Path;

use crate::tests::payload;
use crate::transfer::{split_round, Block, BlockPlan, Merger, TransferError, DEFAULT_BLOCK_MARKER};

fn write_blocks(data: &[u8], dest: &Path, block_size: u64) -> Vec<Block> {
    let plan = BlockPlan {
        worker_count: 16,
        block_size,
    };
    let blocks = split_round(0, data.len() as u64, plan, dest, DEFAULT_BLOCK_MARKER);
    for b in &blocks {
        std::fs::write(&b.file_path, &data[b.start as usize..b.end as usize]).unwrap();
    }
    blocks
}

#[tokio::test]
async fn merges_in_start_order_and_removes_block_files() {
    let data = payload(10_000, 11);
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("out.bin");
    let mut blocks = write_blocks(&data, &dest, 1000);
    blocks.reverse();

    let mut merger = Merger::open(&dest, 0, 7).await.unwrap();
    let merged = merger.merge_round(&blocks).await.unwrap();

    assert_eq!(merged, 10_000);
    assert_eq!(merger.write_offset(), 10_000);
    drop(merger);
    assert_eq!(std::fs::read(&dest).unwrap(), data);
    assert!(blocks.iter().all(|b| !b.file_path.exists()));
}

#[tokio::test]
async fn appends_after_existing_prefix() {
    let data = payload(5000, 12);
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("out.bin");
    std::fs::write(&dest, &data[..2000]).unwrap();

    let plan = BlockPlan {
        worker_count: 4,
        block_size: 1000,
    };
    let blocks = split_round(2000, 5000, plan, &dest, DEFAULT_BLOCK_MARKER);
    for b in &blocks {
        std::fs::write(&b.file_path, &data[b.start as usize..b.end as usize]).unwrap();
    }

    let mut merger = Merger::open(&dest, 2000, 64 * 1024).await.unwrap();
    merger.merge_round(&blocks).await.unwrap();
    drop(merger);

    assert_eq!(std::fs::read(&dest).unwrap(), data);
}

#[tokio::test]
async fn oversized_block_file_contributes_only_its_range() {
    let data = payload(2000, 13);
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("out.bin");
    let blocks = write_blocks(&data, &dest, 1000);
    // 第一个分块文件多出 50 字节垃圾
    let mut first = data[..1000].to_vec();
    first.extend_from_slice(&[0xAA; 50]);
    std::fs::write(&blocks[0].file_path, first).unwrap();

    let mut merger = Merger::open(&dest, 0, 4096).await.unwrap();
    merger.merge_round(&blocks).await.unwrap();
    drop(merger);

    assert_eq!(std::fs::read(&dest).unwrap(), data);
}

#[tokio::test]
async fn gap_is_a_merge_offset_error() {
    let data = payload(3000, 14);
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("out.bin");
    let blocks = write_blocks(&data, &dest, 1000);

    let mut merger = Merger::open(&dest, 0, 4096).await.unwrap();
    let err = merger.merge_round(&blocks[1..]).await.unwrap_err();

    assert!(
        matches!(err, TransferError::MergeOffset { expected: 0, actual: 1000 }),
        "{:?}",
        err
    );
    // 未合并的分块文件保留
    assert!(blocks[1].file_path.exists());
}
