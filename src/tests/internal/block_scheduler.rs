//! 一轮分块的切分：连续覆盖、尾巴合并、并发上限、分块文件名确定。

use std::path::Path;

use crate::transfer::{split_round, BlockPlan, DEFAULT_BLOCK_MARKER};

fn plan(worker_count: usize, block_size: u64) -> BlockPlan {
    BlockPlan {
        worker_count,
        block_size,
    }
}

#[test]
fn blocks_cover_span_without_gaps() {
    let dest = Path::new("/tmp/out/a.iso");
    let blocks = split_round(1000, 9000, plan(8, 1000), dest, DEFAULT_BLOCK_MARKER);

    assert_eq!(blocks.len(), 8);
    assert_eq!(blocks[0].start, 1000);
    assert_eq!(blocks.last().unwrap().end, 9000);
    for pair in blocks.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
    for (i, b) in blocks.iter().enumerate() {
        assert_eq!(b.index, i);
        assert_eq!(b.len(), 1000);
    }
}

#[test]
fn short_tail_is_absorbed_by_last_block() {
    let dest = Path::new("/tmp/out/a.iso");
    let blocks = split_round(0, 2500, plan(8, 1000), dest, DEFAULT_BLOCK_MARKER);

    let ranges: Vec<_> = blocks.iter().map(|b| (b.start, b.end)).collect();
    assert_eq!(ranges, vec![(0, 1000), (1000, 2500)]);
}

#[test]
fn worker_count_caps_the_round() {
    let dest = Path::new("/tmp/out/a.iso");
    let blocks = split_round(0, 10_000, plan(3, 1000), dest, DEFAULT_BLOCK_MARKER);

    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks.last().unwrap().end, 3000);
}

#[test]
fn empty_span_has_no_blocks() {
    let dest = Path::new("/tmp/out/a.iso");
    assert!(split_round(500, 500, plan(8, 1000), dest, DEFAULT_BLOCK_MARKER).is_empty());
}

#[test]
fn block_file_names_are_deterministic() {
    let dest = Path::new("/tmp/out/a.iso");
    let first = split_round(0, 4000, plan(4, 1000), dest, "part");
    let second = split_round(0, 4000, plan(4, 1000), dest, "part");

    assert_eq!(first, second);
    assert_eq!(
        first[1].file_path,
        Path::new("/tmp/out/a.iso.part-1000-2000")
    );
    assert_eq!(first[1].range_header(0), "bytes=1000-1999");
    assert_eq!(first[1].range_header(250), "bytes=1250-1999");
}
