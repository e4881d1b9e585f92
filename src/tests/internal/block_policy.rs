//! 分块策略：档位边界、默认布局、自定义档位校验。

use crate::transfer::{BlockPlan, BlockPolicy, BlockSizeRule, BlockTier, TransferError, GIB, MIB};

#[test]
fn default_tier_boundaries() {
    let policy = BlockPolicy::default();

    assert_eq!(
        policy.plan(10 * MIB),
        BlockPlan { worker_count: 8, block_size: 10 * MIB / 8 }
    );
    assert_eq!(policy.plan(10 * MIB + 1).worker_count, 16);
    assert_eq!(
        policy.plan(GIB),
        BlockPlan { worker_count: 32, block_size: GIB / 16 }
    );
    assert_eq!(
        policy.plan(GIB + 1),
        BlockPlan { worker_count: 64, block_size: 64 * MIB }
    );
}

#[test]
fn hundred_mib_fits_in_one_round() {
    let plan = BlockPolicy::default().plan(100 * MIB);
    assert_eq!(plan.worker_count, 16);
    assert_eq!(plan.block_size, 100 * MIB / 8);
}

#[test]
fn custom_tier_gives_sixteenth_blocks() {
    let policy = BlockPolicy::new(vec![BlockTier {
        max_remaining: None,
        workers: 16,
        block_size: BlockSizeRule::Divide(16),
    }])
    .unwrap();

    // 6.25M
    assert_eq!(policy.plan(100 * MIB).block_size, 6_553_600);
}

#[test]
fn tiny_remaining_is_clamped_to_one_byte() {
    let plan = BlockPolicy::default().plan(3);
    assert_eq!(plan.block_size, 1);
    assert_eq!(plan.worker_count, 8);
}

#[test]
fn invalid_policies_are_rejected() {
    let unbounded = |workers, block_size| BlockTier {
        max_remaining: None,
        workers,
        block_size,
    };

    let cases = vec![
        vec![],
        vec![BlockTier {
            max_remaining: Some(MIB),
            workers: 4,
            block_size: BlockSizeRule::Divide(4),
        }],
        vec![unbounded(0, BlockSizeRule::Divide(4))],
        vec![unbounded(4, BlockSizeRule::Divide(0))],
        vec![unbounded(4, BlockSizeRule::Fixed(0))],
        vec![
            BlockTier {
                max_remaining: Some(2 * MIB),
                workers: 4,
                block_size: BlockSizeRule::Divide(4),
            },
            BlockTier {
                max_remaining: Some(MIB),
                workers: 4,
                block_size: BlockSizeRule::Divide(4),
            },
            unbounded(4, BlockSizeRule::Fixed(MIB)),
        ],
        vec![
            unbounded(4, BlockSizeRule::Divide(4)),
            unbounded(4, BlockSizeRule::Divide(4)),
        ],
    ];

    for tiers in cases {
        let result = BlockPolicy::new(tiers.clone());
        assert!(
            matches!(result, Err(TransferError::InvalidPolicy(_))),
            "应当拒绝: {:?}",
            tiers
        );
    }
}
