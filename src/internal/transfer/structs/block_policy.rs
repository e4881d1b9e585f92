//! 分块策略：根据剩余字节数选出本轮的并发数与分块大小。

use super::transfer_error::TransferError;

pub const KIB: u64 = 1024;
pub const MIB: u64 = 1024 * KIB;
pub const GIB: u64 = 1024 * MIB;

/// 分块大小的计算规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSizeRule {
    /// 剩余字节数除以给定值
    Divide(u64),
    /// 固定字节数，与剩余大小无关
    Fixed(u64),
}

/// 策略表中的一档
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockTier {
    /// 本档适用的剩余字节上限（含），`None` 表示不设上限
    pub max_remaining: Option<u64>,
    /// 每轮最多并发的分块数
    pub workers: usize,
    pub block_size: BlockSizeRule,
}

/// 一轮调度的布局：并发数 + 分块大小。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockPlan {
    pub worker_count: usize,
    pub block_size: u64,
}

/// 分档策略表，构造时校验，之后只读。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPolicy {
    tiers: Vec<BlockTier>,
}

impl Default for BlockPolicy {
    /// - ≤ 10M：8 并发，剩余/8
    /// - ≤ 100M：16 并发，剩余/8
    /// - ≤ 1G：32 并发，剩余/16
    /// - 其余：64 并发，每块固定 64M
    fn default() -> Self {
        Self {
            tiers: vec![
                BlockTier {
                    max_remaining: Some(10 * MIB),
                    workers: 8,
                    block_size: BlockSizeRule::Divide(8),
                },
                BlockTier {
                    max_remaining: Some(100 * MIB),
                    workers: 16,
                    block_size: BlockSizeRule::Divide(8),
                },
                BlockTier {
                    max_remaining: Some(GIB),
                    workers: 32,
                    block_size: BlockSizeRule::Divide(16),
                },
                BlockTier {
                    max_remaining: None,
                    workers: 64,
                    block_size: BlockSizeRule::Fixed(64 * MIB),
                },
            ],
        }
    }
}

impl BlockPolicy {
    /// 使用自定义档位创建策略。
    ///
    /// 要求：至少一档、上限严格递增、最后一档不设上限、并发数与分块参数均大于 0。
    pub fn new(tiers: Vec<BlockTier>) -> Result<Self, TransferError> {
        let Some(last) = tiers.last() else {
            return Err(TransferError::InvalidPolicy("至少需要一档".into()));
        };
        if last.max_remaining.is_some() {
            return Err(TransferError::InvalidPolicy(
                "最后一档不能设置上限".into(),
            ));
        }

        let mut previous: Option<u64> = None;
        for (i, tier) in tiers.iter().enumerate() {
            if tier.workers == 0 {
                return Err(TransferError::InvalidPolicy(format!(
                    "第 {} 档并发数为 0",
                    i + 1
                )));
            }
            match tier.block_size {
                BlockSizeRule::Divide(0) | BlockSizeRule::Fixed(0) => {
                    return Err(TransferError::InvalidPolicy(format!(
                        "第 {} 档分块参数为 0",
                        i + 1
                    )));
                }
                _ => {}
            }
            if i + 1 < tiers.len() {
                let Some(bound) = tier.max_remaining else {
                    return Err(TransferError::InvalidPolicy(format!(
                        "只有最后一档可以不设上限，第 {} 档违反",
                        i + 1
                    )));
                };
                if previous.is_some_and(|p| bound <= p) {
                    return Err(TransferError::InvalidPolicy(format!(
                        "第 {} 档上限没有递增",
                        i + 1
                    )));
                }
                previous = Some(bound);
            }
        }

        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[BlockTier] {
        &self.tiers
    }

    /// 根据剩余字节数选档并算出本轮布局；分块大小至少为 1 字节。
    pub fn plan(&self, remaining: u64) -> BlockPlan {
        let tier = self
            .tiers
            .iter()
            .find(|t| t.max_remaining.is_none_or(|max| remaining <= max))
            .copied()
            .unwrap_or_else(|| self.tiers[self.tiers.len() - 1]);

        let block_size = match tier.block_size {
            BlockSizeRule::Divide(n) => remaining / n,
            BlockSizeRule::Fixed(size) => size,
        };

        BlockPlan {
            worker_count: tier.workers,
            block_size: block_size.max(1),
        }
    }
}
