use std::path::PathBuf;

/// 传输状态机：`Probing → Resuming → Scheduling ⟲ → Verifying → Done`，任一阶段可进入 `Failed`。
///
/// 探测在 [`Transfer::prepare`](super::transfer::Transfer::prepare) 内完成，探测失败时不会得到 `Transfer`，
/// 所以构造出的传输至少处于 `Resuming`；`Probing` 只用于日志与状态展示。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferPhase {
    Probing,
    Resuming,
    Scheduling { round: usize },
    Verifying,
    Done,
    Failed,
}

/// 一次成功传输的汇总
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReport {
    pub destination: PathBuf,
    pub total_size: u64,
    /// 启动时目标文件中已有的字节数
    pub resumed_bytes: u64,
    /// 执行的调度轮数
    pub rounds: usize,
    /// 合并进目标文件的分块数
    pub blocks: usize,
}
