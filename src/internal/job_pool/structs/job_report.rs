use crate::internal::transfer::structs::{TransferError, TransferReport};

/// 单个任务的结果
#[derive(Debug)]
pub enum JobOutcome {
    Completed(TransferReport),
    Failed(TransferError),
    /// 任务 panic 或被中止
    Panicked(String),
}

/// 任务池中一个任务的汇总，`label` 通常是文件 URL
#[derive(Debug)]
pub struct JobReport {
    pub label: String,
    pub outcome: JobOutcome,
}

impl JobReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, JobOutcome::Completed(_))
    }
}
