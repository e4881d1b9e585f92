use std::sync::atomic::{AtomicU64, Ordering};

/// 传输进度快照；比例可用 [`ProgressSnapshot::pct`] 获取。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// 已获取的字节数（含续传时已有的部分）
    pub bytes_done: u64,
    /// 文件总大小（字节）
    pub total: u64,
    /// `bytes_done` 中直接复用磁盘已有数据的部分，不计入速度
    pub reused: u64,
}

impl ProgressSnapshot {
    /// 进度百分比（0～100）；总大小为 0 时返回 `f64::NAN`。
    pub fn pct(&self) -> f64 {
        if self.total == 0 {
            return f64::NAN;
        }
        (self.bytes_done as f64 / self.total as f64) * 100.0
    }

    /// 本次运行从网络取得的字节数
    pub fn fetched(&self) -> u64 {
        self.bytes_done.saturating_sub(self.reused)
    }
}

/// 多个分块任务共享的进度计数器。
///
/// 写入方只做原子累加；读取方（进度监控）拿到的是最终一致的值，不参与任何控制判断。
#[derive(Debug)]
pub struct SharedProgress {
    total: u64,
    bytes_done: AtomicU64,
    reused: AtomicU64,
}

impl SharedProgress {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            bytes_done: AtomicU64::new(0),
            reused: AtomicU64::new(0),
        }
    }

    /// 累加从网络写入的字节
    pub fn add(&self, bytes: u64) -> u64 {
        self.bytes_done.fetch_add(bytes, Ordering::Relaxed) + bytes
    }

    /// 累加磁盘上已有、直接复用的字节：计入进度，不计入速度
    pub fn add_reused(&self, bytes: u64) -> u64 {
        self.reused.fetch_add(bytes, Ordering::Relaxed);
        self.add(bytes)
    }

    pub fn bytes_done(&self) -> u64 {
        self.bytes_done.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            bytes_done: self.bytes_done(),
            total: self.total,
            reused: self.reused.load(Ordering::Relaxed),
        }
    }
}
