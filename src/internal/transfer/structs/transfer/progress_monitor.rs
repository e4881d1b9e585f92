//! 进度监控：后台任务按固定间隔采样共享计数器，输出进度与瞬时速度。仅供展示，不影响正确性。

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::info;

use super::super::transfer_progress::{ProgressSnapshot, SharedProgress};
use crate::internal::transfer::functions::byte_format::format_bytes;

/// 一行进度输出
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressLine {
    pub name: String,
    pub snapshot: ProgressSnapshot,
    /// 瞬时速度（字节/秒）
    pub speed: f64,
}

impl fmt::Display for ProgressLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "download {} ---> {}/{} {:.3}% speed:{}/s",
            self.name,
            format_bytes(self.snapshot.bytes_done as f64),
            format_bytes(self.snapshot.total as f64),
            self.snapshot.pct(),
            format_bytes(self.speed),
        )
    }
}

/// 记住上一次采样时已从网络取得的字节数，把两次采样的差值换算成速度。
///
/// 复用的磁盘数据（[`ProgressSnapshot::reused`]）不算作速度。
#[derive(Debug)]
pub struct ProgressSampler {
    name: String,
    previous: u64,
}

impl ProgressSampler {
    pub fn new(name: impl Into<String>, initial: u64) -> Self {
        Self {
            name: name.into(),
            previous: initial,
        }
    }

    pub fn sample(
        &mut self,
        snapshot: ProgressSnapshot,
        elapsed: Duration,
    ) -> ProgressLine {
        let fetched = snapshot.fetched();
        let delta = fetched.saturating_sub(self.previous);
        self.previous = fetched;

        let secs = elapsed.as_secs_f64();
        let speed = if secs > 0.0 { delta as f64 / secs } else { 0.0 };

        ProgressLine {
            name: self.name.clone(),
            snapshot,
            speed,
        }
    }
}

/// 每个传输一个的后台采样任务
#[derive(Debug)]
pub struct ProgressMonitor {
    stop: Arc<Notify>,
    handle: JoinHandle<()>,
}

impl ProgressMonitor {
    pub fn spawn(
        name: impl Into<String>,
        progress: Arc<SharedProgress>,
        period: Duration,
    ) -> Self {
        let stop = Arc::new(Notify::new());
        let stop_signal = Arc::clone(&stop);
        let mut sampler = ProgressSampler::new(name, progress.snapshot().fetched());

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut last = Instant::now();

            loop {
                tokio::select! {
                    _ = stop_signal.notified() => break,
                    now = ticker.tick() => {
                        let snapshot = progress.snapshot();
                        let line = sampler.sample(snapshot, now - last);
                        last = now;
                        info!("{}", line);
                        if snapshot.bytes_done >= snapshot.total {
                            break;
                        }
                    }
                }
            }
        });

        Self { stop, handle }
    }

    /// 停止采样并等待后台任务退出
    pub async fn stop(self) {
        self.stop.notify_one();
        let _ = self.handle.await;
    }
}
