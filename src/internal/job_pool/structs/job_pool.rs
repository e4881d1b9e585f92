use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::error;

use crate::internal::transfer::structs::{TransferError, TransferReport};

use super::job_report::{JobOutcome, JobReport};

type JobHandle = (String, JoinHandle<Result<TransferReport, TransferError>>);

/// 有界任务池：最多 `capacity` 个任务同时运行。
///
/// 由调用方按次创建、用 [`JobPool::wait_all`] 收尾，不依赖任何全局状态。
/// 某个任务失败或 panic 不会影响其他任务。
#[derive(Debug)]
pub struct JobPool {
    semaphore: Arc<Semaphore>,
    handles: Vec<JobHandle>,
}

impl JobPool {
    /// 容量最小为 1
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity.max(1))),
            handles: Vec::new(),
        }
    }

    /// 当前空闲的名额数
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// 已提交的任务数
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// 关闭任务池：之后提交的任务不再执行，直接记为 [`TransferError::PoolClosed`]；已启动的任务不受影响。
    pub fn close(&self) {
        self.semaphore.close();
    }

    pub fn is_closed(&self) -> bool {
        self.semaphore.is_closed()
    }

    /// 提交一个任务；池满时等待有名额空出再启动（对提交方形成背压）。
    pub async fn submit<F>(&mut self, label: impl Into<String>, job: F)
    where
        F: Future<Output = Result<TransferReport, TransferError>> + Send + 'static,
    {
        let label = label.into();
        let handle = match Arc::clone(&self.semaphore).acquire_owned().await {
            Ok(permit) => tokio::spawn(async move {
                let _permit = permit;
                job.await
            }),
            Err(e) => {
                error!(job = %label, error = %e, "任务池已关闭，跳过任务");
                drop(job);
                tokio::spawn(async { Err(TransferError::PoolClosed) })
            }
        };
        self.handles.push((label, handle));
    }

    /// 等待所有已提交任务结束，按提交顺序返回结果；失败的任务会记录日志。
    pub async fn wait_all(self) -> Vec<JobReport> {
        let mut reports = Vec::with_capacity(self.handles.len());

        for (label, handle) in self.handles {
            let outcome = match handle.await {
                Ok(Ok(report)) => JobOutcome::Completed(report),
                Ok(Err(e)) => {
                    error!(job = %label, error = %e, "出现错误");
                    JobOutcome::Failed(e)
                }
                Err(join_err) => {
                    error!(job = %label, error = %join_err, "任务异常退出");
                    JobOutcome::Panicked(join_err.to_string())
                }
            };
            reports.push(JobReport { label, outcome });
        }

        reports
    }
}
