//! 文件级任务池：并发上限、失败隔离、panic 隔离。

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::job_pool::{JobOutcome, JobPool};
use crate::transfer::{TransferError, TransferReport};

fn report(name: &str) -> TransferReport {
    TransferReport {
        destination: PathBuf::from(name),
        total_size: 0,
        resumed_bytes: 0,
        rounds: 0,
        blocks: 0,
    }
}

#[tokio::test]
async fn never_exceeds_capacity() {
    let mut pool = JobPool::new(2);
    let running = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    for i in 0..6 {
        let running = running.clone();
        let peak = peak.clone();
        pool.submit(format!("job-{}", i), async move {
            let now = running.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(30)).await;
            running.fetch_sub(1, Ordering::SeqCst);
            Ok(report("x"))
        })
        .await;
    }

    assert_eq!(pool.len(), 6);
    let reports = pool.wait_all().await;

    assert_eq!(reports.len(), 6);
    assert!(reports.iter().all(|r| r.is_success()));
    assert!(peak.load(Ordering::SeqCst) <= 2);
    let labels: Vec<_> = reports.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, ["job-0", "job-1", "job-2", "job-3", "job-4", "job-5"]);
}

#[tokio::test]
async fn failure_does_not_affect_other_jobs() {
    let mut pool = JobPool::new(4);
    pool.submit("ok-1", async { Ok(report("a")) }).await;
    pool.submit("bad", async { Err(TransferError::InvalidUrl("x".into())) })
        .await;
    pool.submit("ok-2", async { Ok(report("b")) }).await;

    let reports = pool.wait_all().await;

    assert!(reports[0].is_success());
    assert!(matches!(
        reports[1].outcome,
        JobOutcome::Failed(TransferError::InvalidUrl(_))
    ));
    assert!(reports[2].is_success());
}

async fn explode() -> Result<TransferReport, TransferError> {
    panic!("job panicked")
}

#[tokio::test]
async fn panic_is_isolated() {
    let mut pool = JobPool::new(2);
    pool.submit("boom", explode()).await;
    pool.submit("ok", async { Ok(report("a")) }).await;

    let reports = pool.wait_all().await;

    assert!(matches!(reports[0].outcome, JobOutcome::Panicked(_)));
    assert!(reports[1].is_success());
}

#[tokio::test]
async fn zero_capacity_still_runs_jobs() {
    let mut pool = JobPool::new(0);
    assert_eq!(pool.available(), 1);
    pool.submit("only", async { Ok(report("a")) }).await;
    assert!(pool.wait_all().await[0].is_success());
}

#[tokio::test]
async fn closed_pool_skips_new_jobs() {
    let mut pool = JobPool::new(2);
    let ran = Arc::new(AtomicUsize::new(0));

    let counter = ran.clone();
    pool.submit("before", async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(report("a"))
    })
    .await;

    pool.close();
    assert!(pool.is_closed());
    let counter = ran.clone();
    pool.submit("after", async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(report("b"))
    })
    .await;

    let reports = pool.wait_all().await;
    assert!(reports[0].is_success());
    assert!(matches!(
        reports[1].outcome,
        JobOutcome::Failed(TransferError::PoolClosed)
    ));
    assert_eq!(ran.load(Ordering::SeqCst), 1);
}
