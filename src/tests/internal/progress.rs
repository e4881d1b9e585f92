use std::time::Duration;

use crate::transfer::{format_bytes, ProgressSampler, ProgressSnapshot, SharedProgress};

#[test]
fn bytes_are_formatted_with_binary_units() {
    assert_eq!(format_bytes(0.0), "0.000B");
    assert_eq!(format_bytes(1023.0), "1023.000B");
    assert_eq!(format_bytes(1536.0), "1.500KB");
    assert_eq!(format_bytes(5.0 * 1024.0 * 1024.0), "5.000M");
    assert_eq!(format_bytes(2048.0 * 1024.0 * 1024.0 * 1024.0 * 1024.0), "2048.000T");
}

#[test]
fn sampler_reports_speed_between_samples() {
    let mut sampler = ProgressSampler::new("a.iso", 0);
    let line = sampler.sample(
        ProgressSnapshot {
            bytes_done: 2048,
            total: 4096,
            reused: 0,
        },
        Duration::from_secs(2),
    );

    assert_eq!(line.speed, 1024.0);
    assert_eq!(
        line.to_string(),
        "download a.iso ---> 2.000KB/4.000KB 50.000% speed:1.000KB/s"
    );

    let line = sampler.sample(
        ProgressSnapshot {
            bytes_done: 2048,
            total: 4096,
            reused: 0,
        },
        Duration::from_secs(1),
    );
    assert_eq!(line.speed, 0.0);
}

#[test]
fn shared_progress_accumulates_across_threads() {
    let progress = std::sync::Arc::new(SharedProgress::new(8000));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let p = progress.clone();
            std::thread::spawn(move || {
                for _ in 0..1000 {
                    p.add(1);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let snapshot = progress.snapshot();
    assert_eq!(snapshot.bytes_done, 8000);
    assert_eq!(snapshot.pct(), 100.0);
}

#[test]
fn empty_total_has_no_percentage() {
    assert!(ProgressSnapshot::default().pct().is_nan());
}

#[test]
fn reused_bytes_do_not_count_as_speed() {
    let progress = SharedProgress::new(10_000);
    progress.add_reused(6_000);
    let mut sampler = ProgressSampler::new("a.iso", progress.snapshot().fetched());

    progress.add(1_000);
    let line = sampler.sample(progress.snapshot(), Duration::from_secs(1));
    assert_eq!(line.snapshot.bytes_done, 7_000);
    assert_eq!(line.speed, 1_000.0);

    // 后续分块复用的部分同样不算速度
    progress.add_reused(2_000);
    progress.add(500);
    let line = sampler.sample(progress.snapshot(), Duration::from_secs(1));
    assert_eq!(line.snapshot.bytes_done, 9_500);
    assert_eq!(line.speed, 500.0);
}
