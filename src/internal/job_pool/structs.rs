pub mod job_pool;
pub mod job_report;

pub use job_pool::JobPool;
pub use job_report::{JobOutcome, JobReport};
