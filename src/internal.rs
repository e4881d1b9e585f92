pub mod entrance;
pub mod job_pool;
pub mod listing;
pub mod transfer;
