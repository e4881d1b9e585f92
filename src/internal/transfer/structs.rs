pub mod block;
pub mod block_policy;
pub mod resume_state;
pub mod transfer;
pub mod transfer_config;
pub mod transfer_error;
pub mod transfer_phase;
pub mod transfer_progress;

// 重导出公共类型
pub use block::{block_file_path, Block};
pub use block_policy::{BlockPlan, BlockPolicy, BlockSizeRule, BlockTier, GIB, KIB, MIB};
pub use resume_state::{detect_resume, verify_size, ResumeState};
pub use transfer::block_scheduler::{run_round, split_round};
pub use transfer::block_transfer::{content_range_start, transfer_block, BlockOutcome};
pub use transfer::leftover_blocks::{
    parse_block_file_name, remove_block_files, LeftoverBlock, LeftoverBlocks,
};
pub use transfer::merger::Merger;
pub use transfer::progress_monitor::{ProgressLine, ProgressMonitor, ProgressSampler};
pub use transfer::range_probe::{probe_range_support, RemoteResource};
pub use transfer::Transfer;
pub use transfer_config::TransferConfig;
pub use transfer_error::TransferError;
pub use transfer_phase::{TransferPhase, TransferReport};
pub use transfer_progress::{ProgressSnapshot, SharedProgress};
