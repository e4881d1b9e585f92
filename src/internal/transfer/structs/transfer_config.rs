use std::time::Duration;

use super::block_policy::BlockPolicy;

/// 默认分块文件标记：`<目标文件>.<标记>-<start>-<end>`
pub const DEFAULT_BLOCK_MARKER: &str = "blkpart";

/// 默认合并缓冲区大小：64KB
pub const DEFAULT_MERGE_BUFFER_SIZE: usize = 64 * 1024;

/// 默认进度采样间隔：1 秒
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// 默认连接超时
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// 目录模式下默认同时下载的文件数
pub const DEFAULT_MAX_CONCURRENT_FILES: usize = 100;

pub const DEFAULT_USER_AGENT: &str =
    concat!("range-fetch/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct TransferConfig {
    /// 分档策略
    pub policy: BlockPolicy,
    /// 分块文件名中的标记
    pub block_marker: String,
    /// 合并时的读缓冲大小（字节）
    pub merge_buffer_size: usize,
    /// 进度采样间隔，`None` 时不启动进度监控
    pub progress_interval: Option<Duration>,
    pub user_agent: String,
    pub connect_timeout: Duration,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            policy: BlockPolicy::default(),
            block_marker: DEFAULT_BLOCK_MARKER.to_string(),
            merge_buffer_size: DEFAULT_MERGE_BUFFER_SIZE,
            progress_interval: Some(DEFAULT_PROGRESS_INTERVAL),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl TransferConfig {
    /// 替换分档策略
    pub fn policy(mut self, policy: BlockPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 设置分块文件标记；空字符串沿用默认值
    pub fn block_marker(mut self, marker: &str) -> Self {
        self.block_marker = if marker.is_empty() {
            DEFAULT_BLOCK_MARKER.to_string()
        } else {
            marker.to_string()
        };
        self
    }

    /// 设置合并缓冲大小，最小 1 字节
    pub fn merge_buffer_size(mut self, size: usize) -> Self {
        self.merge_buffer_size = size.max(1);
        self
    }

    pub fn progress_interval(mut self, interval: Option<Duration>) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}
