//! 可续传的多线程 HTTP 下载库：把文件切成按字节范围的分块并发拉取，按轮合并进目标文件。
//! 中断后再次运行时，根据目标文件与残留分块文件的长度从断点继续。

/// 内部实现模块
mod internal;

#[cfg(test)]
mod tests;

/// 导出核心入口函数
pub use internal::entrance::remote::*;

/// 单文件分块传输：策略、续传检测、分块下载、合并与进度
pub mod transfer {
    use crate::internal;
    pub use internal::transfer::functions::*;
    pub use internal::transfer::structs::*;
    pub use internal::transfer::structs::transfer_config::{
        DEFAULT_BLOCK_MARKER, DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_CONCURRENT_FILES,
        DEFAULT_MERGE_BUFFER_SIZE, DEFAULT_PROGRESS_INTERVAL, DEFAULT_USER_AGENT,
    };
}

/// 目录列表：目录模式使用的外部协作者接口及 HTML 索引页实现
pub mod listing {
    use crate::internal;
    pub use internal::listing::functions::*;
    pub use internal::listing::structs::*;
    pub use internal::listing::traits::*;
}

/// 文件级任务池
pub mod job_pool {
    use crate::internal;
    pub use internal::job_pool::structs::*;
}
