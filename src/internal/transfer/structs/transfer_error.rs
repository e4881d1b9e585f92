//! 传输相关错误类型。

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("服务器不支持 Range 请求: {url}")]
    UnsupportedRange { url: String },

    #[error("文件已经存在，若要重新下载，请删除文件后重试: {}", path.display())]
    AlreadyComplete { path: PathBuf },

    #[error("HTTP 请求失败: {0}")]
    Network(#[from] reqwest::Error),

    #[error("服务器返回异常状态 {status}: {url}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("服务器返回的范围与请求不符，请求起点 {requested}，响应起点 {actual:?}: {url}")]
    RangeMismatch {
        url: String,
        requested: u64,
        actual: Option<u64>,
    },

    #[error("响应中缺少 Content-Length: {url}")]
    UnknownContentLength { url: String },

    #[error("分块数据不完整，期望 {expected} 字节，实际 {received} 字节: {}", path.display())]
    IncompleteTransfer {
        path: PathBuf,
        expected: u64,
        received: u64,
    },

    #[error("文件未能完全下载 filesize:{actual},total:{expected}: {}", path.display())]
    SizeMismatch {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    #[error("文件操作失败 {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("目标路径是目录: {}", path.display())]
    IsDir { path: PathBuf },

    #[error("合并偏移不一致，写入位置 {expected}，分块起点 {actual}")]
    MergeOffset { expected: u64, actual: u64 },

    #[error("分块 {start}-{end} 下载失败: {source}")]
    Block {
        start: u64,
        end: u64,
        #[source]
        source: Box<TransferError>,
    },

    #[error("本轮有 {} 个分块失败", .0.len())]
    RoundFailed(Vec<TransferError>),

    #[error("分块策略配置无效: {0}")]
    InvalidPolicy(String),

    #[error("URL 格式错误: {0}")]
    InvalidUrl(String),

    #[error("读取目录列表失败 {url}: {message}")]
    Listing { url: String, message: String },

    #[error("任务池已关闭，任务未执行")]
    PoolClosed,

    #[error("分块任务异常退出: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl TransferError {
    /// 把 io 错误与出错路径绑定，配合 `map_err` 使用。
    pub(crate) fn fs(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Filesystem {
            path: path.to_path_buf(),
            source,
        }
    }

    /// 剥掉 [`TransferError::Block`] 包装，返回真正的错误。
    pub fn root(&self) -> &TransferError {
        match self {
            Self::Block { source, .. } => source.root(),
            other => other,
        }
    }
}
