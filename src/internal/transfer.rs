//! 分块续传下载的核心：分块策略、单块续传、按轮调度与合并。
//!
//! 对外导出以 [`crate::transfer`] 为准，此处仅做模块划分。

pub mod functions;
pub mod structs;
