//! 目录列表：把远程目录页解析成带类型的条目（目录 / 文件），供目录模式遍历。
//!
//! 传输核心不解析 HTML，只消费这里给出的 [`structs::ListingEntry`]。

pub mod functions;
pub mod structs;
pub mod traits;
