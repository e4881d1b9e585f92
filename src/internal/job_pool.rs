//! 目录模式下的文件级任务池：限制同时进行的整文件下载数，并提供统一的完成屏障。

pub mod structs;
