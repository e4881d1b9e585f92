//! 测试模块入口：`lib` 提供模拟服务器与测试数据，`internal` 按组件划分。

#[cfg(test)]
pub use lib::*;
