use reqwest::Client;

use crate::internal::transfer::structs::transfer_config::TransferConfig;
use crate::internal::transfer::structs::transfer_error::TransferError;

/// 按配置创建 HTTP 客户端。
///
/// 不开启透明解压，保证 Range 偏移与资源字节一一对应；不设整体超时，大块下载可能持续很久。
pub fn build_client(config: &TransferConfig) -> Result<Client, TransferError> {
    let client = Client::builder()
        .http1_only()
        .user_agent(config.user_agent.as_str())
        .connect_timeout(config.connect_timeout)
        .build()?;
    Ok(client)
}
