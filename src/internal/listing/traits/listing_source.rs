use async_trait::async_trait;
use url::Url;

use crate::internal::listing::structs::listing_entry::ListingEntry;
use crate::internal::transfer::structs::transfer_error::TransferError;

/// 目录列表来源：给定目录 URL，返回其直接子项（不递归）。
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn list(&self, dir_url: &Url) -> Result<Vec<ListingEntry>, TransferError>;
}
