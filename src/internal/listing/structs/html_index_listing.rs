use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::internal::listing::functions::parse_index_html::parse_index_html;
use crate::internal::listing::structs::listing_entry::ListingEntry;
use crate::internal::listing::traits::listing_source::ListingSource;
use crate::internal::transfer::structs::transfer_error::TransferError;

/// 读取 HTTP 服务器自动生成的目录索引页（nginx / Apache 风格）。
#[derive(Debug, Clone)]
pub struct HtmlIndexListing {
    client: Client,
}

impl HtmlIndexListing {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ListingSource for HtmlIndexListing {
    async fn list(&self, dir_url: &Url) -> Result<Vec<ListingEntry>, TransferError> {
        let resp = self.client.get(dir_url.as_str()).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransferError::HttpStatus {
                url: dir_url.to_string(),
                status,
            });
        }

        let html = resp.text().await.map_err(|e| TransferError::Listing {
            url: dir_url.to_string(),
            message: e.to_string(),
        })?;
        Ok(parse_index_html(dir_url, &html))
    }
}
