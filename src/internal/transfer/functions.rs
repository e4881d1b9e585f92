pub mod byte_format;
pub mod file_name;
pub mod http_client;

pub use byte_format::format_bytes;
pub use file_name::{file_name_from_url, FALLBACK_FILE_NAME};
pub use http_client::build_client;
