pub mod parse_index_html;

pub use parse_index_html::{ensure_dir_url, parse_index_html};
