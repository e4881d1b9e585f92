use percent_encoding::percent_decode_str;
use url::Url;

/// 无法从 URL 得到文件名时使用
pub const FALLBACK_FILE_NAME: &str = "download.bin";

/// 从 URL 最后一段路径得到本地文件名。
///
/// 会做 URL 解码，路径分隔符替换为 `_`，空名、`.`、`..` 退回 [`FALLBACK_FILE_NAME`]。
pub fn file_name_from_url(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut s| s.next_back())
        .unwrap_or("");

    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    let name: String = decoded
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect();

    match name.trim() {
        "" | "." | ".." => FALLBACK_FILE_NAME.to_string(),
        _ => name,
    }
}
