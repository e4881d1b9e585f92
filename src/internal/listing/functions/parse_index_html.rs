//! 从目录索引页中提取子项链接。
//!
//! 用 quick-xml 宽松模式逐个读取 `<a href>`，不要求页面是合法 XML；
//! 遇到无法解析的内容时停止，返回已取得的条目。

use percent_encoding::percent_decode_str;
use quick_xml::escape::unescape;
use quick_xml::events::Event;
use quick_xml::Reader;
use url::Url;

use crate::internal::listing::structs::listing_entry::{EntryKind, ListingEntry};

/// 保证目录 URL 以 `/` 结尾，相对链接才能正确拼接
pub fn ensure_dir_url(url: &Url) -> Url {
    let mut url = url.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// 解析目录页，只保留 `dir_url` 的直接子项；`href` 以 `/` 结尾的视为目录。
pub fn parse_index_html(dir_url: &Url, html: &str) -> Vec<ListingEntry> {
    let base = ensure_dir_url(dir_url);

    let mut reader = Reader::from_str(html);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut entries: Vec<ListingEntry> = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if !e.name().as_ref().eq_ignore_ascii_case(b"a") {
                    continue;
                }
                let href = e
                    .html_attributes()
                    .flatten()
                    .find(|a| a.key.as_ref().eq_ignore_ascii_case(b"href"))
                    .and_then(|a| {
                        let raw = String::from_utf8_lossy(&a.value).into_owned();
                        unescape(&raw).map(|s| s.into_owned()).ok()
                    });

                if let Some(entry) = href.and_then(|h| entry_from_href(&base, &h))
                    && !entries.iter().any(|x| x.url == entry.url)
                {
                    entries.push(entry);
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            Ok(_) => {}
        }
    }

    entries
}

fn entry_from_href(base: &Url, href: &str) -> Option<ListingEntry> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('?') || href.starts_with('#') {
        return None;
    }

    let mut url = base.join(href).ok()?;
    url.set_query(None);
    url.set_fragment(None);

    if url.scheme() != base.scheme()
        || url.host_str() != base.host_str()
        || url.port_or_known_default() != base.port_or_known_default()
    {
        return None;
    }

    // 只要直接子项：去掉父路径后不能再含 `/`
    let rest = url.path().strip_prefix(base.path())?;
    let kind = if rest.ends_with('/') {
        EntryKind::Directory
    } else {
        EntryKind::File
    };
    let segment = rest.trim_end_matches('/');
    if segment.is_empty() || segment.contains('/') {
        return None;
    }

    let name = percent_decode_str(segment).decode_utf8_lossy().into_owned();
    if name == "." || name == ".." {
        return None;
    }

    Some(ListingEntry { url, name, kind })
}
