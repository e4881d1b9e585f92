use url::Url;

/// 条目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// 目录列表中的一项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// 绝对 URL；目录以 `/` 结尾
    pub url: Url,
    /// 解码后的名称，不含结尾的 `/`
    pub name: String,
    pub kind: EntryKind,
}
