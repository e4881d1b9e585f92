pub mod html_index_listing;
pub mod listing_entry;

pub use html_index_listing::HtmlIndexListing;
pub use listing_entry::{EntryKind, ListingEntry};
