pub mod listing_source;

pub use listing_source::ListingSource;
