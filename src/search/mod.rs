pub mod interface;
pub mod google;

pub use interface::{SearchError, SearchHit, SearchProvider};
pub use google::GoogleSearch;
