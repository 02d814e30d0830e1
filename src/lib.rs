pub mod config;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod message;
pub mod query;
pub mod search;

pub use debounce::DebounceScheduler;
pub use error::ViewerError;
pub use filter::{FilterSummary, MessageFilter};
pub use message::Message;
pub use query::{Query, SearchFields};
pub use search::LiveSearch;
