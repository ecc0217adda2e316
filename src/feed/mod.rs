mod epoch;
mod error;
mod fetcher;
mod parser;
mod types;

pub use epoch::{format_epoch, parse_epoch};
pub use error::{FetchError, ParseError};
pub use fetcher::{FeedSource, HttpFeedSource};
pub use parser::parse_oem;
pub use types::{OemDocument, OemHeader, OemMetadata, StateVector};

pub(crate) use epoch::serde_epoch;

#[cfg(test)]
pub(crate) use parser::tests as fixtures;
