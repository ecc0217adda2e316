mod error;
mod index;

pub use error::LookupError;
pub use index::EpochIndex;

use crate::feed::{OemDocument, OemHeader, OemMetadata};

/// An immutable published dataset: the epoch index plus the descriptive parts
/// of the message it was built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ephemeris {
    pub header: OemHeader,
    pub metadata: OemMetadata,
    pub comments: Vec<String>,
    pub index: EpochIndex,
}

impl From<OemDocument> for Ephemeris {
    fn from(doc: OemDocument) -> Self {
        Self {
            header: doc.header,
            metadata: doc.metadata,
            comments: doc.comments,
            index: EpochIndex::new(doc.state_vectors),
        }
    }
}
