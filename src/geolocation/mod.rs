mod error;
mod nominatim;
mod types;

pub use error::GeolocationError;
pub use nominatim::{NominatimGeocoder, ReverseGeocoder};
pub use types::NamedLocation;
