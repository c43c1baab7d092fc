//! Data module - source loading, geolocation repair, and view building

pub(crate) mod cell;
mod geocode;
mod loader;
mod processor;
pub mod schema;

pub use geocode::{fill_missing_coordinates, normalize_postal_code, GeocodeError, ZipGazetteer};
pub use loader::{ensure_columns, LoaderError, SourceTables};
pub use processor::{ProcessorError, ViewBuilder};
