mod loader;

pub use loader::{RateLoaderError, RateRecord, RateTableLoader};
