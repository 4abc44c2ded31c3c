pub mod repository;

pub use repository::{DraftStore, StoreError};
