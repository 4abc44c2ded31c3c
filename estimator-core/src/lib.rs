pub mod calculations;
pub mod db;
pub mod models;
pub mod wizard;

pub use db::{DraftStore, StoreError};
pub use models::*;
