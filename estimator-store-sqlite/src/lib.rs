mod repository;

pub use repository::SqliteDraftStore;
