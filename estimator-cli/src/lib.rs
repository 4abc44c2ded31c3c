pub mod app;
pub mod config;
pub mod logging;
pub mod projects;
pub mod render;
pub mod utils;
pub mod wizard;
