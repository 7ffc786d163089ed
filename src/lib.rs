pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod highlight;
pub mod models;
pub mod persistence;
pub mod state;
pub mod storage;
pub mod tone;
pub mod tracker;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use tracker::Tracker;
