//! HTTP API handlers for annot-ui

pub mod actions;
pub mod export;
pub mod health;
pub mod ui;

pub use actions::session_routes;
pub use export::export_routes;
pub use health::health_routes;
pub use ui::ui_routes;
