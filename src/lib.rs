pub mod collab;
pub mod config;
pub mod error;
pub mod lineage;
pub mod logging;
pub mod model;
pub mod store;
pub mod tui;

mod tui_shell;
