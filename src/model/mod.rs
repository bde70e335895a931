pub mod api;
pub mod config;
pub mod task;

pub use api::*;
pub use config::*;
pub use task::*;
