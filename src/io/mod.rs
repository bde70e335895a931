pub mod api_client;
pub mod config_io;
pub mod query_cache;
pub mod state;
pub mod worker;
