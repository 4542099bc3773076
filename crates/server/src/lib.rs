pub mod config;
pub mod error;
pub mod prompt;
pub mod routes;
pub mod state;
