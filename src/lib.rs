pub mod config;
pub mod resolver;
