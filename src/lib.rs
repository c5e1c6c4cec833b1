pub mod config;
pub mod darwin;
pub mod server;
pub mod translator;
