pub mod config;
pub mod credentials;
pub mod email;
pub mod error;
pub mod logging;
pub mod matcher;
pub mod models;
pub mod operator;
pub mod parse;
pub mod scraping;
pub mod workflow;
