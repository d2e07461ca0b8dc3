pub mod config;
pub mod question_client;
