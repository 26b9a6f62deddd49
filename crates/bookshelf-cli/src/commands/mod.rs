pub mod book;
pub mod config;
