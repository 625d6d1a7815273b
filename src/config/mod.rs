pub mod database;
pub mod redis;
pub mod summarizer;
