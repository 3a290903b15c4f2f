pub mod config;
pub mod envelope;
pub mod http;
pub mod storage;
