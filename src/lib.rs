pub mod arguments;
pub mod coin;
pub mod config;
pub mod errors;
pub mod filtering;
pub mod logger;
pub mod notifications;
pub mod paths;
pub mod scanner;
pub mod screener;
pub mod sent_cache;
