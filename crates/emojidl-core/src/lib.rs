pub mod config;
pub mod logging;

pub mod http;
pub mod images;
pub mod pack;
pub mod pool;
pub mod storage;
pub mod sweep;
pub mod template;
