pub mod content;
pub mod database;
pub mod event;
pub mod storage;
