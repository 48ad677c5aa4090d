pub mod catalog;
pub mod storage;
pub mod tracking;
