//! Durable storage adapters

mod file_kv;

pub use file_kv::FileKeyValueStore;
