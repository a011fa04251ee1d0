//! On-disk task storage: one JSON document, replaced atomically on save.

pub mod json_file_store;

pub use json_file_store::JsonFileStore;
