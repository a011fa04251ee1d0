//! Core abstractions for Tasker: the task model, command/outcome contracts,
//! and the storage boundary. Concrete stores and the operations live in
//! sibling crates so this one stays dependency-light.

pub mod clock;
pub mod command;
pub mod listing;
pub mod storage;
pub mod tasks;
