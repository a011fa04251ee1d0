pub mod codec;
mod task_store;

pub use task_store::{InMemoryTaskStore, StoreError, TaskStore};
