//! Session storage implementations.

mod file_session_storage;
mod memory_session_storage;

pub use file_session_storage::FileSessionStorage;
pub use memory_session_storage::MemorySessionStorage;
