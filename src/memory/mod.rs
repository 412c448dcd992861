//! 记忆层：跨智能体共享的会话记忆缓冲

pub mod session;

pub use session::{MemoryEntry, MemoryRole, SessionMemory, DEFAULT_CAPACITY};
