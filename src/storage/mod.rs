//! Storage implementations for different back ends

pub mod in_memory;

pub use in_memory::InMemoryBackEnd;
