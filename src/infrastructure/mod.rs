//! Adapters behind the domain ports: an in-memory status sink and a
//! scripted booking service for tests and rehearsal runs.

pub mod in_memory;
pub mod scripted;
