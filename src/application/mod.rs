//! Orchestration layer: the availability poller and the acquisition
//! engine driving collaborator ports.

pub mod engine;
pub mod poller;
