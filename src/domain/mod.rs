//! Pure domain types and logic: no I/O, no clocks, no collaborators.

pub mod order;
pub mod passenger;
pub mod ports;
pub mod train;
