//! Domain model and the pure balance/settlement computations.

pub mod balance;
pub mod expense;
pub mod participant;
pub mod ports;
pub mod settlement;
