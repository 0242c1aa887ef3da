//! Boundary adapters turning external formats into domain values and back.

pub mod csv;
