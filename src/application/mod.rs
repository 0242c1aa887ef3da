//! Application layer orchestrating the store and the domain computations.
//!
//! `ExpenseLedger` is the entry point: it validates and records expenses,
//! and evaluates balances and settlements over consistent store snapshots.

pub mod ledger;
