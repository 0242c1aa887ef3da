//! Group configuration loaded from a TOML file.
//!
//! ```toml
//! roster = ["alice", "bob", "carol"]
//!
//! [settlement]
//! tolerance = "0.01"
//! ```

use crate::domain::participant::Roster;
use crate::domain::settlement::SettlementPolicy;
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    /// Participant names in display order.
    #[serde(default)]
    pub roster: Vec<String>,
    #[serde(default)]
    pub settlement: SettlementPolicy,
}

impl GroupConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let config: GroupConfig = toml::from_str(raw)?;
        if config.settlement.tolerance < Decimal::ZERO {
            return Err(LedgerError::Validation(
                "Settlement tolerance must not be negative".to_string(),
            ));
        }
        Ok(config)
    }

    /// Replaces the configured roster, e.g. with one given on the command line.
    pub fn with_roster(mut self, roster: Vec<String>) -> Self {
        self.roster = roster;
        self
    }

    pub fn roster(&self) -> Result<Roster> {
        Roster::new(self.roster.iter().cloned())
    }
}
