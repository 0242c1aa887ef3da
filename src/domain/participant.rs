use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A member of the group, identified by name or handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Participant(String);

impl Participant {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Participant {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// The fixed, ordered list of participants a group is configured with.
///
/// Declaration order is significant: balances are reported in this order and
/// it serves as the tie-break when settlement sorts equal balances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    members: Vec<Participant>,
}

impl Roster {
    /// Builds a roster, rejecting empty rosters, blank names and duplicates.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut members = Vec::new();

        for name in names {
            let name = name.into().trim().to_string();
            if name.is_empty() {
                return Err(LedgerError::Validation(
                    "Roster names must not be blank".to_string(),
                ));
            }
            if !seen.insert(name.clone()) {
                return Err(LedgerError::Validation(format!(
                    "Duplicate roster entry: {}",
                    name
                )));
            }
            members.push(Participant(name));
        }

        if members.is_empty() {
            return Err(LedgerError::Validation(
                "Roster must contain at least one participant".to_string(),
            ));
        }

        Ok(Self { members })
    }

    pub fn contains(&self, participant: &Participant) -> bool {
        self.members.contains(participant)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_preserves_declaration_order() {
        let roster = Roster::new(["carol", "alice", "bob"]).unwrap();
        let names: Vec<&str> = roster.iter().map(Participant::name).collect();
        assert_eq!(names, vec!["carol", "alice", "bob"]);
    }

    #[test]
    fn test_roster_trims_names() {
        let roster = Roster::new([" alice ", "bob"]).unwrap();
        assert!(roster.contains(&Participant::from("alice")));
    }

    #[test]
    fn test_roster_rejects_duplicates() {
        assert!(matches!(
            Roster::new(["alice", "bob", "alice"]),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_roster_rejects_blank_and_empty() {
        assert!(matches!(
            Roster::new(["alice", "  "]),
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            Roster::new(Vec::<String>::new()),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_participant_serializes_as_plain_string() {
        let json = serde_json::to_string(&Participant::from("alice")).unwrap();
        assert_eq!(json, "\"alice\"");
    }
}
