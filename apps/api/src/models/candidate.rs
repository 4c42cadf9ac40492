use serde::{Deserialize, Serialize};

use crate::extraction::ResumeDocument;
use crate::models::links::ProfileLinks;

/// Which of the two people in a session.
/// `Person1` is the one asking; `Person2` is the crush or partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateSlot {
    Person1,
    Person2,
}

impl CandidateSlot {
    pub const ALL: [CandidateSlot; 2] = [CandidateSlot::Person1, CandidateSlot::Person2];

    pub fn index(self) -> usize {
        match self {
            CandidateSlot::Person1 => 0,
            CandidateSlot::Person2 => 1,
        }
    }
}

impl std::fmt::Display for CandidateSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateSlot::Person1 => f.write_str("person1"),
            CandidateSlot::Person2 => f.write_str("person2"),
        }
    }
}

/// One of the two parties being compared.
#[derive(Debug, Clone, Default)]
pub struct Candidate {
    pub resume: Option<ResumeDocument>,
    pub links: ProfileLinks,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_serde_is_lowercase() {
        let slot: CandidateSlot = serde_json::from_str(r#""person2""#).unwrap();
        assert_eq!(slot, CandidateSlot::Person2);
        assert_eq!(serde_json::to_string(&CandidateSlot::Person1).unwrap(), r#""person1""#);
    }

    #[test]
    fn test_slot_indices_are_distinct() {
        assert_eq!(CandidateSlot::Person1.index(), 0);
        assert_eq!(CandidateSlot::Person2.index(), 1);
        assert_eq!(CandidateSlot::Person2.to_string(), "person2");
    }
}
