//! Layer 1 predicates. These define P(x) for the Axiom of Specification.

use crate::core::partition::LogicPartition;

const BASE_DENSITY: u64 = 100;
const REJECTED_ACTIONS: [&str; 2] = ["exploit", "overflow"];
const WITNESSED_ACTIONS: [&str; 2] = ["governance_vote", "large_transfer"];

pub struct EthicalRules;

impl EthicalRules {
    /// x ∈ M only if the action is non-harmful and does not attack the protocol.
    pub fn predicate_p(action: &str, impact_score: i32) -> bool {
        impact_score >= 0 && !REJECTED_ACTIONS.contains(&action)
    }

    /// Sensitive actions move to the Conditional branch until a witness is given.
    pub fn requires_witness(action: &str) -> bool {
        WITNESSED_ACTIONS.contains(&action)
    }

    pub fn calculate_logical_density(impact_score: i32) -> u64 {
        if impact_score < 0 {
            0
        } else {
            impact_score as u64 + BASE_DENSITY
        }
    }

    pub fn classify_action(action: &str, impact_score: i32) -> LogicPartition {
        if !Self::predicate_p(action, impact_score) {
            LogicPartition::Forbidden
        } else if Self::requires_witness(action) {
            LogicPartition::Conditional
        } else {
            LogicPartition::Allowed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_rejects_harm_and_exploits() {
        assert!(EthicalRules::predicate_p("transfer", 0));
        assert!(!EthicalRules::predicate_p("transfer", -1));
        assert!(!EthicalRules::predicate_p("exploit", 10));
        assert!(!EthicalRules::predicate_p("overflow", 10));
    }

    #[test]
    fn test_density() {
        assert_eq!(EthicalRules::calculate_logical_density(-5), 0);
        assert_eq!(EthicalRules::calculate_logical_density(0), 100);
        assert_eq!(EthicalRules::calculate_logical_density(42), 142);
    }

    #[test]
    fn test_classification_branches() {
        assert_eq!(EthicalRules::classify_action("transfer", 5), LogicPartition::Allowed);
        assert_eq!(
            EthicalRules::classify_action("governance_vote", 5),
            LogicPartition::Conditional
        );
        assert_eq!(
            EthicalRules::classify_action("large_transfer", -3),
            LogicPartition::Forbidden
        );
    }
}
