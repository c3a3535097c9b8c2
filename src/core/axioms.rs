//! Layer 0 invariants expressed as ZF axioms.
//!
//! Every check here is a pure predicate. The kernel decides which axioms are
//! enforced and turns failures into [`CrystallineError::AxiomaticViolation`].
//!
//! [`CrystallineError::AxiomaticViolation`]: crate::utils::error::CrystallineError

use crate::utils::error::CrystallineError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// Payloads carrying this marker reference their own root state.
pub const RECURSION_MARKER: &str = "recursive_loop";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axiom {
    Extensionality,
    Regularity,
    Separation,
    Choice,
}

impl Axiom {
    pub const ALL: [Axiom; 4] = [
        Axiom::Extensionality,
        Axiom::Regularity,
        Axiom::Separation,
        Axiom::Choice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Axiom::Extensionality => "extensionality",
            Axiom::Regularity => "regularity",
            Axiom::Separation => "separation",
            Axiom::Choice => "choice",
        }
    }
}

impl fmt::Display for Axiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axiom {
    type Err = CrystallineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "extensionality" => Ok(Axiom::Extensionality),
            "regularity" => Ok(Axiom::Regularity),
            "separation" => Ok(Axiom::Separation),
            "choice" => Ok(Axiom::Choice),
            other => Err(CrystallineError::validation(
                "kernel.enforce",
                format!("Unknown axiom: {}", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateNode {
    pub id: String,
    pub parent_id: Option<String>,
}

impl StateNode {
    pub fn root(id: &str) -> Self {
        Self {
            id: id.to_string(),
            parent_id: None,
        }
    }

    pub fn child(id: &str, parent_id: &str) -> Self {
        Self {
            id: id.to_string(),
            parent_id: Some(parent_id.to_string()),
        }
    }
}

/// Anything that can be ranked by the Axiom of Choice.
pub trait LogicalDensity {
    fn logical_density(&self) -> u64;
}

pub struct AxiomaticEngine;

impl AxiomaticEngine {
    /// Extensionality on raw data: the empty set carries no identity.
    pub fn verify_extensionality(data: &str) -> bool {
        !data.is_empty()
    }

    /// ∀x∀y (∀z(z ∈ x ↔ z ∈ y) → x = y)
    pub fn sets_are_equal<T: Eq + Hash>(set_a: &HashSet<T>, set_b: &HashSet<T>) -> bool {
        if set_a.len() != set_b.len() {
            return false;
        }
        set_a.iter().all(|item| set_b.contains(item))
    }

    /// Regularity on a payload: no reference to its own root state.
    pub fn verify_regularity(payload: &str) -> bool {
        !payload.contains(RECURSION_MARKER)
    }

    /// A transition must move to a different state.
    pub fn verify_transition(current_val: &str, next_val: &str) -> bool {
        current_val != next_val
    }

    /// x ∉ x: a node cannot be its own parent. Roots are always regular.
    pub fn verify_lineage(node: &StateNode) -> bool {
        match &node.parent_id {
            Some(parent_id) => node.id != *parent_id,
            None => true,
        }
    }

    /// Foundation over a whole set of nodes: no parent chain loops back.
    ///
    /// Parents outside the set are treated as external roots.
    pub fn verify_acyclic(nodes: &[StateNode]) -> bool {
        let parents: HashMap<&str, Option<&str>> = nodes
            .iter()
            .map(|n| (n.id.as_str(), n.parent_id.as_deref()))
            .collect();

        // Nodes already proven to reach a root.
        let mut grounded: HashSet<&str> = HashSet::new();

        for node in nodes {
            let mut path: HashSet<&str> = HashSet::new();
            let mut cursor = Some(node.id.as_str());

            while let Some(id) = cursor {
                if grounded.contains(id) {
                    break;
                }
                if !path.insert(id) {
                    tracing::debug!("Regularity violated: cycle through '{}'", id);
                    return false;
                }
                cursor = parents.get(id).copied().flatten();
                if let Some(next) = cursor {
                    if !parents.contains_key(next) {
                        break;
                    }
                }
            }

            grounded.extend(path);
        }

        true
    }

    /// Separation: access requires the predicate φ (an access token).
    pub fn verify_separation(data: &str, predicate: &str) -> bool {
        !predicate.is_empty() && data.contains(predicate)
    }

    /// ∀A ∃B ∀x (x ∈ B ↔ (x ∈ A ∧ P(x)))
    pub fn apply_specification<T, F>(input_set: Vec<T>, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        input_set.into_iter().filter(|x| predicate(x)).collect()
    }

    /// A choice function exists only over a non-empty family.
    pub fn verify_choice(states: &[&str]) -> bool {
        !states.is_empty()
    }

    /// Deterministic choice between two candidates. Ties keep `tx_a`.
    pub fn dcf_select<T: LogicalDensity>(tx_a: T, tx_b: T) -> T {
        if tx_a.logical_density() >= tx_b.logical_density() {
            tx_a
        } else {
            tx_b
        }
    }

    /// Highest density wins; on ties the earliest option is kept.
    pub fn resolve_choice<T, F>(options: Vec<T>, density_score: F) -> Option<T>
    where
        F: Fn(&T) -> u64,
    {
        let mut best: Option<(u64, T)> = None;
        for option in options {
            let score = density_score(&option);
            let replace = match &best {
                Some((best_score, _)) => score > *best_score,
                None => true,
            };
            if replace {
                best = Some((score, option));
            }
        }
        best.map(|(_, option)| option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Candidate {
        id: &'static str,
        density: u64,
    }

    impl LogicalDensity for Candidate {
        fn logical_density(&self) -> u64 {
            self.density
        }
    }

    #[test]
    fn test_regularity_violation() {
        let node = StateNode::child("node_1", "node_1");
        assert!(!AxiomaticEngine::verify_lineage(&node));
        assert!(AxiomaticEngine::verify_lineage(&StateNode::root("genesis")));
        assert!(!AxiomaticEngine::verify_regularity("a recursive_loop here"));
        assert!(AxiomaticEngine::verify_regularity("user_message_payload_77"));
    }

    #[test]
    fn test_acyclic_detects_long_cycles() {
        let chain = vec![
            StateNode::root("a"),
            StateNode::child("b", "a"),
            StateNode::child("c", "b"),
        ];
        assert!(AxiomaticEngine::verify_acyclic(&chain));

        let cycle = vec![
            StateNode::child("a", "c"),
            StateNode::child("b", "a"),
            StateNode::child("c", "b"),
        ];
        assert!(!AxiomaticEngine::verify_acyclic(&cycle));
    }

    #[test]
    fn test_acyclic_external_parent_is_root() {
        let nodes = vec![StateNode::child("x", "outside"), StateNode::child("y", "x")];
        assert!(AxiomaticEngine::verify_acyclic(&nodes));
    }

    #[test]
    fn test_extensionality_on_sets() {
        let a: HashSet<_> = ["x", "y"].into_iter().collect();
        let b: HashSet<_> = ["y", "x"].into_iter().collect();
        let c: HashSet<_> = ["x", "z"].into_iter().collect();
        assert!(AxiomaticEngine::sets_are_equal(&a, &b));
        assert!(!AxiomaticEngine::sets_are_equal(&a, &c));
        assert!(!AxiomaticEngine::verify_extensionality(""));
    }

    #[test]
    fn test_separation_requires_token() {
        assert!(AxiomaticEngine::verify_separation("token=abc;data", "token=abc"));
        assert!(!AxiomaticEngine::verify_separation("data", "token=abc"));
        assert!(!AxiomaticEngine::verify_separation("data", ""));
    }

    #[test]
    fn test_specification_keeps_order() {
        let filtered = AxiomaticEngine::apply_specification(vec![5, -1, 3, -7, 9], |x| *x > 0);
        assert_eq!(filtered, vec![5, 3, 9]);
    }

    #[test]
    fn test_choice_function() {
        let tx1 = Candidate { id: "tx_1", density: 100 };
        let tx2 = Candidate { id: "tx_2", density: 200 };
        assert_eq!(AxiomaticEngine::dcf_select(tx1.clone(), tx2).id, "tx_2");

        let tie = Candidate { id: "tx_3", density: 100 };
        assert_eq!(AxiomaticEngine::dcf_select(tx1, tie).id, "tx_1");
    }

    #[test]
    fn test_resolve_choice_tie_keeps_first() {
        let options = vec![
            Candidate { id: "a", density: 10 },
            Candidate { id: "b", density: 30 },
            Candidate { id: "c", density: 30 },
        ];
        let winner = AxiomaticEngine::resolve_choice(options, |c| c.density).unwrap();
        assert_eq!(winner.id, "b");
        assert!(AxiomaticEngine::resolve_choice(Vec::<Candidate>::new(), |c| c.density).is_none());
        assert!(!AxiomaticEngine::verify_choice(&[]));
    }

    #[test]
    fn test_axiom_parsing() {
        assert_eq!("Regularity".parse::<Axiom>().unwrap(), Axiom::Regularity);
        assert!("infinity".parse::<Axiom>().is_err());
        assert_eq!(Axiom::Choice.to_string(), "choice");
    }
}
