use crate::core::axioms::AxiomaticEngine;
use crate::utils::error::{CrystallineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_MAX_LABEL_LEN: usize = 64;

/// The three branches produced by the Axiom of Specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicPartition {
    /// Set M: satisfies P(x).
    Allowed,
    /// Set N: violates P(x) or an invariant.
    Forbidden,
    /// Set R: requires an auxiliary witness π.
    Conditional,
}

impl fmt::Display for LogicPartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogicPartition::Allowed => "allowed",
            LogicPartition::Forbidden => "forbidden",
            LogicPartition::Conditional => "conditional",
        };
        f.write_str(name)
    }
}

/// A label naming an isolated partition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartitionLabel(String);

impl PartitionLabel {
    /// Labels are `[A-Za-z0-9][A-Za-z0-9_.-]*`, bounded in length and regular.
    pub fn parse(label: &str, max_len: usize) -> Result<Self> {
        if label.is_empty() {
            return Err(CrystallineError::validation("partition.label", "Label is empty"));
        }
        if label.len() > max_len {
            return Err(CrystallineError::validation(
                "partition.label",
                format!("Label exceeds {} bytes", max_len),
            ));
        }

        let mut chars = label.chars();
        let leads_alphanumeric = chars.next().is_some_and(|c| c.is_ascii_alphanumeric());
        let rest_allowed = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !leads_alphanumeric || !rest_allowed {
            return Err(CrystallineError::validation(
                "partition.label",
                format!("Label '{}' contains unsupported characters", label),
            ));
        }

        if !AxiomaticEngine::verify_regularity(label) {
            return Err(CrystallineError::validation(
                "partition.label",
                format!("Label '{}' violates regularity", label),
            ));
        }

        Ok(Self(label.to_string()))
    }

    pub fn is_valid(label: &str) -> bool {
        Self::parse(label, DEFAULT_MAX_LABEL_LEN).is_ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartitionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The subset a partition exposes, defined by its predicate.
#[derive(Debug, Clone, Default)]
pub struct AxiomaticSubset<T> {
    pub elements: Vec<T>,
    pub predicate_id: String,
}

#[derive(Debug)]
struct IsolatedPartition {
    subset: AxiomaticSubset<String>,
}

impl IsolatedPartition {
    fn admit(&self, label: &str, token: &str) -> Result<()> {
        if AxiomaticEngine::verify_separation(token, &self.subset.predicate_id) {
            Ok(())
        } else {
            tracing::warn!("Separation denied access to partition '{}'", label);
            Err(CrystallineError::axiom(
                "separation",
                format!("Token does not grant access to partition '{}'", label),
            ))
        }
    }
}

/// Named partitions whose elements are only reachable through their token.
#[derive(Debug)]
pub struct PartitionRegistry {
    partitions: BTreeMap<PartitionLabel, IsolatedPartition>,
    max_label_len: usize,
}

impl Default for PartitionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LABEL_LEN)
    }
}

impl PartitionRegistry {
    pub fn new(max_label_len: usize) -> Self {
        Self {
            partitions: BTreeMap::new(),
            max_label_len,
        }
    }

    pub fn create(&mut self, label: &str, access_token: &str) -> Result<()> {
        let label = PartitionLabel::parse(label, self.max_label_len)?;
        if access_token.is_empty() {
            return Err(CrystallineError::validation(
                "partition.access_token",
                "Access token cannot be empty",
            ));
        }
        if self.partitions.contains_key(&label) {
            return Err(CrystallineError::LogicalInconsistency {
                message: format!("Partition '{}' already exists", label),
            });
        }

        tracing::info!("Created isolated partition '{}'", label);
        self.partitions.insert(
            label,
            IsolatedPartition {
                subset: AxiomaticSubset {
                    elements: Vec::new(),
                    predicate_id: access_token.to_string(),
                },
            },
        );
        Ok(())
    }

    fn lookup(&self, label: &str) -> Result<&IsolatedPartition> {
        let key = PartitionLabel::parse(label, self.max_label_len)?;
        self.partitions
            .get(&key)
            .ok_or_else(|| CrystallineError::LogicalInconsistency {
                message: format!("Unknown partition '{}'", label),
            })
    }

    pub fn insert(&mut self, label: &str, token: &str, element: &str) -> Result<()> {
        self.lookup(label)?.admit(label, token)?;
        let key = PartitionLabel::parse(label, self.max_label_len)?;
        if let Some(partition) = self.partitions.get_mut(&key) {
            partition.subset.elements.push(element.to_string());
        }
        Ok(())
    }

    pub fn elements(&self, label: &str, token: &str) -> Result<&[String]> {
        let partition = self.lookup(label)?;
        partition.admit(label, token)?;
        Ok(&partition.subset.elements)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.partitions.keys().map(PartitionLabel::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }
}
