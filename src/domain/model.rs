use crate::core::partition::LogicPartition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One item submitted for a batch audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRequest {
    pub id: String,
    pub payload: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub impact_score: Option<i32>,
    /// Rights proof checked against the deontic default deny.
    #[serde(default)]
    pub proof: Option<String>,
    /// Access token the payload must contain (Separation).
    #[serde(default)]
    pub predicate: Option<String>,
}

impl AuditRequest {
    pub fn new(id: &str, payload: &str) -> Self {
        Self {
            id: id.to_string(),
            payload: payload.to_string(),
            action: None,
            impact_score: None,
            proof: None,
            predicate: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: String,
    pub partition: LogicPartition,
    pub allowed: bool,
    pub reason: String,
    pub density: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub kernel_version: String,
    pub generated_at: DateTime<Utc>,
    pub records: Vec<AuditRecord>,
}

impl AuditReport {
    fn count(&self, partition: LogicPartition) -> usize {
        self.records.iter().filter(|r| r.partition == partition).count()
    }

    pub fn allowed_count(&self) -> usize {
        self.count(LogicPartition::Allowed)
    }

    pub fn forbidden_count(&self) -> usize {
        self.count(LogicPartition::Forbidden)
    }

    pub fn conditional_count(&self) -> usize {
        self.count(LogicPartition::Conditional)
    }
}
