//! Deontic layer: Obligation (O), Permission (P) and Prohibition (F).
//!
//! F(x) ↔ ¬P(x). Anything carrying a forbidden or revoked right is denied
//! before any norm is weighed.

use crate::core::resolver::{ConflictResolver, ResolutionStrategy};
use serde::{Deserialize, Serialize};

pub const MEV_GUARD_NORM: &str = "ETHICAL_MEV_GUARD";
pub const SURVIVAL_NORM: &str = "SURVIVAL_AXIOM";

const SLIPPAGE_LIMIT: f64 = 0.01;
const MIN_COLLATERAL_RATIO: f64 = 1.3;
const DENIED_RIGHTS: [&str; 2] = ["FORBIDDEN", "REVOKED"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeonticModality {
    Obligation,
    Prohibition,
    Permission,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Norm {
    pub id: String,
    pub modality: DeonticModality,
    pub priority: u32,
}

impl Norm {
    /// A plain permission with the lowest priority.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            modality: DeonticModality::Permission,
            priority: 1,
        }
    }

    pub fn obligation(id: &str, priority: u32) -> Self {
        Self {
            id: id.to_string(),
            modality: DeonticModality::Obligation,
            priority,
        }
    }

    pub fn prohibition(id: &str, priority: u32) -> Self {
        Self {
            id: id.to_string(),
            modality: DeonticModality::Prohibition,
            priority,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionStatus {
    Allowed,
    Forbidden,
}

#[derive(Debug, Clone, Default)]
pub struct WorldState {
    pub collateral_ratio: f64,
    pub network_slippage: f64,
    pub market_volatility: f64,
}

#[derive(Debug, Clone)]
pub struct LogicVerdict {
    pub is_allowed: bool,
    pub confidence_score: u32,
    pub logs: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DeonticEngine {
    norms: Vec<Norm>,
    resolver: ConflictResolver,
}

impl DeonticEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(strategy: ResolutionStrategy) -> Self {
        Self {
            norms: Vec::new(),
            resolver: ConflictResolver::new(strategy),
        }
    }

    pub fn add_norm(&mut self, norm: Norm) {
        tracing::debug!(
            "Registering norm {} ({:?}, priority {})",
            norm.id,
            norm.modality,
            norm.priority
        );
        self.norms.push(norm);
    }

    pub fn norms(&self) -> &[Norm] {
        &self.norms
    }

    pub fn strategy(&self) -> ResolutionStrategy {
        self.resolver.strategy()
    }

    fn find(&self, id: &str) -> Option<&Norm> {
        self.norms.iter().find(|n| n.id == id)
    }

    /// Sovereign default deny.
    pub fn check_rights(proof: &str) -> bool {
        !DENIED_RIGHTS.iter().any(|right| proof.contains(right))
    }

    pub fn check_compliance(&self, payload: &str) -> ActionStatus {
        if !Self::check_rights(payload) {
            tracing::debug!("Payload carries a denied right");
            return ActionStatus::Forbidden;
        }

        let mut obligation_weight = 0u32;
        let mut prohibition_weight = 0u32;
        for norm in self.norms.iter().filter(|n| payload.contains(n.id.as_str())) {
            match norm.modality {
                DeonticModality::Obligation => {
                    obligation_weight = obligation_weight.saturating_add(norm.priority)
                }
                DeonticModality::Prohibition => {
                    prohibition_weight = prohibition_weight.saturating_add(norm.priority)
                }
                DeonticModality::Permission => {}
            }
        }

        if self
            .resolver
            .resolve(obligation_weight, prohibition_weight)
            .is_allowed()
        {
            ActionStatus::Allowed
        } else {
            ActionStatus::Forbidden
        }
    }

    /// Weighs anti-greed (MEV) against solvency for a profit-seeking action.
    pub fn check(&self, profit: f64, state: &WorldState) -> LogicVerdict {
        let mut logs = Vec::new();
        let mut forbidden_weight = 0u32;
        let mut mandatory_weight = 0u32;

        if state.network_slippage > SLIPPAGE_LIMIT && profit > 0.0 {
            if let Some(n) = self.find(MEV_GUARD_NORM) {
                forbidden_weight = forbidden_weight.saturating_add(n.priority);
                logs.push(format!(
                    "MODALITY_CRITICAL: {} triggered (Weight: {})",
                    n.id, n.priority
                ));
            }
        }

        if state.collateral_ratio < MIN_COLLATERAL_RATIO {
            if let Some(n) = self.find(SURVIVAL_NORM) {
                mandatory_weight = mandatory_weight.saturating_add(n.priority);
                logs.push(format!(
                    "MODALITY_CRITICAL: {} triggered (Weight: {})",
                    n.id, n.priority
                ));
            }
        }

        let is_allowed = self
            .resolver
            .resolve(mandatory_weight, forbidden_weight)
            .is_allowed();
        let confidence_score = if is_allowed {
            mandatory_weight
        } else {
            forbidden_weight
        };

        LogicVerdict {
            is_allowed,
            confidence_score,
            logs,
        }
    }
}
