use crate::utils::error::CrystallineError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// Obligation wins when its weight is at least the prohibition weight.
    #[default]
    StandardWeighted,
    /// Any prohibition vetoes the action.
    StrictSafety,
}

impl FromStr for ResolutionStrategy {
    type Err = CrystallineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "standard_weighted" => Ok(Self::StandardWeighted),
            "strict_safety" => Ok(Self::StrictSafety),
            other => Err(CrystallineError::validation(
                "deontic.strategy",
                format!("Unknown resolution strategy: {}", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionResult {
    Allowed(String),
    Denied(String),
}

impl ResolutionResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, ResolutionResult::Allowed(_))
    }

    pub fn reason(&self) -> &str {
        match self {
            ResolutionResult::Allowed(reason) | ResolutionResult::Denied(reason) => reason,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConflictResolver {
    strategy: ResolutionStrategy,
}

impl ConflictResolver {
    pub fn new(strategy: ResolutionStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> ResolutionStrategy {
        self.strategy
    }

    /// Arbitrates between the weight of obligations and prohibitions.
    pub fn resolve(&self, obligation_weight: u32, prohibition_weight: u32) -> ResolutionResult {
        let result = match self.strategy {
            ResolutionStrategy::StandardWeighted => {
                if obligation_weight >= prohibition_weight {
                    ResolutionResult::Allowed("Obligation outweighs Prohibition".to_string())
                } else {
                    ResolutionResult::Denied("Prohibition weight too high".to_string())
                }
            }
            ResolutionStrategy::StrictSafety => {
                if prohibition_weight > 0 {
                    ResolutionResult::Denied(
                        "Strict Safety Mode: Zero-tolerance for prohibitions".to_string(),
                    )
                } else {
                    ResolutionResult::Allowed("No prohibitions detected".to_string())
                }
            }
        };

        tracing::debug!(
            "Resolved O={} P={} under {:?}: {:?}",
            obligation_weight,
            prohibition_weight,
            self.strategy,
            result
        );
        result
    }
}
