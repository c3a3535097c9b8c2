//! Formal witnesses (π) for verified state transitions.

use crate::core::axioms::{AxiomaticEngine, LogicalDensity};
use serde::{Deserialize, Serialize};

pub const PROVER_ALGORITHM: &str = "Axiomatic-ZF-Prover";
const BASE_PROOF_DENSITY: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormalProof {
    pub witness_pi: String,
    pub density: u64,
    pub is_verified: bool,
}

impl LogicalDensity for FormalProof {
    fn logical_density(&self) -> u64 {
        self.density
    }
}

#[derive(Debug, Clone)]
pub struct ProofGenerator {
    pub algorithm: String,
}

impl Default for ProofGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProofGenerator {
    pub fn new() -> Self {
        Self {
            algorithm: PROVER_ALGORITHM.to_string(),
        }
    }

    pub fn generate_witness(&self, state_root: &str, action: &str) -> FormalProof {
        FormalProof {
            witness_pi: format!("π({} + {})_via_{}", state_root, action, self.algorithm),
            density: BASE_PROOF_DENSITY,
            is_verified: false,
        }
    }

    /// A witness is sound when sender and receiver differ and it carries weight.
    pub fn verify_witness(&self, proof: &mut FormalProof, sender: &str, receiver: &str) -> bool {
        proof.is_verified =
            AxiomaticEngine::verify_transition(sender, receiver) && proof.density > 0;
        proof.is_verified
    }
}

#[derive(Debug, Clone, Default)]
pub struct WitnessSet {
    pub proofs: Vec<FormalProof>,
}

impl WitnessSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, proof: FormalProof) {
        self.proofs.push(proof);
    }

    /// Returns how many proofs ended up verified.
    pub fn verify_all(&mut self, generator: &ProofGenerator, sender: &str, receiver: &str) -> usize {
        self.proofs
            .iter_mut()
            .map(|proof| generator.verify_witness(proof, sender, receiver))
            .filter(|verified| *verified)
            .count()
    }

    pub fn total_density(&self) -> u64 {
        self.proofs
            .iter()
            .filter(|p| p.is_verified)
            .map(|p| p.density)
            .fold(0u64, |acc, d| acc.saturating_add(d))
    }

    /// The verified proof selected by the Axiom of Choice.
    pub fn strongest(&self) -> Option<&FormalProof> {
        let verified: Vec<&FormalProof> = self.proofs.iter().filter(|p| p.is_verified).collect();
        AxiomaticEngine::resolve_choice(verified, |p| p.density)
    }
}
