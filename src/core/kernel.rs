//! The Crystalline kernel: enforced axioms, deontic norms and sealing in one place.

use crate::config::toml_config::TomlConfig;
use crate::core::axioms::{Axiom, AxiomaticEngine, LogicalDensity};
use crate::core::crypto::{self, derive_key, SealedPacket};
use crate::core::deontic::{ActionStatus, DeonticEngine, Norm};
use crate::core::ethics::EthicalRules;
use crate::core::partition::{LogicPartition, PartitionLabel, DEFAULT_MAX_LABEL_LEN};
use crate::core::proof::{FormalProof, ProofGenerator};
use crate::domain::model::{AuditRecord, AuditRequest};
use crate::utils::error::{CrystallineError, Result};
use std::collections::BTreeSet;

pub const KERNEL_VERSION: &str = "0.1.0-full-axiomatic";
pub const MOBILE_INTEGRITY_NORM: &str = "MOBILE_DATA_INTEGRITY";

/// A state root together with the elements already committed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSet {
    pub root: String,
    pub elements: BTreeSet<String>,
}

impl StateSet {
    pub fn new(root: &str) -> Self {
        Self {
            root: root.to_string(),
            elements: BTreeSet::new(),
        }
    }

    pub fn with_elements<I, S>(root: &str, elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root: root.to_string(),
            elements: elements.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: String,
    pub amount: String,
    pub parent: Option<String>,
    pub logical_density: u64,
}

impl Transaction {
    pub fn new_withdrawal(id: &str, amount: &str) -> Self {
        Self {
            id: id.to_string(),
            amount: amount.to_string(),
            parent: None,
            logical_density: 100,
        }
    }

    pub fn with_parent(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    pub fn with_density(mut self, density: u64) -> Self {
        self.logical_density = density;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl LogicalDensity for Transaction {
    fn logical_density(&self) -> u64 {
        self.logical_density
    }
}

/// Raw input captured outside the untrusted application.
#[derive(Debug, Clone)]
pub struct TrustedInput {
    text: String,
}

impl TrustedInput {
    pub fn capture(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone)]
pub struct Kernel {
    pub version: String,
    enforced: BTreeSet<Axiom>,
    deontic: DeonticEngine,
    prover: ProofGenerator,
    max_label_len: usize,
}

impl Default for Kernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel {
    /// A kernel with no axioms enforced and no norms.
    pub fn new() -> Self {
        Self {
            version: KERNEL_VERSION.to_string(),
            enforced: BTreeSet::new(),
            deontic: DeonticEngine::new(),
            prover: ProofGenerator::new(),
            max_label_len: DEFAULT_MAX_LABEL_LEN,
        }
    }

    /// All four axioms plus the mobile data integrity norm.
    pub fn default_policy() -> Self {
        let mut kernel = Self::new();
        for axiom in Axiom::ALL {
            kernel.enforce(axiom);
        }
        kernel.deontic.add_norm(Norm::new(MOBILE_INTEGRITY_NORM));
        kernel
    }

    pub fn from_config(config: &TomlConfig) -> Result<Self> {
        let mut kernel = Self::new();
        kernel.deontic = DeonticEngine::with_strategy(config.strategy()?);
        for axiom in config.enforced_axioms()? {
            kernel.enforce(axiom);
        }
        for norm in config.norms() {
            kernel.deontic.add_norm(norm);
        }
        kernel.max_label_len = config.max_label_len();

        tracing::info!(
            "Kernel {} loaded: {} axioms, {} norms, {:?}",
            kernel.version,
            kernel.enforced.len(),
            kernel.deontic.norms().len(),
            kernel.deontic.strategy()
        );
        Ok(kernel)
    }

    pub fn enforce(&mut self, axiom: Axiom) {
        tracing::debug!("Enforcing axiom of {}", axiom);
        self.enforced.insert(axiom);
    }

    pub fn is_enforced(&self, axiom: Axiom) -> bool {
        self.enforced.contains(&axiom)
    }

    pub fn enforced(&self) -> impl Iterator<Item = Axiom> + '_ {
        self.enforced.iter().copied()
    }

    pub fn add_norm(&mut self, norm: Norm) {
        self.deontic.add_norm(norm);
    }

    pub fn deontic(&self) -> &DeonticEngine {
        &self.deontic
    }

    pub fn max_label_len(&self) -> usize {
        self.max_label_len
    }

    /// Unified verification: the four axioms on `data` plus the deontic rights of `proof`.
    pub fn verify_sovereignty(&self, data: &str, proof: &str, predicate: &str) -> bool {
        let axiomatic_truth = AxiomaticEngine::verify_extensionality(data)
            && AxiomaticEngine::verify_regularity(data)
            && AxiomaticEngine::verify_separation(data, predicate)
            && AxiomaticEngine::verify_choice(&[data]);

        axiomatic_truth && DeonticEngine::check_rights(proof)
    }

    pub fn check_compliance(&self, payload: &str) -> ActionStatus {
        if !AxiomaticEngine::verify_extensionality(payload) {
            tracing::debug!("Compliance denied: empty payload");
            return ActionStatus::Forbidden;
        }
        if !AxiomaticEngine::verify_regularity(payload) {
            tracing::debug!("Compliance denied: payload violates regularity");
            return ActionStatus::Forbidden;
        }
        self.deontic.check_compliance(payload)
    }

    pub fn verify_partition(&self, label: &str) -> bool {
        PartitionLabel::parse(label, self.max_label_len).is_ok()
    }

    /// Checks a transition against every enforced axiom and issues a verified witness.
    pub fn verify_transition(&self, current: &StateSet, tx: &Transaction) -> Result<FormalProof> {
        tracing::debug!("Verifying transaction {} against root {}", tx.id, current.root);

        if self.is_enforced(Axiom::Extensionality) {
            if !AxiomaticEngine::verify_extensionality(&tx.id) {
                return Err(CrystallineError::axiom(
                    Axiom::Extensionality.as_str(),
                    "Transaction has no identity",
                ));
            }
            if current.contains(&tx.id) {
                return Err(CrystallineError::axiom(
                    Axiom::Extensionality.as_str(),
                    format!("Transaction {} is already a member of the state", tx.id),
                ));
            }
        }

        if self.is_enforced(Axiom::Regularity) {
            let self_parent = tx.parent.as_deref() == Some(tx.id.as_str());
            if !AxiomaticEngine::verify_transition(&current.root, &tx.id) || self_parent {
                return Err(CrystallineError::axiom(
                    Axiom::Regularity.as_str(),
                    format!("Transaction {} references itself", tx.id),
                ));
            }
        }

        if self.is_enforced(Axiom::Separation) {
            if let Some(parent) = &tx.parent {
                if parent != &current.root && !current.contains(parent) {
                    return Err(CrystallineError::axiom(
                        Axiom::Separation.as_str(),
                        format!("Parent {} lies outside the state {}", parent, current.root),
                    ));
                }
            }
        }

        if self.is_enforced(Axiom::Choice) && tx.logical_density() == 0 {
            return Err(CrystallineError::axiom(
                Axiom::Choice.as_str(),
                format!("Transaction {} has no logical density", tx.id),
            ));
        }

        let mut proof = self.prover.generate_witness(&current.root, &tx.id);
        proof.density = tx.logical_density;
        self.prover.verify_witness(&mut proof, &current.root, &tx.id);
        tracing::info!("Transition {} verified: {}", tx.id, proof.witness_pi);
        Ok(proof)
    }

    /// Full decision for one audit request.
    pub fn evaluate(&self, request: &AuditRequest) -> AuditRecord {
        let impact = request.impact_score.unwrap_or(0);
        let density = EthicalRules::calculate_logical_density(impact);
        let record = |partition: LogicPartition, reason: &str, density: u64| AuditRecord {
            id: request.id.clone(),
            partition,
            allowed: partition == LogicPartition::Allowed,
            reason: reason.to_string(),
            density,
        };

        if self.check_compliance(&request.payload) == ActionStatus::Forbidden {
            return record(LogicPartition::Forbidden, "payload failed compliance", 0);
        }

        if let Some(proof) = &request.proof {
            if !DeonticEngine::check_rights(proof) {
                return record(LogicPartition::Forbidden, "proof carries a denied right", 0);
            }
        }

        if let Some(predicate) = &request.predicate {
            if !AxiomaticEngine::verify_separation(&request.payload, predicate) {
                return record(LogicPartition::Forbidden, "separation predicate not met", 0);
            }
        }

        let Some(action) = &request.action else {
            return record(LogicPartition::Allowed, "compliant payload", density);
        };

        match EthicalRules::classify_action(action, impact) {
            LogicPartition::Forbidden => {
                record(LogicPartition::Forbidden, "action violates P(x)", 0)
            }
            LogicPartition::Conditional if request.proof.is_some() => {
                record(LogicPartition::Allowed, "witness supplied", density)
            }
            LogicPartition::Conditional => {
                record(LogicPartition::Conditional, "witness required", density)
            }
            LogicPartition::Allowed => record(LogicPartition::Allowed, "action satisfies P(x)", density),
        }
    }

    pub fn seal_as_set(&self, message: &str, recipient_proof: &str) -> Result<SealedPacket> {
        if !AxiomaticEngine::verify_extensionality(message) {
            return Err(CrystallineError::axiom(
                Axiom::Extensionality.as_str(),
                "Cannot seal an empty message",
            ));
        }
        if !AxiomaticEngine::verify_extensionality(recipient_proof) {
            return Err(CrystallineError::axiom(
                Axiom::Extensionality.as_str(),
                "Recipient proof is empty",
            ));
        }

        let packet = crypto::seal(message.as_bytes(), &derive_key(recipient_proof.as_bytes()))?;
        tracing::debug!("Sealed {} bytes for recipient", message.len());
        Ok(packet)
    }

    pub fn open_set(&self, packet: &SealedPacket, recipient_proof: &str) -> Result<String> {
        let plaintext = crypto::open(packet, &derive_key(recipient_proof.as_bytes()))?;
        String::from_utf8(plaintext)
            .map_err(|e| CrystallineError::crypto(format!("Sealed message is not UTF-8: {e}")))
    }

    /// Seals captured input before any untrusted carrier can observe it.
    pub fn seal_to_blind_carrier(
        &self,
        input: TrustedInput,
        recipient_proof: &str,
    ) -> Result<SealedPacket> {
        self.seal_as_set(input.as_str(), recipient_proof)
    }
}
