pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod ffi;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{AuditArgs, CliConfig, Command};

pub use app::pipelines::batch_pipeline::BatchAuditPipeline;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::axioms::{Axiom, AxiomaticEngine, StateNode};
pub use crate::core::deontic::{ActionStatus, DeonticEngine, DeonticModality, Norm, WorldState};
pub use crate::core::kernel::{Kernel, StateSet, Transaction, TrustedInput};
pub use crate::core::partition::{LogicPartition, PartitionLabel, PartitionRegistry};
pub use crate::core::{audit::AuditEngine, crypto::SealedPacket};
pub use utils::error::{CrystallineError, Result};
