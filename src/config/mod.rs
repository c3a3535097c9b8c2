pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::identity::ProtocolMode;
#[cfg(feature = "cli")]
use crate::domain::ports::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, Validate};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "crystalline")]
#[command(about = "Axiomatic policy kernel: compliance checks, partitions and sealing")]
pub struct CliConfig {
    /// Path to a TOML policy file
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check a payload for compliance
    Check { payload: String },
    /// Validate a partition label
    Partition { label: String },
    /// Seal a message for a recipient proof
    Seal {
        message: String,
        #[arg(long)]
        recipient: String,
    },
    /// Open a base64 sealed packet
    Open {
        packet: String,
        #[arg(long)]
        recipient: String,
    },
    /// Generate a new signing identity
    Keygen {
        #[arg(long, value_enum, default_value_t = ProtocolMode::Ed25519)]
        mode: ProtocolMode,
    },
    /// Evaluate a JSON file of audit requests
    Audit(AuditArgs),
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct AuditArgs {
    /// JSON array of audit requests
    #[arg(long)]
    pub input: String,

    #[arg(long, default_value = "./output")]
    pub output: String,
}

#[cfg(feature = "cli")]
impl ConfigProvider for AuditArgs {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output
    }
}

#[cfg(feature = "cli")]
impl Validate for AuditArgs {
    fn validate(&self) -> crate::utils::error::Result<()> {
        validate_path("audit.input", &self.input)?;
        validate_path("audit.output", &self.output)
    }
}
