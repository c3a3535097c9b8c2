use crate::core::axioms::Axiom;
use crate::core::deontic::{DeonticModality, Norm};
use crate::core::kernel::MOBILE_INTEGRITY_NORM;
use crate::core::partition::DEFAULT_MAX_LABEL_LEN;
use crate::core::resolver::ResolutionStrategy;
use crate::utils::error::{CrystallineError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Kernel policy file. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub kernel: KernelConfig,
    #[serde(default)]
    pub deontic: DeonticConfig,
    #[serde(default)]
    pub partition: PartitionConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Axioms to enforce. All four when omitted.
    pub enforce: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeonticConfig {
    pub strategy: Option<String>,
    pub norms: Option<Vec<NormConfig>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormConfig {
    pub id: String,
    pub modality: DeonticModality,
    #[serde(default = "default_priority")]
    pub priority: u32,
}

fn default_priority() -> u32 {
    1
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartitionConfig {
    pub max_label_len: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// Replaces `${VAR}` with the environment value. Unknown variables are kept verbatim.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| CrystallineError::config(format!("Invalid substitution pattern: {e}")))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn enforced_axioms(&self) -> Result<Vec<Axiom>> {
        match &self.kernel.enforce {
            Some(names) => names.iter().map(|name| name.parse()).collect(),
            None => Ok(Axiom::ALL.to_vec()),
        }
    }

    pub fn strategy(&self) -> Result<ResolutionStrategy> {
        match &self.deontic.strategy {
            Some(name) => name.parse(),
            None => Ok(ResolutionStrategy::default()),
        }
    }

    /// Configured norms, or the mobile data integrity permission when none are given.
    pub fn norms(&self) -> Vec<Norm> {
        match &self.deontic.norms {
            Some(norms) => norms
                .iter()
                .map(|n| Norm {
                    id: n.id.clone(),
                    modality: n.modality,
                    priority: n.priority,
                })
                .collect(),
            None => vec![Norm::new(MOBILE_INTEGRITY_NORM)],
        }
    }

    pub fn max_label_len(&self) -> usize {
        self.partition.max_label_len.unwrap_or(DEFAULT_MAX_LABEL_LEN)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn validate_config(&self) -> Result<()> {
        self.enforced_axioms()?;
        self.strategy()?;

        if let Some(norms) = &self.deontic.norms {
            for norm in norms {
                validation::validate_non_empty_string("deontic.norms.id", &norm.id)?;
                validation::validate_min("deontic.norms.priority", norm.priority, 1)?;
            }
            validation::validate_unique("deontic.norms.id", norms.iter().map(|n| n.id.as_str()))?;
        }

        validation::validate_range("partition.max_label_len", self.max_label_len(), 1, 255)?;
        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_policy() {
        let toml_content = r#"
[kernel]
enforce = ["extensionality", "Regularity"]

[deontic]
strategy = "strict_safety"

[[deontic.norms]]
id = "ENCRYPT_BEFORE_EXIT"
modality = "obligation"
priority = 10

[[deontic.norms]]
id = "TRACKING"
modality = "prohibition"

[partition]
max_label_len = 32

[logging]
level = "debug"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.enforced_axioms().unwrap(),
            vec![Axiom::Extensionality, Axiom::Regularity]
        );
        assert_eq!(config.strategy().unwrap(), ResolutionStrategy::StrictSafety);
        let norms = config.norms();
        assert_eq!(norms.len(), 2);
        assert_eq!(norms[1].priority, 1);
        assert_eq!(config.max_label_len(), 32);
        assert_eq!(config.log_level(), Some("debug"));
    }

    #[test]
    fn test_empty_policy_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.enforced_axioms().unwrap().len(), 4);
        assert_eq!(config.strategy().unwrap(), ResolutionStrategy::StandardWeighted);
        assert_eq!(config.norms()[0].id, MOBILE_INTEGRITY_NORM);
        assert_eq!(config.max_label_len(), DEFAULT_MAX_LABEL_LEN);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CRYSTALLINE_TEST_STRATEGY", "strict_safety");

        let config =
            TomlConfig::from_toml_str("[deontic]\nstrategy = \"${CRYSTALLINE_TEST_STRATEGY}\"\n")
                .unwrap();
        assert_eq!(config.strategy().unwrap(), ResolutionStrategy::StrictSafety);

        std::env::remove_var("CRYSTALLINE_TEST_STRATEGY");
    }

    #[test]
    fn test_config_validation_failures() {
        let unknown_axiom = TomlConfig::from_toml_str("[kernel]\nenforce = [\"infinity\"]\n").unwrap();
        assert!(unknown_axiom.validate().is_err());

        let duplicate = TomlConfig::from_toml_str(
            r#"
[[deontic.norms]]
id = "A"
modality = "permission"

[[deontic.norms]]
id = "A"
modality = "prohibition"
"#,
        )
        .unwrap();
        assert!(duplicate.validate().is_err());

        let zero_priority = TomlConfig::from_toml_str(
            "[[deontic.norms]]\nid = \"A\"\nmodality = \"obligation\"\npriority = 0\n",
        )
        .unwrap();
        assert!(zero_priority.validate().is_err());

        let oversized = TomlConfig::from_toml_str("[partition]\nmax_label_len = 1000\n").unwrap();
        assert!(oversized.validate().is_err());

        assert!(TomlConfig::from_toml_str("[deontic]\nnorms = 3\n").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[partition]\nmax_label_len = 16\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.max_label_len(), 16);
    }
}
