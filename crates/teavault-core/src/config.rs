//! Vault YAML configuration parser.
//!
//! Loads and validates a `vault.yaml` describing the vault's roles and the
//! validators guarding each target contract.

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use alloy::primitives::Address;
use serde::Deserialize;
use thiserror::Error;

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which rule family a configured validator belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorKind {
    PassThrough,
    TokenApproval,
    Router,
    PositionManager,
}

impl ValidatorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PassThrough => "pass_through",
            Self::TokenApproval => "token_approval",
            Self::Router => "router",
            Self::PositionManager => "position_manager",
        }
    }
}

/// One validator entry in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidatorConfig {
    /// Human-readable label used in logs.
    pub name: String,
    pub kind: ValidatorKind,
    /// Address the validator is registered under.
    pub address: String,
    /// Allow-list administrator (defaults to the vault owner).
    #[serde(default)]
    pub admin: Option<String>,
    /// Spenders or tokens placed on the allow-list at startup.
    #[serde(default)]
    pub allowed: Vec<String>,
    /// Target contracts this validator guards.
    #[serde(default)]
    pub targets: Vec<String>,
    /// Router only: require swap proceeds to go to the vault.
    #[serde(default)]
    pub pin_recipient: bool,
}

/// Parsed vault configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct VaultConfig {
    /// The vault's own address.
    pub vault: String,
    pub owner: String,
    #[serde(default)]
    pub manager: Option<String>,
    #[serde(default)]
    pub investor: Option<String>,
    #[serde(default)]
    pub allow_manager_signature: bool,
    #[serde(default)]
    pub validators: Vec<ValidatorConfig>,
}

impl VaultConfig {
    /// Parse and validate a config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Check addresses parse and that no validator or target is declared twice.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.vault_address()?;
        self.owner_address()?;
        self.manager_address()?;
        self.investor_address()?;

        let mut validator_addresses = HashSet::new();
        let mut targets = HashSet::new();
        for validator in &self.validators {
            let address = validator.address()?;
            if !validator_addresses.insert(address) {
                return Err(ConfigError::Invalid(format!(
                    "validator address {address} declared more than once"
                )));
            }
            validator.admin_address(self.owner_address()?)?;
            validator.allowed_addresses()?;
            for target in validator.target_addresses()? {
                if !targets.insert(target) {
                    return Err(ConfigError::Invalid(format!(
                        "target {target} is mapped to more than one validator"
                    )));
                }
            }
            if validator.pin_recipient && validator.kind != ValidatorKind::Router {
                return Err(ConfigError::Invalid(format!(
                    "validator '{}': pin_recipient only applies to router validators",
                    validator.name
                )));
            }
        }
        Ok(())
    }

    pub fn vault_address(&self) -> Result<Address, ConfigError> {
        parse_address("vault", &self.vault)
    }

    pub fn owner_address(&self) -> Result<Address, ConfigError> {
        parse_address("owner", &self.owner)
    }

    pub fn manager_address(&self) -> Result<Option<Address>, ConfigError> {
        self.manager
            .as_deref()
            .map(|s| parse_address("manager", s))
            .transpose()
    }

    pub fn investor_address(&self) -> Result<Option<Address>, ConfigError> {
        self.investor
            .as_deref()
            .map(|s| parse_address("investor", s))
            .transpose()
    }
}

impl ValidatorConfig {
    pub fn address(&self) -> Result<Address, ConfigError> {
        parse_address(&format!("validator '{}' address", self.name), &self.address)
    }

    /// The configured admin, or `default` when none is set.
    pub fn admin_address(&self, default: Address) -> Result<Address, ConfigError> {
        match &self.admin {
            Some(admin) => parse_address(&format!("validator '{}' admin", self.name), admin),
            None => Ok(default),
        }
    }

    pub fn allowed_addresses(&self) -> Result<Vec<Address>, ConfigError> {
        self.allowed
            .iter()
            .map(|s| parse_address(&format!("validator '{}' allowed entry", self.name), s))
            .collect()
    }

    pub fn target_addresses(&self) -> Result<Vec<Address>, ConfigError> {
        self.targets
            .iter()
            .map(|s| parse_address(&format!("validator '{}' target", self.name), s))
            .collect()
    }
}

fn parse_address(field: &str, value: &str) -> Result<Address, ConfigError> {
    Address::from_str(value.trim())
        .map_err(|e| ConfigError::Invalid(format!("{field}: invalid address '{value}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
vault: "0x00000000000000000000000000000000000000aa"
owner: "0x00000000000000000000000000000000000000a1"
manager: "0x00000000000000000000000000000000000000b2"
validators:
  - name: erc20
    kind: token_approval
    address: "0x00000000000000000000000000000000000000f1"
    allowed:
      - "0x68b3465833fb72A70ecDF485E0e4C7bD8665Fc45"
    targets:
      - "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"
  - name: router
    kind: router
    address: "0x00000000000000000000000000000000000000f2"
    pin_recipient: true
    targets:
      - "0x68b3465833fb72A70ecDF485E0e4C7bD8665Fc45"
"#;

    #[test]
    fn parse_vault_yaml() {
        let config = VaultConfig::from_yaml(YAML).unwrap();
        assert_eq!(config.validators.len(), 2);
        assert_eq!(config.validators[0].kind, ValidatorKind::TokenApproval);
        assert_eq!(config.validators[1].kind, ValidatorKind::Router);
        assert!(config.validators[1].pin_recipient);
        assert!(config.investor_address().unwrap().is_none());
        assert!(!config.allow_manager_signature);
    }

    #[test]
    fn admin_defaults_to_owner() {
        let config = VaultConfig::from_yaml(YAML).unwrap();
        let owner = config.owner_address().unwrap();
        assert_eq!(config.validators[0].admin_address(owner).unwrap(), owner);
    }

    #[test]
    fn bad_address_rejected() {
        let yaml = r#"
vault: "0x1234"
owner: "0x00000000000000000000000000000000000000a1"
"#;
        let err = VaultConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("vault")));
    }

    #[test]
    fn duplicate_target_rejected() {
        let yaml = r#"
vault: "0x00000000000000000000000000000000000000aa"
owner: "0x00000000000000000000000000000000000000a1"
validators:
  - name: a
    kind: token_approval
    address: "0x00000000000000000000000000000000000000f1"
    targets: ["0x00000000000000000000000000000000000000e1"]
  - name: b
    kind: pass_through
    address: "0x00000000000000000000000000000000000000f2"
    targets: ["0x00000000000000000000000000000000000000e1"]
"#;
        let err = VaultConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("more than one")));
    }

    #[test]
    fn pin_recipient_only_for_router() {
        let yaml = r#"
vault: "0x00000000000000000000000000000000000000aa"
owner: "0x00000000000000000000000000000000000000a1"
validators:
  - name: a
    kind: token_approval
    address: "0x00000000000000000000000000000000000000f1"
    pin_recipient: true
"#;
        assert!(VaultConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn unknown_kind_is_parse_error() {
        let yaml = r#"
vault: "0x00000000000000000000000000000000000000aa"
owner: "0x00000000000000000000000000000000000000a1"
validators:
  - name: a
    kind: allow_everything
    address: "0x00000000000000000000000000000000000000f1"
"#;
        assert!(matches!(
            VaultConfig::from_yaml(yaml).unwrap_err(),
            ConfigError::ParseError(_)
        ));
    }
}
