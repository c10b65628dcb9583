//! # teavault-core
//!
//! Chain-agnostic pieces of the vault's call-authorization engine: the
//! allow-list store, the [`Validator`](validator::Validator) capability, the
//! target → validator registry, vault roles, configuration and audit logging.
//!
//! Concrete validators that understand EVM calldata live in `teavault-evm`.

pub mod allowlist;
pub mod audit;
pub mod config;
pub mod registry;
pub mod roles;
pub mod types;
pub mod validator;

pub use allowlist::{AllowList, AllowListError};
pub use registry::{RegistryError, ValidatorRegistry};
pub use roles::{AccessError, Role, RoleSet};
pub use types::CallRequest;
pub use validator::{Decision, Denial, Validator};
pub use audit::{AuditError, AuditEvent, AuditLogger, AuditSink, MemoryAuditSink};
pub use config::{ConfigError, ValidatorConfig, ValidatorKind, VaultConfig};
