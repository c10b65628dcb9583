//! # teavault
//!
//! Custodial vault with a pluggable call-authorization engine. A delegated
//! manager may ask the vault to call external contracts; each call is
//! resolved to a validator, decoded, and only forwarded when allowed.
//!
//! This crate re-exports the workspace members:
//!
//! - [`teavault_core`] — allow-lists, validator registry, roles, config, audit log
//! - [`teavault_evm`] — EVM validators, the vault dispatcher, deployer, signatures

pub use teavault_core;
pub use teavault_evm;

pub use teavault_core::{AllowList, CallRequest, Decision, Denial, Validator, ValidatorRegistry, VaultConfig};
pub use teavault_evm::{DispatchError, Ledger, Vault, VaultDeployer};

/// Returns the library version string.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
