//! # teavault-evm
//!
//! EVM side of the vault: calldata validators, the manager call dispatcher,
//! and the deployment and signature collaborators.
//!
//! ## Modules
//!
//! - [`abi`] — `sol!` bindings for ERC-20, SwapRouter02 and the position manager
//! - [`validators`] — pass-through, token-approval, router and position-manager rules
//! - [`vault`] — the dispatcher that resolves, decides and forwards manager calls
//! - [`forwarder`] / [`ledger`] — call execution seam and its in-memory implementation
//! - [`deployer`] — CREATE2 address prediction and idempotent deployment
//! - [`signature`] — EIP-1271 checks for owner and manager signatures
//! - [`bootstrap`] — building all of the above from a `VaultConfig`

pub mod abi;
pub mod bootstrap;
pub mod deployer;
pub mod forwarder;
pub mod ledger;
pub mod signature;
pub mod validators;
pub mod vault;

pub use bootstrap::{registry_from_config, vault_from_config, BootstrapError};
pub use deployer::{Deployment, VaultDeployer};
pub use forwarder::{CallForwarder, Reverted};
pub use ledger::{CallEnv, Contract, Erc20Token, Ledger};
pub use signature::{hash_message, is_valid_signature, SignatureError};
pub use validators::{
    Erc20ApprovalValidator, PassThroughValidator, PositionManagerValidator, RouterValidator,
};
pub use vault::{DispatchError, Vault};

// Re-export alloy primitives used in the public API.
pub use alloy::primitives::{Address, Bytes, B256, U256};
