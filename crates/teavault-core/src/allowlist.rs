//! Admin-controlled address allow-list.
//!
//! Every validator owns one of these to hold the spenders or tokens it
//! trusts. Membership is binary and defaults to `false`; writes go through a
//! single lock so readers always observe a consistent snapshot.

use std::collections::HashMap;
use std::sync::RwLock;

use alloy::primitives::Address;
use thiserror::Error;
use tracing::info;

use crate::roles::{self, AccessError, Role};

/// Errors from allow-list administration.
#[derive(Debug, Error)]
pub enum AllowListError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("length mismatch: {addresses} addresses, {flags} flags")]
    LengthMismatch { addresses: usize, flags: usize },
    #[error("internal lock error")]
    LockError,
}

/// A set of addresses, each independently allowed or not.
#[derive(Debug)]
pub struct AllowList {
    admin: Address,
    entries: RwLock<HashMap<Address, bool>>,
}

impl AllowList {
    /// An empty list administered by `admin`.
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn admin(&self) -> Address {
        self.admin
    }

    /// Mark `address` allowed or not. Re-asserting the same value is a no-op.
    pub fn set(&self, caller: Address, address: Address, allowed: bool) -> Result<(), AllowListError> {
        roles::require(Role::Admin, Some(self.admin), caller)?;
        let mut entries = self.entries.write().map_err(|_| AllowListError::LockError)?;
        apply(&mut entries, address, allowed);
        info!(%address, allowed, "allow-list entry set");
        Ok(())
    }

    /// Batched [`set`](Self::set). Nothing changes unless the lengths match.
    pub fn set_many(
        &self,
        caller: Address,
        addresses: &[Address],
        flags: &[bool],
    ) -> Result<(), AllowListError> {
        roles::require(Role::Admin, Some(self.admin), caller)?;
        if addresses.len() != flags.len() {
            return Err(AllowListError::LengthMismatch {
                addresses: addresses.len(),
                flags: flags.len(),
            });
        }
        let mut entries = self.entries.write().map_err(|_| AllowListError::LockError)?;
        for (address, allowed) in addresses.iter().zip(flags) {
            apply(&mut entries, *address, *allowed);
        }
        info!(count = addresses.len(), "allow-list entries set");
        Ok(())
    }

    /// Whether `address` is currently allowed. A poisoned lock reads as "no".
    pub fn is_allowed(&self, address: Address) -> bool {
        self.entries
            .read()
            .map(|entries| entries.get(&address).copied().unwrap_or(false))
            .unwrap_or(false)
    }

    /// Number of currently allowed addresses.
    pub fn allowed_count(&self) -> usize {
        self.entries
            .read()
            .map(|entries| entries.len())
            .unwrap_or(0)
    }
}

// Only allowed addresses are stored, so "not allowed" and "never set" look the same.
fn apply(entries: &mut HashMap<Address, bool>, address: Address, allowed: bool) {
    if allowed {
        entries.insert(address, true);
    } else {
        entries.remove(&address);
    }
}
