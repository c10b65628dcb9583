//! Target contract → validator mapping.
//!
//! A target with no mapping is unreachable through the manager path. The
//! registry never guesses a default.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use alloy::primitives::Address;
use thiserror::Error;
use tracing::info;

use crate::roles::{self, AccessError, Role};
use crate::validator::Validator;

/// Errors from registry administration.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("internal lock error")]
    LockError,
}

/// Maps each target contract to at most one validator.
#[derive(Debug)]
pub struct ValidatorRegistry {
    admin: Address,
    mappings: RwLock<HashMap<Address, Arc<dyn Validator>>>,
}

impl ValidatorRegistry {
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            mappings: RwLock::new(HashMap::new()),
        }
    }

    pub fn admin(&self) -> Address {
        self.admin
    }

    /// Point `target` at `validator`, replacing any previous mapping.
    /// `None` removes the mapping.
    pub fn assign(
        &self,
        caller: Address,
        target: Address,
        validator: Option<Arc<dyn Validator>>,
    ) -> Result<(), RegistryError> {
        roles::require(Role::Admin, Some(self.admin), caller)?;
        let mut mappings = self.mappings.write().map_err(|_| RegistryError::LockError)?;
        match validator {
            Some(validator) => {
                info!(%target, validator = %validator.address(), kind = validator.kind(), "validator assigned");
                mappings.insert(target, validator);
            }
            None => {
                info!(%target, "validator mapping cleared");
                mappings.remove(&target);
            }
        }
        Ok(())
    }

    /// The validator responsible for `target`, if any.
    pub fn resolve(&self, target: Address) -> Option<Arc<dyn Validator>> {
        self.mappings
            .read()
            .ok()
            .and_then(|mappings| mappings.get(&target).cloned())
    }

    /// Address of the validator responsible for `target`, if any.
    pub fn validator_address(&self, target: Address) -> Option<Address> {
        self.resolve(target).map(|validator| validator.address())
    }

    /// Number of mapped targets.
    pub fn len(&self) -> usize {
        self.mappings.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
