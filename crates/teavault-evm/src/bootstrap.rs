//! Build validators, a registry, and a vault from a [`VaultConfig`].

use std::sync::Arc;

use alloy::primitives::Address;
use teavault_core::{
    AccessError, AllowListError, ConfigError, RegistryError, Validator, ValidatorConfig,
    ValidatorKind, ValidatorRegistry, VaultConfig,
};
use thiserror::Error;
use tracing::info;

use crate::forwarder::CallForwarder;
use crate::validators::{
    Erc20ApprovalValidator, PassThroughValidator, PositionManagerValidator, RouterValidator,
};
use crate::vault::Vault;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    AllowList(#[from] AllowListError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Access(#[from] AccessError),
}

/// Instantiate one configured validator and fill its allow-list.
pub fn build_validator(
    config: &ValidatorConfig,
    owner: Address,
) -> Result<Arc<dyn Validator>, BootstrapError> {
    let address = config.address()?;
    let admin = config.admin_address(owner)?;
    let validator: Arc<dyn Validator> = match config.kind {
        ValidatorKind::PassThrough => Arc::new(PassThroughValidator::new(address, admin)),
        ValidatorKind::TokenApproval => Arc::new(Erc20ApprovalValidator::new(address, admin)),
        ValidatorKind::Router => Arc::new(
            RouterValidator::new(address, admin).with_pinned_recipient(config.pin_recipient),
        ),
        ValidatorKind::PositionManager => Arc::new(PositionManagerValidator::new(address, admin)),
    };

    let allowed = config.allowed_addresses()?;
    validator
        .allow_list()
        .set_many(admin, &allowed, &vec![true; allowed.len()])?;
    info!(
        name = %config.name,
        kind = config.kind.as_str(),
        %address,
        allowed = allowed.len(),
        "validator built"
    );
    Ok(validator)
}

/// A registry administered by the vault owner with every configured target
/// mapped to its validator.
pub fn registry_from_config(config: &VaultConfig) -> Result<ValidatorRegistry, BootstrapError> {
    config.validate()?;
    let owner = config.owner_address()?;
    let registry = ValidatorRegistry::new(owner);
    for validator_config in &config.validators {
        let validator = build_validator(validator_config, owner)?;
        for target in validator_config.target_addresses()? {
            registry.assign(owner, target, Some(Arc::clone(&validator)))?;
        }
    }
    Ok(registry)
}

/// A vault with the configured roles and registry.
pub fn vault_from_config<F: CallForwarder>(
    config: &VaultConfig,
    forwarder: F,
) -> Result<Vault<F>, BootstrapError> {
    let owner = config.owner_address()?;
    let registry = Arc::new(registry_from_config(config)?);
    let mut vault = Vault::new(config.vault_address()?, owner, forwarder);
    if let Some(manager) = config.manager_address()? {
        vault.assign_manager(owner, manager)?;
    }
    if let Some(investor) = config.investor_address()? {
        vault.assign_investor(owner, investor)?;
    }
    vault.set_allow_manager_signature(owner, config.allow_manager_signature)?;
    vault.assign_registry(owner, registry)?;
    Ok(vault)
}
