//! `teavault check` — decide one manager call against a vault config.

use std::path::PathBuf;

use alloy::primitives::{Address, U256};
use teavault_core::{CallRequest, Decision, Validator, VaultConfig};
use teavault_evm::registry_from_config;

use super::{decode_hex, selectors};

/// Run the `check` subcommand. Returns whether the call would be forwarded.
pub fn run(
    config: PathBuf,
    target: Address,
    value: Option<U256>,
    data: &str,
) -> Result<bool, Box<dyn std::error::Error>> {
    tracing::debug!(path = %config.display(), "loading vault config");
    let config = VaultConfig::from_file(&config)?;
    let vault = config.vault_address()?;
    let registry = registry_from_config(&config)?;
    let request = CallRequest::new(target, value.unwrap_or_default(), decode_hex(data)?);

    println!("\n=== Manager Call Check ===");
    println!("  Vault:     {vault}");
    println!("  Target:    {target}");
    println!("  Value:     {} wei", request.value);
    match request.selector() {
        Some(selector) => println!("  Selector:  0x{}", hex::encode(selector)),
        None => println!("  Selector:  -"),
    }

    let Some(validator) = registry.resolve(target) else {
        println!("  Validator: -");
        println!("==========================\n");
        println!("❌ Denied: contract {target} is not in the whitelist");
        return Ok(false);
    };
    println!("  Validator: {} ({})", validator.address(), validator.kind());
    if let Some(signature) = request
        .selector()
        .and_then(|selector| selectors::recognized_signature(validator.kind(), selector))
    {
        println!("  Function:  {signature}");
    }
    println!("==========================\n");

    match validator.decide(vault, &request) {
        Decision::Allow => {
            println!("✅ Allowed");
            Ok(true)
        }
        Decision::Deny(denial) => {
            println!("❌ Denied: {denial}");
            Ok(false)
        }
    }
}
