//! `teavault predict` — print the CREATE2 address of a vault.

use alloy::primitives::{Address, B256};
use teavault_evm::VaultDeployer;

use super::decode_hex;

/// Run the `predict` subcommand.
pub fn run(deployer: Address, init_code: &str, salt: B256) -> Result<(), Box<dyn std::error::Error>> {
    let init_code = decode_hex(init_code)?;
    let deployer = VaultDeployer::new(deployer, &init_code);
    println!("{}", deployer.predicted_address(salt));
    Ok(())
}
