//! Deterministic (CREATE2) vault deployment.

use std::collections::HashMap;

use alloy::primitives::{keccak256, Address, B256};
use tracing::info;

/// Record of a vault deployed at a salt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    pub address: Address,
    pub owner: Address,
    /// Whether this `deploy` call created the vault.
    pub newly_deployed: bool,
}

/// Computes vault addresses from a salt and deploys each at most once.
#[derive(Debug, Clone)]
pub struct VaultDeployer {
    address: Address,
    init_code_hash: B256,
    deployed: HashMap<B256, (Address, Address)>,
}

impl VaultDeployer {
    pub fn new(address: Address, init_code: &[u8]) -> Self {
        Self {
            address,
            init_code_hash: keccak256(init_code),
            deployed: HashMap::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn init_code_hash(&self) -> B256 {
        self.init_code_hash
    }

    /// `keccak256(0xff ‖ deployer ‖ salt ‖ keccak256(init_code))[12..]`
    pub fn predicted_address(&self, salt: B256) -> Address {
        self.address.create2(salt, self.init_code_hash)
    }

    /// Deploy the vault for `salt` with `caller` as owner. A second deploy
    /// at the same salt changes nothing and reports the existing vault.
    pub fn deploy(&mut self, caller: Address, salt: B256) -> Deployment {
        if let Some(&(address, owner)) = self.deployed.get(&salt) {
            return Deployment {
                address,
                owner,
                newly_deployed: false,
            };
        }
        let address = self.predicted_address(salt);
        self.deployed.insert(salt, (address, caller));
        info!(%address, owner = %caller, %salt, "vault deployed");
        Deployment {
            address,
            owner: caller,
            newly_deployed: true,
        }
    }

    pub fn is_deployed(&self, salt: B256) -> bool {
        self.deployed.contains_key(&salt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, b256, hex};

    #[test]
    fn eip1014_vectors() {
        // Example 0 from EIP-1014.
        let deployer = VaultDeployer::new(Address::ZERO, &hex!("00"));
        assert_eq!(
            deployer.predicted_address(B256::ZERO),
            address!("4D1A2e2bB4F88F0250f26Ffff098B0b30B26BF38")
        );
        // Example 5 from EIP-1014.
        let deployer = VaultDeployer::new(
            address!("00000000000000000000000000000000deadbeef"),
            &hex!("deadbeef"),
        );
        assert_eq!(
            deployer.predicted_address(b256!(
                "00000000000000000000000000000000000000000000000000000000cafebabe"
            )),
            address!("60f3f640a8508fC6a86d45DF051962668E1e8AC7")
        );
        assert_eq!(deployer.init_code_hash(), keccak256(hex!("deadbeef")));
    }

    #[test]
    fn deploy_is_idempotent() {
        let alice = address!("00000000000000000000000000000000000000a1");
        let bob = address!("00000000000000000000000000000000000000b0");
        let mut deployer = VaultDeployer::new(address!("00000000000000000000000000000000000000d0"), b"vault");
        let salt = B256::repeat_byte(1);
        let predicted = deployer.predicted_address(salt);
        assert!(!deployer.is_deployed(salt));

        let first = deployer.deploy(alice, salt);
        assert!(first.newly_deployed);
        assert_eq!(first.address, predicted);
        assert_eq!(first.owner, alice);

        let second = deployer.deploy(bob, salt);
        assert!(!second.newly_deployed);
        assert_eq!(second.address, predicted);
        assert_eq!(second.owner, alice);
        assert_eq!(deployer.predicted_address(salt), predicted);
    }

    #[test]
    fn different_salts_differ() {
        let deployer = VaultDeployer::new(Address::ZERO, b"vault");
        assert_ne!(
            deployer.predicted_address(B256::repeat_byte(1)),
            deployer.predicted_address(B256::repeat_byte(2))
        );
    }
}
