//! The base validator: recognizes nothing, so every call is denied.

use alloy::primitives::Address;
use teavault_core::{AllowList, CallRequest, Decision, Denial, Validator};

/// Denies every call. New deployments start from this and map targets to
/// richer validators once their call shapes have been reviewed.
#[derive(Debug)]
pub struct PassThroughValidator {
    address: Address,
    allow_list: AllowList,
}

impl PassThroughValidator {
    pub fn new(address: Address, admin: Address) -> Self {
        Self {
            address,
            allow_list: AllowList::new(admin),
        }
    }
}

impl Validator for PassThroughValidator {
    fn address(&self) -> Address {
        self.address
    }

    fn kind(&self) -> &'static str {
        "pass_through"
    }

    fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    fn decide(&self, _vault: Address, _request: &CallRequest) -> Decision {
        Decision::Deny(Denial::NoRule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, U256};

    #[test]
    fn denies_even_allow_listed_targets() {
        let admin = address!("00000000000000000000000000000000000000a1");
        let target = address!("00000000000000000000000000000000000000e1");
        let validator = PassThroughValidator::new(Address::ZERO, admin);
        validator.allow_list().set(admin, target, true).unwrap();

        for payload in [vec![], vec![0x09, 0x5e, 0xa7, 0xb3], vec![0xff; 100]] {
            let request = CallRequest::new(target, U256::ZERO, payload);
            assert_eq!(
                validator.decide(Address::ZERO, &request),
                Decision::Deny(Denial::NoRule)
            );
        }
    }
}
