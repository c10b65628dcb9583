//! ERC-20 `approve` validation.
//!
//! Only `approve(address,uint256)` is recognized, and only for spenders on
//! the allow-list. The amount is not constrained.

use alloy::primitives::Address;
use alloy::sol_types::SolCall;
use teavault_core::{AllowList, CallRequest, Decision, Denial, Validator};

use super::{decode_call, recognized, RecognizedFunction};
use crate::abi::IERC20;

const APPROVE: [u8; 4] = IERC20::approveCall::SELECTOR;

/// Allows `approve` calls whose spender is allow-listed.
#[derive(Debug)]
pub struct Erc20ApprovalValidator {
    address: Address,
    allow_list: AllowList,
}

impl Erc20ApprovalValidator {
    pub const FUNCTIONS: &'static [RecognizedFunction] = &[recognized::<IERC20::approveCall>()];

    pub fn new(address: Address, admin: Address) -> Self {
        Self {
            address,
            allow_list: AllowList::new(admin),
        }
    }

    fn check(&self, request: &CallRequest) -> Result<(), Denial> {
        let selector = request.selector().ok_or(Denial::NoSelector)?;
        if selector != APPROVE {
            return Err(Denial::UnknownSelector { selector });
        }
        let call = decode_call::<IERC20::approveCall>(&request.payload)?;
        if !self.allow_list.is_allowed(call.spender) {
            return Err(Denial::SpenderNotAllowed {
                spender: call.spender,
            });
        }
        Ok(())
    }
}

impl Validator for Erc20ApprovalValidator {
    fn address(&self) -> Address {
        self.address
    }

    fn kind(&self) -> &'static str {
        "token_approval"
    }

    fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    fn decide(&self, _vault: Address, request: &CallRequest) -> Decision {
        self.check(request).into()
    }
}
