//! Uniswap V3 NonfungiblePositionManager validation.
//!
//! The position manager can send withdrawn liquidity to any recipient, so
//! every operation that names a recipient must name the vault. `mint` must
//! also use allow-listed tokens. Operations can be batched in a
//! `multicall(bytes[])` envelope; each embedded call is checked on its own.

use alloy::primitives::Address;
use alloy::sol_types::SolCall;
use teavault_core::{AllowList, CallRequest, Decision, Denial, Validator};

use super::{
    check_batched, decode_call, function_name, recognized, require_token, require_vault,
    RecognizedFunction, MULTICALL,
};
use crate::abi::{IMulticall, INonfungiblePositionManager as Npm, IPeripheryPayments};

const MINT: [u8; 4] = Npm::mintCall::SELECTOR;
const INCREASE_LIQUIDITY: [u8; 4] = Npm::increaseLiquidityCall::SELECTOR;
const DECREASE_LIQUIDITY: [u8; 4] = Npm::decreaseLiquidityCall::SELECTOR;
const COLLECT: [u8; 4] = Npm::collectCall::SELECTOR;
const BURN: [u8; 4] = Npm::burnCall::SELECTOR;
const UNWRAP_WETH9: [u8; 4] = IPeripheryPayments::unwrapWETH9Call::SELECTOR;
const SWEEP_TOKEN: [u8; 4] = IPeripheryPayments::sweepTokenCall::SELECTOR;
const REFUND_ETH: [u8; 4] = IPeripheryPayments::refundETHCall::SELECTOR;

const ENVELOPES: &[[u8; 4]] = &[MULTICALL];

/// Allows position-manager operations that keep funds inside the vault.
#[derive(Debug)]
pub struct PositionManagerValidator {
    address: Address,
    allow_list: AllowList,
}

impl PositionManagerValidator {
    pub const FUNCTIONS: &'static [RecognizedFunction] = &[
        recognized::<Npm::mintCall>(),
        recognized::<Npm::increaseLiquidityCall>(),
        recognized::<Npm::decreaseLiquidityCall>(),
        recognized::<Npm::collectCall>(),
        recognized::<Npm::burnCall>(),
        recognized::<IPeripheryPayments::unwrapWETH9Call>(),
        recognized::<IPeripheryPayments::sweepTokenCall>(),
        recognized::<IPeripheryPayments::refundETHCall>(),
        recognized::<IMulticall::multicallCall>(),
    ];

    pub fn new(address: Address, admin: Address) -> Self {
        Self {
            address,
            allow_list: AllowList::new(admin),
        }
    }

    fn check_operation(&self, vault: Address, selector: [u8; 4], data: &[u8]) -> Result<(), Denial> {
        match selector {
            MINT => {
                let name = function_name::<Npm::mintCall>();
                let p = decode_call::<Npm::mintCall>(data)?.params;
                require_token(&self.allow_list, name, p.token0)?;
                require_token(&self.allow_list, name, p.token1)?;
                require_vault(name, p.recipient, vault)
            }
            COLLECT => {
                let p = decode_call::<Npm::collectCall>(data)?.params;
                require_vault(function_name::<Npm::collectCall>(), p.recipient, vault)
            }
            UNWRAP_WETH9 => {
                let call = decode_call::<IPeripheryPayments::unwrapWETH9Call>(data)?;
                require_vault(
                    function_name::<IPeripheryPayments::unwrapWETH9Call>(),
                    call.recipient,
                    vault,
                )
            }
            SWEEP_TOKEN => {
                let call = decode_call::<IPeripheryPayments::sweepTokenCall>(data)?;
                require_vault(
                    function_name::<IPeripheryPayments::sweepTokenCall>(),
                    call.recipient,
                    vault,
                )
            }
            // These act on a position the vault already owns, or refund the
            // caller, so only the shape is checked.
            INCREASE_LIQUIDITY => decode_call::<Npm::increaseLiquidityCall>(data).map(drop),
            DECREASE_LIQUIDITY => decode_call::<Npm::decreaseLiquidityCall>(data).map(drop),
            BURN => decode_call::<Npm::burnCall>(data).map(drop),
            REFUND_ETH => decode_call::<IPeripheryPayments::refundETHCall>(data).map(drop),
            _ => Err(Denial::UnknownSelector { selector }),
        }
    }
}

impl Validator for PositionManagerValidator {
    fn address(&self) -> Address {
        self.address
    }

    fn kind(&self) -> &'static str {
        "position_manager"
    }

    fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    fn decide(&self, vault: Address, request: &CallRequest) -> Decision {
        check_batched(&request.payload, ENVELOPES, |selector, data| {
            self.check_operation(vault, selector, data)
        })
        .into()
    }
}
