//! Calldata validators for the contract families the vault may call.
//!
//! Each validator owns an [`AllowList`] and implements
//! [`Validator`](teavault_core::Validator). Decoding is done with the
//! `sol!` bindings in [`crate::abi`]; anything that fails to decode is a
//! [`Denial::Malformed`], never a panic.
//!
//! Router and position-manager calls may arrive wrapped in a `multicall`
//! envelope. Envelopes are unwrapped one level only: an envelope inside an
//! envelope is denied.

mod erc20;
mod pass_through;
mod position_manager;
mod router;

pub use erc20::Erc20ApprovalValidator;
pub use pass_through::PassThroughValidator;
pub use position_manager::PositionManagerValidator;
pub use router::{decode_v3_path, PathHop, RouterValidator};

use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolCall;
use teavault_core::types::selector_of;
use teavault_core::{AllowList, Denial};

use crate::abi::{IMulticall, IMulticallBlockhash, IMulticallDeadline};

/// `multicall(bytes[])`
pub const MULTICALL: [u8; 4] = IMulticall::multicallCall::SELECTOR;
/// `multicall(uint256,bytes[])`
pub const MULTICALL_DEADLINE: [u8; 4] = IMulticallDeadline::multicallCall::SELECTOR;
/// `multicall(bytes32,bytes[])`
pub const MULTICALL_BLOCKHASH: [u8; 4] = IMulticallBlockhash::multicallCall::SELECTOR;

/// A function a validator recognizes, for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecognizedFunction {
    pub signature: &'static str,
    pub selector: [u8; 4],
}

pub(crate) const fn recognized<C: SolCall>() -> RecognizedFunction {
    RecognizedFunction {
        signature: C::SIGNATURE,
        selector: C::SELECTOR,
    }
}

/// Look up the signature of `selector` in a validator's function table.
pub fn signature_of(functions: &[RecognizedFunction], selector: [u8; 4]) -> Option<&'static str> {
    functions
        .iter()
        .find(|f| f.selector == selector)
        .map(|f| f.signature)
}

/// Function name without its parameter list, e.g. `"approve"`.
pub(crate) fn function_name<C: SolCall>() -> &'static str {
    C::SIGNATURE.split('(').next().unwrap_or(C::SIGNATURE)
}

/// Decode a full call (selector included) or report it as malformed.
pub(crate) fn decode_call<C: SolCall>(data: &[u8]) -> Result<C, Denial> {
    C::abi_decode(data).map_err(|e| Denial::Malformed {
        function: function_name::<C>().to_string(),
        reason: e.to_string(),
    })
}

pub(crate) fn require_vault(
    function: &str,
    recipient: Address,
    vault: Address,
) -> Result<(), Denial> {
    if recipient == vault {
        Ok(())
    } else {
        Err(Denial::RecipientNotVault {
            function: function.to_string(),
            recipient,
        })
    }
}

pub(crate) fn require_token(
    allow_list: &AllowList,
    function: &str,
    token: Address,
) -> Result<(), Denial> {
    if allow_list.is_allowed(token) {
        Ok(())
    } else {
        Err(Denial::TokenNotAllowed {
            function: function.to_string(),
            token,
        })
    }
}

/// The embedded calls of `data` when its selector is one of `envelopes`.
fn open_envelope(
    selector: [u8; 4],
    data: &[u8],
    envelopes: &[[u8; 4]],
) -> Option<Result<Vec<Bytes>, Denial>> {
    if !envelopes.contains(&selector) {
        return None;
    }
    let calls = match selector {
        MULTICALL => decode_call::<IMulticall::multicallCall>(data).map(|c| c.data),
        MULTICALL_DEADLINE => decode_call::<IMulticallDeadline::multicallCall>(data).map(|c| c.data),
        MULTICALL_BLOCKHASH => {
            decode_call::<IMulticallBlockhash::multicallCall>(data).map(|c| c.data)
        }
        _ => return None,
    };
    Some(calls)
}

/// Run `check` over a single operation, or over every call inside an
/// accepted envelope. The first denial wins.
pub(crate) fn check_batched(
    data: &[u8],
    envelopes: &[[u8; 4]],
    mut check: impl FnMut([u8; 4], &[u8]) -> Result<(), Denial>,
) -> Result<(), Denial> {
    let selector = selector_of(data).ok_or(Denial::NoSelector)?;
    let Some(calls) = open_envelope(selector, data, envelopes).transpose()? else {
        return check(selector, data);
    };
    for call in &calls {
        let inner = selector_of(call).ok_or(Denial::NoSelector)?;
        if envelopes.contains(&inner) {
            return Err(Denial::NestedEnvelope);
        }
        check(inner, call)?;
    }
    Ok(())
}
