//! The call-authorization capability.
//!
//! A [`Validator`] looks at one outbound call and answers allow or deny.
//! Denial is an ordinary, expected outcome and is returned as a value.

use std::fmt;

use alloy::primitives::Address;
use thiserror::Error;

use crate::allowlist::AllowList;
use crate::types::CallRequest;

/// Why a validator refused a call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Denial {
    /// The validator has no rule that permits anything.
    #[error("no rule permits calls through this validator")]
    NoRule,
    /// The payload is too short to hold a function selector.
    #[error("payload has no function selector")]
    NoSelector,
    /// The function selector is not one this validator recognizes.
    #[error("function 0x{} is not whitelisted", hex_selector(.selector))]
    UnknownSelector { selector: [u8; 4] },
    /// The selector was recognized but its arguments could not be decoded.
    #[error("malformed {function} arguments: {reason}")]
    Malformed { function: String, reason: String },
    /// A spender argument is not on the allow-list.
    #[error("spender {spender} not approved")]
    SpenderNotAllowed { spender: Address },
    /// A token argument is not on the allow-list.
    #[error("{function} references token {token} which is not allowed")]
    TokenNotAllowed { function: String, token: Address },
    /// Funds would be sent somewhere other than the vault.
    #[error("{function} recipient {recipient} is not the vault")]
    RecipientNotVault { function: String, recipient: Address },
    /// A multicall envelope was found inside another envelope.
    #[error("nested multicall envelopes are not allowed")]
    NestedEnvelope,
}

impl Denial {
    /// Whether the payload itself could not be parsed, as opposed to being
    /// parsed and refused.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Denial::NoSelector | Denial::Malformed { .. })
    }
}

fn hex_selector(selector: &[u8; 4]) -> String {
    selector.iter().map(|b| format!("{b:02x}")).collect()
}

/// Result of asking a validator about one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn denial(&self) -> Option<&Denial> {
        match self {
            Decision::Allow => None,
            Decision::Deny(denial) => Some(denial),
        }
    }
}

impl From<Result<(), Denial>> for Decision {
    fn from(result: Result<(), Denial>) -> Self {
        match result {
            Ok(()) => Decision::Allow,
            Err(denial) => Decision::Deny(denial),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Allow => write!(f, "allowed"),
            Decision::Deny(denial) => write!(f, "denied: {denial}"),
        }
    }
}

/// A rule that decides whether the vault may forward a call to a target.
///
/// Implementations must be total over arbitrary payload bytes: anything they
/// cannot decode is a [`Denial`], never a panic.
pub trait Validator: Send + Sync + fmt::Debug {
    /// The address this validator is registered under.
    fn address(&self) -> Address;

    /// Short name of the rule family (e.g. `"token_approval"`).
    fn kind(&self) -> &'static str;

    /// The allow-list this validator consults.
    fn allow_list(&self) -> &AllowList;

    /// Decide whether `vault` may forward `request`.
    fn decide(&self, vault: Address, request: &CallRequest) -> Decision;
}
