//! Common types shared across teavault crates.

use alloy::primitives::{Address, Bytes, U256};

/// One outbound call a manager asks the vault to forward.
///
/// Built per dispatch and never persisted. `payload` is attacker-influenced
/// input as far as validators are concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    /// Contract the call is forwarded to.
    pub target: Address,
    /// Native value (wei) attached to the call.
    pub value: U256,
    /// Raw calldata, selector first.
    pub payload: Bytes,
}

impl CallRequest {
    pub fn new(target: Address, value: U256, payload: impl Into<Bytes>) -> Self {
        Self {
            target,
            value,
            payload: payload.into(),
        }
    }

    /// The leading 4-byte function selector, if the payload is long enough.
    pub fn selector(&self) -> Option<[u8; 4]> {
        selector_of(&self.payload)
    }
}

/// Extract the 4-byte function selector from raw calldata.
pub fn selector_of(data: &[u8]) -> Option<[u8; 4]> {
    match data {
        [a, b, c, d, ..] => Some([*a, *b, *c, *d]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_requires_four_bytes() {
        assert_eq!(selector_of(&[]), None);
        assert_eq!(selector_of(&[0x09, 0x5e, 0xa7]), None);
        assert_eq!(
            selector_of(&[0x09, 0x5e, 0xa7, 0xb3]),
            Some([0x09, 0x5e, 0xa7, 0xb3])
        );
    }

    #[test]
    fn request_selector_ignores_arguments() {
        let req = CallRequest::new(
            Address::ZERO,
            U256::ZERO,
            vec![0xde, 0xad, 0xbe, 0xef, 0x00, 0x01],
        );
        assert_eq!(req.selector(), Some([0xde, 0xad, 0xbe, 0xef]));
    }
}
