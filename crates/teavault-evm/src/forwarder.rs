//! The seam between the vault and whatever executes its outbound calls.

use alloy::primitives::{Address, Bytes};
use alloy::sol_types::{Revert, SolError};
use teavault_core::CallRequest;
use thiserror::Error;

/// A forwarded call that failed, with its revert payload preserved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("execution reverted: {reason}")]
pub struct Reverted {
    pub reason: String,
    /// Raw revert data as returned by the callee.
    pub data: Bytes,
}

impl Reverted {
    /// A revert carrying a standard `Error(string)` payload.
    pub fn with_reason(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let data = Revert {
            reason: reason.clone(),
        }
        .abi_encode()
        .into();
        Self { reason, data }
    }
}

/// Executes calls on behalf of the vault.
///
/// Effects of `forward` must be undoable: everything after a `checkpoint`
/// is discarded by `rollback` with that checkpoint.
pub trait CallForwarder {
    type Checkpoint;

    fn checkpoint(&mut self) -> Self::Checkpoint;

    fn rollback(&mut self, checkpoint: Self::Checkpoint);

    /// Send `request` from `from`, returning the callee's return data.
    fn forward(&mut self, from: Address, request: &CallRequest) -> Result<Bytes, Reverted>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_is_abi_encoded() {
        let reverted = Reverted::with_reason("ERC20: insufficient allowance");
        // Error(string) selector = 0x08c379a0
        assert_eq!(&reverted.data[..4], &[0x08, 0xc3, 0x79, 0xa0]);
        let decoded = Revert::abi_decode(&reverted.data).unwrap();
        assert_eq!(decoded.reason, "ERC20: insufficient allowance");
        assert_eq!(
            reverted.to_string(),
            "execution reverted: ERC20: insufficient allowance"
        );
    }
}
