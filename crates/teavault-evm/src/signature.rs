//! EIP-1271 signature checking for the vault.
//!
//! The owner's signature is always accepted. The manager's is accepted only
//! while the owner has enabled `allow_manager_signature`.

use alloy::primitives::{eip191_hash_message, Address, B256};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use sha3::{Digest, Keccak256};
use teavault_core::RoleSet;
use thiserror::Error;

/// `bytes4(keccak256("isValidSignature(bytes32,bytes)"))`
pub const MAGIC_VALUE: [u8; 4] = [0x16, 0x26, 0xba, 0x7e];

/// Returned for any signature that is not accepted.
pub const INVALID_SIGNATURE: [u8; 4] = [0xff, 0xff, 0xff, 0xff];

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("signature must be 65 bytes, got {0}")]
    InvalidLength(usize),
    #[error("invalid recovery id {0}")]
    InvalidRecoveryId(u8),
    #[error("signature s value is not in the lower half of the curve order")]
    HighS,
    #[error("signature recovery failed: {0}")]
    Recovery(#[from] k256::ecdsa::Error),
}

/// EIP-191 personal-message digest of `message`.
pub fn hash_message(message: &[u8]) -> B256 {
    eip191_hash_message(message)
}

/// Derives the Ethereum address of a public key.
pub fn public_key_to_address(key: &VerifyingKey) -> Address {
    let pubkey_bytes = key.to_encoded_point(false);
    // Skip the 0x04 prefix byte, hash the remaining 64 bytes
    let hash = Keccak256::digest(&pubkey_bytes.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// Recover the signer of `hash` from a 65-byte `r ‖ s ‖ v` signature.
///
/// `v` may be 27/28 or 0/1. High-s signatures are rejected.
pub fn recover_signer(hash: B256, signature: &[u8]) -> Result<Address, SignatureError> {
    if signature.len() != 65 {
        return Err(SignatureError::InvalidLength(signature.len()));
    }
    let (rs, v) = (&signature[..64], signature[64]);
    let sig = Signature::from_slice(rs)?;
    if sig.normalize_s().is_some() {
        return Err(SignatureError::HighS);
    }
    let recovery_byte = if v >= 27 { v - 27 } else { v };
    let recovery_id =
        RecoveryId::from_byte(recovery_byte).ok_or(SignatureError::InvalidRecoveryId(v))?;
    let key = VerifyingKey::recover_from_prehash(hash.as_slice(), &sig, recovery_id)?;
    Ok(public_key_to_address(&key))
}

/// Whether `signer` may sign on the vault's behalf.
pub fn is_authorized_signer(roles: &RoleSet, signer: Address) -> bool {
    signer == roles.owner()
        || (roles.allow_manager_signature() && roles.manager() == Some(signer))
}

/// EIP-1271 `isValidSignature`: [`MAGIC_VALUE`] when the signature was made
/// by an authorized signer, [`INVALID_SIGNATURE`] otherwise.
pub fn is_valid_signature(roles: &RoleSet, hash: B256, signature: &[u8]) -> [u8; 4] {
    match recover_signer(hash, signature) {
        Ok(signer) if is_authorized_signer(roles, signer) => MAGIC_VALUE,
        Ok(signer) => {
            tracing::debug!(%signer, "signature from unauthorized signer");
            INVALID_SIGNATURE
        }
        Err(e) => {
            tracing::debug!(error = %e, "unusable signature");
            INVALID_SIGNATURE
        }
    }
}
