//! `teavault selectors` — list recognized functions per validator kind.

use teavault_evm::validators::{signature_of, RecognizedFunction};
use teavault_evm::{Erc20ApprovalValidator, PositionManagerValidator, RouterValidator};

const KINDS: &[(&str, &[RecognizedFunction])] = &[
    ("pass_through", &[]),
    ("token_approval", Erc20ApprovalValidator::FUNCTIONS),
    ("router", RouterValidator::FUNCTIONS),
    ("position_manager", PositionManagerValidator::FUNCTIONS),
];

/// Signature of `selector` if a validator of `kind` recognizes it.
pub fn recognized_signature(kind: &str, selector: [u8; 4]) -> Option<&'static str> {
    KINDS
        .iter()
        .find(|(name, _)| *name == kind)
        .and_then(|(_, functions)| signature_of(functions, selector))
}

/// Run the `selectors` subcommand.
pub fn run() {
    for (kind, functions) in KINDS {
        println!("{kind}:");
        if functions.is_empty() {
            println!("  (denies every call)");
        }
        for function in *functions {
            println!("  0x{}  {}", hex::encode(function.selector), function.signature);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_found_per_kind() {
        let approve = [0x09, 0x5e, 0xa7, 0xb3];
        assert_eq!(
            recognized_signature("token_approval", approve),
            Some("approve(address,uint256)")
        );
        assert_eq!(recognized_signature("router", approve), None);
        assert_eq!(recognized_signature("pass_through", approve), None);
        assert_eq!(recognized_signature("unknown", approve), None);
        assert_eq!(
            recognized_signature("position_manager", [0xfc, 0x6f, 0x78, 0x65]),
            Some("collect((uint256,address,uint128,uint128))")
        );
    }
}
