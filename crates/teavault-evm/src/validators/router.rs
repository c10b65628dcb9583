//! Uniswap V3 SwapRouter02 validation.
//!
//! A payload is either one swap/payment operation or one `multicall`
//! envelope (any of the three overloads) wrapping such operations. Every
//! token named by any operation, including every hop of an encoded path,
//! must be allow-listed.

use alloy::primitives::Address;
use alloy::sol_types::SolCall;
use teavault_core::{AllowList, CallRequest, Decision, Denial, Validator};

use super::{
    check_batched, decode_call, function_name, recognized, require_token, require_vault,
    RecognizedFunction, MULTICALL, MULTICALL_BLOCKHASH, MULTICALL_DEADLINE,
};
use crate::abi::{
    IMulticall, IMulticallBlockhash, IMulticallDeadline, IPeripheryPayments,
    IPeripheryPaymentsExtended, IV3SwapRouter,
};

const EXACT_INPUT_SINGLE: [u8; 4] = IV3SwapRouter::exactInputSingleCall::SELECTOR;
const EXACT_OUTPUT_SINGLE: [u8; 4] = IV3SwapRouter::exactOutputSingleCall::SELECTOR;
const EXACT_INPUT: [u8; 4] = IV3SwapRouter::exactInputCall::SELECTOR;
const EXACT_OUTPUT: [u8; 4] = IV3SwapRouter::exactOutputCall::SELECTOR;
const REFUND_ETH: [u8; 4] = IPeripheryPayments::refundETHCall::SELECTOR;
const UNWRAP_WETH9_TO: [u8; 4] = IPeripheryPayments::unwrapWETH9Call::SELECTOR;
const UNWRAP_WETH9: [u8; 4] = IPeripheryPaymentsExtended::unwrapWETH9Call::SELECTOR;

const ENVELOPES: &[[u8; 4]] = &[MULTICALL, MULTICALL_DEADLINE, MULTICALL_BLOCKHASH];

/// A decoded hop in a Uniswap V3 multi-hop path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathHop {
    pub token_in: Address,
    pub fee: u32,
    pub token_out: Address,
}

/// Decode a Uniswap V3 path into a list of hops.
///
/// Path encoding: `token(20) | fee(3) | token(20) [| fee(3) | token(20) ]*`
/// Returns `None` if the path is malformed (wrong length or too short).
pub fn decode_v3_path(path: &[u8]) -> Option<Vec<PathHop>> {
    // Minimum: 20 + 3 + 20 = 43 bytes for one hop
    if path.len() < 43 || (path.len() - 20) % 23 != 0 {
        return None;
    }

    let hops = (0..(path.len() - 20) / 23)
        .map(|i| {
            let offset = i * 23;
            let fee = path[offset + 20..offset + 23]
                .iter()
                .fold(0u32, |acc, b| (acc << 8) | u32::from(*b));
            PathHop {
                token_in: Address::from_slice(&path[offset..offset + 20]),
                fee,
                token_out: Address::from_slice(&path[offset + 23..offset + 43]),
            }
        })
        .collect();
    Some(hops)
}

/// Every token in a path, in order, without repeating shared hop ends.
fn path_tokens(function: &str, path: &[u8]) -> Result<Vec<Address>, Denial> {
    let hops = decode_v3_path(path).ok_or_else(|| Denial::Malformed {
        function: function.to_string(),
        reason: format!("invalid V3 path of {} bytes", path.len()),
    })?;
    let mut tokens = Vec::with_capacity(hops.len() + 1);
    if let Some(first) = hops.first() {
        tokens.push(first.token_in);
    }
    tokens.extend(hops.iter().map(|hop| hop.token_out));
    Ok(tokens)
}

/// Allows SwapRouter02 swaps over allow-listed tokens.
#[derive(Debug)]
pub struct RouterValidator {
    address: Address,
    allow_list: AllowList,
    pin_recipient: bool,
}

impl RouterValidator {
    pub const FUNCTIONS: &'static [RecognizedFunction] = &[
        recognized::<IV3SwapRouter::exactInputSingleCall>(),
        recognized::<IV3SwapRouter::exactOutputSingleCall>(),
        recognized::<IV3SwapRouter::exactInputCall>(),
        recognized::<IV3SwapRouter::exactOutputCall>(),
        recognized::<IPeripheryPayments::refundETHCall>(),
        recognized::<IPeripheryPayments::unwrapWETH9Call>(),
        recognized::<IPeripheryPaymentsExtended::unwrapWETH9Call>(),
        recognized::<IMulticall::multicallCall>(),
        recognized::<IMulticallDeadline::multicallCall>(),
        recognized::<IMulticallBlockhash::multicallCall>(),
    ];

    pub fn new(address: Address, admin: Address) -> Self {
        Self {
            address,
            allow_list: AllowList::new(admin),
            pin_recipient: false,
        }
    }

    /// Also require every swap and unwrap recipient to be the vault.
    pub fn with_pinned_recipient(mut self, pin: bool) -> Self {
        self.pin_recipient = pin;
        self
    }

    pub fn pins_recipient(&self) -> bool {
        self.pin_recipient
    }

    fn check_recipient(&self, function: &str, recipient: Address, vault: Address) -> Result<(), Denial> {
        if self.pin_recipient {
            require_vault(function, recipient, vault)
        } else {
            Ok(())
        }
    }

    fn check_tokens(&self, function: &str, tokens: &[Address]) -> Result<(), Denial> {
        tokens
            .iter()
            .try_for_each(|token| require_token(&self.allow_list, function, *token))
    }

    fn check_operation(&self, vault: Address, selector: [u8; 4], data: &[u8]) -> Result<(), Denial> {
        match selector {
            EXACT_INPUT_SINGLE => {
                let name = function_name::<IV3SwapRouter::exactInputSingleCall>();
                let p = decode_call::<IV3SwapRouter::exactInputSingleCall>(data)?.params;
                self.check_tokens(name, &[p.tokenIn, p.tokenOut])?;
                self.check_recipient(name, p.recipient, vault)
            }
            EXACT_OUTPUT_SINGLE => {
                let name = function_name::<IV3SwapRouter::exactOutputSingleCall>();
                let p = decode_call::<IV3SwapRouter::exactOutputSingleCall>(data)?.params;
                self.check_tokens(name, &[p.tokenIn, p.tokenOut])?;
                self.check_recipient(name, p.recipient, vault)
            }
            EXACT_INPUT => {
                let name = function_name::<IV3SwapRouter::exactInputCall>();
                let p = decode_call::<IV3SwapRouter::exactInputCall>(data)?.params;
                self.check_tokens(name, &path_tokens(name, &p.path)?)?;
                self.check_recipient(name, p.recipient, vault)
            }
            EXACT_OUTPUT => {
                let name = function_name::<IV3SwapRouter::exactOutputCall>();
                let p = decode_call::<IV3SwapRouter::exactOutputCall>(data)?.params;
                self.check_tokens(name, &path_tokens(name, &p.path)?)?;
                self.check_recipient(name, p.recipient, vault)
            }
            REFUND_ETH => decode_call::<IPeripheryPayments::refundETHCall>(data).map(drop),
            UNWRAP_WETH9_TO => {
                let call = decode_call::<IPeripheryPayments::unwrapWETH9Call>(data)?;
                self.check_recipient(
                    function_name::<IPeripheryPayments::unwrapWETH9Call>(),
                    call.recipient,
                    vault,
                )
            }
            UNWRAP_WETH9 => decode_call::<IPeripheryPaymentsExtended::unwrapWETH9Call>(data).map(drop),
            _ => Err(Denial::UnknownSelector { selector }),
        }
    }
}

impl Validator for RouterValidator {
    fn address(&self) -> Address {
        self.address
    }

    fn kind(&self) -> &'static str {
        "router"
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

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::aliases::{U160, U24};
    use alloy::primitives::{address, Bytes, B256, U256};

    const ADMIN: Address = address!("00000000000000000000000000000000000000a1");
    const VAULT: Address = address!("00000000000000000000000000000000000000aa");
    const ROUTER: Address = address!("68b3465833fb72A70ecDF485E0e4C7bD8665Fc45");
    const USDC: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
    const WETH: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
    const DAI: Address = address!("6B175474E89094C44Da98b954EedeAC495271d0F");
    const SCAM: Address = address!("deadbeefdeadbeefdeadbeefdeadbeefdeadbeef");

    fn validator() -> RouterValidator {
        let v = RouterValidator::new(address!("00000000000000000000000000000000000000f2"), ADMIN);
        v.allow_list()
            .set_many(ADMIN, &[USDC, WETH, DAI], &[true, true, true])
            .unwrap();
        v
    }

    fn decide(v: &RouterValidator, payload: impl Into<Bytes>) -> Decision {
        v.decide(VAULT, &CallRequest::new(ROUTER, U256::ZERO, payload))
    }

    fn encode_path(tokens: &[Address], fee: u32) -> Bytes {
        let mut path = Vec::new();
        for (i, token) in tokens.iter().enumerate() {
            if i > 0 {
                path.extend_from_slice(&fee.to_be_bytes()[1..]);
            }
            path.extend_from_slice(token.as_slice());
        }
        path.into()
    }

    fn exact_input_single(token_in: Address, token_out: Address, recipient: Address) -> Bytes {
        IV3SwapRouter::exactInputSingleCall {
            params: IV3SwapRouter::ExactInputSingleParams {
                tokenIn: token_in,
                tokenOut: token_out,
                fee: U24::from(3000u32),
                recipient,
                amountIn: U256::from(1_000_000u64),
                amountOutMinimum: U256::ZERO,
                sqrtPriceLimitX96: U160::ZERO,
            },
        }
        .abi_encode()
        .into()
    }

    fn exact_output(path: Bytes, recipient: Address) -> Bytes {
        IV3SwapRouter::exactOutputCall {
            params: IV3SwapRouter::ExactOutputParams {
                path,
                recipient,
                amountOut: U256::from(1u64),
                amountInMaximum: U256::MAX,
            },
        }
        .abi_encode()
        .into()
    }

    fn exact_input(path: Bytes, recipient: Address) -> Bytes {
        IV3SwapRouter::exactInputCall {
            params: IV3SwapRouter::ExactInputParams {
                path,
                recipient,
                amountIn: U256::from(1u64),
                amountOutMinimum: U256::ZERO,
            },
        }
        .abi_encode()
        .into()
    }

    fn refund_eth() -> Bytes {
        IPeripheryPayments::refundETHCall {}.abi_encode().into()
    }

    // ---- path decoding ----

    #[test]
    fn decode_single_hop_path() {
        let hops = decode_v3_path(&encode_path(&[USDC, WETH], 500)).unwrap();
        assert_eq!(
            hops,
            vec![PathHop {
                token_in: USDC,
                fee: 500,
                token_out: WETH
            }]
        );
    }

    #[test]
    fn decode_multi_hop_path() {
        let hops = decode_v3_path(&encode_path(&[USDC, WETH, DAI], 3000)).unwrap();
        assert_eq!(hops.len(), 2);
        assert_eq!(hops[0].token_out, hops[1].token_in);
        assert_eq!(hops[1].token_out, DAI);
        assert_eq!(hops[1].fee, 3000);
    }

    #[test]
    fn decode_path_rejects_bad_lengths() {
        assert!(decode_v3_path(&[]).is_none());
        assert!(decode_v3_path(&[0u8; 20]).is_none());
        assert!(decode_v3_path(&[0u8; 42]).is_none());
        assert!(decode_v3_path(&[0u8; 44]).is_none());
        assert!(decode_v3_path(&[0u8; 65]).is_none());
        assert!(decode_v3_path(&[0u8; 66]).is_some());
    }

    // ---- single operations ----

    #[test]
    fn single_hop_allowed_tokens() {
        assert!(decide(&validator(), exact_input_single(USDC, WETH, VAULT)).is_allowed());
    }

    #[test]
    fn single_hop_unlisted_token_denied() {
        assert_eq!(
            decide(&validator(), exact_input_single(USDC, SCAM, VAULT)),
            Decision::Deny(Denial::TokenNotAllowed {
                function: "exactInputSingle".into(),
                token: SCAM
            })
        );
    }

    #[test]
    fn every_hop_checked() {
        let v = validator();
        assert!(decide(&v, exact_input(encode_path(&[USDC, WETH, DAI], 500), VAULT)).is_allowed());
        let through_scam = encode_path(&[USDC, SCAM, DAI], 500);
        assert!(!decide(&v, exact_input(through_scam.clone(), VAULT)).is_allowed());
        assert!(!decide(&v, exact_output(through_scam, VAULT)).is_allowed());
    }

    #[test]
    fn malformed_path_denied() {
        let mut bad = encode_path(&[USDC, WETH], 500).to_vec();
        bad.push(0);
        let decision = decide(&validator(), exact_input(bad.into(), VAULT));
        assert!(decision.denial().is_some_and(Denial::is_malformed));
    }

    #[test]
    fn recipient_unconstrained_by_default() {
        let v = validator();
        assert!(!v.pins_recipient());
        assert!(decide(&v, exact_input_single(USDC, WETH, SCAM)).is_allowed());
    }

    #[test]
    fn pinned_recipient_must_be_vault() {
        let v = validator().with_pinned_recipient(true);
        assert!(decide(&v, exact_input_single(USDC, WETH, VAULT)).is_allowed());
        assert_eq!(
            decide(&v, exact_input_single(USDC, WETH, SCAM)),
            Decision::Deny(Denial::RecipientNotVault {
                function: "exactInputSingle".into(),
                recipient: SCAM
            })
        );
        let unwrap_to_scam = IPeripheryPayments::unwrapWETH9Call {
            amountMinimum: U256::ZERO,
            recipient: SCAM,
        }
        .abi_encode();
        assert!(!decide(&v, unwrap_to_scam).is_allowed());
    }

    #[test]
    fn payment_helpers_allowed() {
        let v = validator();
        assert!(decide(&v, refund_eth()).is_allowed());
        let unwrap = IPeripheryPaymentsExtended::unwrapWETH9Call {
            amountMinimum: U256::ZERO,
        }
        .abi_encode();
        assert!(decide(&v, unwrap).is_allowed());
    }

    #[test]
    fn unknown_selector_denied() {
        let sweep = IPeripheryPayments::sweepTokenCall {
            token: USDC,
            amountMinimum: U256::ZERO,
            recipient: VAULT,
        }
        .abi_encode();
        assert_eq!(
            decide(&validator(), sweep),
            Decision::Deny(Denial::UnknownSelector {
                selector: [0xdf, 0x2a, 0xb5, 0xbb]
            })
        );
    }

    // ---- envelopes ----

    #[test]
    fn multicall_all_allowed() {
        let data = IMulticallDeadline::multicallCall {
            deadline: U256::from(1_700_000_000u64),
            data: vec![exact_input_single(USDC, WETH, ROUTER), refund_eth()],
        }
        .abi_encode();
        assert!(decide(&validator(), data).is_allowed());
    }

    #[test]
    fn one_bad_operation_denies_envelope() {
        let data = IMulticallBlockhash::multicallCall {
            previousBlockhash: B256::ZERO,
            data: vec![
                exact_input_single(USDC, WETH, VAULT),
                exact_input_single(WETH, SCAM, VAULT),
            ],
        }
        .abi_encode();
        assert!(matches!(
            decide(&validator(), data),
            Decision::Deny(Denial::TokenNotAllowed { token, .. }) if token == SCAM
        ));
    }

    #[test]
    fn nested_multicall_denied() {
        let inner: Bytes = IMulticall::multicallCall {
            data: vec![exact_input_single(USDC, WETH, VAULT)],
        }
        .abi_encode()
        .into();
        let data = IMulticallDeadline::multicallCall {
            deadline: U256::from(1u64),
            data: vec![inner],
        }
        .abi_encode();
        assert_eq!(
            decide(&validator(), data),
            Decision::Deny(Denial::NestedEnvelope)
        );
    }

    #[test]
    fn truncated_operation_denied() {
        let full = exact_input_single(USDC, WETH, VAULT);
        let decision = decide(&validator(), full[..100].to_vec());
        assert!(decision.denial().is_some_and(Denial::is_malformed));
    }

    #[test]
    fn arbitrary_bytes_never_allowed() {
        let v = validator();
        for payload in [vec![], vec![0u8; 3], vec![0xffu8; 4], vec![0x04, 0xe4, 0x5a, 0xaf, 1, 2, 3]] {
            assert!(!decide(&v, payload).is_allowed());
        }
    }
}
