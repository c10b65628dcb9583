//! ABI definitions for the contracts the vault's validators understand,
//! using alloy's `sol!` macro.
//!
//! Overloaded functions (`multicall`, `unwrapWETH9`) are split across
//! separate interfaces so each generated call type has a single signature.

use alloy::sol;

sol! {
    /// ERC-20 token interface.
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
    }
}

sol! {
    /// Uniswap V3 SwapRouter02 swap entry points (no deadline field).
    interface IV3SwapRouter {
        struct ExactInputSingleParams {
            address tokenIn;
            address tokenOut;
            uint24 fee;
            address recipient;
            uint256 amountIn;
            uint256 amountOutMinimum;
            uint160 sqrtPriceLimitX96;
        }

        struct ExactInputParams {
            bytes path;
            address recipient;
            uint256 amountIn;
            uint256 amountOutMinimum;
        }

        struct ExactOutputSingleParams {
            address tokenIn;
            address tokenOut;
            uint24 fee;
            address recipient;
            uint256 amountOut;
            uint256 amountInMaximum;
            uint160 sqrtPriceLimitX96;
        }

        struct ExactOutputParams {
            bytes path;
            address recipient;
            uint256 amountOut;
            uint256 amountInMaximum;
        }

        function exactInputSingle(ExactInputSingleParams calldata params) external payable returns (uint256 amountOut);
        function exactInput(ExactInputParams calldata params) external payable returns (uint256 amountOut);
        function exactOutputSingle(ExactOutputSingleParams calldata params) external payable returns (uint256 amountIn);
        function exactOutput(ExactOutputParams calldata params) external payable returns (uint256 amountIn);
    }
}

sol! {
    /// Native-asset helpers shared by the router and the position manager.
    interface IPeripheryPayments {
        function refundETH() external payable;
        function unwrapWETH9(uint256 amountMinimum, address recipient) external payable;
        function sweepToken(address token, uint256 amountMinimum, address recipient) external payable;
    }
}

sol! {
    /// SwapRouter02's recipient-less `unwrapWETH9` overload.
    interface IPeripheryPaymentsExtended {
        function unwrapWETH9(uint256 amountMinimum) external payable;
    }
}

sol! {
    interface IMulticall {
        function multicall(bytes[] data) external payable returns (bytes[] results);
    }
}

sol! {
    interface IMulticallDeadline {
        function multicall(uint256 deadline, bytes[] data) external payable returns (bytes[] results);
    }
}

sol! {
    interface IMulticallBlockhash {
        function multicall(bytes32 previousBlockhash, bytes[] data) external payable returns (bytes[] results);
    }
}

sol! {
    /// Uniswap V3 NonfungiblePositionManager.
    interface INonfungiblePositionManager {
        struct MintParams {
            address token0;
            address token1;
            uint24 fee;
            int24 tickLower;
            int24 tickUpper;
            uint256 amount0Desired;
            uint256 amount1Desired;
            uint256 amount0Min;
            uint256 amount1Min;
            address recipient;
            uint256 deadline;
        }

        struct IncreaseLiquidityParams {
            uint256 tokenId;
            uint256 amount0Desired;
            uint256 amount1Desired;
            uint256 amount0Min;
            uint256 amount1Min;
            uint256 deadline;
        }

        struct DecreaseLiquidityParams {
            uint256 tokenId;
            uint128 liquidity;
            uint256 amount0Min;
            uint256 amount1Min;
            uint256 deadline;
        }

        struct CollectParams {
            uint256 tokenId;
            address recipient;
            uint128 amount0Max;
            uint128 amount1Max;
        }

        function mint(MintParams calldata params) external payable returns (uint256 tokenId, uint128 liquidity, uint256 amount0, uint256 amount1);
        function increaseLiquidity(IncreaseLiquidityParams calldata params) external payable returns (uint128 liquidity, uint256 amount0, uint256 amount1);
        function decreaseLiquidity(DecreaseLiquidityParams calldata params) external payable returns (uint256 amount0, uint256 amount1);
        function collect(CollectParams calldata params) external payable returns (uint256 amount0, uint256 amount1);
        function burn(uint256 tokenId) external payable;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, U256};
    use alloy::sol_types::SolCall;

    #[test]
    fn encode_approve() {
        let call = IERC20::approveCall {
            spender: Address::ZERO,
            amount: U256::MAX,
        };
        let encoded = call.abi_encode();
        assert_eq!(encoded.len(), 68);
        // approve(address,uint256) selector = 0x095ea7b3
        assert_eq!(&encoded[..4], &[0x09, 0x5e, 0xa7, 0xb3]);
    }

    #[test]
    fn router_selectors() {
        assert_eq!(IV3SwapRouter::exactInputSingleCall::SELECTOR, [0x04, 0xe4, 0x5a, 0xaf]);
        assert_eq!(IV3SwapRouter::exactOutputSingleCall::SELECTOR, [0x50, 0x23, 0xb4, 0xdf]);
        assert_eq!(IV3SwapRouter::exactInputCall::SELECTOR, [0xb8, 0x58, 0x18, 0x3f]);
        assert_eq!(IV3SwapRouter::exactOutputCall::SELECTOR, [0x09, 0xb8, 0x13, 0x46]);
    }

    #[test]
    fn payment_selectors() {
        assert_eq!(IPeripheryPayments::refundETHCall::SELECTOR, [0x12, 0x21, 0x0e, 0x8a]);
        assert_eq!(IPeripheryPayments::unwrapWETH9Call::SELECTOR, [0x49, 0x40, 0x4b, 0x7c]);
        assert_eq!(IPeripheryPayments::sweepTokenCall::SELECTOR, [0xdf, 0x2a, 0xb5, 0xbb]);
        assert_eq!(IPeripheryPaymentsExtended::unwrapWETH9Call::SELECTOR, [0x49, 0x61, 0x69, 0x97]);
    }

    #[test]
    fn multicall_selectors() {
        assert_eq!(IMulticall::multicallCall::SELECTOR, [0xac, 0x96, 0x50, 0xd8]);
        assert_eq!(IMulticallDeadline::multicallCall::SELECTOR, [0x5a, 0xe4, 0x01, 0xdc]);
        assert_eq!(IMulticallBlockhash::multicallCall::SELECTOR, [0x1f, 0x04, 0x64, 0xd1]);
    }

    #[test]
    fn position_manager_selectors() {
        assert_eq!(INonfungiblePositionManager::mintCall::SELECTOR, [0x88, 0x31, 0x64, 0x56]);
        assert_eq!(
            INonfungiblePositionManager::increaseLiquidityCall::SELECTOR,
            [0x21, 0x9f, 0x5d, 0x17]
        );
        assert_eq!(
            INonfungiblePositionManager::decreaseLiquidityCall::SELECTOR,
            [0x0c, 0x49, 0xcc, 0xbe]
        );
        assert_eq!(INonfungiblePositionManager::collectCall::SELECTOR, [0xfc, 0x6f, 0x78, 0x65]);
        assert_eq!(INonfungiblePositionManager::burnCall::SELECTOR, [0x42, 0x96, 0x6c, 0x68]);
    }
}
