//! An in-memory execution environment for forwarded calls.
//!
//! The ledger keeps native balances and a set of contract models keyed by
//! address. Checkpoints are full copies of that state, which keeps batch
//! rollback trivially correct.

use std::collections::HashMap;
use std::fmt;

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::{SolInterface, SolValue};
use teavault_core::CallRequest;
use tracing::debug;

use crate::abi::IERC20;
use crate::forwarder::{CallForwarder, Reverted};

/// Who is calling and with how much native value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallEnv {
    pub caller: Address,
    pub value: U256,
}

/// A contract living in the [`Ledger`].
pub trait Contract: Send + fmt::Debug {
    fn call(&mut self, env: &CallEnv, data: &[u8]) -> Result<Bytes, Reverted>;

    fn clone_box(&self) -> Box<dyn Contract>;
}

impl Clone for Box<dyn Contract> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[derive(Debug, Clone, Default)]
struct LedgerState {
    balances: HashMap<Address, U256>,
    contracts: HashMap<Address, Box<dyn Contract>>,
}

/// Snapshot returned by [`Ledger::checkpoint`].
#[derive(Debug, Clone)]
pub struct LedgerCheckpoint(LedgerState);

/// In-memory [`CallForwarder`].
#[derive(Debug, Default)]
pub struct Ledger {
    state: LedgerState,
    attempts: usize,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_balance(&mut self, account: Address, amount: U256) {
        self.state.balances.insert(account, amount);
    }

    pub fn balance(&self, account: Address) -> U256 {
        self.state.balances.get(&account).copied().unwrap_or_default()
    }

    /// Place `contract` at `address`, replacing anything already there.
    pub fn install(&mut self, address: Address, contract: impl Contract + 'static) {
        self.state.contracts.insert(address, Box::new(contract));
    }

    /// Run a call against a copy of the target, leaving the ledger untouched.
    pub fn static_call(&self, target: Address, data: &[u8]) -> Result<Bytes, Reverted> {
        let env = CallEnv {
            caller: Address::ZERO,
            value: U256::ZERO,
        };
        match self.state.contracts.get(&target) {
            Some(contract) => contract.clone_box().call(&env, data),
            None => Ok(Bytes::new()),
        }
    }

    /// Number of calls forwarded so far, including ones later rolled back.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    fn transfer_value(&mut self, from: Address, to: Address, value: U256) -> Result<(), Reverted> {
        if value.is_zero() {
            return Ok(());
        }
        let available = self.balance(from);
        let remaining = available
            .checked_sub(value)
            .ok_or_else(|| Reverted::with_reason("insufficient native balance"))?;
        self.state.balances.insert(from, remaining);
        let credited = self.balance(to).saturating_add(value);
        self.state.balances.insert(to, credited);
        Ok(())
    }
}

impl CallForwarder for Ledger {
    type Checkpoint = LedgerCheckpoint;

    fn checkpoint(&mut self) -> LedgerCheckpoint {
        LedgerCheckpoint(self.state.clone())
    }

    fn rollback(&mut self, checkpoint: LedgerCheckpoint) {
        self.state = checkpoint.0;
    }

    fn forward(&mut self, from: Address, request: &CallRequest) -> Result<Bytes, Reverted> {
        self.attempts += 1;
        debug!(%from, target = %request.target, value = %request.value, "ledger call");

        let before = self.state.balances.clone();
        self.transfer_value(from, request.target, request.value)?;

        let env = CallEnv {
            caller: from,
            value: request.value,
        };
        let result = match self.state.contracts.get_mut(&request.target) {
            Some(contract) => contract.call(&env, &request.payload),
            None => Ok(Bytes::new()),
        };
        if result.is_err() {
            self.state.balances = before;
        }
        result
    }
}

/// A plain ERC-20 token model: balances, allowances, `approve` and
/// `transfer`.
#[derive(Debug, Clone, Default)]
pub struct Erc20Token {
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
}

impl Erc20Token {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `account` out of thin air.
    pub fn with_balance(mut self, account: Address, amount: U256) -> Self {
        self.balances.insert(account, amount);
        self
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }
}

impl Contract for Erc20Token {
    fn call(&mut self, env: &CallEnv, data: &[u8]) -> Result<Bytes, Reverted> {
        if !env.value.is_zero() {
            return Err(Reverted::with_reason("ERC20: non-payable"));
        }
        let call = IERC20::IERC20Calls::abi_decode(data)
            .map_err(|e| Reverted::with_reason(format!("ERC20: bad calldata: {e}")))?;
        let output = match call {
            IERC20::IERC20Calls::balanceOf(c) => self.balance_of(c.owner).abi_encode(),
            IERC20::IERC20Calls::allowance(c) => self.allowance(c.owner, c.spender).abi_encode(),
            IERC20::IERC20Calls::approve(c) => {
                self.allowances.insert((env.caller, c.spender), c.amount);
                true.abi_encode()
            }
            IERC20::IERC20Calls::transfer(c) => {
                let from_balance = self.balance_of(env.caller);
                let remaining = from_balance
                    .checked_sub(c.amount)
                    .ok_or_else(|| Reverted::with_reason("ERC20: transfer amount exceeds balance"))?;
                self.balances.insert(env.caller, remaining);
                let to_balance = self.balance_of(c.to).saturating_add(c.amount);
                self.balances.insert(c.to, to_balance);
                true.abi_encode()
            }
        };
        Ok(output.into())
    }

    fn clone_box(&self) -> Box<dyn Contract> {
        Box::new(self.clone())
    }
}
