//! Access gating from a token balance.
//!
//! Wallet connection and the on-chain balance query live outside this crate.
//! Hosts hand in a [`TokenBalance`] snapshot and the gate turns it into the
//! single boolean the editor consumes.

use crate::constants::{DEFAULT_MINIMUM_BALANCE, DEFAULT_TOKEN_DECIMALS};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Raw balance as reported by the token contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenBalance {
    pub raw: u128,
    /// `None` while the contract's decimals are still unknown
    pub decimals: Option<u8>,
}

impl TokenBalance {
    pub fn new(raw: u128, decimals: Option<u8>) -> Self {
        Self { raw, decimals }
    }

    /// Balance in whole tokens.
    pub fn balance(&self) -> f64 {
        self.balance_with_default(DEFAULT_TOKEN_DECIMALS)
    }

    pub fn balance_with_default(&self, default_decimals: u8) -> f64 {
        let decimals = self.decimals.unwrap_or(default_decimals);
        self.raw as f64 / 10f64.powi(i32::from(decimals))
    }
}

/// Display a whole-token balance, with more precision for small amounts.
pub fn format_balance(balance: f64) -> String {
    if balance < 1.0 {
        format!("{:.6}", balance)
    } else if balance < 100.0 {
        format!("{:.4}", balance)
    } else {
        format!("{:.2}", balance)
    }
}

/// Inputs to one access evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessSignal {
    pub connected: bool,
    pub balance: Option<TokenBalance>,
}

/// Decides whether the current wallet may edit.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessGate {
    minimum_balance: f64,
    default_decimals: u8,
    granted: bool,
    balance: f64,
}

impl AccessGate {
    pub fn new(minimum_balance: f64, default_decimals: u8) -> Self {
        Self {
            minimum_balance,
            default_decimals,
            granted: false,
            balance: 0.0,
        }
    }

    /// A gate that is always open, for offline and batch use.
    pub fn open() -> Self {
        Self {
            minimum_balance: 0.0,
            default_decimals: DEFAULT_TOKEN_DECIMALS,
            granted: true,
            balance: 0.0,
        }
    }

    /// Re-evaluate on demand or after a connection change. Returns the verdict.
    pub fn refresh(&mut self, signal: AccessSignal) -> bool {
        self.balance = signal
            .balance
            .map(|balance| balance.balance_with_default(self.default_decimals))
            .unwrap_or(0.0);
        self.granted = signal.connected && signal.balance.is_some() && self.balance >= self.minimum_balance;
        debug!(
            connected = signal.connected,
            balance = self.balance,
            required = self.minimum_balance,
            granted = self.granted,
            "Access evaluated"
        );
        self.granted
    }

    pub fn is_granted(&self) -> bool {
        self.granted
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn formatted_balance(&self) -> String {
        format_balance(self.balance)
    }

    pub fn minimum_balance(&self) -> f64 {
        self.minimum_balance
    }
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new(DEFAULT_MINIMUM_BALANCE, DEFAULT_TOKEN_DECIMALS)
    }
}
