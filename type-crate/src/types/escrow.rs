use alloy_primitives::{Address, U256};
use fixed::types::I80F48;

use crate::voting_power::voting_power_at;

use super::ratio;

/// Static information about the voting escrow contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotingEscrow {
    pub address: Address,
    /// The locked token (YFI).
    pub token: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub supply: U256,
    pub reward_pool: Address,
}

/// An account's lock, as reported by the position helper.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EscrowPosition {
    /// Current veYFI balance (voting power).
    pub balance: U256,
    /// YFI locked.
    pub underlying_balance: U256,
    pub unlock_time_ms: u64,
    /// YFI forfeited by withdrawing right now.
    pub penalty: U256,
    pub withdrawable: U256,
}

impl EscrowPosition {
    pub fn penalty_ratio(&self) -> I80F48 {
        if self.underlying_balance.is_zero() {
            return I80F48::ZERO;
        }
        ratio(self.penalty, self.underlying_balance)
    }

    pub fn has_lock(&self) -> bool {
        !self.underlying_balance.is_zero()
    }

    pub fn is_unlocked(&self, now_ms: u64) -> bool {
        self.unlock_time_ms <= now_ms
    }

    pub fn voting_power(&self, now_ms: u64) -> U256 {
        voting_power_at(self.underlying_balance, self.unlock_time_ms, now_ms)
    }
}
