use alloy_primitives::{Address, U256};
use std::collections::HashMap;

/// Identifies one ERC-20 approval: `owner` allowing `spender` to move `token` on `chain_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllowanceKey {
    pub chain_id: u64,
    pub token: Address,
    pub spender: Address,
    pub owner: Address,
}

impl AllowanceKey {
    pub fn new(chain_id: u64, token: Address, spender: Address, owner: Address) -> Self {
        Self {
            chain_id,
            token,
            spender,
            owner,
        }
    }
}

/// Snapshot of fetched allowances.
pub type Allowances = HashMap<AllowanceKey, U256>;
