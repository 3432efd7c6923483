use alloy_primitives::{Address, U256};
use fixed::types::I80F48;
use fixed_macro::types::I80F48;
use std::cmp::Ordering;

use super::{ratio, NormalizedAmount};

/// An empty position shows the minimum boost.
const EMPTY_POSITION_BOOST: I80F48 = I80F48!(1);
const MAX_BOOST: I80F48 = I80F48!(10);

/// Read-only mirror of a gauge contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gauge {
    pub address: Address,
    /// The vault token staked into this gauge.
    pub vault_address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_staked: NormalizedAmount,
    pub reward_rate: NormalizedAmount,
}

/// An account's stake in one gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaugePosition {
    pub address: Address,
    pub deposit: NormalizedAmount,
    /// Earned, unclaimed dYFI.
    pub reward: NormalizedAmount,
    /// Between 1x and 10x.
    pub boost: I80F48,
}

impl GaugePosition {
    pub fn new(
        address: Address,
        deposit: NormalizedAmount,
        reward: NormalizedAmount,
        boosted_balance: U256,
    ) -> Self {
        Self {
            address,
            deposit,
            reward,
            boost: boost(deposit.raw, boosted_balance),
        }
    }

    pub fn has_rewards(&self) -> bool {
        !self.reward.is_zero()
    }
}

/// `min(1, boosted / balance) * 10`.
pub fn boost(balance: U256, boosted_balance: U256) -> I80F48 {
    if balance.is_zero() {
        return EMPTY_POSITION_BOOST;
    }

    ratio(boosted_balance, balance).min(I80F48::ONE) * MAX_BOOST
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeSortKey {
    Name,
    TotalStaked,
}

pub fn sort_gauges(gauges: &mut [Gauge], by: GaugeSortKey, order: SortOrder) {
    gauges.sort_by(|a, b| {
        let ordering = match by {
            GaugeSortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            GaugeSortKey::TotalStaked => a
                .total_staked
                .normalized()
                .partial_cmp(&b.total_staked.normalized())
                .unwrap_or(Ordering::Equal),
        };

        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(0, 0, I80F48!(1) ; "empty position")]
    #[test_case(4, 1, I80F48!(2.5) ; "quarter boosted")]
    #[test_case(100, 50, I80F48!(5) ; "half boosted")]
    #[test_case(100, 100, I80F48!(10) ; "max boost")]
    #[test_case(100, 250, I80F48!(10) ; "capped above max")]
    fn boost_from_balances(balance: u64, boosted: u64, expected: I80F48) {
        assert_eq!(boost(U256::from(balance), U256::from(boosted)), expected);
    }

    fn gauge(name: &str, staked: u64) -> Gauge {
        Gauge {
            address: Address::repeat_byte(staked as u8),
            vault_address: Address::ZERO,
            name: name.to_string(),
            symbol: name.to_string(),
            decimals: 18,
            total_staked: NormalizedAmount::new(U256::from(staked), 0),
            reward_rate: NormalizedAmount::zero(18),
        }
    }

    #[test]
    fn sorts_by_name_case_insensitive() {
        let mut gauges = vec![gauge("beta", 1), gauge("Alpha", 2), gauge("gamma", 3)];
        sort_gauges(&mut gauges, GaugeSortKey::Name, SortOrder::Asc);

        let names: Vec<_> = gauges.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn sorts_by_total_staked_descending() {
        let mut gauges = vec![gauge("a", 5), gauge("b", 20), gauge("c", 1)];
        sort_gauges(&mut gauges, GaugeSortKey::TotalStaked, SortOrder::Desc);

        let names: Vec<_> = gauges.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }
}
