use alloy_primitives::{Address, U256};
use fixed::types::I80F48;

use crate::types::{AllowanceKey, Allowances};

/// Outcome of a form-level check.
///
/// `is_valid: None` with no error is the "nothing entered yet" state: no error should be shown,
/// but the input is not submittable either.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationResponse {
    pub is_valid: Option<bool>,
    pub error: Option<String>,
}

impl ValidationResponse {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn valid() -> Self {
        Self {
            is_valid: Some(true),
            error: None,
        }
    }

    pub fn invalid() -> Self {
        Self {
            is_valid: Some(false),
            error: None,
        }
    }

    pub fn invalid_with(error: impl Into<String>) -> Self {
        Self {
            is_valid: Some(false),
            error: Some(error.into()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid == Some(true)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AmountValidation {
    pub amount: I80F48,
    pub balance: Option<I80F48>,
    pub min_amount_allowed: Option<I80F48>,
    pub max_amount_allowed: Option<I80F48>,
    pub should_display_min: bool,
}

/// Checks run in order and the first failure wins.
pub fn validate_amount(props: &AmountValidation) -> ValidationResponse {
    let amount = props.amount;

    if amount == I80F48::ZERO {
        return ValidationResponse::empty();
    }

    if amount < I80F48::ZERO {
        return ValidationResponse::invalid_with("Invalid amount");
    }

    if let Some(max) = props.max_amount_allowed {
        if amount > max {
            return ValidationResponse::invalid_with("Exceeded max amount");
        }
    }

    if let Some(min) = props.min_amount_allowed {
        if amount < min {
            let error = if props.should_display_min {
                format!("Amount under minimum allowed (min {min})")
            } else {
                "Amount under minimum allowed".to_string()
            };
            return ValidationResponse::invalid_with(error);
        }
    }

    if let Some(balance) = props.balance {
        if amount > balance {
            return ValidationResponse::invalid_with("Insufficient balance");
        }
    }

    ValidationResponse::valid()
}

#[derive(Debug, Clone, Copy)]
pub struct AllowanceValidation<'a> {
    pub owner: Address,
    pub token: Address,
    pub spender: Address,
    pub chain_id: u64,
    pub allowances: &'a Allowances,
    pub amount: U256,
}

/// Pure lookup against an allowance snapshot; a missing entry is not approved.
pub fn validate_allowance(props: &AllowanceValidation) -> ValidationResponse {
    if props.token.is_zero() || props.spender.is_zero() {
        return ValidationResponse::invalid();
    }

    let key = AllowanceKey::new(props.chain_id, props.token, props.spender, props.owner);
    let is_approved = props
        .allowances
        .get(&key)
        .is_some_and(|allowance| *allowance >= props.amount);

    ValidationResponse {
        is_valid: Some(is_approved),
        error: None,
    }
}

pub fn validate_address(address: Option<&str>) -> ValidationResponse {
    match address.map(str::trim) {
        None | Some("") => ValidationResponse::invalid(),
        Some(address) if !is_address(address) => ValidationResponse::invalid_with("Invalid Address"),
        Some(_) => ValidationResponse::valid(),
    }
}

/// `0x` followed by 40 hex digits. Mixed-case input must carry a valid EIP-55 checksum.
pub fn is_address(value: &str) -> bool {
    let Some(hex) = value.strip_prefix("0x") else {
        return false;
    };
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return false;
    }

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Address::parse_checksummed(value, None).is_ok();
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{VEYFI_ADDRESS, VEYFI_CHAIN_ID, YFI_ADDRESS};
    use fixed_macro::types::I80F48;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn amount(amount: I80F48) -> AmountValidation {
        AmountValidation {
            amount,
            ..Default::default()
        }
    }

    #[test_case(None, None, None ; "no bounds")]
    #[test_case(Some(I80F48!(10)), None, None ; "with balance")]
    #[test_case(Some(I80F48!(10)), Some(I80F48!(5)), Some(I80F48!(1)) ; "with every bound")]
    fn zero_amount_is_empty(
        balance: Option<I80F48>,
        min: Option<I80F48>,
        max: Option<I80F48>,
    ) {
        let result = validate_amount(&AmountValidation {
            amount: I80F48::ZERO,
            balance,
            min_amount_allowed: min,
            max_amount_allowed: max,
            should_display_min: true,
        });
        assert_eq!(result, ValidationResponse::empty());
    }

    #[test]
    fn negative_amount_is_invalid() {
        let result = validate_amount(&AmountValidation {
            balance: Some(I80F48!(10)),
            ..amount(I80F48!(-5))
        });
        assert_eq!(result, ValidationResponse::invalid_with("Invalid amount"));
    }

    #[test]
    fn amount_above_balance_is_insufficient() {
        let result = validate_amount(&AmountValidation {
            balance: Some(I80F48!(10)),
            ..amount(I80F48!(15))
        });
        assert_eq!(result, ValidationResponse::invalid_with("Insufficient balance"));
    }

    #[test]
    fn amount_below_minimum() {
        let result = validate_amount(&AmountValidation {
            balance: Some(I80F48!(10)),
            min_amount_allowed: Some(I80F48!(10)),
            ..amount(I80F48!(5))
        });
        assert_eq!(
            result,
            ValidationResponse::invalid_with("Amount under minimum allowed")
        );

        let result = validate_amount(&AmountValidation {
            min_amount_allowed: Some(I80F48!(10)),
            should_display_min: true,
            ..amount(I80F48!(5))
        });
        assert_eq!(
            result,
            ValidationResponse::invalid_with("Amount under minimum allowed (min 10)")
        );
    }

    #[test]
    fn max_is_checked_before_balance() {
        let result = validate_amount(&AmountValidation {
            balance: Some(I80F48!(1)),
            max_amount_allowed: Some(I80F48!(2)),
            ..amount(I80F48!(3))
        });
        assert_eq!(result, ValidationResponse::invalid_with("Exceeded max amount"));
    }

    #[test]
    fn amount_within_bounds_is_valid() {
        let result = validate_amount(&AmountValidation {
            balance: Some(I80F48!(10)),
            min_amount_allowed: Some(I80F48!(1)),
            max_amount_allowed: Some(I80F48!(10)),
            ..amount(I80F48!(10))
        });
        assert!(result.is_valid());
        assert_eq!(result.error, None);
    }

    #[test]
    fn allowance_must_cover_amount() {
        let owner = Address::repeat_byte(0x11);
        let mut allowances = Allowances::new();
        allowances.insert(
            AllowanceKey::new(VEYFI_CHAIN_ID, YFI_ADDRESS, VEYFI_ADDRESS, owner),
            U256::from(100u64),
        );

        let check = |amount: u64| {
            validate_allowance(&AllowanceValidation {
                owner,
                token: YFI_ADDRESS,
                spender: VEYFI_ADDRESS,
                chain_id: VEYFI_CHAIN_ID,
                allowances: &allowances,
                amount: U256::from(amount),
            })
        };

        assert!(check(100).is_valid());
        assert_eq!(check(101), ValidationResponse::invalid());
    }

    #[test]
    fn allowance_for_unknown_key_is_invalid() {
        let allowances = Allowances::new();
        let result = validate_allowance(&AllowanceValidation {
            owner: Address::repeat_byte(0x11),
            token: YFI_ADDRESS,
            spender: VEYFI_ADDRESS,
            chain_id: VEYFI_CHAIN_ID,
            allowances: &allowances,
            amount: U256::ZERO,
        });
        assert_eq!(result, ValidationResponse::invalid());

        let result = validate_allowance(&AllowanceValidation {
            owner: Address::repeat_byte(0x11),
            token: Address::ZERO,
            spender: VEYFI_ADDRESS,
            chain_id: VEYFI_CHAIN_ID,
            allowances: &allowances,
            amount: U256::ZERO,
        });
        assert_eq!(result, ValidationResponse::invalid());
    }

    #[test_case(None, ValidationResponse::invalid() ; "missing")]
    #[test_case(Some(""), ValidationResponse::invalid() ; "empty")]
    #[test_case(Some("0x1234"), ValidationResponse::invalid_with("Invalid Address") ; "too short")]
    #[test_case(Some("90c1f9220d90d3966fbee24045edd73e1d588ad5"), ValidationResponse::invalid_with("Invalid Address") ; "missing prefix")]
    #[test_case(Some("0x90C1f9220d90d3966FbeE24045EDd73E1d588aD5"), ValidationResponse::invalid_with("Invalid Address") ; "bad checksum")]
    #[test_case(Some("0x90c1f9220d90d3966FbeE24045EDd73E1d588aD5"), ValidationResponse::valid() ; "checksummed")]
    #[test_case(Some("0x90c1f9220d90d3966fbee24045edd73e1d588ad5"), ValidationResponse::valid() ; "lowercase")]
    fn validates_addresses(input: Option<&str>, expected: ValidationResponse) {
        assert_eq!(validate_address(input), expected);
    }
}
