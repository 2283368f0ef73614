//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for balances and settlements
//! that give more meaningful error messages than standard assertions.

use core_kernel::MemberId;
use domain_settlement::{residual_balances, NetBalance, Settlement};
use rust_decimal::Decimal;

/// Asserts that net balances cancel out within `tolerance`
pub fn assert_zero_sum(balances: &[NetBalance], tolerance: Decimal) {
    let total: Decimal = balances.iter().map(|b| b.balance.amount()).sum();
    assert!(
        total.abs() <= tolerance,
        "Balances sum to {}, expected zero within {}",
        total,
        tolerance
    );
}

/// Asserts that applying `settlements` leaves every balance within `tolerance`
pub fn assert_settles(balances: &[NetBalance], settlements: &[Settlement], tolerance: Decimal) {
    for (member_id, remaining) in residual_balances(balances, settlements) {
        assert!(
            remaining.abs() <= tolerance,
            "Member {} left with {} after settlements",
            member_id,
            remaining
        );
    }
}

/// Asserts that one member's balance equals `expected`
pub fn assert_balance(balances: &[NetBalance], member_id: MemberId, expected: Decimal) {
    let balance = balances
        .iter()
        .find(|b| b.member_id == member_id)
        .unwrap_or_else(|| panic!("No balance for member {}", member_id));
    assert_eq!(
        balance.balance.amount(),
        expected,
        "Balance for member {} is {}, expected {}",
        member_id,
        balance.balance.amount(),
        expected
    );
}

/// Asserts that an error matches a specific variant
#[macro_export]
macro_rules! assert_err_variant {
    ($result:expr, $pattern:pat) => {
        match $result {
            Ok(value) => panic!("Expected Err matching {}, got Ok({:?})", stringify!($pattern), value),
            Err(ref e) => {
                assert!(
                    matches!(e, $pattern),
                    "Error {:?} does not match pattern {}",
                    e,
                    stringify!($pattern)
                );
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{Currency, Money, MoneyError};
    use rust_decimal_macros::dec;

    #[test]
    fn test_assert_settles() {
        let creditor = MemberId::new();
        let debtor = MemberId::new();
        let balances = vec![
            NetBalance {
                member_id: creditor,
                total_paid: Money::new(dec!(20), Currency::USD),
                total_owed: Money::new(dec!(10), Currency::USD),
                balance: Money::new(dec!(10), Currency::USD),
            },
            NetBalance {
                member_id: debtor,
                total_paid: Money::zero(Currency::USD),
                total_owed: Money::new(dec!(10), Currency::USD),
                balance: Money::new(dec!(-10), Currency::USD),
            },
        ];
        let settlements = vec![Settlement {
            from: debtor,
            to: creditor,
            amount: Money::new(dec!(10), Currency::USD),
        }];

        assert_zero_sum(&balances, dec!(0.01));
        assert_settles(&balances, &settlements, dec!(0.01));
        assert_balance(&balances, debtor, dec!(-10));
    }

    #[test]
    #[should_panic(expected = "left with")]
    fn test_assert_settles_detects_leftover() {
        let member_id = MemberId::new();
        let balances = vec![NetBalance {
            member_id,
            total_paid: Money::new(dec!(5), Currency::USD),
            total_owed: Money::zero(Currency::USD),
            balance: Money::new(dec!(5), Currency::USD),
        }];
        assert_settles(&balances, &[], dec!(0.01));
    }

    #[test]
    fn test_assert_err_variant() {
        let result = Money::new(dec!(1), Currency::USD).allocate(0);
        crate::assert_err_variant!(result, MoneyError::InvalidAmount(_));
    }

    #[test]
    #[should_panic(expected = "Expected Err")]
    fn test_assert_err_variant_rejects_ok() {
        let result: Result<u32, MoneyError> = Ok(3);
        crate::assert_err_variant!(result, MoneyError::InvalidAmount(_));
    }
}
