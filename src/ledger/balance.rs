//! ENFORCED BALANCE TYPE - used by the Ledger Store
//!
//! This is the SINGLE source of truth for balance values.
//! ALL balance mutations MUST go through these methods.
//!
//! # Enforcement Strategy:
//! 1. Fields are PRIVATE - no direct access
//! 2. All mutations return Result - errors are explicit
//! 3. Version auto-increments - optimistic concurrency token
//! 4. checked_add/sub - overflow protection

use serde::{Deserialize, Serialize};

/// Balance for a single account
///
/// # Invariants (ENFORCED by private fields):
/// - `available` is never negative (unsigned + explicit funds check)
/// - `version` increments on every committed mutation
/// - No overflow/underflow (checked arithmetic)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountBalance {
    available: u64, // PRIVATE - ONLY modified through credit/debit
    version: u64,   // PRIVATE - incremented on every mutation
}

impl AccountBalance {
    /// Get available balance (read-only)
    #[inline(always)]
    pub const fn available(&self) -> u64 {
        self.available
    }

    /// Get version (read-only) - the optimistic-concurrency token
    #[inline(always)]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Credit funds to the available balance
    ///
    /// # Errors
    /// - Returns error on overflow
    pub fn credit(&mut self, amount: u64) -> Result<(), &'static str> {
        self.available = self
            .available
            .checked_add(amount)
            .ok_or("Credit overflow")?;
        self.version = self.version.wrapping_add(1);
        Ok(())
    }

    /// Debit funds from the available balance
    ///
    /// The funds check and the subtraction are one operation on this value;
    /// the store guarantees the value itself is not stale when committed.
    ///
    /// # Errors
    /// - "Insufficient funds" if available < amount
    pub fn debit(&mut self, amount: u64) -> Result<(), &'static str> {
        if self.available < amount {
            return Err("Insufficient funds");
        }
        self.available = self
            .available
            .checked_sub(amount)
            .ok_or("Debit underflow")?;
        self.version = self.version.wrapping_add(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit() {
        let mut bal = AccountBalance::default();
        assert_eq!(bal.available(), 0);

        bal.credit(100).unwrap();
        assert_eq!(bal.available(), 100);
        assert_eq!(bal.version(), 1);

        bal.credit(50).unwrap();
        assert_eq!(bal.available(), 150);
        assert_eq!(bal.version(), 2);
    }

    #[test]
    fn test_credit_overflow() {
        let mut bal = AccountBalance::default();
        bal.credit(u64::MAX).unwrap();

        assert!(bal.credit(1).is_err());
        assert_eq!(bal.available(), u64::MAX); // Unchanged
    }

    #[test]
    fn test_debit() {
        let mut bal = AccountBalance::default();
        bal.credit(100).unwrap();

        bal.debit(60).unwrap();
        assert_eq!(bal.available(), 40);
        assert_eq!(bal.version(), 2);
    }

    #[test]
    fn test_debit_insufficient() {
        let mut bal = AccountBalance::default();
        bal.credit(50).unwrap();

        assert!(bal.debit(100).is_err());
        assert_eq!(bal.available(), 50); // Unchanged
        assert_eq!(bal.version(), 1); // Failed mutation does not bump version
    }
}
