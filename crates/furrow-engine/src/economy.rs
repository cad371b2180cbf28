//! Money and energy for player actions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Economy error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EconomyError {
    /// Insufficient funds
    #[error("Insufficient funds: need {needed}, have {have}")]
    InsufficientFunds {
        /// Amount needed
        needed: u64,
        /// Amount available
        have: u64,
    },
    /// Insufficient energy
    #[error("Not enough energy: need {needed}, have {have}")]
    InsufficientEnergy {
        /// Energy needed
        needed: u32,
        /// Energy available
        have: u32,
    },
}

/// Result type for economy operations.
pub type EconomyResult<T> = Result<T, EconomyError>;

/// The player's money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Wallet {
    balance: u64,
}

impl Wallet {
    /// Creates a wallet with a starting balance.
    #[must_use]
    pub fn new(initial: u64) -> Self {
        Self { balance: initial }
    }

    /// Current balance.
    #[must_use]
    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Whether `amount` can be spent.
    #[must_use]
    pub fn can_afford(&self, amount: u64) -> bool {
        self.balance >= amount
    }

    /// Adds money to the wallet.
    pub fn earn(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
    }

    /// Removes money from the wallet.
    pub fn spend(&mut self, amount: u64) -> EconomyResult<()> {
        if !self.can_afford(amount) {
            return Err(EconomyError::InsufficientFunds {
                needed: amount,
                have: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }
}

/// Daily action budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Energy {
    current: u32,
    max: u32,
}

impl Energy {
    /// Full energy with the given maximum.
    #[must_use]
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Energy with an explicit current value, capped at `max`.
    #[must_use]
    pub fn with_current(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    /// Remaining energy.
    #[must_use]
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Maximum energy.
    #[must_use]
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Whether `amount` can be spent.
    #[must_use]
    pub fn has(&self, amount: u32) -> bool {
        self.current >= amount
    }

    /// Use energy.
    pub fn spend(&mut self, amount: u32) -> EconomyResult<()> {
        if !self.has(amount) {
            return Err(EconomyError::InsufficientEnergy {
                needed: amount,
                have: self.current,
            });
        }
        self.current -= amount;
        Ok(())
    }

    /// Refill to maximum (start of a new day).
    pub fn restore_full(&mut self) {
        self.current = self.max;
    }

    /// Percentage remaining (0-100).
    #[must_use]
    pub fn percentage(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        self.current as f32 / self.max as f32 * 100.0
    }
}

/// Player resources passed to the action gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmContext {
    /// Money
    pub wallet: Wallet,
    /// Energy
    pub energy: Energy,
}

impl FarmContext {
    /// Create a context with a starting balance and full energy.
    #[must_use]
    pub fn new(money: u64, max_energy: u32) -> Self {
        Self {
            wallet: Wallet::new(money),
            energy: Energy::new(max_energy),
        }
    }

    /// Check both budgets without spending anything.
    pub fn check(&self, money: u64, energy: u32) -> EconomyResult<()> {
        if !self.wallet.can_afford(money) {
            return Err(EconomyError::InsufficientFunds {
                needed: money,
                have: self.wallet.balance(),
            });
        }
        if !self.energy.has(energy) {
            return Err(EconomyError::InsufficientEnergy {
                needed: energy,
                have: self.energy.current(),
            });
        }
        Ok(())
    }

    /// Spend both budgets, or neither.
    pub fn charge(&mut self, money: u64, energy: u32) -> EconomyResult<()> {
        self.check(money, energy)?;
        self.wallet.spend(money)?;
        self.energy.spend(energy)
    }
}
