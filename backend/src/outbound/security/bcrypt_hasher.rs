//! `PasswordHasher` backed by the `bcrypt` crate.

use std::ops::RangeInclusive;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Work factor used when none is configured.
pub const DEFAULT_BCRYPT_COST: u32 = 10;
const COST_RANGE: RangeInclusive<u32> = 4..=31;

#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Reject costs bcrypt itself would refuse, so misconfiguration fails at
    /// startup rather than on the first login.
    pub fn new(cost: u32) -> Result<Self, PasswordHashError> {
        if !COST_RANGE.contains(&cost) {
            return Err(PasswordHashError::hash(format!(
                "bcrypt cost {cost} outside {}..={}",
                COST_RANGE.start(),
                COST_RANGE.end()
            )));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self {
            cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        bcrypt::hash(password, self.cost)
            .map(PasswordHash::new)
            .map_err(|err| PasswordHashError::hash(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        bcrypt::verify(password, hash.as_str())
            .map_err(|err| PasswordHashError::malformed_hash(err.to_string()))
    }
}
