use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Values
pub const SERVICE_NAME: &str = "meibo-api";
pub const HEALTH_STATUS_OK: &str = "ok";

// New Type Pattern -- https://doc.rust-lang.org/rust-by-example/generics/new_types.html
/// Storage assigned identifier of a person, never changes once the row exists
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PersonId(pub i64);

impl PersonId {
    pub fn to_number(self) -> i64 {
        self.0
    }

    pub fn increment(&self) -> PersonId {
        PersonId(self.0 + 1)
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum PersonIdError {
    #[error("Person id is not a number: {0:?}")]
    NotANumber(String),
    #[error("Person id must not be negative, got {0}")]
    Negative(i64),
}

/// Parses the id token taken from a request path, e.g. `/api/persons/{id}`
impl FromStr for PersonId {
    type Err = PersonIdError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let value = token
            .parse::<i64>()
            .map_err(|_| PersonIdError::NotANumber(token.to_string()))?;

        PersonId::try_from(value)
    }
}

impl TryFrom<i64> for PersonId {
    type Error = PersonIdError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < 0 {
            return Err(PersonIdError::Negative(value));
        }

        Ok(PersonId(value))
    }
}
