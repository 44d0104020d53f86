//! The closed set of number categories served by the windows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CategoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "p")]
    Primes,
    #[serde(rename = "f")]
    Fibonacci,
    #[serde(rename = "e")]
    Even,
    #[serde(rename = "r")]
    Random,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Primes,
        Category::Fibonacci,
        Category::Even,
        Category::Random,
    ];

    /// Parse the single-letter id used in request paths.
    pub fn parse(id: &str) -> Result<Self, CategoryError> {
        match id {
            "p" => Ok(Category::Primes),
            "f" => Ok(Category::Fibonacci),
            "e" => Ok(Category::Even),
            "r" => Ok(Category::Random),
            other => Err(CategoryError::Invalid(other.to_string())),
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Category::Primes => "p",
            Category::Fibonacci => "f",
            Category::Even => "e",
            Category::Random => "r",
        }
    }

    /// Path of the upstream endpoint serving this category, relative to the
    /// upstream base URL.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Category::Primes => "/primes",
            Category::Fibonacci => "/fibo",
            Category::Even => "/even",
            Category::Random => "/rand",
        }
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::parse(s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_ids() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.id()), Ok(category));
        }
    }

    #[test]
    fn test_parse_rejects_unknown_ids() {
        assert_eq!(
            "x".parse::<Category>(),
            Err(CategoryError::Invalid("x".to_string()))
        );
        assert!(Category::parse("P").is_err());
        assert!(Category::parse("").is_err());
        assert!(Category::parse("primes").is_err());
    }

    #[test]
    fn test_serializes_as_id() {
        assert_eq!(serde_json::to_string(&Category::Fibonacci).unwrap(), "\"f\"");
        assert_eq!(
            serde_json::from_str::<Category>("\"r\"").unwrap(),
            Category::Random
        );
    }
}
