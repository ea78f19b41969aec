//! Task priority and its persisted integer encoding.
//!
//! # Invariants
//! - `PRIORITY_CODES` is a persisted contract. Codes must never be reused or
//!   renumbered; add new variants with fresh codes only.
//! - Sort order is independent of the persisted code.
//! - `PRIORITY_CODES` and `to_code` expand from one `priority_codes!` list, so
//!   a variant without a code fails to compile.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// How urgently a task should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    High,
    #[default]
    Normal,
    Low,
}

macro_rules! priority_codes {
    ($($variant:ident = $code:literal),+ $(,)?) => {
        /// Bidirectional mapping between priorities and their stored integer code.
        pub const PRIORITY_CODES: &[(TaskPriority, i64)] = &[$((TaskPriority::$variant, $code)),+];

        impl TaskPriority {
            /// Integer code used in storage and query parameters.
            pub fn to_code(self) -> i64 {
                match self {
                    $(Self::$variant => $code,)+
                }
            }
        }
    };
}

priority_codes! {
    Low = 0,
    Normal = 1,
    High = 2,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [Self::High, Self::Normal, Self::Low];

    /// Position of this priority in an ascending sort; lower sorts first.
    pub fn sort_index(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Normal => 2,
            Self::Low => 3,
        }
    }

    /// Resolves a stored code back to a priority.
    ///
    /// Returns `None` for codes not present in `PRIORITY_CODES`.
    pub fn from_code(code: i64) -> Option<Self> {
        PRIORITY_CODES
            .iter()
            .find(|(_, stored)| *stored == code)
            .map(|(priority, _)| *priority)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Normal => "normal",
            Self::Low => "low",
        }
    }
}

impl Display for TaskPriority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text does not name a known priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePriorityError(pub String);

impl Display for ParsePriorityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown priority `{}`; expected high|normal|low",
            self.0
        )
    }
}

impl Error for ParsePriorityError {}

impl FromStr for TaskPriority {
    type Err = ParsePriorityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "normal" => Ok(Self::Normal),
            "low" => Ok(Self::Low),
            _ => Err(ParsePriorityError(value.to_string())),
        }
    }
}
