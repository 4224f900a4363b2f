//! Branch condition codes.

use std::fmt::{self, Display};

use num_enum::TryFromPrimitive;

/// Possible conditions for conditional branches.
///
/// The discriminant is the condition code placed in the high nibble of the
/// conditional branch encoding. There is no "never" condition, and `b`
/// covers the always case with its own encoding, so codes 14 and 15 do not
/// appear here.
#[derive(Debug, Copy, Clone, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
pub enum Condition {
    Equal = 0,
    NotEqual = 1,
    CarrySet = 2,
    CarryClear = 3,
    Minus = 4,
    Plus = 5,
    Overflow = 6,
    NoOverflow = 7,
    Higher = 8,
    LowerOrSame = 9,
    GreaterThanOrEqual = 10,
    LessThan = 11,
    GreaterThan = 12,
    LessThanOrEqual = 13,
}

impl Condition {
    /// Condition code used in instruction encodings.
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// All conditions, in condition code order.
    pub fn iter() -> impl Iterator<Item = Self> {
        (0..14).map(|c| Self::try_from(c).unwrap())
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Condition::Equal => "eq",
            Condition::NotEqual => "ne",
            Condition::CarrySet => "cs",
            Condition::CarryClear => "cc",
            Condition::Minus => "mi",
            Condition::Plus => "pl",
            Condition::Overflow => "vs",
            Condition::NoOverflow => "vc",
            Condition::Higher => "hi",
            Condition::LowerOrSame => "ls",
            Condition::GreaterThanOrEqual => "ge",
            Condition::LessThan => "lt",
            Condition::GreaterThan => "gt",
            Condition::LessThanOrEqual => "le",
        };
        write!(f, "{}", s)
    }
}
