//! Assembler error types.

use thiserror::Error;

/// Possible failures when assembling a source fragment.
///
/// Any of those aborts the whole assemble call: no partial output is ever
/// returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssembleError {
    /// Mnemonic is not present in the instruction table.
    #[error("unknown mnemonic \"{0}\"")]
    UnknownMnemonic(String),
    /// Mnemonic is known, but no encoding variant accepts the given
    /// arguments.
    #[error("invalid arguments \"{args}\" for \"{mnemonic}\"")]
    NoMatchingVariant { mnemonic: String, args: String },
    /// A register operand is not in the set allowed by the encoding.
    #[error("unknown register \"{0}\"")]
    UnknownRegister(String),
    /// An operand refers to a label which was not defined in the fragment.
    #[error("unknown label \"{0}\"")]
    UnknownLabel(String),
    /// The same label is defined twice in the fragment.
    #[error("label \"{0}\" is defined twice")]
    LabelRedefinition(String),
    /// An immediate or displacement does not fit the encoding field.
    #[error("value {value} out of range [{min}, {max}]")]
    ImmediateOutOfRange { value: i64, min: i64, max: i64 },
    /// An immediate or displacement is not a multiple of the field
    /// granularity.
    #[error("value {value} is not a multiple of {multiple}")]
    ImmediateAlignment { value: i64, multiple: i64 },
    /// An operand expected to be an immediate cannot be parsed as one.
    #[error("malformed immediate \"{0}\"")]
    MalformedImmediate(String),
}
