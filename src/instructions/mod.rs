//! The instruction encoding table.
//!
//! Each instruction family has its own submodule which registers the
//! encoding variants of its mnemonics into the [InstructionTable]. A
//! variant couples an anchored regular expression over the argument blob
//! with an encoding expression and the converters filling its placeholder
//! bits. For a given mnemonic the variants are tried in registration order
//! and the first whose expression matches wins, so specific operand forms
//! must be registered before permissive ones.

use std::{collections::HashMap, sync::OnceLock};

use regex::{Captures, Regex};

use crate::{error::AssembleError, operands::Converter, template::Encoding};

pub mod add_sub;
pub mod alu;
pub mod branch;
pub mod directives;
pub mod load_store;
pub mod mov;
pub mod shift;
pub mod stack;
pub mod system;

/// Operand sub-patterns shared by the family modules.
///
/// Register captures are permissive on purpose: `r9` matches [REG] so the
/// register converter can report an unknown register instead of the table
/// reporting no matching variant.
pub(crate) const REG: &str = r"(r\d+)";
pub(crate) const REG4: &str = r"(r\d+|sp|lr|pc)";
pub(crate) const REG_OR_IMM: &str = r"(r\d+|#?-?\d+)";
pub(crate) const IMM: &str = r"(#-?\d+)";
pub(crate) const IMM16: &str = r"(#(?:0x[0-9a-fA-F]+|-?\d+))";
pub(crate) const LABEL: &str = r"([a-zA-Z_][a-zA-Z0-9_]*(?:\+\d+)?)";
pub(crate) const IMM_OR_LABEL: &str = r"(#-?\d+|[a-zA-Z_][a-zA-Z0-9_]*(?:\+\d+)?)";

/// One concrete encoding for a mnemonic.
pub struct Variant {
    /// Anchored regular expression tested against the whitespace-stripped
    /// argument blob.
    args: Regex,
    /// Encoding template.
    encoding: Encoding,
    /// Converters fed positionally with the capture groups of `args`.
    converters: Vec<Converter>,
}

impl Variant {
    /// Builds a variant from its argument pattern, encoding expression and
    /// converter list.
    ///
    /// The table is static reference data: a pattern which does not
    /// compile, an invalid expression or a converter list whose length
    /// differs from the number of capture groups panics here and is caught
    /// by the table tests.
    fn new(args: &str, expression: &str, converters: &[Converter]) -> Self {
        let args = Regex::new(&format!("^{}$", args)).expect("invalid arguments pattern");
        let encoding = Encoding::parse(expression);
        assert_eq!(
            args.captures_len() - 1,
            converters.len(),
            "converter count does not match capture groups of {:?}",
            args.as_str()
        );
        Self {
            args,
            encoding,
            converters: converters.to_vec(),
        }
    }

    /// Returns the operand captures if the argument blob matches this
    /// variant.
    pub fn try_match<'t>(&self, args: &'t str) -> Option<Captures<'t>> {
        self.args.captures(args)
    }

    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    pub fn converters(&self) -> &[Converter] {
        &self.converters
    }
}

/// Mapping from mnemonic to its ordered encoding variants.
///
/// This is process-wide immutable reference data; [InstructionTable::shared]
/// returns a lazily built instance shared between all assemblers.
pub struct InstructionTable {
    entries: HashMap<String, Vec<Variant>>,
}

impl InstructionTable {
    pub fn new() -> Self {
        let mut table = Self {
            entries: HashMap::new(),
        };
        shift::register(&mut table);
        alu::register(&mut table);
        add_sub::register(&mut table);
        mov::register(&mut table);
        branch::register(&mut table);
        load_store::register(&mut table);
        stack::register(&mut table);
        system::register(&mut table);
        directives::register(&mut table);
        table
    }

    /// Shared table instance.
    pub fn shared() -> &'static InstructionTable {
        static TABLE: OnceLock<InstructionTable> = OnceLock::new();
        TABLE.get_or_init(InstructionTable::new)
    }

    pub(crate) fn insert(
        &mut self,
        mnemonic: &str,
        args: &str,
        expression: &str,
        converters: &[Converter],
    ) {
        self.entries
            .entry(mnemonic.into())
            .or_default()
            .push(Variant::new(args, expression, converters));
    }

    /// All variants of a mnemonic, in match priority order.
    pub fn variants(&self, mnemonic: &str) -> Option<&[Variant]> {
        self.entries.get(mnemonic).map(Vec::as_slice)
    }

    /// Selects the first variant of `mnemonic` whose argument pattern
    /// matches `args`.
    ///
    /// Selection is purely textual: it does not depend on label values, so
    /// both assembler passes select the same variant for a given line.
    pub fn select<'a, 't>(
        &'a self,
        mnemonic: &str,
        args: &'t str,
    ) -> Result<(&'a Variant, Captures<'t>), AssembleError> {
        let variants = self
            .variants(mnemonic)
            .ok_or_else(|| AssembleError::UnknownMnemonic(mnemonic.into()))?;
        variants
            .iter()
            .find_map(|v| v.try_match(args).map(|captures| (v, captures)))
            .ok_or_else(|| AssembleError::NoMatchingVariant {
                mnemonic: mnemonic.into(),
                args: args.into(),
            })
    }

    /// Iterates over all (mnemonic, variant) pairs. Used by the table
    /// invariant tests.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variant)> {
        self.entries
            .iter()
            .flat_map(|(m, vs)| vs.iter().map(move |v| (m.as_str(), v)))
    }
}

impl Default for InstructionTable {
    fn default() -> Self {
        Self::new()
    }
}
