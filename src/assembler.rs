//! The two-pass assembler engine.
//!
//! Pass 1 walks the source lines to compute the byte address of every label:
//! it only needs each instruction's size, so argument converters are not
//! invoked and an incomplete label table cannot cause spurious range errors.
//! Pass 2 walks the lines again with the completed table and composes the
//! opcodes. Thumb branches and PC-relative loads are encoded as
//! displacements from the pipeline PC (instruction address + 4), which is
//! only known once every preceding instruction size is fixed; this is why a
//! single pass is not enough.

use tracing::{debug, trace};

use crate::{
    error::AssembleError, instructions::InstructionTable, operands::LabelTable,
    template::InstructionSize,
};

/// A tokenized source line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    /// Empty or whitespace-only line, produces nothing.
    Empty,
    /// Label definition, colon stripped.
    Label(&'a str),
    /// Instruction mnemonic with its whitespace-stripped argument blob.
    Instruction { mnemonic: &'a str, args: String },
}

fn tokenize(line: &str) -> Line {
    let line = line.trim();
    if line.is_empty() {
        return Line::Empty;
    }
    if let Some(name) = line.strip_suffix(':') {
        return Line::Label(name);
    }
    match line.find([' ', '\t']) {
        Some(pos) => Line::Instruction {
            mnemonic: &line[..pos],
            args: line[pos..].replace([' ', '\t'], ""),
        },
        None => Line::Instruction {
            mnemonic: line,
            args: String::new(),
        },
    }
}

/// Assembles fragments of Thumb assembly into half-word streams.
///
/// The assembler itself is stateless: every call owns its label table and
/// output buffer, so a single instance can be reused freely.
pub struct Assembler {
    table: &'static InstructionTable,
}

impl Assembler {
    pub fn new() -> Self {
        Self {
            table: InstructionTable::shared(),
        }
    }

    /// Assembles a fragment given as individual source lines.
    ///
    /// On success the returned stream always holds an even number of
    /// half-words: a trailing `0x0000` is appended when needed so the
    /// fragment stays word-aligned. On failure no partial output is
    /// returned.
    pub fn assemble_block<S: AsRef<str>>(&self, lines: &[S]) -> Result<Vec<u16>, AssembleError> {
        let labels = self.first_pass(lines)?;
        self.second_pass(lines, labels)
    }

    /// Assembles a fragment given as newline separated source text.
    pub fn assemble(&self, source: &str) -> Result<Vec<u16>, AssembleError> {
        let lines: Vec<&str> = source.lines().collect();
        self.assemble_block(&lines)
    }

    /// Computes the label table. Variant selection only depends on the
    /// argument blob, so the sizes found here are the sizes pass 2 emits.
    fn first_pass<S: AsRef<str>>(&self, lines: &[S]) -> Result<LabelTable, AssembleError> {
        let mut labels = LabelTable::new();
        let mut address = 0u32;
        for line in lines {
            match tokenize(line.as_ref()) {
                Line::Empty => {}
                Line::Label(name) => labels.define(name, address)?,
                Line::Instruction { mnemonic, args } => {
                    let (variant, _) = self.table.select(mnemonic, &args)?;
                    address += variant.encoding().size().byte_count() as u32;
                }
            }
        }
        debug!(bytes = address, "first pass complete");
        Ok(labels)
    }

    fn second_pass<S: AsRef<str>>(
        &self,
        lines: &[S],
        mut labels: LabelTable,
    ) -> Result<Vec<u16>, AssembleError> {
        let mut address = 0u32;
        let mut output = Vec::new();
        for line in lines {
            let Line::Instruction { mnemonic, args } = tokenize(line.as_ref()) else {
                continue;
            };
            // ARM pipeline convention: PC reads as the current instruction
            // address + 4.
            labels.set_pc(address + 4);
            let (variant, captures) = self.table.select(mnemonic, &args)?;
            let mut opcode = variant.encoding().opcode();
            for (converter, capture) in variant
                .converters()
                .iter()
                .zip(captures.iter().skip(1).flatten())
            {
                let bits = converter.apply(capture.as_str(), &labels)?;
                debug_assert_eq!(bits & variant.encoding().opcode(), 0);
                opcode |= bits;
            }
            trace!(address, mnemonic, opcode, "emitting");
            match variant.encoding().size() {
                InstructionSize::Ins16 => output.push(opcode as u16),
                InstructionSize::Ins32 => {
                    output.push((opcode >> 16) as u16);
                    output.push(opcode as u16);
                }
            }
            address += variant.encoding().size().byte_count() as u32;
        }
        if output.len() % 2 != 0 {
            output.push(0);
        }
        debug!(half_words = output.len(), "second pass complete");
        Ok(output)
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Assembles a source fragment with the shared instruction table.
///
/// Convenience wrapper over [Assembler::assemble].
pub fn assemble(source: &str) -> Result<Vec<u16>, AssembleError> {
    Assembler::new().assemble(source)
}
