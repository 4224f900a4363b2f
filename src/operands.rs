//! Argument converters turning operand text into encoding bits.
//!
//! Each converter is one variant of the [Converter] tagged sum. Converters
//! are listed in the instruction table next to the encoding expression they
//! fill in; [Converter::apply] returns the bits to OR into the base opcode.
//! This mirrors, in the encoding direction, the field extraction helpers an
//! instruction decoder uses in the decoding direction.

use std::collections::HashMap;

use crate::{
    align::Align,
    error::AssembleError,
    registers::{MainRegisterList, RegisterIndex},
};

/// Label addresses within the assembled fragment.
///
/// Populated during the first pass, read-only during the second. The `pc`
/// value is the ARM pipeline view of the program counter: address of the
/// current instruction plus 4. It is kept apart from the label map so a
/// source label can never shadow it.
#[derive(Debug, Default)]
pub struct LabelTable {
    addresses: HashMap<String, u32>,
    pc: u32,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a label definition. Each label may only be defined once per
    /// fragment.
    pub fn define(&mut self, name: &str, address: u32) -> Result<(), AssembleError> {
        if self.addresses.insert(name.into(), address).is_some() {
            return Err(AssembleError::LabelRedefinition(name.into()));
        }
        Ok(())
    }

    /// Byte address of a label, or [AssembleError::UnknownLabel].
    pub fn address_of(&self, name: &str) -> Result<u32, AssembleError> {
        self.addresses
            .get(name)
            .copied()
            .ok_or_else(|| AssembleError::UnknownLabel(name.into()))
    }

    pub fn set_pc(&mut self, pc: u32) {
        self.pc = pc;
    }

    pub fn pc(&self) -> u32 {
        self.pc
    }
}

/// Converts an operand to the encoding bits of one instruction field.
///
/// The bits returned by [Converter::apply] always lie within the placeholder
/// positions of the encoding expression the converter is paired with in the
/// instruction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    /// Low register R0-R7, 3-bit field at bit `off`.
    Reg { off: u32 },
    /// Any core register, 4-bit field at bit `off`.
    Reg4 { off: u32 },
    /// Either a low register at bit `off`, or an integer in 0..=7 at bit
    /// `off` with `imm_bit` set to select the immediate form.
    RegOrImm { off: u32, imm_bit: u32 },
    /// Register list for PUSH and POP, bits 0-8.
    RegList,
    /// Unsigned immediate or label displacement: `bits` wide field at bit
    /// `off`, value scaled down by `shift`.
    Uint { off: u32, bits: u32, shift: u32 },
    /// Signed immediate or label displacement, two's complement in the
    /// field.
    Sint { off: u32, bits: u32, shift: u32 },
    /// 16-bit immediate split into the Thumb-2 T3 i:imm4:imm3:imm8 fields.
    T3Imm,
    /// Branch with link displacement split into two 11-bit half-word
    /// fields.
    BlAddr,
    /// Raw 32-bit word for the `.word` directive, halves swapped so the
    /// high-first emission order yields a little-endian word in memory.
    WordLit,
}

impl Converter {
    pub fn apply(&self, text: &str, labels: &LabelTable) -> Result<u32, AssembleError> {
        match *self {
            Self::Reg { off } => Ok(low_register(text)?.index() << off),
            Self::Reg4 { off } => {
                let reg = RegisterIndex::from_name(text)
                    .ok_or_else(|| AssembleError::UnknownRegister(text.into()))?;
                Ok(reg.index() << off)
            }
            Self::RegOrImm { off, imm_bit } => {
                let stripped = text.strip_prefix('#').unwrap_or(text);
                if let Ok(value) = stripped.parse::<i64>() {
                    if !(0..=7).contains(&value) {
                        return Err(AssembleError::ImmediateOutOfRange {
                            value,
                            min: 0,
                            max: 7,
                        });
                    }
                    Ok(((value as u32) << off) | (1 << imm_bit))
                } else {
                    Ok(low_register(text)?.index() << off)
                }
            }
            Self::RegList => Ok(MainRegisterList::parse(text)?.bits() as u32),
            Self::Uint { off, bits, shift } => field(text, labels, off, bits, shift, false),
            Self::Sint { off, bits, shift } => field(text, labels, off, bits, shift, true),
            Self::T3Imm => {
                let digits = text
                    .strip_prefix('#')
                    .ok_or_else(|| AssembleError::MalformedImmediate(text.into()))?;
                let value = parse_int(digits)
                    .ok_or_else(|| AssembleError::MalformedImmediate(text.into()))?;
                if !(0..=0xffff).contains(&value) {
                    return Err(AssembleError::ImmediateOutOfRange {
                        value,
                        min: 0,
                        max: 0xffff,
                    });
                }
                let value = value as u32;
                let imm4 = (value >> 12) & 0xf;
                let i = (value >> 11) & 1;
                let imm3 = (value >> 8) & 7;
                let imm8 = value & 0xff;
                Ok(i << 26 | imm4 << 16 | imm3 << 12 | imm8)
            }
            Self::BlAddr => {
                // 22-bit half-word displacement, then split over the two
                // 11-bit fields of the long branch encoding.
                let v = field(text, labels, 0, 22, 1, true)?;
                Ok(((v >> 11) & 0x7ff) << 16 | (v & 0x7ff))
            }
            Self::WordLit => {
                let value = parse_int(text)
                    .ok_or_else(|| AssembleError::MalformedImmediate(text.into()))?;
                if !((i32::MIN as i64)..=(u32::MAX as i64)).contains(&value) {
                    return Err(AssembleError::ImmediateOutOfRange {
                        value,
                        min: i32::MIN as i64,
                        max: u32::MAX as i64,
                    });
                }
                let value = value as u32;
                Ok((value >> 16) | (value << 16))
            }
        }
    }

    /// Mask of all the bits the converter may ever set.
    ///
    /// The instruction table tests check this against the literal bits of
    /// the encoding each converter is paired with.
    pub fn mask(&self) -> u32 {
        match *self {
            Self::Reg { off } => 7 << off,
            Self::Reg4 { off } => 15 << off,
            Self::RegOrImm { off, imm_bit } => (7 << off) | (1 << imm_bit),
            Self::RegList => 0x1ff,
            Self::Uint { off, bits, .. } | Self::Sint { off, bits, .. } => {
                ((1u32 << bits) - 1) << off
            }
            Self::T3Imm => 1 << 26 | 0xf << 16 | 7 << 12 | 0xff,
            Self::BlAddr => 0x07ff_07ff,
            Self::WordLit => u32::MAX,
        }
    }
}

fn low_register(text: &str) -> Result<RegisterIndex, AssembleError> {
    RegisterIndex::from_name(text)
        .filter(RegisterIndex::is_low)
        .ok_or_else(|| AssembleError::UnknownRegister(text.into()))
}

/// Parses a `#` prefixed signed decimal immediate.
fn immediate(text: &str) -> Result<i64, AssembleError> {
    let digits = text
        .strip_prefix('#')
        .ok_or_else(|| AssembleError::MalformedImmediate(text.into()))?;
    digits
        .parse()
        .map_err(|_| AssembleError::MalformedImmediate(text.into()))
}

/// Parses a decimal or `0x` prefixed hexadecimal integer.
///
/// Hexadecimal is only reachable from the `movw` and `.word` operand
/// patterns; the narrow immediate fields are decimal only.
fn parse_int(digits: &str) -> Option<i64> {
    if let Some(hexa) = digits.strip_prefix("0x") {
        i64::from_str_radix(hexa, 16).ok()
    } else {
        digits.parse().ok()
    }
}

/// Value of an immediate or of a `NAME` / `NAME+INTEGER` label reference.
///
/// A label reference resolves to the PC-relative byte displacement of the
/// label.
fn immediate_or_displacement(text: &str, labels: &LabelTable) -> Result<i64, AssembleError> {
    if text.starts_with('#') {
        return immediate(text);
    }
    let (name, offset) = match text.split_once('+') {
        Some((name, int)) => {
            let offset = int
                .parse::<i64>()
                .map_err(|_| AssembleError::MalformedImmediate(text.into()))?;
            (name, offset)
        }
        None => (text, 0),
    };
    Ok(labels.address_of(name)? as i64 + offset - labels.pc() as i64)
}

/// Encodes a value into a `bits` wide field at `off`, scaled down by
/// `shift`.
///
/// The value must be a multiple of `1 << shift` and fit the signed or
/// unsigned range of the field. Signed values are kept as two's complement
/// in the field width: the arithmetic shift is masked to `bits` bits, so
/// widening to the u32 container cannot leak sign bits.
fn field(
    text: &str,
    labels: &LabelTable,
    off: u32,
    bits: u32,
    shift: u32,
    signed: bool,
) -> Result<u32, AssembleError> {
    let value = immediate_or_displacement(text, labels)?;
    let min: i64 = if signed { -(1 << (bits - 1)) << shift } else { 0 };
    let mut max: i64 = ((1 << bits) - 1) << shift;
    if signed {
        max += min;
    }
    if value < min || value > max {
        return Err(AssembleError::ImmediateOutOfRange { value, min, max });
    }
    let multiple = 1usize << shift;
    if !value.is_aligned(multiple) {
        return Err(AssembleError::ImmediateAlignment {
            value,
            multiple: multiple as i64,
        });
    }
    Ok((((value >> shift) as u32) & ((1 << bits) - 1)) << off)
}

#[cfg(test)]
mod tests {
    use super::{Converter, LabelTable};
    use crate::error::AssembleError;

    fn apply(conv: Converter, text: &str) -> Result<u32, AssembleError> {
        conv.apply(text, &LabelTable::new())
    }

    #[test]
    fn test_reg() {
        for i in 0..=7 {
            let text = format!("r{}", i);
            assert_eq!(apply(Converter::Reg { off: 3 }, &text), Ok(i << 3));
        }
        for text in ["r8", "r15", "lr", "pc", "sp", "#1", "foo"] {
            assert_eq!(
                apply(Converter::Reg { off: 0 }, text),
                Err(AssembleError::UnknownRegister(text.into()))
            );
        }
    }

    #[test]
    fn test_reg4() {
        for i in 0..=15 {
            let text = format!("r{}", i);
            assert_eq!(apply(Converter::Reg4 { off: 3 }, &text), Ok(i << 3));
        }
        assert_eq!(apply(Converter::Reg4 { off: 0 }, "lr"), Ok(14));
        assert_eq!(apply(Converter::Reg4 { off: 0 }, "pc"), Ok(15));
        assert_eq!(
            apply(Converter::Reg4 { off: 0 }, "r16"),
            Err(AssembleError::UnknownRegister("r16".into()))
        );
    }

    #[test]
    fn test_reg_or_imm() {
        let conv = Converter::RegOrImm { off: 6, imm_bit: 10 };
        assert_eq!(apply(conv, "r3"), Ok(3 << 6));
        assert_eq!(apply(conv, "#5"), Ok(5 << 6 | 1 << 10));
        assert_eq!(apply(conv, "5"), Ok(5 << 6 | 1 << 10));
        assert_eq!(apply(conv, "#0"), Ok(1 << 10));
        assert_eq!(
            apply(conv, "#8"),
            Err(AssembleError::ImmediateOutOfRange {
                value: 8,
                min: 0,
                max: 7
            })
        );
        assert_eq!(
            apply(conv, "r9"),
            Err(AssembleError::UnknownRegister("r9".into()))
        );
    }

    #[test]
    fn test_reg_list() {
        assert_eq!(apply(Converter::RegList, "r0"), Ok(1));
        assert_eq!(apply(Converter::RegList, "r0,r1,r2"), Ok(7));
        assert_eq!(apply(Converter::RegList, "r4,lr"), Ok(0x110));
        assert_eq!(
            apply(Converter::RegList, "r0,sp"),
            Err(AssembleError::UnknownRegister("sp".into()))
        );
    }

    #[test]
    fn test_uint_round_trip() {
        for (bits, shift) in [(5u32, 0u32), (8, 0), (5, 2), (8, 2), (7, 2), (8, 1)] {
            for off in [0u32, 3, 6, 8] {
                let conv = Converter::Uint { off, bits, shift };
                for value in (0..(1u32 << bits)).map(|f| f << shift) {
                    let text = format!("#{}", value);
                    let out = apply(conv, &text).unwrap();
                    assert_eq!((out >> off) & ((1 << bits) - 1), value >> shift);
                    assert_eq!(out & !(((1u32 << bits) - 1) << off), 0);
                }
            }
        }
    }

    #[test]
    fn test_uint_range() {
        let conv = Converter::Uint {
            off: 0,
            bits: 8,
            shift: 0,
        };
        assert_eq!(apply(conv, "#255"), Ok(255));
        assert_eq!(
            apply(conv, "#256"),
            Err(AssembleError::ImmediateOutOfRange {
                value: 256,
                min: 0,
                max: 255
            })
        );
        assert_eq!(
            apply(conv, "#-1"),
            Err(AssembleError::ImmediateOutOfRange {
                value: -1,
                min: 0,
                max: 255
            })
        );
    }

    #[test]
    fn test_uint_alignment() {
        let conv = Converter::Uint {
            off: 0,
            bits: 8,
            shift: 2,
        };
        assert_eq!(apply(conv, "#8"), Ok(2));
        assert_eq!(
            apply(conv, "#6"),
            Err(AssembleError::ImmediateAlignment {
                value: 6,
                multiple: 4
            })
        );
    }

    #[test]
    fn test_sint_round_trip() {
        // The encoded field, sign-extended back from the field width, must
        // reproduce value >> shift.
        for (bits, shift) in [(8u32, 1u32), (11, 1), (22, 1), (8, 0)] {
            let conv = Converter::Sint { off: 0, bits, shift };
            let min = -(1i64 << (bits - 1)) << shift;
            let max = ((1i64 << (bits - 1)) - 1) << shift;
            for value in [min, min + (1 << shift), -(1i64 << shift), 0, 1 << shift, max] {
                let text = format!("#{}", value);
                let f = apply(conv, &text).unwrap() as i64;
                let extended = (f << (64 - bits)) >> (64 - bits);
                assert_eq!(extended, value >> shift, "bits={} value={}", bits, value);
            }
        }
    }

    #[test]
    fn test_sint_range() {
        let conv = Converter::Sint {
            off: 0,
            bits: 8,
            shift: 1,
        };
        assert_eq!(apply(conv, "#-256"), Ok(0x80));
        assert_eq!(apply(conv, "#254"), Ok(0x7f));
        assert_eq!(
            apply(conv, "#-258"),
            Err(AssembleError::ImmediateOutOfRange {
                value: -258,
                min: -256,
                max: 254
            })
        );
        assert_eq!(
            apply(conv, "#256"),
            Err(AssembleError::ImmediateOutOfRange {
                value: 256,
                min: -256,
                max: 254
            })
        );
        assert_eq!(
            apply(conv, "#3"),
            Err(AssembleError::ImmediateAlignment {
                value: 3,
                multiple: 2
            })
        );
    }

    #[test]
    fn test_random_fields() {
        use rand::Rng;
        let mut rng = rand::rng();
        for _ in 0..1000 {
            let bits = rng.random_range(1..=22u32);
            let shift = rng.random_range(0..=2u32);
            let off = rng.random_range(0..=(32 - bits - 2).min(16));
            let max = ((1u64 << bits) - 1) << shift;
            let value = (rng.random_range(0..=max) >> shift) << shift;
            let conv = Converter::Uint { off, bits, shift };
            let out = apply(conv, &format!("#{}", value)).unwrap();
            assert_eq!(((out >> off) & ((1 << bits) - 1)) as u64, value >> shift);
        }
    }

    #[test]
    fn test_label_displacement() {
        let mut labels = LabelTable::new();
        labels.define("loop", 0).unwrap();
        labels.define("data", 16).unwrap();
        labels.set_pc(6);

        let conv = Converter::Sint {
            off: 0,
            bits: 8,
            shift: 1,
        };
        // loop is at 0, PC is 6: displacement -6 bytes, field -3.
        assert_eq!(conv.apply("loop", &labels), Ok(0xfd));
        assert_eq!(conv.apply("data", &labels), Ok(5));
        assert_eq!(conv.apply("data+4", &labels), Ok(7));
        assert_eq!(
            conv.apply("nowhere", &labels),
            Err(AssembleError::UnknownLabel("nowhere".into()))
        );
        assert_eq!(
            conv.apply("data+x", &labels),
            Err(AssembleError::MalformedImmediate("data+x".into()))
        );
    }

    #[test]
    fn test_label_redefinition() {
        let mut labels = LabelTable::new();
        labels.define("a", 0).unwrap();
        assert_eq!(
            labels.define("a", 4),
            Err(AssembleError::LabelRedefinition("a".into()))
        );
    }

    #[test]
    fn test_t3_imm() {
        assert_eq!(apply(Converter::T3Imm, "#0"), Ok(0));
        // 0x1234: imm4=1, i=0, imm3=2, imm8=0x34.
        assert_eq!(apply(Converter::T3Imm, "#4660"), Ok(0x12034));
        assert_eq!(apply(Converter::T3Imm, "#0x1234"), Ok(0x12034));
        // 0xffff: imm4=0xf, i=1, imm3=7, imm8=0xff.
        assert_eq!(
            apply(Converter::T3Imm, "#65535"),
            Ok(1 << 26 | 0xf << 16 | 7 << 12 | 0xff)
        );
        assert_eq!(
            apply(Converter::T3Imm, "#65536"),
            Err(AssembleError::ImmediateOutOfRange {
                value: 65536,
                min: 0,
                max: 0xffff
            })
        );
        assert_eq!(
            apply(Converter::T3Imm, "42"),
            Err(AssembleError::MalformedImmediate("42".into()))
        );
    }

    #[test]
    fn test_bl_addr() {
        let mut labels = LabelTable::new();
        labels.define("target", 6).unwrap();
        labels.set_pc(4);
        // Displacement 2, field 1: high half 0, low half 1.
        assert_eq!(Converter::BlAddr.apply("target", &labels), Ok(1));

        labels.set_pc(8);
        // Displacement -2, field -1: both halves all ones.
        assert_eq!(
            Converter::BlAddr.apply("target", &labels),
            Ok(0x07ff_07ff)
        );
    }

    #[test]
    fn test_word_lit() {
        assert_eq!(apply(Converter::WordLit, "0x12345678"), Ok(0x56781234));
        assert_eq!(apply(Converter::WordLit, "1"), Ok(0x00010000));
        assert_eq!(apply(Converter::WordLit, "-1"), Ok(0xffffffff));
        assert_eq!(
            apply(Converter::WordLit, "0xzz"),
            Err(AssembleError::MalformedImmediate("0xzz".into()))
        );
        assert_eq!(
            apply(Converter::WordLit, "banana"),
            Err(AssembleError::MalformedImmediate("banana".into()))
        );
    }
}
