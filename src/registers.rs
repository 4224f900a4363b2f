//! Defines ARM processor core registers as seen by the assembler.

use std::fmt::{self, Display};

use crate::error::AssembleError;

/// Enumeration to identify a CPU core register.
///
/// Provides methods to convert from source operand text and to instruction
/// encoding values.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RegisterIndex {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
    R9,
    R10,
    R11,
    R12,
    Sp,
    Lr,
    Pc,
}

impl RegisterIndex {
    /// Parses a register operand such as `r3`, `lr` or `pc`.
    ///
    /// Returns [None] if the text does not name a core register. `sp` is
    /// accepted here; encodings which exclude it reject it afterwards.
    pub fn from_name(name: &str) -> Option<Self> {
        let index = match name {
            "r0" => 0,
            "r1" => 1,
            "r2" => 2,
            "r3" => 3,
            "r4" => 4,
            "r5" => 5,
            "r6" => 6,
            "r7" => 7,
            "r8" => 8,
            "r9" => 9,
            "r10" => 10,
            "r11" => 11,
            "r12" => 12,
            "sp" => 13,
            "lr" => 14,
            "pc" => 15,
            _ => return None,
        };
        Some(Self::new_main(index))
    }

    pub fn new_main(index: u32) -> Self {
        match index {
            0 => Self::R0,
            1 => Self::R1,
            2 => Self::R2,
            3 => Self::R3,
            4 => Self::R4,
            5 => Self::R5,
            6 => Self::R6,
            7 => Self::R7,
            8 => Self::R8,
            9 => Self::R9,
            10 => Self::R10,
            11 => Self::R11,
            12 => Self::R12,
            13 => Self::Sp,
            14 => Self::Lr,
            15 => Self::Pc,
            _ => panic!("invalid main register index"),
        }
    }

    /// Index of the register in instruction encodings, from 0 for R0 to 15
    /// for PC.
    pub fn index(&self) -> u32 {
        match self {
            Self::R0 => 0,
            Self::R1 => 1,
            Self::R2 => 2,
            Self::R3 => 3,
            Self::R4 => 4,
            Self::R5 => 5,
            Self::R6 => 6,
            Self::R7 => 7,
            Self::R8 => 8,
            Self::R9 => 9,
            Self::R10 => 10,
            Self::R11 => 11,
            Self::R12 => 12,
            Self::Sp => 13,
            Self::Lr => 14,
            Self::Pc => 15,
        }
    }

    /// Returns true if index is in R0-R7.
    ///
    /// Most 16-bit Thumb encodings only have 3-bit register fields and can
    /// address those registers only.
    pub fn is_low(&self) -> bool {
        self.index() < 8
    }
}

impl Display for RegisterIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::R0 => "r0",
            Self::R1 => "r1",
            Self::R2 => "r2",
            Self::R3 => "r3",
            Self::R4 => "r4",
            Self::R5 => "r5",
            Self::R6 => "r6",
            Self::R7 => "r7",
            Self::R8 => "r8",
            Self::R9 => "r9",
            Self::R10 => "r10",
            Self::R11 => "r11",
            Self::R12 => "r12",
            Self::Sp => "sp",
            Self::Lr => "lr",
            Self::Pc => "pc",
        };
        write!(f, "{}", s)
    }
}

/// List of registers used in the PUSH and POP instructions encoding.
///
/// Each bit of the data maps to a register: bits 0 to 7 for R0 to R7, bit 8
/// for LR (which POP repurposes as the PC bit).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MainRegisterList(u16);

impl MainRegisterList {
    const LR_BIT: u16 = 1 << 8;

    pub fn new(bits: u16) -> MainRegisterList {
        MainRegisterList(bits)
    }

    /// Parses a comma separated register list, e.g. `r0,r4,lr`.
    ///
    /// Only R0-R7 and LR may appear in a list. The tokenizer has already
    /// stripped whitespace from the operand blob, but stray spaces are
    /// trimmed anyway so the parser can also be used on raw text.
    pub fn parse(text: &str) -> Result<Self, AssembleError> {
        let mut bits = 0u16;
        for token in text.split(',') {
            let token = token.trim();
            bits |= match RegisterIndex::from_name(token) {
                Some(r) if r.is_low() => 1 << r.index(),
                Some(RegisterIndex::Lr) => Self::LR_BIT,
                _ => return Err(AssembleError::UnknownRegister(token.into())),
            };
        }
        Ok(Self(bits))
    }

    /// Encoding bits of the list.
    pub fn bits(&self) -> u16 {
        self.0
    }

    /// Returns `true` if the list contains no registers.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if given register is in the list.
    pub fn contains(&self, x: &RegisterIndex) -> bool {
        if *x == RegisterIndex::Lr {
            self.0 & Self::LR_BIT != 0
        } else {
            x.is_low() && self.0 & (1 << x.index()) != 0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MainRegisterList, RegisterIndex};
    use crate::error::AssembleError;

    #[test]
    fn test_from_name() {
        for i in 0..=12 {
            let name = format!("r{}", i);
            assert_eq!(
                RegisterIndex::from_name(&name),
                Some(RegisterIndex::new_main(i))
            );
        }
        assert_eq!(RegisterIndex::from_name("sp"), Some(RegisterIndex::Sp));
        assert_eq!(RegisterIndex::from_name("lr"), Some(RegisterIndex::Lr));
        assert_eq!(RegisterIndex::from_name("pc"), Some(RegisterIndex::Pc));
        assert_eq!(RegisterIndex::from_name("r16"), None);
        assert_eq!(RegisterIndex::from_name("R0"), None);
        assert_eq!(RegisterIndex::from_name(""), None);
    }

    #[test]
    fn test_index_round_trip() {
        for i in 0..=15 {
            let reg = RegisterIndex::new_main(i);
            assert_eq!(reg.index(), i);
            assert_eq!(RegisterIndex::from_name(&reg.to_string()), Some(reg));
        }
    }

    #[test]
    fn test_is_low() {
        for i in 0..=7 {
            assert!(RegisterIndex::new_main(i).is_low());
        }
        for i in 8..=15 {
            assert!(!RegisterIndex::new_main(i).is_low());
        }
    }

    #[test]
    fn test_list_parse() {
        let list = MainRegisterList::parse("r0,r4,lr").unwrap();
        assert_eq!(list.bits(), 0x111);
        assert!(list.contains(&RegisterIndex::R0));
        assert!(list.contains(&RegisterIndex::R4));
        assert!(list.contains(&RegisterIndex::Lr));
        assert!(!list.contains(&RegisterIndex::R1));
        assert!(!list.contains(&RegisterIndex::Pc));

        assert_eq!(MainRegisterList::parse("r7").unwrap().bits(), 0x80);
        assert!(MainRegisterList::parse("").is_err());
        assert!(!MainRegisterList::new(0).contains(&RegisterIndex::R0));
        assert!(MainRegisterList::new(0).is_empty());
    }

    #[test]
    fn test_list_rejects_high_registers() {
        for name in ["r8", "r12", "sp", "pc", "x0"] {
            let text = format!("r0,{}", name);
            assert_eq!(
                MainRegisterList::parse(&text),
                Err(AssembleError::UnknownRegister(name.into()))
            );
        }
    }
}
