//! Data-processing instructions of the `010000` group, plus CMP.
//!
//! All of them operate on two low registers. CMP additionally has an 8-bit
//! immediate form which must be registered first.

use super::{InstructionTable, IMM, REG};
use crate::operands::Converter;

const RD_RS: [Converter; 2] = [Converter::Reg { off: 0 }, Converter::Reg { off: 3 }];

/// Mnemonic and encoding expression for each member of the group. The four
/// opcode bits follow the Thumb data-processing opcode numbering; LSL, LSR,
/// ASR and CMP register forms live in their own modules or entries.
const DATA_PROCESSING: [(&str, &str); 12] = [
    ("and", "0100000000______"),
    ("eor", "0100000001______"),
    ("adc", "0100000101______"),
    ("sbc", "0100000110______"),
    ("ror", "0100000111______"),
    ("tst", "0100001000______"),
    ("neg", "0100001001______"),
    ("cmn", "0100001011______"),
    ("orr", "0100001100______"),
    ("mul", "0100001101______"),
    ("bic", "0100001110______"),
    ("mvn", "0100001111______"),
];

pub fn register(table: &mut InstructionTable) {
    let reg_args = format!("{REG},{REG}");

    table.insert(
        "cmp",
        &format!("{REG},{IMM}"),
        "00101___--------",
        &[
            Converter::Reg { off: 8 },
            Converter::Uint {
                off: 0,
                bits: 8,
                shift: 0,
            },
        ],
    );
    table.insert("cmp", &reg_args, "0100001010______", &RD_RS);

    for (mnemonic, expression) in DATA_PROCESSING {
        table.insert(mnemonic, &reg_args, expression, &RD_RS);
    }
}
