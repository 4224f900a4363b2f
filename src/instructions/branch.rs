//! Branch instructions: B, the conditional branches, BL and BX.

use super::{InstructionTable, LABEL, REG4};
use crate::{condition::Condition, operands::Converter};

pub fn register(table: &mut InstructionTable) {
    table.insert(
        "b",
        LABEL,
        "11100-----------",
        &[Converter::Sint {
            off: 0,
            bits: 11,
            shift: 1,
        }],
    );

    // One conditional branch mnemonic per condition code, e.g. "beq" with
    // the code in the high nibble of the displacement byte.
    for cond in Condition::iter() {
        table.insert(
            &format!("b{cond}"),
            LABEL,
            &format!("1101{:04b}--------", cond.code()),
            &[Converter::Sint {
                off: 0,
                bits: 8,
                shift: 1,
            }],
        );
    }

    // Long branch with link, displacement split over both half-words.
    table.insert(
        "bl",
        LABEL,
        "11110-----------11111-----------",
        &[Converter::BlAddr],
    );

    table.insert(
        "bx",
        REG4,
        "010001110____000",
        &[Converter::Reg4 { off: 3 }],
    );
}
