/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

mod constants;

use crate::ast::CInstruction;
use crate::errors::AssemblerError;
use constants::*;

/// Encodes an already-resolved 15-bit address into the `0aaaaaaaaaaaaaaa`
/// text form.
pub fn encode_a_instruction(address: u16) -> String {
    format!("0{:015b}", address)
}

/// Encodes a C-instruction's three fields into `111accccccdddjjj`.
pub fn encode_c_instruction(
    instruction: &CInstruction,
    line: usize,
) -> Result<String, AssemblerError> {
    let comp = comp_code(&instruction.comp).ok_or_else(|| AssemblerError::EncodingError {
        line,
        reason: format!("Invalid computation field: {}", instruction.comp),
    })?;
    let dest =
        dest_code(instruction.dest.as_deref()).ok_or_else(|| AssemblerError::EncodingError {
            line,
            reason: format!("Invalid destination field: {:?}", instruction.dest),
        })?;
    let jump =
        jump_code(instruction.jump.as_deref()).ok_or_else(|| AssemblerError::EncodingError {
            line,
            reason: format!("Invalid jump field: {:?}", instruction.jump),
        })?;

    let word = C_INSTRUCTION_HEADER
        | ((comp as u16) << 6)
        | ((dest as u16) << 3)
        | (jump as u16);

    Ok(format!("{:016b}", word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_a_instruction() {
        assert_eq!(encode_a_instruction(2), "0000000000000010");
        assert_eq!(encode_a_instruction(0), "0000000000000000");
    }

    #[test]
    fn encodes_c_instruction_dest_eq_comp() {
        let inst = CInstruction {
            comp: "A".to_string(),
            dest: Some("D".to_string()),
            jump: None,
        };
        assert_eq!(encode_c_instruction(&inst, 1).unwrap(), "1110110000010000");
    }

    #[test]
    fn encodes_c_instruction_comp_semi_jump() {
        let inst = CInstruction {
            comp: "0".to_string(),
            dest: None,
            jump: Some("JMP".to_string()),
        };
        assert_eq!(encode_c_instruction(&inst, 1).unwrap(), "1110101010000111");
    }

    #[test]
    fn encodes_d_plus_a_into_d() {
        let inst = CInstruction {
            comp: "D+A".to_string(),
            dest: Some("D".to_string()),
            jump: None,
        };
        assert_eq!(encode_c_instruction(&inst, 1).unwrap(), "1110000010010000");
    }

    #[test]
    fn rejects_invalid_comp_field() {
        let inst = CInstruction {
            comp: "D+D".to_string(),
            dest: None,
            jump: None,
        };
        assert!(encode_c_instruction(&inst, 3).is_err());
    }
}
