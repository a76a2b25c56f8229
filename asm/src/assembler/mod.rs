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

mod encoder;
mod symbol_table;

use crate::ast::{Instruction, Program};
use crate::errors::AssemblerError;
use symbol_table::{is_predefined, predefined_symbol, SymbolTable};

/// Pass 1: walk the program assigning each label the ROM address of the
/// instruction immediately following it. A-instructions and C-instructions
/// occupy one word each; labels occupy none.
pub fn build_symbol_table(program: &Program) -> Result<SymbolTable, AssemblerError> {
    let mut symbol_table = SymbolTable::new();
    let mut rom_address: u16 = 0;

    for (line, instruction) in program.iter().enumerate() {
        match instruction {
            Instruction::Label(name) => {
                if is_predefined(name) {
                    return Err(AssemblerError::ResolutionError {
                        line: line + 1,
                        reason: format!("Label '{}' collides with a predefined symbol", name),
                    });
                }
                if symbol_table.contains_key(name) {
                    return Err(AssemblerError::ResolutionError {
                        line: line + 1,
                        reason: format!("Duplicate label definition: {}", name),
                    });
                }
                symbol_table.insert(name.clone(), rom_address);
            }
            Instruction::AInstruction(_) | Instruction::CInstruction(_) => {
                rom_address += 1;
            }
        }
    }

    Ok(symbol_table)
}

/// Pass 2: resolve every A-instruction's symbol to a concrete address and
/// encode the full program to its 16-character binary text form, one line
/// per instruction. Labels are dropped; they contributed no ROM address.
///
/// Variables (A-instructions referencing a name that is neither predefined
/// nor a label) are auto-allocated in RAM starting at address 16, in the
/// order they are first seen.
pub fn generate_machine_code(
    program: &Program,
    symbol_table: &mut SymbolTable,
) -> Result<Vec<String>, AssemblerError> {
    let mut next_variable_address = symbol_table::FIRST_AUTO_VARIABLE_ADDRESS;
    let mut output = Vec::new();

    for (line, instruction) in program.iter().enumerate() {
        let line_number = line + 1;
        match instruction {
            Instruction::Label(_) => continue,
            Instruction::AInstruction(symbol) => {
                let address = resolve_address(
                    symbol,
                    symbol_table,
                    &mut next_variable_address,
                    line_number,
                )?;
                output.push(encoder::encode_a_instruction(address));
            }
            Instruction::CInstruction(c) => {
                output.push(encoder::encode_c_instruction(c, line_number)?);
            }
        }
    }

    Ok(output)
}

fn resolve_address(
    symbol: &str,
    symbol_table: &mut SymbolTable,
    next_variable_address: &mut u16,
    line: usize,
) -> Result<u16, AssemblerError> {
    if let Ok(literal) = symbol.parse::<u16>() {
        if literal as u32 > symbol_table::MAX_ADDRESSABLE_MEMORY - 1 {
            return Err(AssemblerError::ResolutionError {
                line,
                reason: format!("Address literal '{}' exceeds the maximum addressable memory", symbol),
            });
        }
        return Ok(literal);
    }

    if let Some(address) = predefined_symbol(symbol) {
        return Ok(address);
    }

    if let Some(&address) = symbol_table.get(symbol) {
        return Ok(address);
    }

    if symbol_table::MAX_ADDRESSABLE_MEMORY <= *next_variable_address as u32 {
        return Err(AssemblerError::ResolutionError {
            line,
            reason: format!("Out of RAM while allocating variable '{}'", symbol),
        });
    }

    let address = *next_variable_address;
    symbol_table.insert(symbol.to_string(), address);
    *next_variable_address += 1;
    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CInstruction;

    fn a(sym: &str) -> Instruction {
        Instruction::AInstruction(sym.to_string())
    }

    #[test]
    fn labels_resolve_to_following_instruction_address() {
        let program = vec![
            a("0"),
            Instruction::Label("LOOP".to_string()),
            a("1"),
            Instruction::CInstruction(CInstruction {
                comp: "D".to_string(),
                dest: None,
                jump: Some("JMP".to_string()),
            }),
        ];
        let table = build_symbol_table(&program).unwrap();
        assert_eq!(table.get("LOOP"), Some(&1));
    }

    #[test]
    fn duplicate_label_is_rejected() {
        let program = vec![
            Instruction::Label("X".to_string()),
            Instruction::Label("X".to_string()),
        ];
        assert!(build_symbol_table(&program).is_err());
    }

    #[test]
    fn variables_allocate_starting_at_sixteen_in_first_seen_order() {
        let program = vec![a("foo"), a("bar"), a("foo")];
        let mut table = build_symbol_table(&program).unwrap();
        let code = generate_machine_code(&program, &mut table).unwrap();
        assert_eq!(table.get("foo"), Some(&16));
        assert_eq!(table.get("bar"), Some(&17));
        assert_eq!(code[0], encoder::encode_a_instruction(16));
        assert_eq!(code[1], encoder::encode_a_instruction(17));
        assert_eq!(code[2], encoder::encode_a_instruction(16));
    }

    #[test]
    fn predefined_symbols_take_precedence_over_allocation() {
        let program = vec![a("SCREEN")];
        let mut table = build_symbol_table(&program).unwrap();
        let code = generate_machine_code(&program, &mut table).unwrap();
        assert_eq!(code[0], encoder::encode_a_instruction(16384));
    }

    #[test]
    fn decimal_literals_resolve_directly() {
        let program = vec![a("123")];
        let mut table = build_symbol_table(&program).unwrap();
        let code = generate_machine_code(&program, &mut table).unwrap();
        assert_eq!(code[0], encoder::encode_a_instruction(123));
    }

    #[test]
    fn decimal_literal_over_max_addressable_memory_is_rejected() {
        let program = vec![a("40000")];
        let mut table = build_symbol_table(&program).unwrap();
        assert!(generate_machine_code(&program, &mut table).is_err());
    }
}
