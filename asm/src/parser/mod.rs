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

use crate::ast::{CInstruction, Instruction, Program};
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

// Derive the parser from our grammar file. The Hack ASM grammar only has
// three line shapes, so a single flat .pest file covers the whole surface
// — no ast_builder split the way the richer HL grammar needs one.
#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct AsmParser;

/// Parses a full `.asm` source string into a sequence of instructions.
/// Blank lines and comment-only lines produce no AST node.
pub fn parse_source(source: &str) -> Result<Program, pest::error::Error<Rule>> {
    let pairs = AsmParser::parse(Rule::program, source)?;
    let mut program = Vec::new();

    for line_pair in pairs {
        if line_pair.as_rule() != Rule::program {
            continue;
        }
        for inner in line_pair.into_inner() {
            if inner.as_rule() != Rule::line {
                continue;
            }
            if let Some(shape) = inner.into_inner().next() {
                program.push(build_instruction(shape));
            }
        }
    }

    Ok(program)
}

fn build_instruction(pair: Pair<Rule>) -> Instruction {
    match pair.as_rule() {
        Rule::a_instruction => {
            let symbol = pair.into_inner().next().unwrap().as_str().to_string();
            Instruction::AInstruction(symbol)
        }
        Rule::label => {
            let name = pair.into_inner().next().unwrap().as_str().to_string();
            Instruction::Label(name)
        }
        Rule::c_instruction => Instruction::CInstruction(build_c_instruction(pair)),
        other => unreachable!("unexpected top-level rule: {:?}", other),
    }
}

fn build_c_instruction(pair: Pair<Rule>) -> CInstruction {
    let mut dest = None;
    let mut comp = String::new();
    let mut jump = None;

    for field in pair.into_inner() {
        match field.as_rule() {
            Rule::dest => dest = Some(field.as_str().to_string()),
            Rule::comp => comp = field.as_str().trim().to_string(),
            Rule::jump => jump = Some(field.as_str().to_string()),
            other => unreachable!("unexpected c_instruction field: {:?}", other),
        }
    }

    CInstruction { comp, dest, jump }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_instruction_decimal() {
        let program = parse_source("@2\n").unwrap();
        assert_eq!(program, vec![Instruction::AInstruction("2".to_string())]);
    }

    #[test]
    fn parses_a_instruction_symbol() {
        let program = parse_source("@LOOP\n").unwrap();
        assert_eq!(
            program,
            vec![Instruction::AInstruction("LOOP".to_string())]
        );
    }

    #[test]
    fn parses_label_declaration() {
        let program = parse_source("(LOOP)\n").unwrap();
        assert_eq!(program, vec![Instruction::Label("LOOP".to_string())]);
    }

    #[test]
    fn parses_dest_eq_comp() {
        let program = parse_source("D=A\n").unwrap();
        assert_eq!(
            program,
            vec![Instruction::CInstruction(CInstruction {
                comp: "A".to_string(),
                dest: Some("D".to_string()),
                jump: None,
            })]
        );
    }

    #[test]
    fn parses_comp_semi_jump() {
        let program = parse_source("0;JMP\n").unwrap();
        assert_eq!(
            program,
            vec![Instruction::CInstruction(CInstruction {
                comp: "0".to_string(),
                dest: None,
                jump: Some("JMP".to_string()),
            })]
        );
    }

    #[test]
    fn parses_full_c_instruction() {
        let program = parse_source("D;JGT\n").unwrap();
        assert_eq!(
            program,
            vec![Instruction::CInstruction(CInstruction {
                comp: "D".to_string(),
                dest: None,
                jump: Some("JGT".to_string()),
            })]
        );
    }

    #[test]
    fn strips_comments_and_blank_lines() {
        let program = parse_source("// a comment\n\n@5 // load five\nD=A\n").unwrap();
        assert_eq!(
            program,
            vec![
                Instruction::AInstruction("5".to_string()),
                Instruction::CInstruction(CInstruction {
                    comp: "A".to_string(),
                    dest: Some("D".to_string()),
                    jump: None,
                }),
            ]
        );
    }

    #[test]
    fn parses_multi_field_dest() {
        let program = parse_source("MD=M-1\n").unwrap();
        assert_eq!(
            program,
            vec![Instruction::CInstruction(CInstruction {
                comp: "M-1".to_string(),
                dest: Some("MD".to_string()),
                jump: None,
            })]
        );
    }
}
