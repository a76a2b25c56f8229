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

pub mod assembler;
pub mod ast;
pub mod errors;
pub mod file_reader;
pub mod parser;

use std::path::Path;

use anyhow::{Context, Result};
use file_reader::FileReader;

extern crate pest;
extern crate pest_derive;

/// Reads `source_path` with `reader`, runs the full two-pass assembler, and
/// returns the `.hack` output as one 16-character binary line per
/// instruction.
pub fn assemble<F: FileReader>(source_path: &Path, reader: &F) -> Result<Vec<String>> {
    let source = reader
        .read_to_string(source_path)
        .with_context(|| format!("Failed to read input file: {}", source_path.display()))?;

    let program = parser::parse_source(&source).context("Failed during parsing stage")?;

    let mut symbol_table =
        assembler::build_symbol_table(&program).context("Failed during assembler phase 1")?;

    let machine_code = assembler::generate_machine_code(&program, &mut symbol_table)
        .context("Failed during assembler phase 2")?;

    Ok(machine_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use file_reader::MockFileReader;
    use std::path::Path;

    #[test]
    fn assembles_simple_program_end_to_end() {
        let mut reader = MockFileReader::default();
        reader.add_file("add.asm", "@2\nD=A\n@3\nD=D+A\n@0\nM=D\n");

        let code = assemble(Path::new("add.asm"), &reader).unwrap();
        assert_eq!(
            code,
            vec![
                "0000000000000010",
                "1110110000010000",
                "0000000000000011",
                "1110000010010000",
                "0000000000000000",
                "1110001100001000",
            ]
        );
    }
}
