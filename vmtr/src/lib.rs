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

pub mod ast;
pub mod errors;
pub mod file_reader;
pub mod parser;
pub mod translator;

use std::path::Path;

use anyhow::{Context, Result};
use ast::{Module, Program};
use file_reader::FileReader;
use translator::Translator;

/// Reads every `.vm` source in `paths`, parses each into a module named
/// after its file stem, and lowers the resulting program to ASM text.
pub fn translate<F: FileReader>(
    paths: &[&Path],
    bootstrap: bool,
    reader: &F,
) -> Result<Vec<String>> {
    let mut program: Program = Vec::new();

    for path in paths {
        let source = reader
            .read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?;

        let module_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Module")
            .to_string();

        let commands = parser::parse_module(&source, &module_name)
            .with_context(|| format!("Failed during parsing of {}", path.display()))?;

        program.push(Module {
            name: module_name,
            commands,
        });
    }

    let mut translator = Translator::new();
    translator
        .translate_program(&program, bootstrap)
        .context("Failed during translation stage")
}

#[cfg(test)]
mod tests {
    use super::*;
    use file_reader::MockFileReader;
    use std::path::Path;

    #[test]
    fn translates_single_module_without_bootstrap() {
        let mut reader = MockFileReader::default();
        reader.add_file("Main.vm", "push constant 7\npush constant 8\nadd\n");

        let lines = translate(&[Path::new("Main.vm")], false, &reader).unwrap();
        assert_eq!(lines[0], "@7");
        assert!(!lines.contains(&"@256".to_string()));
    }

    #[test]
    fn translates_with_bootstrap_preamble() {
        let mut reader = MockFileReader::default();
        reader.add_file("Sys.vm", "function Sys.init 0\ncall Sys.init 0\n");

        let lines = translate(&[Path::new("Sys.vm")], true, &reader).unwrap();
        assert_eq!(lines[0], "@256");
    }

    #[test]
    fn multiple_modules_concatenate_in_argument_order() {
        let mut reader = MockFileReader::default();
        reader.add_file("A.vm", "push constant 1\n");
        reader.add_file("B.vm", "push constant 2\n");

        let lines = translate(&[Path::new("A.vm"), Path::new("B.vm")], false, &reader).unwrap();
        assert_eq!(lines[0], "@1");
        assert_eq!(lines[7], "@2");
    }
}
