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
pub mod lowering;
pub mod parser;
pub mod scope;
pub mod stdlib;
pub mod typecheck;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indexmap::IndexMap;

use ast::Program;
use errors::HlError;
use file_reader::FileReader;
use lowering::LoweredProgram;
use stdlib::StdlibAbi;

/// The result of a full compile: the lowered VM modules, plus the input
/// path each class was parsed from — a caller writing output files needs
/// the latter to place each module alongside its own source, not a single
/// shared directory.
pub struct CompileOutput {
    pub modules: LoweredProgram,
    pub sources: IndexMap<String, PathBuf>,
}

/// Parses every `.jack`-equivalent source in `paths` into a `Program`,
/// optionally type-checks it against the merged user/standard-library
/// signature table, then lowers each class into its own VM module.
pub fn compile<F: FileReader>(
    paths: &[&Path],
    stdlib_source: Option<&str>,
    run_typecheck: bool,
    reader: &F,
) -> Result<CompileOutput> {
    let mut program: Program = Program::new();
    let mut sources: IndexMap<String, PathBuf> = IndexMap::new();

    for path in paths {
        let source = reader
            .read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?;

        let placeholder = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Class")
            .to_string();

        let class = parser::parse_class(&source)
            .map_err(|source| HlError::PestError {
                class: placeholder,
                source,
            })
            .with_context(|| format!("Failed during parsing of {}", path.display()))?;

        sources.insert(class.name.clone(), path.to_path_buf());
        program.insert(class.name.clone(), class);
    }

    let stdlib_abi: Option<StdlibAbi> = stdlib_source
        .map(stdlib::load_abi)
        .transpose()
        .context("Failed to load standard-library ABI")?;

    let signatures = typecheck::build_signature_table(&program, stdlib_abi.as_ref());

    if run_typecheck {
        typecheck::check_program(&program, &signatures).context("Failed during type checking")?;
    }

    let modules = lowering::lower_program(&program, &signatures)
        .context("Failed during lowering stage")?;

    Ok(CompileOutput { modules, sources })
}

#[cfg(test)]
mod tests {
    use super::*;
    use file_reader::MockFileReader;
    use std::path::Path;

    #[test]
    fn compiles_single_class_without_typecheck() {
        let mut reader = MockFileReader::default();
        reader.add_file("Main.jack", "class Main { function void run() { return; } }");

        let result = compile(&[Path::new("Main.jack")], None, false, &reader).unwrap();
        assert!(result.modules.contains_key("Main"));
        assert!(result.modules["Main"][0].starts_with("function Main.run"));
        assert_eq!(result.sources["Main"], Path::new("Main.jack"));
    }

    #[test]
    fn typecheck_failure_surfaces_as_error() {
        let mut reader = MockFileReader::default();
        reader.add_file(
            "Main.jack",
            "class Main { function void run() { if (1) { } return; } }",
        );

        let result = compile(&[Path::new("Main.jack")], None, true, &reader);
        assert!(result.is_err());
    }

    #[test]
    fn multiple_classes_each_lower_to_their_own_module() {
        let mut reader = MockFileReader::default();
        reader.add_file(
            "Point.jack",
            "class Point { field int x; method void draw() { return; } }",
        );
        reader.add_file(
            "Main.jack",
            "class Main { function void run() { var Point p; do p.draw(); return; } }",
        );

        let result = compile(
            &[Path::new("Point.jack"), Path::new("Main.jack")],
            None,
            true,
            &reader,
        )
        .unwrap();
        assert!(result.modules.contains_key("Point"));
        assert!(result.modules.contains_key("Main"));
    }
}
