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

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use std::fs;
use std::path::{Path, PathBuf};

use hlc::file_reader::HlFileReader;

#[derive(ClapParser)]
#[clap(version = "0.1.0", author = "Connor Nolan")]
struct Opts {
    /// Path to the standard-library ABI JSON file. When omitted, calls into
    /// unresolved external classes are reported as resolution errors.
    #[clap(long)]
    stdlib: Option<PathBuf>,
    /// Run the type checker before lowering.
    #[clap(long)]
    typecheck: bool,
    /// One or more `.jack`-equivalent source files, or a single directory
    /// containing them.
    inputs: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    let reader = HlFileReader;

    let input_paths = resolve_inputs(&opts.inputs)?;
    let paths: Vec<&Path> = input_paths.iter().map(|p| p.as_path()).collect();

    let stdlib_source = opts
        .stdlib
        .as_ref()
        .map(|path| {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read standard-library ABI file: {}", path.display()))
        })
        .transpose()?;

    let result = hlc::compile(&paths, stdlib_source.as_deref(), opts.typecheck, &reader)?;

    for (class_name, code) in &result.modules {
        let source_path = &result.sources[class_name.as_str()];
        let out_dir = source_path.parent().unwrap_or_else(|| Path::new("."));
        let out_path = out_dir.join(format!("{}.vm", class_name));
        fs::write(&out_path, code.join("\n") + "\n")
            .with_context(|| format!("Failed to write output file: {}", out_path.display()))?;
        println!("Compiled {} -> {}", class_name, out_path.display());
    }

    Ok(())
}

/// Accepts either a list of source files, or a single directory, in which
/// case every `.jack` file in it (non-recursively) becomes an input.
fn resolve_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if let [only] = inputs {
        if only.is_dir() {
            let mut files: Vec<PathBuf> = fs::read_dir(only)
                .with_context(|| format!("Failed to read directory: {}", only.display()))?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("jack"))
                .collect();
            files.sort();
            return Ok(files);
        }
    }
    Ok(inputs.to_vec())
}
