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
use std::path::PathBuf;
use vmtr::file_reader::VmFileReader;
use vmtr::translate;

#[derive(ClapParser)]
#[clap(version = "0.1.0", author = "Connor Nolan")]
struct Opts {
    /// Path the translated `.asm` output is written to.
    #[clap(long)]
    output: PathBuf,
    /// Prefix the output with the bootstrap preamble (`SP=256; call Sys.init 0`).
    #[clap(long)]
    bootstrap: bool,
    /// One or more `.vm` source files, translated and concatenated in order.
    inputs: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    let reader = VmFileReader;
    let input_paths: Vec<&std::path::Path> = opts.inputs.iter().map(|p| p.as_path()).collect();

    let asm_lines = translate(&input_paths, opts.bootstrap, &reader)?;

    fs::write(&opts.output, asm_lines.join("\n") + "\n")
        .with_context(|| format!("Failed to write output file: {}", opts.output.display()))?;

    println!(
        "Successfully translated {} file(s) to {}",
        opts.inputs.len(),
        opts.output.display()
    );

    Ok(())
}
