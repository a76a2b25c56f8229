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
use asm::assemble;
use asm::file_reader::AsmFileReader;
use clap::Parser as ClapParser;
use std::fs;
use std::path::PathBuf;

#[derive(ClapParser)]
#[clap(version = "0.1.0", author = "Connor Nolan")]
struct Opts {
    /// Path to the `.asm` source file.
    #[clap(short, long)]
    input: PathBuf,
    /// Path the assembled `.hack` output is written to.
    #[clap(short, long)]
    output: PathBuf,
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    let reader = AsmFileReader;

    let machine_code = assemble(&opts.input, &reader)?;

    fs::write(&opts.output, machine_code.join("\n") + "\n")
        .with_context(|| format!("Failed to write output file: {}", opts.output.display()))?;

    println!(
        "Successfully assembled {} to {}",
        opts.input.display(),
        opts.output.display()
    );

    Ok(())
}
