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

/// A single parsed line of Hack assembly.
///
/// The grammar only ever produces these three shapes; comments and blank
/// lines are stripped by the parser and never reach the AST.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// `@symbol` — symbol is a decimal literal, a predefined symbol, or a
    /// user label, resolved in the assembler's first pass.
    AInstruction(String),
    /// `dest=comp;jump` in any of its three legal reduced forms.
    CInstruction(CInstruction),
    /// `(name)` — occupies no instruction slot.
    Label(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CInstruction {
    pub comp: String,
    pub dest: Option<String>,
    pub jump: Option<String>,
}

pub type Program = Vec<Instruction>;
