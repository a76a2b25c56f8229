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

use std::collections::HashMap;

/// Maps user label names to the instruction index they resolve to.
/// Populated by the assembler's first pass; grown in the second pass with
/// auto-allocated RAM variables.
pub type SymbolTable = HashMap<String, u16>;

/// The built-in address table every Hack assembler reserves. User labels
/// may never collide with one of these names.
pub fn predefined_symbol(name: &str) -> Option<u16> {
    match name {
        "SP" => Some(0),
        "LCL" => Some(1),
        "ARG" => Some(2),
        "THIS" => Some(3),
        "THAT" => Some(4),
        "SCREEN" => Some(16384),
        "KBD" => Some(24576),
        _ if name.len() >= 2 && name.starts_with('R') => {
            name[1..].parse::<u16>().ok().filter(|&n| n <= 15)
        }
        _ => None,
    }
}

pub fn is_predefined(name: &str) -> bool {
    predefined_symbol(name).is_some()
}

/// First RAM address handed out to a user variable; 0-15 are reserved for
/// the predefined `R0`-`R15` registers.
pub const FIRST_AUTO_VARIABLE_ADDRESS: u16 = 16;

/// One past the highest address the Hack architecture can name with a
/// 15-bit A-instruction.
pub const MAX_ADDRESSABLE_MEMORY: u32 = 1 << 15;
