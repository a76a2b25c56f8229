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

/// The 7-bit `comp` field, keyed by the textual computation. The high bit
/// of the returned code is the "a" bit that selects the A vs M form.
pub fn comp_code(comp: &str) -> Option<u8> {
    Some(match comp {
        "0" => 0b0101010,
        "1" => 0b0111111,
        "-1" => 0b0111010,
        "D" => 0b0001100,
        "A" => 0b0110000,
        "M" => 0b1110000,
        "!D" => 0b0001101,
        "!A" => 0b0110001,
        "!M" => 0b1110001,
        "-D" => 0b0001111,
        "-A" => 0b0110011,
        "-M" => 0b1110011,
        "D+1" => 0b0011111,
        "A+1" => 0b0110111,
        "M+1" => 0b1110111,
        "D-1" => 0b0001110,
        "A-1" => 0b0110010,
        "M-1" => 0b1110010,
        "D+A" => 0b0000010,
        "D+M" => 0b1000010,
        "D-A" => 0b0010011,
        "D-M" => 0b1010011,
        "A-D" => 0b0000111,
        "M-D" => 0b1000111,
        "D&A" => 0b0000000,
        "D&M" => 0b1000000,
        "D|A" => 0b0010101,
        "D|M" => 0b1010101,
        _ => return None,
    })
}

/// The 3-bit `dest` field.
pub fn dest_code(dest: Option<&str>) -> Option<u8> {
    Some(match dest {
        None => 0b000,
        Some("M") => 0b001,
        Some("D") => 0b010,
        Some("MD") => 0b011,
        Some("A") => 0b100,
        Some("AM") => 0b101,
        Some("AD") => 0b110,
        Some("AMD") => 0b111,
        Some(_) => return None,
    })
}

/// The 3-bit `jump` field.
pub fn jump_code(jump: Option<&str>) -> Option<u8> {
    Some(match jump {
        None => 0b000,
        Some("JGT") => 0b001,
        Some("JEQ") => 0b010,
        Some("JGE") => 0b011,
        Some("JLT") => 0b100,
        Some("JNE") => 0b101,
        Some("JLE") => 0b110,
        Some("JMP") => 0b111,
        Some(_) => return None,
    })
}

pub const C_INSTRUCTION_HEADER: u16 = 0b111_0000000_000_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comp_table_covers_all_28_forms() {
        let forms = [
            "0", "1", "-1", "D", "A", "M", "!D", "!A", "!M", "-D", "-A", "-M", "D+1", "A+1",
            "M+1", "D-1", "A-1", "M-1", "D+A", "D+M", "D-A", "D-M", "A-D", "M-D", "D&A", "D&M",
            "D|A", "D|M",
        ];
        for f in forms {
            assert!(comp_code(f).is_some(), "missing comp form {f}");
        }
        assert_eq!(forms.len(), 28);
    }

    #[test]
    fn comp_high_bit_selects_a_or_m() {
        assert_eq!(comp_code("A").unwrap() & 0b1000000, 0);
        assert_eq!(comp_code("M").unwrap() & 0b1000000, 0b1000000);
    }

    #[test]
    fn dest_and_jump_round_trip_reference_values() {
        assert_eq!(dest_code(Some("AMD")), Some(0b111));
        assert_eq!(dest_code(None), Some(0b000));
        assert_eq!(jump_code(Some("JMP")), Some(0b111));
        assert_eq!(jump_code(None), Some(0b000));
    }

    #[test]
    fn unknown_fields_reject() {
        assert_eq!(dest_code(Some("X")), None);
        assert_eq!(jump_code(Some("JXX")), None);
        assert_eq!(comp_code("D+D"), None);
    }
}
