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

use crate::ast::Segment;
use crate::errors::TranslatorError;

const POINTER_BASE: u16 = 3;
const TEMP_BASE: u16 = 5;

fn base_register(segment: Segment) -> Option<&'static str> {
    match segment {
        Segment::Local => Some("LCL"),
        Segment::Argument => Some("ARG"),
        Segment::This => Some("THIS"),
        Segment::That => Some("THAT"),
        _ => None,
    }
}

/// Emits the ASM lines that leave a segment's value in the D register,
/// per the segment dispatch table.
pub fn push_value_into_d(
    segment: Segment,
    index: u16,
    module: &str,
    line: usize,
) -> Result<Vec<String>, TranslatorError> {
    let lines = match segment {
        Segment::Constant => vec![format!("@{}", index), "D=A".to_string()],
        Segment::Local | Segment::Argument | Segment::This | Segment::That => {
            let base = base_register(segment).unwrap();
            vec![
                format!("@{}", index),
                "D=A".to_string(),
                format!("@{}", base),
                "A=D+M".to_string(),
                "D=M".to_string(),
            ]
        }
        Segment::Pointer => {
            let addr = bounded_address(POINTER_BASE, index, 1, "pointer", module, line)?;
            vec![format!("@{}", addr), "D=M".to_string()]
        }
        Segment::Temp => {
            let addr = bounded_address(TEMP_BASE, index, 7, "temp", module, line)?;
            vec![format!("@{}", addr), "D=M".to_string()]
        }
        Segment::Static => {
            vec![format!("@{}.{}", module, index), "D=M".to_string()]
        }
    };
    Ok(lines)
}

/// Emits the ASM lines that compute a segment's destination address into
/// scratch register R13, for use by pop lowering.
pub fn pop_address_into_scratch(
    segment: Segment,
    index: u16,
    module: &str,
    line: usize,
) -> Result<Vec<String>, TranslatorError> {
    if segment == Segment::Constant {
        return Err(TranslatorError::EncodingError {
            module: module.to_string(),
            line,
            reason: "'pop constant' is illegal".to_string(),
        });
    }

    let lines = match segment {
        Segment::Local | Segment::Argument | Segment::This | Segment::That => {
            let base = base_register(segment).unwrap();
            vec![
                format!("@{}", index),
                "D=A".to_string(),
                format!("@{}", base),
                "D=D+M".to_string(),
                "@R13".to_string(),
                "M=D".to_string(),
            ]
        }
        Segment::Pointer => {
            let addr = bounded_address(POINTER_BASE, index, 1, "pointer", module, line)?;
            vec![format!("@{}", addr), "D=A".to_string(), "@R13".to_string(), "M=D".to_string()]
        }
        Segment::Temp => {
            let addr = bounded_address(TEMP_BASE, index, 7, "temp", module, line)?;
            vec![format!("@{}", addr), "D=A".to_string(), "@R13".to_string(), "M=D".to_string()]
        }
        Segment::Static => {
            vec![
                format!("@{}.{}", module, index),
                "D=A".to_string(),
                "@R13".to_string(),
                "M=D".to_string(),
            ]
        }
        Segment::Constant => unreachable!(),
    };
    Ok(lines)
}

fn bounded_address(
    base: u16,
    index: u16,
    max_index: u16,
    segment_name: &str,
    module: &str,
    line: usize,
) -> Result<u16, TranslatorError> {
    if index > max_index {
        return Err(TranslatorError::EncodingError {
            module: module.to_string(),
            line,
            reason: format!(
                "{} index {} out of range 0-{}",
                segment_name, index, max_index
            ),
        });
    }
    Ok(base + index)
}
