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

use crate::ast::{ArithmeticOp, Command, Segment};
use crate::errors::TranslatorError;

/// Parses one `.vm` source file into its command sequence.
///
/// The VM text grammar has no nesting and only ten statement shapes, all
/// whitespace-tokenized — a hand-rolled line scanner covers it without the
/// overhead of a grammar file.
pub fn parse_module(source: &str, module_name: &str) -> Result<Vec<Command>, TranslatorError> {
    let mut commands = Vec::new();

    for (idx, raw_line) in source.lines().enumerate() {
        let line_number = idx + 1;
        let stripped = strip_comment(raw_line);
        let tokens: Vec<&str> = stripped.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }

        let command = parse_line(&tokens, module_name, line_number)?;
        commands.push(command);
    }

    Ok(commands)
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_line(
    tokens: &[&str],
    module: &str,
    line: usize,
) -> Result<Command, TranslatorError> {
    let syntax_error = |reason: String| TranslatorError::SyntaxError {
        module: module.to_string(),
        line,
        reason,
    };

    match tokens[0] {
        "push" | "pop" => {
            if tokens.len() != 3 {
                return Err(syntax_error(format!(
                    "'{}' requires a segment and an index",
                    tokens[0]
                )));
            }
            let segment = Segment::parse(tokens[1])
                .ok_or_else(|| syntax_error(format!("Unknown segment: {}", tokens[1])))?;
            let index: u16 = tokens[2]
                .parse()
                .map_err(|_| syntax_error(format!("Invalid index: {}", tokens[2])))?;

            if tokens[0] == "push" {
                Ok(Command::Push { segment, index })
            } else {
                Ok(Command::Pop { segment, index })
            }
        }
        "label" => {
            expect_one_operand(tokens, &syntax_error).map(Command::Label)
        }
        "goto" => expect_one_operand(tokens, &syntax_error).map(Command::Goto),
        "if-goto" => expect_one_operand(tokens, &syntax_error).map(Command::IfGoto),
        "function" => {
            if tokens.len() != 3 {
                return Err(syntax_error(
                    "'function' requires a name and a local count".to_string(),
                ));
            }
            let locals: u16 = tokens[2]
                .parse()
                .map_err(|_| syntax_error(format!("Invalid local count: {}", tokens[2])))?;
            Ok(Command::Function {
                name: tokens[1].to_string(),
                locals,
            })
        }
        "call" => {
            if tokens.len() != 3 {
                return Err(syntax_error(
                    "'call' requires a name and an argument count".to_string(),
                ));
            }
            let args: u16 = tokens[2]
                .parse()
                .map_err(|_| syntax_error(format!("Invalid argument count: {}", tokens[2])))?;
            Ok(Command::Call {
                name: tokens[1].to_string(),
                args,
            })
        }
        "return" => {
            if tokens.len() != 1 {
                return Err(syntax_error("'return' takes no operands".to_string()));
            }
            Ok(Command::Return)
        }
        word => {
            if let Some(op) = ArithmeticOp::parse(word) {
                if tokens.len() != 1 {
                    return Err(syntax_error(format!("'{}' takes no operands", word)));
                }
                Ok(Command::Arithmetic(op))
            } else {
                Err(syntax_error(format!("Unknown command: {}", word)))
            }
        }
    }
}

fn expect_one_operand(
    tokens: &[&str],
    syntax_error: &impl Fn(String) -> TranslatorError,
) -> Result<String, TranslatorError> {
    if tokens.len() != 2 {
        return Err(syntax_error(format!(
            "'{}' requires exactly one operand",
            tokens[0]
        )));
    }
    Ok(tokens[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_push_and_pop() {
        let commands = parse_module("push constant 7\npop local 2\n", "Main").unwrap();
        assert_eq!(
            commands,
            vec![
                Command::Push {
                    segment: Segment::Constant,
                    index: 7
                },
                Command::Pop {
                    segment: Segment::Local,
                    index: 2
                },
            ]
        );
    }

    #[test]
    fn parses_arithmetic_words() {
        let commands = parse_module("add\nneg\neq\n", "Main").unwrap();
        assert_eq!(
            commands,
            vec![
                Command::Arithmetic(ArithmeticOp::Add),
                Command::Arithmetic(ArithmeticOp::Neg),
                Command::Arithmetic(ArithmeticOp::Eq),
            ]
        );
    }

    #[test]
    fn parses_control_flow() {
        let commands = parse_module("label LOOP\ngoto LOOP\nif-goto LOOP\n", "Main").unwrap();
        assert_eq!(
            commands,
            vec![
                Command::Label("LOOP".to_string()),
                Command::Goto("LOOP".to_string()),
                Command::IfGoto("LOOP".to_string()),
            ]
        );
    }

    #[test]
    fn parses_function_call_and_return() {
        let commands =
            parse_module("function Main.main 2\ncall Main.helper 1\nreturn\n", "Main").unwrap();
        assert_eq!(
            commands,
            vec![
                Command::Function {
                    name: "Main.main".to_string(),
                    locals: 2
                },
                Command::Call {
                    name: "Main.helper".to_string(),
                    args: 1
                },
                Command::Return,
            ]
        );
    }

    #[test]
    fn strips_comments_and_blank_lines() {
        let commands = parse_module("// header\n\npush constant 1 // one\n", "Main").unwrap();
        assert_eq!(
            commands,
            vec![Command::Push {
                segment: Segment::Constant,
                index: 1
            }]
        );
    }

    #[test]
    fn rejects_unknown_segment() {
        assert!(parse_module("push bogus 0\n", "Main").is_err());
    }

    #[test]
    fn rejects_unknown_command() {
        assert!(parse_module("frobnicate\n", "Main").is_err());
    }
}
