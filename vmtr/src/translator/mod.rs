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

mod segments;

use crate::ast::{ArithmeticOp, Command, Module, Program};
use crate::errors::TranslatorError;

/// Lowers a VM program to ASM text. Holds the two counters that must stay
/// unique across the whole emitted file: one for comparison labels, one
/// for call-site return-address labels.
pub struct Translator {
    comparison_counter: u32,
    call_counter: u32,
}

impl Translator {
    pub fn new() -> Self {
        Translator {
            comparison_counter: 0,
            call_counter: 0,
        }
    }

    /// Translates every module in source order, optionally preceded by the
    /// bootstrap preamble that sets `SP` and calls `Sys.init`.
    pub fn translate_program(
        &mut self,
        program: &Program,
        bootstrap: bool,
    ) -> Result<Vec<String>, TranslatorError> {
        let mut output = Vec::new();

        if bootstrap {
            output.push("@256".to_string());
            output.push("D=A".to_string());
            output.push("@SP".to_string());
            output.push("M=D".to_string());
            output.extend(self.lower_call("Sys.init", 0, "Bootstrap"));
        }

        for module in program {
            output.extend(self.translate_module(module)?);
        }

        Ok(output)
    }

    fn translate_module(&mut self, module: &Module) -> Result<Vec<String>, TranslatorError> {
        let mut output = Vec::new();
        let mut current_function = String::new();

        for (idx, command) in module.commands.iter().enumerate() {
            let line = idx + 1;
            match command {
                Command::Push { segment, index } => {
                    let mut lines =
                        segments::push_value_into_d(*segment, *index, &module.name, line)?;
                    lines.extend([
                        "@SP".to_string(),
                        "A=M".to_string(),
                        "M=D".to_string(),
                        "@SP".to_string(),
                        "M=M+1".to_string(),
                    ]);
                    output.extend(lines);
                }
                Command::Pop { segment, index } => {
                    let mut lines =
                        segments::pop_address_into_scratch(*segment, *index, &module.name, line)?;
                    lines.extend([
                        "@SP".to_string(),
                        "M=M-1".to_string(),
                        "A=M".to_string(),
                        "D=M".to_string(),
                        "@R13".to_string(),
                        "A=M".to_string(),
                        "M=D".to_string(),
                    ]);
                    output.extend(lines);
                }
                Command::Arithmetic(op) => output.extend(self.lower_arithmetic(*op)),
                Command::Label(name) => {
                    output.push(format!("({}${})", current_function, name));
                }
                Command::Goto(name) => {
                    output.push(format!("@{}${}", current_function, name));
                    output.push("0;JMP".to_string());
                }
                Command::IfGoto(name) => {
                    output.push("@SP".to_string());
                    output.push("AM=M-1".to_string());
                    output.push("D=M".to_string());
                    output.push(format!("@{}${}", current_function, name));
                    output.push("D;JNE".to_string());
                }
                Command::Function { name, locals } => {
                    current_function = name.clone();
                    output.push(format!("({})", name));
                    for _ in 0..*locals {
                        output.extend([
                            "@0".to_string(),
                            "D=A".to_string(),
                            "@SP".to_string(),
                            "A=M".to_string(),
                            "M=D".to_string(),
                            "@SP".to_string(),
                            "M=M+1".to_string(),
                        ]);
                    }
                }
                Command::Call { name, args } => {
                    output.extend(self.lower_call(name, *args, &module.name));
                }
                Command::Return => output.extend(lower_return()),
            }
        }

        Ok(output)
    }

    fn lower_arithmetic(&mut self, op: ArithmeticOp) -> Vec<String> {
        match op {
            ArithmeticOp::Neg => vec!["@SP".to_string(), "A=M-1".to_string(), "M=-M".to_string()],
            ArithmeticOp::Not => vec!["@SP".to_string(), "A=M-1".to_string(), "M=!M".to_string()],
            ArithmeticOp::Add => binary_op("M=D+M"),
            ArithmeticOp::Sub => binary_op("M=M-D"),
            ArithmeticOp::And => binary_op("M=D&M"),
            ArithmeticOp::Or => binary_op("M=D|M"),
            ArithmeticOp::Eq => self.lower_comparison("JEQ"),
            ArithmeticOp::Gt => self.lower_comparison("JGT"),
            ArithmeticOp::Lt => self.lower_comparison("JLT"),
        }
    }

    fn lower_comparison(&mut self, jump: &str) -> Vec<String> {
        let n = self.comparison_counter;
        self.comparison_counter += 1;
        let true_label = format!("COMP_TRUE_{}", n);
        let end_label = format!("COMP_END_{}", n);

        vec![
            "@SP".to_string(),
            "AM=M-1".to_string(),
            "D=M".to_string(),
            "A=A-1".to_string(),
            "D=M-D".to_string(),
            format!("@{}", true_label),
            format!("D;{}", jump),
            "@SP".to_string(),
            "A=M-1".to_string(),
            "M=0".to_string(),
            format!("@{}", end_label),
            "0;JMP".to_string(),
            format!("({})", true_label),
            "@SP".to_string(),
            "A=M-1".to_string(),
            "M=-1".to_string(),
            format!("({})", end_label),
        ]
    }

    fn lower_call(&mut self, name: &str, args: u16, module: &str) -> Vec<String> {
        let n = self.call_counter;
        self.call_counter += 1;
        let return_label = format!("{}$ret.{}", module, n);

        let mut lines = vec![
            format!("@{}", return_label),
            "D=A".to_string(),
            "@SP".to_string(),
            "A=M".to_string(),
            "M=D".to_string(),
            "@SP".to_string(),
            "M=M+1".to_string(),
        ];
        for reg in ["LCL", "ARG", "THIS", "THAT"] {
            lines.extend([
                format!("@{}", reg),
                "D=M".to_string(),
                "@SP".to_string(),
                "A=M".to_string(),
                "M=D".to_string(),
                "@SP".to_string(),
                "M=M+1".to_string(),
            ]);
        }
        lines.extend([
            "@SP".to_string(),
            "D=M".to_string(),
            format!("@{}", args as u32 + 5),
            "D=D-A".to_string(),
            "@ARG".to_string(),
            "M=D".to_string(),
            "@SP".to_string(),
            "D=M".to_string(),
            "@LCL".to_string(),
            "M=D".to_string(),
            format!("@{}", name),
            "0;JMP".to_string(),
            format!("({})", return_label),
        ]);
        lines
    }
}

fn binary_op(compute: &str) -> Vec<String> {
    vec![
        "@SP".to_string(),
        "M=M-1".to_string(),
        "A=M".to_string(),
        "D=M".to_string(),
        "A=A-1".to_string(),
        compute.to_string(),
    ]
}

fn lower_return() -> Vec<String> {
    vec![
        "@LCL".to_string(),
        "D=M".to_string(),
        "@R13".to_string(),
        "M=D".to_string(),
        "@5".to_string(),
        "A=D-A".to_string(),
        "D=M".to_string(),
        "@R14".to_string(),
        "M=D".to_string(),
        "@SP".to_string(),
        "AM=M-1".to_string(),
        "D=M".to_string(),
        "@ARG".to_string(),
        "A=M".to_string(),
        "M=D".to_string(),
        "@ARG".to_string(),
        "D=M+1".to_string(),
        "@SP".to_string(),
        "M=D".to_string(),
        "@R13".to_string(),
        "AM=M-1".to_string(),
        "D=M".to_string(),
        "@THAT".to_string(),
        "M=D".to_string(),
        "@R13".to_string(),
        "AM=M-1".to_string(),
        "D=M".to_string(),
        "@THIS".to_string(),
        "M=D".to_string(),
        "@R13".to_string(),
        "AM=M-1".to_string(),
        "D=M".to_string(),
        "@ARG".to_string(),
        "M=D".to_string(),
        "@R13".to_string(),
        "AM=M-1".to_string(),
        "D=M".to_string(),
        "@LCL".to_string(),
        "M=D".to_string(),
        "@R14".to_string(),
        "A=M".to_string(),
        "0;JMP".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Segment;

    fn module(name: &str, commands: Vec<Command>) -> Module {
        Module {
            name: name.to_string(),
            commands,
        }
    }

    #[test]
    fn two_comparisons_produce_four_distinct_labels() {
        let mut t = Translator::new();
        let m = module(
            "Main",
            vec![Command::Arithmetic(ArithmeticOp::Eq), Command::Arithmetic(ArithmeticOp::Eq)],
        );
        let lines = t.translate_module(&m).unwrap();
        let labels: Vec<&String> = lines
            .iter()
            .filter(|l| l.starts_with('(') && l.ends_with(')'))
            .collect();
        assert_eq!(labels.len(), 4);
        let unique: std::collections::HashSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn labels_are_namespaced_by_enclosing_function() {
        let mut t = Translator::new();
        let m = module(
            "Main",
            vec![
                Command::Function {
                    name: "Main.loop".to_string(),
                    locals: 0,
                },
                Command::Label("START".to_string()),
                Command::Goto("START".to_string()),
            ],
        );
        let lines = t.translate_module(&m).unwrap();
        assert!(lines.contains(&"(Main.loop$START)".to_string()));
        assert!(lines.contains(&"@Main.loop$START".to_string()));
    }

    #[test]
    fn push_constant_then_pop_local_round_trips_through_stack_protocol() {
        let mut t = Translator::new();
        let m = module(
            "Main",
            vec![
                Command::Push {
                    segment: Segment::Constant,
                    index: 42,
                },
                Command::Pop {
                    segment: Segment::Local,
                    index: 0,
                },
            ],
        );
        let lines = t.translate_module(&m).unwrap();
        assert!(lines.contains(&"@42".to_string()));
        assert!(lines.iter().any(|l| l == "@LCL"));
    }

    #[test]
    fn call_emits_five_frame_pushes_and_a_unique_return_label() {
        let mut t = Translator::new();
        let lines = t.lower_call("Main.helper", 2, "Main");
        let pushes = lines.iter().filter(|l| *l == "M=M+1").count();
        assert_eq!(pushes, 5);
        assert!(lines.contains(&"(Main$ret.0)".to_string()));
    }

    #[test]
    fn pop_constant_is_rejected_in_module_translation() {
        let mut t = Translator::new();
        let m = module(
            "Main",
            vec![Command::Pop {
                segment: Segment::Constant,
                index: 0,
            }],
        );
        assert!(t.translate_module(&m).is_err());
    }

    #[test]
    fn bootstrap_preamble_sets_sp_and_calls_sys_init() {
        let mut t = Translator::new();
        let lines = t.translate_program(&vec![], true).unwrap();
        assert_eq!(lines[0], "@256");
        assert!(lines.contains(&"@Sys.init".to_string()));
    }
}
