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

use indexmap::IndexMap;

use crate::ast::{
    BinaryOp, CallTarget, Class, Expression, LValue, LiteralKind, Program, Statement,
    StorageClass, Subroutine, SubroutineKind, UnaryOp, Variable,
};
use crate::errors::HlError;
use crate::scope::ScopeTable;
use crate::typecheck::SignatureTable;

/// class name -> VM instructions for that class's module.
pub type LoweredProgram = IndexMap<String, Vec<String>>;

/// Lowers every class in `program` into its own VM module. `program` holds
/// only user-authored classes; the standard library is consulted through
/// `signatures` for call resolution but never appears in the output, since
/// the lowerer has no bodies to emit for it.
pub fn lower_program(
    program: &Program,
    signatures: &SignatureTable,
) -> Result<LoweredProgram, HlError> {
    let mut out = LoweredProgram::new();
    for class in program.values() {
        out.insert(class.name.clone(), lower_class(class, signatures)?);
    }
    Ok(out)
}

fn lower_class(class: &Class, signatures: &SignatureTable) -> Result<Vec<String>, HlError> {
    let mut scope = ScopeTable::new();
    scope.push_class_scope(&class.name);
    for field in class.fields.values() {
        scope.register_variable(field.clone());
    }
    for s in class.statics.values() {
        scope.register_variable(s.clone());
    }

    let field_count = class.fields.len();
    let mut code = Vec::new();

    for sub in class.subroutines.values() {
        scope.push_subroutine_scope(&sub.name);
        let mut lowerer = Lowerer {
            signatures,
            scope: &mut scope,
            class_name: &class.name,
            label_counter: 0,
        };
        code.extend(lowerer.lower_subroutine(sub, field_count)?);
        scope.pop_subroutine_scope();
    }

    scope.pop_class_scope();
    Ok(code)
}

fn count_locals(body: &[Statement]) -> usize {
    body.iter().filter(|s| matches!(s, Statement::Var(_))).count()
}

struct Lowerer<'a> {
    signatures: &'a SignatureTable,
    scope: &'a mut ScopeTable,
    class_name: &'a str,
    label_counter: u32,
}

impl<'a> Lowerer<'a> {
    fn err(&self, reason: impl Into<String>) -> HlError {
        HlError::ResolutionError {
            class: self.class_name.to_string(),
            reason: reason.into(),
        }
    }

    fn next_label(&mut self, tag: &str) -> String {
        self.label_counter += 1;
        format!("{}_{}_{}", self.class_name, tag, self.label_counter)
    }

    fn lower_subroutine(&mut self, sub: &Subroutine, field_count: usize) -> Result<Vec<String>, HlError> {
        if sub.kind == SubroutineKind::Method {
            self.scope.register_variable(Variable {
                name: "this".to_string(),
                storage: StorageClass::Parameter,
                data_type: crate::ast::DataType::object(self.class_name.to_string()),
            });
        }
        for p in &sub.parameters {
            self.scope.register_variable(p.clone());
        }

        let local_count = count_locals(&sub.body);
        let mut code = vec![format!("function {}.{} {}", self.class_name, sub.name, local_count)];

        match sub.kind {
            SubroutineKind::Method => {
                code.push("push argument 0".to_string());
                code.push("pop pointer 0".to_string());
            }
            SubroutineKind::Constructor => {
                code.push(format!("push constant {}", field_count));
                code.push("call Memory.alloc 1".to_string());
                code.push("pop pointer 0".to_string());
            }
            SubroutineKind::Function => {}
        }

        for stmt in &sub.body {
            self.lower_statement(stmt, &mut code)?;
        }

        Ok(code)
    }

    fn lower_statement(&mut self, stmt: &Statement, code: &mut Vec<String>) -> Result<(), HlError> {
        match stmt {
            Statement::Var(var) => {
                self.scope.register_variable(var.clone());
                Ok(())
            }
            Statement::Let { lhs, rhs } => self.lower_let(lhs, rhs, code),
            Statement::Do(expr) => {
                self.lower_expression(expr, code)?;
                code.push("pop temp 0".to_string());
                Ok(())
            }
            Statement::If {
                condition,
                then_block,
                else_block,
            } => self.lower_if(condition, then_block, else_block.as_deref(), code),
            Statement::While { condition, body } => self.lower_while(condition, body, code),
            Statement::Return(expr) => {
                match expr {
                    Some(e) => self.lower_expression(e, code)?,
                    None => code.push("push constant 0".to_string()),
                }
                code.push("return".to_string());
                Ok(())
            }
        }
    }

    fn lower_let(&mut self, lhs: &LValue, rhs: &Expression, code: &mut Vec<String>) -> Result<(), HlError> {
        match lhs {
            LValue::Var(name) => {
                self.lower_expression(rhs, code)?;
                code.push(self.pop_variable(name)?);
                Ok(())
            }
            LValue::Index { array, index } => {
                // Indirection dance: compute the target address first and
                // park it in temp 0, so evaluating `rhs` (which may itself
                // touch another array through pointer 1) can't clobber it.
                self.lower_expression(&Expression::VarRef(array.clone()), code)?;
                self.lower_expression(index, code)?;
                code.push("add".to_string());
                code.push("pop temp 0".to_string());

                self.lower_expression(rhs, code)?;

                code.push("push temp 0".to_string());
                code.push("pop pointer 1".to_string());
                code.push("pop that 0".to_string());
                Ok(())
            }
        }
    }

    fn lower_if(
        &mut self,
        condition: &Expression,
        then_block: &[Statement],
        else_block: Option<&[Statement]>,
        code: &mut Vec<String>,
    ) -> Result<(), HlError> {
        let else_label = self.next_label("IF_ELSE");
        let end_label = self.next_label("IF_END");

        self.lower_expression(condition, code)?;
        code.push("not".to_string());
        code.push(format!("if-goto {}", else_label));
        for stmt in then_block {
            self.lower_statement(stmt, code)?;
        }
        code.push(format!("goto {}", end_label));
        code.push(format!("label {}", else_label));
        if let Some(block) = else_block {
            for stmt in block {
                self.lower_statement(stmt, code)?;
            }
        }
        code.push(format!("label {}", end_label));
        Ok(())
    }

    fn lower_while(&mut self, condition: &Expression, body: &[Statement], code: &mut Vec<String>) -> Result<(), HlError> {
        let top_label = self.next_label("WHILE_TOP");
        let end_label = self.next_label("WHILE_END");

        code.push(format!("label {}", top_label));
        self.lower_expression(condition, code)?;
        code.push("not".to_string());
        code.push(format!("if-goto {}", end_label));
        for stmt in body {
            self.lower_statement(stmt, code)?;
        }
        code.push(format!("goto {}", top_label));
        code.push(format!("label {}", end_label));
        Ok(())
    }

    fn lower_expression(&mut self, expr: &Expression, code: &mut Vec<String>) -> Result<(), HlError> {
        match expr {
            Expression::VarRef(name) => {
                code.push(self.push_variable(name)?);
                Ok(())
            }
            Expression::Literal(lit) => self.lower_literal(lit, code),
            Expression::Index { array, index } => {
                self.lower_expression(array, code)?;
                self.lower_expression(index, code)?;
                code.push("add".to_string());
                code.push("pop pointer 1".to_string());
                code.push("push that 0".to_string());
                Ok(())
            }
            Expression::Cast { expr, .. } => self.lower_expression(expr, code),
            Expression::Unary { op, expr } => {
                self.lower_expression(expr, code)?;
                code.push(match op {
                    UnaryOp::Minus => "neg".to_string(),
                    UnaryOp::Not => "not".to_string(),
                });
                Ok(())
            }
            Expression::Binary { op, lhs, rhs } => self.lower_binary(*op, lhs, rhs, code),
            Expression::Call { target, args } => self.lower_call(target, args, code),
        }
    }

    fn lower_literal(&mut self, lit: &crate::ast::Literal, code: &mut Vec<String>) -> Result<(), HlError> {
        match lit.kind {
            LiteralKind::Int => {
                code.push(format!("push constant {}", lit.text));
            }
            LiteralKind::Char => {
                let ch = lit.text.chars().next().unwrap_or('\0');
                code.push(format!("push constant {}", ch as u32));
            }
            LiteralKind::Bool => {
                if lit.text == "true" {
                    code.push("push constant 1".to_string());
                    code.push("neg".to_string());
                } else {
                    code.push("push constant 0".to_string());
                }
            }
            LiteralKind::Null => {
                code.push("push constant 0".to_string());
            }
            LiteralKind::String => {
                code.push(format!("push constant {}", lit.text.chars().count()));
                code.push("call String.new 1".to_string());
                for ch in lit.text.chars() {
                    code.push(format!("push constant {}", ch as u32));
                    code.push("call String.appendChar 2".to_string());
                }
            }
        }
        Ok(())
    }

    fn lower_binary(
        &mut self,
        op: BinaryOp,
        lhs: &Expression,
        rhs: &Expression,
        code: &mut Vec<String>,
    ) -> Result<(), HlError> {
        self.lower_expression(lhs, code)?;
        self.lower_expression(rhs, code)?;
        match op {
            BinaryOp::Add => code.push("add".to_string()),
            BinaryOp::Sub => code.push("sub".to_string()),
            BinaryOp::Mul => code.push("call Math.multiply 2".to_string()),
            BinaryOp::Div => code.push("call Math.divide 2".to_string()),
            BinaryOp::And => code.push("and".to_string()),
            BinaryOp::Or => code.push("or".to_string()),
            BinaryOp::Eq => code.push("eq".to_string()),
            BinaryOp::Lt => code.push("lt".to_string()),
            BinaryOp::Gt => code.push("gt".to_string()),
        }
        Ok(())
    }

    fn lower_call(&mut self, target: &CallTarget, args: &[Expression], code: &mut Vec<String>) -> Result<(), HlError> {
        let (class_name, sub_name, receiver) = match target {
            CallTarget::Unqualified(name) => (self.class_name.to_string(), name.clone(), None),
            CallTarget::Qualified { target, name } => {
                if let Some(binding) = self.scope.resolve_variable(target) {
                    let class = binding
                        .variable
                        .data_type
                        .subtype
                        .clone()
                        .ok_or_else(|| self.err(format!("'{}' is not an object variable", target)))?;
                    (class, name.clone(), Some(target.clone()))
                } else {
                    (target.clone(), name.clone(), None)
                }
            }
        };

        let signature = self
            .signatures
            .get(&class_name)
            .and_then(|subs| subs.get(&sub_name))
            .ok_or_else(|| self.err(format!("subroutine '{}.{}' does not exist", class_name, sub_name)))?
            .clone();

        let mut arg_count = args.len();
        match receiver {
            Some(ref name) => {
                code.push(self.push_variable(name)?);
                arg_count += 1;
            }
            None if signature.kind == SubroutineKind::Method => {
                // Unqualified call to a method on the current object.
                code.push("push pointer 0".to_string());
                arg_count += 1;
            }
            None => {}
        }

        for arg in args {
            self.lower_expression(arg, code)?;
        }

        code.push(format!("call {}.{} {}", class_name, sub_name, arg_count));
        Ok(())
    }

    fn push_variable(&self, name: &str) -> Result<String, HlError> {
        if name == "this" {
            return Ok("push pointer 0".to_string());
        }
        let binding = self
            .scope
            .resolve_variable(name)
            .ok_or_else(|| self.err(format!("variable '{}' does not exist", name)))?;
        Ok(format!("push {} {}", segment_for(binding.variable.storage), binding.offset))
    }

    fn pop_variable(&self, name: &str) -> Result<String, HlError> {
        let binding = self
            .scope
            .resolve_variable(name)
            .ok_or_else(|| self.err(format!("variable '{}' does not exist", name)))?;
        Ok(format!("pop {} {}", segment_for(binding.variable.storage), binding.offset))
    }
}

fn segment_for(storage: StorageClass) -> &'static str {
    match storage {
        StorageClass::Local => "local",
        StorageClass::Parameter => "argument",
        StorageClass::Field => "this",
        StorageClass::Static => "static",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_class;
    use crate::typecheck::build_signature_table;

    fn program_of(sources: &[&str]) -> Program {
        let mut program = Program::new();
        for src in sources {
            let class = parse_class(src).unwrap();
            program.insert(class.name.clone(), class);
        }
        program
    }

    #[test]
    fn lowers_field_assignment_from_parameter() {
        let program = program_of(&[
            "class Point { field int x; method void setX(int v) { let x = v; return; } }",
        ]);
        let sigs = build_signature_table(&program, None);
        let lowered = lower_program(&program, &sigs).unwrap();
        let code = &lowered["Point"];
        assert!(code.contains(&"push argument 1".to_string()));
        assert!(code.contains(&"pop this 0".to_string()));
    }

    #[test]
    fn method_call_through_variable_pushes_receiver_first() {
        let program = program_of(&[
            "class Point { field int x; method void draw() { return; } }",
            "class Main { function void run() { var Point p; do p.draw(); return; } }",
        ]);
        let sigs = build_signature_table(&program, None);
        let lowered = lower_program(&program, &sigs).unwrap();
        let code = &lowered["Main"];
        let push_idx = code.iter().position(|l| l == "push local 0").unwrap();
        let call_idx = code.iter().position(|l| l == "call Point.draw 1").unwrap();
        assert!(push_idx < call_idx);
    }

    #[test]
    fn string_literal_lowers_to_new_and_appendchar_calls() {
        let program = program_of(&[
            "class Main { function void run() { do Output.printString(\"Hi\"); return; } }",
        ]);
        let sigs = build_signature_table(&program, None);
        let lowered = lower_program(&program, &sigs).unwrap();
        let code = &lowered["Main"];
        assert_eq!(code[1], "push constant 2");
        assert_eq!(code[2], "call String.new 1");
        assert_eq!(code[3], "push constant 72");
        assert_eq!(code[4], "call String.appendChar 2");
        assert_eq!(code[5], "push constant 105");
        assert_eq!(code[6], "call String.appendChar 2");
    }

    #[test]
    fn constructor_allocates_field_count_and_returns_this() {
        let program = program_of(&[
            "class Point { field int x, y; constructor Point new() { return this; } }",
        ]);
        let sigs = build_signature_table(&program, None);
        let lowered = lower_program(&program, &sigs).unwrap();
        let code = &lowered["Point"];
        assert_eq!(code[1], "push constant 2");
        assert_eq!(code[2], "call Memory.alloc 1");
        assert_eq!(code[3], "pop pointer 0");
        assert!(code.contains(&"push pointer 0".to_string()));
        assert_eq!(code.last().unwrap(), "return");
    }

    #[test]
    fn while_loop_emits_distinct_labels_from_if() {
        let program = program_of(&[
            "class Main { function void run() { while (true) { if (true) { } } return; } }",
        ]);
        let sigs = build_signature_table(&program, None);
        let lowered = lower_program(&program, &sigs).unwrap();
        let code = &lowered["Main"];
        let labels: Vec<&String> = code.iter().filter(|l| l.starts_with("label")).collect();
        assert_eq!(labels.len(), 4);
    }
}
