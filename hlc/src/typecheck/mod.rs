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
    BinaryOp, CallTarget, Class, DataType, Expression, LValue, LiteralKind, MainKind, Program,
    Statement, SubroutineKind, UnaryOp,
};
use crate::errors::HlError;
use crate::scope::ScopeTable;
use crate::stdlib::StdlibAbi;

#[derive(Debug, Clone)]
pub struct SubroutineSignature {
    pub kind: SubroutineKind,
    pub return_type: DataType,
    pub params: Vec<DataType>,
}

pub type SignatureTable = IndexMap<String, IndexMap<String, SubroutineSignature>>;

/// Merges user classes and, when present, the standard-library ABI into a
/// single lookup table of class -> subroutine -> signature. The table is
/// used by both the type checker and the lowerer for call resolution; it
/// carries no bodies, so stdlib entries never produce lowered code.
pub fn build_signature_table(program: &Program, stdlib: Option<&StdlibAbi>) -> SignatureTable {
    let mut table = SignatureTable::new();

    for class in program.values() {
        let mut subs = IndexMap::new();
        for sub in class.subroutines.values() {
            subs.insert(
                sub.name.clone(),
                SubroutineSignature {
                    kind: sub.kind,
                    return_type: sub.return_type.clone(),
                    params: sub.parameters.iter().map(|p| p.data_type.clone()).collect(),
                },
            );
        }
        table.insert(class.name.clone(), subs);
    }

    if let Some(abi) = stdlib {
        for (class_name, subs) in abi {
            let entry = table.entry(class_name.clone()).or_default();
            for (sub_name, sig) in subs {
                entry.insert(
                    sub_name.clone(),
                    SubroutineSignature {
                        kind: sig.kind.into(),
                        return_type: sig.return_type.to_data_type(),
                        params: sig.params.iter().map(|p| p.to_data_type()).collect(),
                    },
                );
            }
        }
    }

    table
}

pub fn check_program(program: &Program, signatures: &SignatureTable) -> Result<(), HlError> {
    for class in program.values() {
        check_class(class, signatures)?;
    }
    Ok(())
}

fn check_class(class: &Class, signatures: &SignatureTable) -> Result<(), HlError> {
    let mut scope = ScopeTable::new();
    scope.push_class_scope(&class.name);
    for field in class.fields.values() {
        scope.register_variable(field.clone());
    }
    for s in class.statics.values() {
        scope.register_variable(s.clone());
    }

    for sub in class.subroutines.values() {
        scope.push_subroutine_scope(&sub.name);
        if sub.kind == SubroutineKind::Method {
            scope.register_variable(crate::ast::Variable {
                name: "this".to_string(),
                storage: crate::ast::StorageClass::Parameter,
                data_type: DataType::object(class.name.clone()),
            });
        }
        for p in &sub.parameters {
            scope.register_variable(p.clone());
        }

        let mut checker = Checker {
            signatures,
            scope: &mut scope,
            class_name: &class.name,
        };
        checker.check_block(&sub.body, &sub.return_type)?;
        scope.pop_subroutine_scope();
    }

    scope.pop_class_scope();
    Ok(())
}

struct Checker<'a> {
    signatures: &'a SignatureTable,
    scope: &'a mut ScopeTable,
    class_name: &'a str,
}

impl<'a> Checker<'a> {
    fn err(&self, reason: impl Into<String>) -> HlError {
        HlError::TypeError {
            class: self.class_name.to_string(),
            reason: reason.into(),
        }
    }

    fn check_block(&mut self, body: &[Statement], return_type: &DataType) -> Result<(), HlError> {
        for stmt in body {
            self.check_statement(stmt, return_type)?;
        }
        Ok(())
    }

    fn check_statement(&mut self, stmt: &Statement, return_type: &DataType) -> Result<(), HlError> {
        match stmt {
            Statement::Var(var) => {
                self.scope.register_variable(var.clone());
                Ok(())
            }
            Statement::Let { lhs, rhs } => {
                let rhs_type = self.infer(rhs)?;
                match lhs {
                    LValue::Var(name) => {
                        let lhs_type = self.resolve_var_type(name)?;
                        if !lhs_type.matches(&rhs_type) {
                            return Err(self.err(format!(
                                "let '{}' expected {:?}, got {:?}",
                                name, lhs_type.main, rhs_type.main
                            )));
                        }
                    }
                    LValue::Index { array, index } => {
                        let index_type = self.infer(index)?;
                        if !index_type.matches(&DataType::simple(MainKind::Int)) {
                            return Err(self.err("array index must be int"));
                        }
                        self.resolve_var_type(array)?;
                    }
                }
                Ok(())
            }
            Statement::Do(expr) => {
                self.infer(expr)?;
                Ok(())
            }
            Statement::If {
                condition,
                then_block,
                else_block,
            } => {
                let cond_type = self.infer(condition)?;
                if !cond_type.matches(&DataType::simple(MainKind::Bool)) {
                    return Err(self.err("if condition must be bool"));
                }
                self.check_block(then_block, return_type)?;
                if let Some(block) = else_block {
                    self.check_block(block, return_type)?;
                }
                Ok(())
            }
            Statement::While { condition, body } => {
                let cond_type = self.infer(condition)?;
                if !cond_type.matches(&DataType::simple(MainKind::Bool)) {
                    return Err(self.err("while condition must be bool"));
                }
                self.check_block(body, return_type)
            }
            Statement::Return(expr) => {
                match expr {
                    Some(e) => {
                        if return_type.main == MainKind::Void {
                            return Err(self.err("void subroutine cannot return a value"));
                        }
                        let t = self.infer(e)?;
                        if !return_type.matches(&t) {
                            return Err(self.err(format!(
                                "return type mismatch: expected {:?}, got {:?}",
                                return_type.main, t.main
                            )));
                        }
                    }
                    None => {
                        if return_type.main != MainKind::Void {
                            return Err(self.err("non-void subroutine must return a value"));
                        }
                    }
                }
                Ok(())
            }
        }
    }

    fn resolve_var_type(&self, name: &str) -> Result<DataType, HlError> {
        if name == "this" {
            return Ok(DataType::object(self.class_name.to_string()));
        }
        self.scope
            .resolve_variable(name)
            .map(|b| b.variable.data_type)
            .ok_or_else(|| self.err(format!("variable '{}' does not exist", name)))
    }

    fn infer(&mut self, expr: &Expression) -> Result<DataType, HlError> {
        match expr {
            Expression::VarRef(name) => self.resolve_var_type(name),
            Expression::Literal(lit) => Ok(match lit.kind {
                LiteralKind::Int => DataType::simple(MainKind::Int),
                LiteralKind::Char => DataType::simple(MainKind::Char),
                LiteralKind::Bool => DataType::simple(MainKind::Bool),
                LiteralKind::Null => DataType::wildcard(),
                LiteralKind::String => DataType::object("String"),
            }),
            Expression::Index { array, index } => {
                self.infer(array)?;
                let index_type = self.infer(index)?;
                if !index_type.matches(&DataType::simple(MainKind::Int)) {
                    return Err(self.err("array index must be int"));
                }
                Ok(DataType::wildcard())
            }
            Expression::Cast { data_type, expr } => {
                self.infer(expr)?;
                Ok(data_type.clone())
            }
            Expression::Unary { op, expr } => {
                let t = self.infer(expr)?;
                match op {
                    UnaryOp::Minus => {
                        if !t.matches(&DataType::simple(MainKind::Int)) {
                            return Err(self.err("unary '-' requires an int operand"));
                        }
                        Ok(DataType::simple(MainKind::Int))
                    }
                    UnaryOp::Not => {
                        if !t.matches(&DataType::simple(MainKind::Bool)) {
                            return Err(self.err("unary '~' requires a bool operand"));
                        }
                        Ok(DataType::simple(MainKind::Bool))
                    }
                }
            }
            Expression::Binary { op, lhs, rhs } => {
                let lhs_type = self.infer(lhs)?;
                let rhs_type = self.infer(rhs)?;
                if !lhs_type.matches(&rhs_type) {
                    return Err(self.err(format!(
                        "operands must match: {:?} vs {:?}",
                        lhs_type.main, rhs_type.main
                    )));
                }
                Ok(match op {
                    BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => lhs_type,
                    BinaryOp::And | BinaryOp::Or | BinaryOp::Eq | BinaryOp::Lt | BinaryOp::Gt => {
                        DataType::simple(MainKind::Bool)
                    }
                })
            }
            Expression::Call { target, args } => self.infer_call(target, args),
        }
    }

    fn infer_call(&mut self, target: &CallTarget, args: &[Expression]) -> Result<DataType, HlError> {
        let arg_types: Vec<DataType> = args
            .iter()
            .map(|a| self.infer(a))
            .collect::<Result<_, _>>()?;

        let signature = match target {
            CallTarget::Unqualified(name) => self.lookup_signature(self.class_name, name)?,
            CallTarget::Qualified { target, name } => {
                if let Some(binding) = self.scope.resolve_variable(target) {
                    match &binding.variable.data_type.subtype {
                        Some(class_name) => self.lookup_signature(class_name, name)?,
                        None => {
                            return Err(self.err(format!(
                                "cannot call '{}' on non-object variable '{}'",
                                name, target
                            )))
                        }
                    }
                } else {
                    self.lookup_signature(target, name)?
                }
            }
        };

        if signature.params.len() != arg_types.len() {
            return Err(self.err(format!(
                "argument count mismatch: expected {}, got {}",
                signature.params.len(),
                arg_types.len()
            )));
        }
        for (expected, actual) in signature.params.iter().zip(arg_types.iter()) {
            if !expected.matches(actual) {
                return Err(self.err(format!(
                    "argument type mismatch: expected {:?}, got {:?}",
                    expected.main, actual.main
                )));
            }
        }

        Ok(signature.return_type.clone())
    }

    fn lookup_signature(
        &self,
        class_name: &str,
        sub_name: &str,
    ) -> Result<SubroutineSignature, HlError> {
        self.signatures
            .get(class_name)
            .and_then(|subs| subs.get(sub_name))
            .cloned()
            .ok_or_else(|| {
                self.err(format!(
                    "subroutine '{}.{}' does not exist",
                    class_name, sub_name
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_class;

    fn program_of(sources: &[&str]) -> Program {
        let mut program = Program::new();
        for src in sources {
            let class = parse_class(src).unwrap();
            program.insert(class.name.clone(), class);
        }
        program
    }

    #[test]
    fn accepts_well_typed_program() {
        let program = program_of(&[
            "class Main { function void run() { var int x; let x = 3; return; } }",
        ]);
        let sigs = build_signature_table(&program, None);
        assert!(check_program(&program, &sigs).is_ok());
    }

    #[test]
    fn rejects_mismatched_let_assignment() {
        let program =
            program_of(&["class Main { function void run() { var int x; let x = true; return; } }"]);
        let sigs = build_signature_table(&program, None);
        assert!(check_program(&program, &sigs).is_err());
    }

    #[test]
    fn rejects_non_bool_condition() {
        let program = program_of(&[
            "class Main { function void run() { if (1) { } return; } }",
        ]);
        let sigs = build_signature_table(&program, None);
        assert!(check_program(&program, &sigs).is_err());
    }

    #[test]
    fn rejects_argument_count_mismatch() {
        let program = program_of(&[
            "class Main { function void helper(int a) { return; } function void run() { do helper(); return; } }",
        ]);
        let sigs = build_signature_table(&program, None);
        assert!(check_program(&program, &sigs).is_err());
    }

    #[test]
    fn resolves_method_call_through_object_variable() {
        let program = program_of(&[
            "class Point { field int x; method void draw() { return; } }",
            "class Main { function void run() { var Point p; do p.draw(); return; } }",
        ]);
        let sigs = build_signature_table(&program, None);
        assert!(check_program(&program, &sigs).is_ok());
    }

    #[test]
    fn void_subroutine_forbids_returned_expression() {
        let program = program_of(&["class Main { function void run() { return 1; } }"]);
        let sigs = build_signature_table(&program, None);
        assert!(check_program(&program, &sigs).is_err());
    }
}
