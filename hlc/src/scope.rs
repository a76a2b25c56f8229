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

use crate::ast::{StorageClass, Variable};

/// A resolved binding: the variable record plus its offset within its
/// storage class, counting shadowed entries.
#[derive(Debug, Clone)]
pub struct Binding {
    pub variable: Variable,
    pub offset: usize,
}

/// Tracks the four variable storage classes across class and subroutine
/// boundaries. `static` is the one class that survives a `push_class_scope`
/// — later classes in the same run still see earlier classes' statics,
/// which is the scope table's documented (not accidental) behavior.
#[derive(Default)]
pub struct ScopeTable {
    locals: Vec<Variable>,
    parameters: Vec<Variable>,
    fields: Vec<Variable>,
    statics: Vec<Variable>,
    current_class: Option<String>,
    current_subroutine: Option<String>,
}

impl ScopeTable {
    pub fn new() -> Self {
        ScopeTable::default()
    }

    pub fn push_class_scope(&mut self, name: &str) {
        self.fields.clear();
        self.current_class = Some(name.to_string());
        self.current_subroutine = None;
    }

    pub fn pop_class_scope(&mut self) {
        self.current_class = None;
    }

    pub fn push_subroutine_scope(&mut self, name: &str) {
        self.locals.clear();
        self.parameters.clear();
        self.current_subroutine = Some(name.to_string());
    }

    pub fn pop_subroutine_scope(&mut self) {
        self.current_subroutine = None;
    }

    pub fn register_variable(&mut self, variable: Variable) -> usize {
        let bucket = self.bucket_mut(variable.storage);
        bucket.push(variable);
        bucket.len() - 1
    }

    fn bucket_mut(&mut self, storage: StorageClass) -> &mut Vec<Variable> {
        match storage {
            StorageClass::Local => &mut self.locals,
            StorageClass::Parameter => &mut self.parameters,
            StorageClass::Field => &mut self.fields,
            StorageClass::Static => &mut self.statics,
        }
    }

    /// Innermost-first lookup: local, parameter, field, static. Returns the
    /// most recently registered binding for `name`.
    pub fn resolve_variable(&self, name: &str) -> Option<Binding> {
        for bucket in [&self.locals, &self.parameters, &self.fields, &self.statics] {
            if let Some((offset, variable)) = bucket
                .iter()
                .enumerate()
                .rev()
                .find(|(_, v)| v.name == name)
            {
                return Some(Binding {
                    variable: variable.clone(),
                    offset,
                });
            }
        }
        None
    }

    pub fn get_scope(&self) -> String {
        match (&self.current_class, &self.current_subroutine) {
            (Some(class), Some(sub)) => format!("{}.{}", class, sub),
            (Some(class), None) => format!("{}.Global", class),
            (None, _) => "Global".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{DataType, MainKind};

    fn var(name: &str, storage: StorageClass) -> Variable {
        Variable {
            name: name.to_string(),
            storage,
            data_type: DataType::simple(MainKind::Int),
        }
    }

    #[test]
    fn resolves_innermost_first() {
        let mut scope = ScopeTable::new();
        scope.push_class_scope("Point");
        scope.register_variable(var("x", StorageClass::Field));
        scope.push_subroutine_scope("f");
        scope.register_variable(var("x", StorageClass::Parameter));

        let binding = scope.resolve_variable("x").unwrap();
        assert_eq!(binding.variable.storage, StorageClass::Parameter);
    }

    #[test]
    fn shadowed_binding_offset_exceeds_shadowed_offset() {
        let mut scope = ScopeTable::new();
        scope.push_subroutine_scope("f");
        scope.register_variable(var("i", StorageClass::Local));
        scope.register_variable(var("i", StorageClass::Local));

        let binding = scope.resolve_variable("i").unwrap();
        assert_eq!(binding.offset, 1);
    }

    #[test]
    fn static_persists_across_class_boundaries() {
        let mut scope = ScopeTable::new();
        scope.push_class_scope("A");
        scope.register_variable(var("count", StorageClass::Static));
        scope.pop_class_scope();

        scope.push_class_scope("B");
        assert!(scope.resolve_variable("count").is_some());
    }

    #[test]
    fn field_scope_is_fresh_per_class() {
        let mut scope = ScopeTable::new();
        scope.push_class_scope("A");
        scope.register_variable(var("x", StorageClass::Field));
        scope.pop_class_scope();

        scope.push_class_scope("B");
        assert!(scope.resolve_variable("x").is_none());
    }

    #[test]
    fn get_scope_reports_qualified_subroutine_name() {
        let mut scope = ScopeTable::new();
        scope.push_class_scope("Point");
        scope.push_subroutine_scope("draw");
        assert_eq!(scope.get_scope(), "Point.draw");
        scope.pop_subroutine_scope();
        assert_eq!(scope.get_scope(), "Point.Global");
    }
}
