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

/// The main kind half of a data type. `Wildcard` has no surface syntax; it
/// is produced internally for `null` literals and unresolved array-element
/// access and matches any other kind during type checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainKind {
    Int,
    Char,
    Bool,
    Void,
    Array,
    Object,
    Wildcard,
}

/// A tagged data type: a main kind plus an optional subtype, meaningful
/// only when the main kind is `Object` (the class name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataType {
    pub main: MainKind,
    pub subtype: Option<String>,
}

impl DataType {
    pub fn simple(main: MainKind) -> Self {
        DataType { main, subtype: None }
    }

    pub fn object(class_name: impl Into<String>) -> Self {
        DataType {
            main: MainKind::Object,
            subtype: Some(class_name.into()),
        }
    }

    pub fn wildcard() -> Self {
        DataType::simple(MainKind::Wildcard)
    }

    /// Two types match if their main kinds agree (object subtypes must
    /// also agree); a wildcard on either side matches unconditionally.
    pub fn matches(&self, other: &DataType) -> bool {
        if self.main == MainKind::Wildcard || other.main == MainKind::Wildcard {
            return true;
        }
        if self.main != other.main {
            return false;
        }
        if self.main == MainKind::Object {
            return self.subtype == other.subtype;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    Local,
    Parameter,
    Field,
    Static,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub storage: StorageClass,
    pub data_type: DataType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubroutineKind {
    Function,
    Method,
    Constructor,
}

#[derive(Debug, Clone)]
pub struct Subroutine {
    pub name: String,
    pub kind: SubroutineKind,
    pub return_type: DataType,
    pub parameters: Vec<Variable>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone)]
pub struct Class {
    pub name: String,
    pub fields: IndexMap<String, Variable>,
    pub statics: IndexMap<String, Variable>,
    pub subroutines: IndexMap<String, Subroutine>,
}

/// A full HL program: every class reachable from this compilation,
/// keyed by name, in source order.
pub type Program = IndexMap<String, Class>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Minus,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Eq,
    Lt,
    Gt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    Char,
    Bool,
    Null,
    String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub text: String,
}

/// A call target: either an unqualified name resolved against the current
/// class (and, failing that, a bare function call), or a qualified
/// `Target.name` call where `Target` is either a variable or a class name.
#[derive(Debug, Clone, PartialEq)]
pub enum CallTarget {
    Unqualified(String),
    Qualified { target: String, name: String },
}

#[derive(Debug, Clone)]
pub enum Expression {
    VarRef(String),
    Literal(Literal),
    Index {
        array: Box<Expression>,
        index: Box<Expression>,
    },
    Cast {
        data_type: DataType,
        expr: Box<Expression>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expression>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Call {
        target: CallTarget,
        args: Vec<Expression>,
    },
}

#[derive(Debug, Clone)]
pub enum LValue {
    Var(String),
    Index { array: String, index: Expression },
}

#[derive(Debug, Clone)]
pub enum Statement {
    Var(Variable),
    Let {
        lhs: LValue,
        rhs: Expression,
    },
    Do(Expression),
    If {
        condition: Expression,
        then_block: Vec<Statement>,
        else_block: Option<Vec<Statement>>,
    },
    While {
        condition: Expression,
        body: Vec<Statement>,
    },
    Return(Option<Expression>),
}
