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
use pest::iterators::Pair;

use super::Rule;
use crate::ast::{
    BinaryOp, CallTarget, Class, DataType, Expression, LValue, Literal, LiteralKind, MainKind,
    Statement, StorageClass, Subroutine, SubroutineKind, UnaryOp, Variable,
};

pub fn build_class(pair: Pair<Rule>) -> Class {
    let mut inner = pair.into_inner();
    let name = inner.next().unwrap().as_str().to_string();

    let mut fields = IndexMap::new();
    let mut statics = IndexMap::new();
    let mut subroutines = IndexMap::new();

    for item in inner {
        match item.as_rule() {
            Rule::class_var_dec => {
                for var in build_class_var_dec(item) {
                    match var.storage {
                        StorageClass::Field => {
                            fields.insert(var.name.clone(), var);
                        }
                        StorageClass::Static => {
                            statics.insert(var.name.clone(), var);
                        }
                        _ => unreachable!(),
                    }
                }
            }
            Rule::subroutine_dec => {
                let sub = build_subroutine(item);
                subroutines.insert(sub.name.clone(), sub);
            }
            other => unreachable!("unexpected class member: {:?}", other),
        }
    }

    Class {
        name,
        fields,
        statics,
        subroutines,
    }
}

fn build_class_var_dec(pair: Pair<Rule>) -> Vec<Variable> {
    let mut inner = pair.into_inner();
    let storage = match inner.next().unwrap().as_str() {
        "static" => StorageClass::Static,
        "field" => StorageClass::Field,
        other => unreachable!("unexpected storage keyword: {}", other),
    };
    let data_type = build_data_type(inner.next().unwrap());

    inner
        .map(|id| Variable {
            name: id.as_str().to_string(),
            storage,
            data_type: data_type.clone(),
        })
        .collect()
}

fn build_data_type(pair: Pair<Rule>) -> DataType {
    match pair.as_str() {
        "int" => DataType::simple(MainKind::Int),
        "char" => DataType::simple(MainKind::Char),
        "bool" => DataType::simple(MainKind::Bool),
        "void" => DataType::simple(MainKind::Void),
        name => DataType::object(name),
    }
}

fn build_subroutine(pair: Pair<Rule>) -> Subroutine {
    let mut inner = pair.into_inner();
    let kind = match inner.next().unwrap().as_str() {
        "function" => SubroutineKind::Function,
        "method" => SubroutineKind::Method,
        "constructor" => SubroutineKind::Constructor,
        other => unreachable!("unexpected subroutine kind: {}", other),
    };
    let return_type = build_data_type(inner.next().unwrap());
    let name = inner.next().unwrap().as_str().to_string();

    let mut parameters = Vec::new();
    let mut body = Vec::new();

    for item in inner {
        match item.as_rule() {
            Rule::parameter_list => {
                parameters = item.into_inner().map(build_parameter).collect();
            }
            Rule::subroutine_body => {
                body = build_subroutine_body(item);
            }
            other => unreachable!("unexpected subroutine item: {:?}", other),
        }
    }

    Subroutine {
        name,
        kind,
        return_type,
        parameters,
        body,
    }
}

fn build_parameter(pair: Pair<Rule>) -> Variable {
    let mut inner = pair.into_inner();
    let data_type = build_data_type(inner.next().unwrap());
    let name = inner.next().unwrap().as_str().to_string();
    Variable {
        name,
        storage: StorageClass::Parameter,
        data_type,
    }
}

fn build_subroutine_body(pair: Pair<Rule>) -> Vec<Statement> {
    let mut statements = Vec::new();
    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::var_dec => statements.extend(build_var_dec(item)),
            Rule::statement => statements.push(build_statement(item)),
            other => unreachable!("unexpected body item: {:?}", other),
        }
    }
    statements
}

fn build_var_dec(pair: Pair<Rule>) -> Vec<Statement> {
    let mut inner = pair.into_inner();
    let data_type = build_data_type(inner.next().unwrap());
    inner
        .map(|id| {
            Statement::Var(Variable {
                name: id.as_str().to_string(),
                storage: StorageClass::Local,
                data_type: data_type.clone(),
            })
        })
        .collect()
}

fn build_statement(pair: Pair<Rule>) -> Statement {
    let inner = pair.into_inner().next().unwrap();
    match inner.as_rule() {
        Rule::let_statement => build_let(inner),
        Rule::if_statement => build_if(inner),
        Rule::while_statement => build_while(inner),
        Rule::do_statement => {
            let call = inner.into_inner().next().unwrap();
            Statement::Do(build_call_expression(call))
        }
        Rule::return_statement => {
            let expr = inner.into_inner().next().map(build_expression);
            Statement::Return(expr)
        }
        other => unreachable!("unexpected statement variant: {:?}", other),
    }
}

fn build_let(pair: Pair<Rule>) -> Statement {
    let mut inner = pair.into_inner();
    let name = inner.next().unwrap().as_str().to_string();
    let rest: Vec<Pair<Rule>> = inner.collect();

    let (lhs, rhs) = if rest.len() == 2 {
        (
            LValue::Index {
                array: name,
                index: build_expression(rest[0].clone()),
            },
            build_expression(rest[1].clone()),
        )
    } else {
        (LValue::Var(name), build_expression(rest[0].clone()))
    };

    Statement::Let { lhs, rhs }
}

fn build_if(pair: Pair<Rule>) -> Statement {
    let mut inner = pair.into_inner();
    let condition = build_expression(inner.next().unwrap());
    let then_block = build_block(inner.next().unwrap());
    let else_block = inner.next().map(build_block);

    Statement::If {
        condition,
        then_block,
        else_block,
    }
}

fn build_while(pair: Pair<Rule>) -> Statement {
    let mut inner = pair.into_inner();
    let condition = build_expression(inner.next().unwrap());
    let body = build_block(inner.next().unwrap());
    Statement::While { condition, body }
}

fn build_block(pair: Pair<Rule>) -> Vec<Statement> {
    pair.into_inner().map(build_statement).collect()
}

fn build_expression(pair: Pair<Rule>) -> Expression {
    let mut inner = pair.into_inner();
    let mut expr = build_term(inner.next().unwrap());

    while let Some(op_pair) = inner.next() {
        let op = build_binary_op(op_pair.as_str());
        let rhs = build_term(inner.next().unwrap());
        expr = Expression::Binary {
            op,
            lhs: Box::new(expr),
            rhs: Box::new(rhs),
        };
    }

    expr
}

fn build_binary_op(text: &str) -> BinaryOp {
    match text {
        "+" => BinaryOp::Add,
        "-" => BinaryOp::Sub,
        "*" => BinaryOp::Mul,
        "/" => BinaryOp::Div,
        "&" => BinaryOp::And,
        "|" => BinaryOp::Or,
        "=" => BinaryOp::Eq,
        "<" => BinaryOp::Lt,
        ">" => BinaryOp::Gt,
        other => unreachable!("unexpected binary operator: {}", other),
    }
}

fn build_term(pair: Pair<Rule>) -> Expression {
    let inner = pair.into_inner().next().unwrap();
    match inner.as_rule() {
        Rule::cast_term => build_cast(inner),
        Rule::paren_expression => build_expression(inner.into_inner().next().unwrap()),
        Rule::unary_term => build_unary(inner),
        Rule::call_expression => build_call_expression(inner),
        Rule::array_index => build_array_index(inner),
        Rule::literal => build_literal(inner),
        Rule::identifier => Expression::VarRef(inner.as_str().to_string()),
        other => unreachable!("unexpected term variant: {:?}", other),
    }
}

fn build_cast(pair: Pair<Rule>) -> Expression {
    let mut inner = pair.into_inner();
    let data_type = build_data_type(inner.next().unwrap());
    let expr = build_term(inner.next().unwrap());
    Expression::Cast {
        data_type,
        expr: Box::new(expr),
    }
}

fn build_unary(pair: Pair<Rule>) -> Expression {
    let mut inner = pair.into_inner();
    let op = match inner.next().unwrap().as_str() {
        "-" => UnaryOp::Minus,
        "~" => UnaryOp::Not,
        other => unreachable!("unexpected unary operator: {}", other),
    };
    let expr = build_term(inner.next().unwrap());
    Expression::Unary {
        op,
        expr: Box::new(expr),
    }
}

fn build_call_expression(pair: Pair<Rule>) -> Expression {
    let parts: Vec<Pair<Rule>> = pair.into_inner().collect();
    let mut idx = 0;
    let first = parts[idx].as_str().to_string();
    idx += 1;

    let target = if parts.len() > idx && parts[idx].as_rule() == Rule::identifier {
        let name = parts[idx].as_str().to_string();
        idx += 1;
        CallTarget::Qualified {
            target: first,
            name,
        }
    } else {
        CallTarget::Unqualified(first)
    };

    let args = if parts.len() > idx && parts[idx].as_rule() == Rule::expression_list {
        parts[idx].clone().into_inner().map(build_expression).collect()
    } else {
        Vec::new()
    };

    Expression::Call { target, args }
}

fn build_array_index(pair: Pair<Rule>) -> Expression {
    let mut inner = pair.into_inner();
    let array = inner.next().unwrap().as_str().to_string();
    let index = build_expression(inner.next().unwrap());
    Expression::Index {
        array: Box::new(Expression::VarRef(array)),
        index: Box::new(index),
    }
}

fn build_literal(pair: Pair<Rule>) -> Expression {
    let inner = pair.into_inner().next().unwrap();
    let (kind, text) = match inner.as_rule() {
        Rule::int_literal => (LiteralKind::Int, inner.as_str().to_string()),
        Rule::string_literal => {
            let raw = inner.as_str();
            (LiteralKind::String, raw[1..raw.len() - 1].to_string())
        }
        Rule::char_literal => {
            let raw = inner.as_str();
            (LiteralKind::Char, raw[1..raw.len() - 1].to_string())
        }
        Rule::true_literal => (LiteralKind::Bool, "true".to_string()),
        Rule::false_literal => (LiteralKind::Bool, "false".to_string()),
        Rule::null_literal => (LiteralKind::Null, "null".to_string()),
        other => unreachable!("unexpected literal variant: {:?}", other),
    };
    Expression::Literal(Literal { kind, text })
}
