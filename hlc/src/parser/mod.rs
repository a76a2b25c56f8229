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

mod ast_builder;

use crate::ast::Class;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct HlParser;

/// Parses a single `.jack`-equivalent source file into one class.
pub fn parse_class(source: &str) -> Result<Class, pest::error::Error<Rule>> {
    let mut pairs = HlParser::parse(Rule::class_file, source)?;
    let class_file = pairs.next().unwrap();
    let class_dec = class_file.into_inner().next().unwrap();
    Ok(ast_builder::build_class(class_dec))
}
