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

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::ast::{DataType, MainKind, SubroutineKind};

/// The on-disk shape of a data type in the standard-library ABI file: the
/// bare type-name strings for the four primitive kinds, or an object pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AbiType {
    Primitive(String),
    Object { main: String, subtype: String },
}

impl AbiType {
    pub fn to_data_type(&self) -> DataType {
        match self {
            AbiType::Primitive(name) => match name.as_str() {
                "int" => DataType::simple(MainKind::Int),
                "char" => DataType::simple(MainKind::Char),
                "bool" => DataType::simple(MainKind::Bool),
                "void" => DataType::simple(MainKind::Void),
                "array" => DataType::simple(MainKind::Array),
                other => DataType::object(other),
            },
            AbiType::Object { subtype, .. } => DataType::object(subtype.clone()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbiSignature {
    pub kind: AbiKind,
    pub return_type: AbiType,
    #[serde(default)]
    pub params: Vec<AbiType>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbiKind {
    Function,
    Method,
    Constructor,
}

impl From<AbiKind> for SubroutineKind {
    fn from(kind: AbiKind) -> Self {
        match kind {
            AbiKind::Function => SubroutineKind::Function,
            AbiKind::Method => SubroutineKind::Method,
            AbiKind::Constructor => SubroutineKind::Constructor,
        }
    }
}

/// class name -> subroutine name -> signature, exactly the shape described
/// in the standard-library ABI section: an ordered mapping loaded once at
/// startup and consulted during resolution and type checking. The lowerer
/// never iterates this table directly — it has no bodies to emit.
pub type StdlibAbi = IndexMap<String, IndexMap<String, AbiSignature>>;

pub fn load_abi(source: &str) -> Result<StdlibAbi> {
    serde_json::from_str(source).context("Failed to parse standard-library ABI file")
}
