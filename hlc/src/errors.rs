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

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HlError {
    #[error("Syntax Error in {class}: {source}")]
    PestError {
        class: String,
        #[source]
        source: pest::error::Error<crate::parser::Rule>,
    },

    #[error("Syntax Error in {class}: {reason}")]
    SyntaxError { class: String, reason: String },

    #[error("Resolution Error in {class}: {reason}")]
    ResolutionError { class: String, reason: String },

    #[error("Type Error in {class}: {reason}")]
    TypeError { class: String, reason: String },
}
