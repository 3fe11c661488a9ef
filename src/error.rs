// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while reading, parsing or gating access to the ledgers.
#[derive(Debug, Error)]
pub enum TallyError {
    /// A date or amount that could not be parsed. `line` is the 1-based line
    /// in the source file (header is line 1).
    #[error("Parse error on line {line}: {message}")]
    Parse { line: u64, message: String },
    #[error("Schema error: {0}")]
    Schema(String),
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Access denied: {0}")]
    Auth(String),
}

impl TallyError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TallyError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TallyError>;
