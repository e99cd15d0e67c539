//! Error types for the editor

use thiserror::Error;

use crate::block::BlockType;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Block error: {0}")]
    Block(#[from] BlockError),

    #[error("Text view error: {0}")]
    View(#[from] ViewError),

    #[error("Save failed: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Rejected block update or construction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BlockError {
    #[error("Unknown block type: {0}")]
    UnknownType(String),

    #[error("Data does not match block type {block_type}: {message}")]
    DataMismatch {
        block_type: BlockType,
        message: String,
    },
}

/// Rejected text view; the live document is never touched
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    #[error("Invalid JSON at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Invalid document structure: {0}")]
    Structure(String),

    #[error("Invalid document: {0}")]
    Invariant(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("{0}")]
    Rejected(String),
}

impl From<std::io::Error> for PersistenceError {
    fn from(e: std::io::Error) -> Self {
        PersistenceError::Io(e.to_string())
    }
}
