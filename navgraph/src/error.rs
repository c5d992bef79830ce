//! Error types for graph construction

use thiserror::Error;

/// Errors raised while interpreting a path-data string
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    /// A token starts with a character that is neither a known command nor a number
    #[error("unknown command character <{character}> in path {{{path}}}")]
    MalformedCommand { character: char, path: String },

    /// A command needs more tokens than are left in the path
    #[error("not enough parameters for command <{command}> in path {{{path}}}")]
    IncompletePath { command: char, path: String },

    /// A coordinate token is not a finite number
    #[error("could not parse coordinate \"{token}\" in path {{{path}}}")]
    NumberFormat { token: String, path: String },
}

/// Errors raised while building a navigable graph
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("path #{index} could not be interpreted: {source}")]
    Path {
        index: usize,
        #[source]
        source: PathError,
    },

    #[error("cell size must be finite and positive, got {0}")]
    InvalidCellSize(f32),

    /// The canvas size is not a finite non-negative number, or it needs more than
    /// [`MAX_CELLS`](crate::grid::MAX_CELLS) cells
    #[error("canvas of {width} x {height} cannot be covered by a grid")]
    InvalidCanvas { width: f32, height: f32 },
}

pub type Result<T> = std::result::Result<T, BuildError>;
