use thiserror::Error;




/**
 * Errors for input that comes from outside the program: configuration text,
 * serialized boxes, and explicitly supplied mappings or layouts. Contract
 * violations by the caller (mixing index types, chopping outside a box,
 * asking for zero processes) are not represented here; they are assertions.
 */
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown distribution strategy: {0}")]
    UnknownStrategy(String),

    #[error("unknown space filling curve: {0}")]
    UnknownCurve(String),

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },

    #[error("malformed configuration line {line}: {text:?}")]
    MalformedLine { line: usize, text: String },

    #[error("buffer too short: expected {expected} bytes, got {actual}")]
    ShortBuffer { expected: usize, actual: usize },

    #[error("malformed box: {0}")]
    MalformedBox(String),

    #[error("team size {team_size} does not evenly divide {nprocs} processes")]
    InvalidTeamSize { team_size: usize, nprocs: usize },

    #[error("rank usage has {actual} entries for {nprocs} processes")]
    UsageLength { actual: usize, nprocs: usize },

    #[error("mapping has {mapping} entries but there are {boxes} boxes")]
    LengthMismatch { mapping: usize, boxes: usize },

    #[error("rank {rank} for box {index} is outside [0, {nprocs})")]
    RankOutOfRange { index: usize, rank: i32, nprocs: usize },
}




pub type Result<T> = std::result::Result<T, Error>;
