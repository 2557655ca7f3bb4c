use thiserror::Error;

/// Errors surfaced by the dose statistics and slice geometry routines.
///
/// Argument errors mean the call was malformed (wrong shape, invalid
/// parameter), range errors mean a well-typed scalar was out of its valid
/// domain, the remaining variants mean the input was too degenerate to
/// produce a defined result. No operation mutates state before failing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    // argument errors
    #[error("index arrays must have equal length (got {left} and {right})")]
    LengthMismatch { left: usize, right: usize },
    #[error("pixel data shape ({data_cols}x{data_rows}) does not match frame shape ({cols}x{rows})")]
    GridShapeMismatch {
        cols: u32,
        rows: u32,
        data_cols: u32,
        data_rows: u32,
    },
    #[error("spacing must be strictly positive (got {0})")]
    NonPositiveSpacing(f64),
    #[error("dose samples must be finite and non-negative (got {0})")]
    InvalidDoseSample(f64),
    #[error("a positive alpha/beta factor is required (got {0})")]
    NonPositiveAlphaBeta(f64),
    #[error("EUD exponent must be non-zero")]
    ZeroEudExponent,
    #[error("frame attribute '{0}' must be set before transforming")]
    MissingGeometry(&'static str),
    #[error("no pixel data is attached to this frame")]
    NoPixelData,
    #[error("pixel index ({col}, {row}) is outside the {cols}x{rows} grid")]
    PixelIndexOutOfBounds {
        col: i32,
        row: i32,
        cols: u32,
        rows: u32,
    },
    #[error("flat pixel index {index} is outside the grid of {len} pixels")]
    FlatIndexOutOfBounds { index: usize, len: usize },
    #[error("pixel buffer length mismatch: expected {expected}, got {actual}")]
    BufferLengthMismatch { expected: usize, actual: usize },
    #[error("unknown resize alignment '{0}'")]
    UnknownAlignment(String),

    // range errors
    #[error("percentage must be in the range [0, 100] (got {0})")]
    PercentOutOfRange(f64),
    #[error("dose must be non-negative (got {0})")]
    NegativeDose(f64),

    // degenerate inputs
    #[error("statistics are undefined for an empty distribution")]
    EmptyDistribution,
    #[error("at least {needed} samples are required (got {got})")]
    TooFewSamples { needed: usize, got: usize },
    #[error("direction cosines are degenerate, the index transform is not invertible")]
    SingularOrientation,
    #[error("EUD with exponent {exponent} requires strictly positive doses")]
    NonPositiveDoseInEud { exponent: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
