use std::path::PathBuf;

/// Failures while deriving the elemental composition of a peptide.
///
/// These are fatal only to the single (peptide, charge) pair being processed,
/// the caller is expected to skip the item and carry on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    /// Every peptide formula has carbon, zero of them means the formula
    /// is malformed.
    NoCarbons,
    Unparseable {
        sequence: String,
        msg: String,
    },
    NotLinear {
        sequence: String,
    },
    AmbiguousFormula {
        sequence: String,
        num_formulas: usize,
    },
}

impl std::fmt::Display for FormulaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormulaError::NoCarbons => write!(f, "No carbons found in formula"),
            FormulaError::Unparseable { sequence, msg } => {
                write!(f, "Error parsing peptide sequence {}: {}", sequence, msg)
            }
            FormulaError::NotLinear { sequence } => {
                write!(f, "Peptide {} is not linear", sequence)
            }
            FormulaError::AmbiguousFormula {
                sequence,
                num_formulas,
            } => write!(
                f,
                "Peptide {} has {} formulas, expected exactly one",
                sequence, num_formulas
            ),
        }
    }
}

/// Per-item failures of a fragment predictor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionError {
    InvalidCharge { sequence: String, charge: u8 },
    Formula(FormulaError),
}

impl std::fmt::Display for PredictionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl From<FormulaError> for PredictionError {
    fn from(x: FormulaError) -> Self {
        Self::Formula(x)
    }
}

#[derive(Debug)]
pub enum LibraryReadingError {
    SpeclibParsingError {
        source: serde_json::Error,
        context: &'static str,
    },
    FileReadingError {
        source: std::io::Error,
        context: &'static str,
        path: PathBuf,
    },
}

impl std::fmt::Display for LibraryReadingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LibraryReadingError::SpeclibParsingError { source, context } => {
                write!(f, "{}: {}", context, source)
            }
            LibraryReadingError::FileReadingError {
                source,
                context,
                path,
            } => write!(f, "{} ({}): {}", context, path.display(), source),
        }
    }
}

#[derive(Debug)]
pub enum SpeclibBuildError {
    Io {
        source: std::io::Error,
        path: Option<PathBuf>,
    },
    Serialization {
        source: serde_json::Error,
        context: &'static str,
    },
    InvalidParameters {
        msg: String,
    },
    LibraryReadingError(LibraryReadingError),
}

impl std::fmt::Display for SpeclibBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

pub type Result<T> = std::result::Result<T, SpeclibBuildError>;

impl From<std::io::Error> for SpeclibBuildError {
    fn from(x: std::io::Error) -> Self {
        Self::Io {
            source: x,
            path: None,
        }
    }
}

impl From<LibraryReadingError> for SpeclibBuildError {
    fn from(x: LibraryReadingError) -> Self {
        Self::LibraryReadingError(x)
    }
}
