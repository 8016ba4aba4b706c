use timsseek_speclib::errors::{
    LibraryReadingError,
    SpeclibBuildError,
};

#[derive(Debug)]
pub enum CliError {
    Config {
        source: String,
    },
    ParseError {
        msg: String,
    },
    Io {
        source: String,
        path: Option<String>,
    },
    Build {
        source: String,
    },
    DataReading {
        source: String,
    },
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Config { source } => write!(f, "Error interpreting the config: {}", source),
            CliError::ParseError { msg } => write!(f, "Error parsing config: {}", msg),
            CliError::Io { source, path } => {
                if let Some(path) = path {
                    write!(f, "Error reading file {}: {}", path, source)
                } else {
                    write!(f, "Error reading file: {}", source)
                }
            }
            CliError::Build { source } => write!(f, "Error building the library: {}", source),
            CliError::DataReading { source } => write!(f, "Error reading data: {}", source),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io {
            source: e.to_string(),
            path: None,
        }
    }
}

impl From<SpeclibBuildError> for CliError {
    fn from(e: SpeclibBuildError) -> Self {
        match e {
            SpeclibBuildError::Io { source, path } => CliError::Io {
                source: source.to_string(),
                path: path.map(|x| x.display().to_string()),
            },
            SpeclibBuildError::LibraryReadingError(e) => e.into(),
            other => CliError::Build {
                source: format!("{}", other),
            },
        }
    }
}

impl From<LibraryReadingError> for CliError {
    fn from(e: LibraryReadingError) -> Self {
        CliError::DataReading {
            source: e.to_string(),
        }
    }
}
