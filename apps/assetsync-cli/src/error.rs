//! CLI error types and exit codes

use assetsync_directory::DirectoryError;
use assetsync_import::ImportError;
use thiserror::Error;

/// Exit codes for the import programs
/// - 0: Success (including runs with failed rows)
/// - 1: General error
/// - 3: Network or client configuration error
/// - 4: Input error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("CSV file not found: {0}")]
    InputNotFound(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Network(_) | CliError::Config(_) => 3,
            CliError::Input(_) | CliError::InputNotFound(_) => 4,
            CliError::Io(_) | CliError::Logging(_) => 1,
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::Config(_) => Some("Set API_URL and API_TOKEN in the environment or a .env file."),
            CliError::InputNotFound(_) => Some("Pass the template path with --input."),
            _ => None,
        }
    }
}

impl From<DirectoryError> for CliError {
    fn from(e: DirectoryError) -> Self {
        match e {
            DirectoryError::InvalidConfig(msg) => CliError::Config(msg),
            other => CliError::Network(other.to_string()),
        }
    }
}

impl From<ImportError> for CliError {
    fn from(e: ImportError) -> Self {
        match e {
            ImportError::Io(e) => CliError::Io(e.to_string()),
            ImportError::Csv(e) => CliError::Input(e.to_string()),
            ImportError::MissingHeaders(columns) => {
                CliError::Input(format!("missing required headers: {columns}"))
            }
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}
