use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Connection error: {0}")]
    ServerConnection(#[source] mongodb::error::Error),

    #[error("Connection '{0}' not set")]
    ConnectionNotSet(String),

    #[error("Connection attribute '{0}' not set")]
    ConnectionAttributeNotSet(&'static str),

    #[error("Connection '{0}' has authdb set but username and password are not set")]
    ConnectionAuthdbSet(String),

    #[error("Backup '{0}' not found")]
    BackupNotFound(String),

    #[error("Database '{0}' not found in backup '{1}'")]
    DatabaseNotFoundInBackup(String, String),

    #[error("Collection '{0}' not found in database '{1}' in backup '{2}'")]
    CollectionNotFoundInBackup(String, String, String),

    #[error("Number of databases ({expected}) and destination databases ({got}) must match")]
    DestinationDatabasesLength { expected: usize, got: usize },

    #[error("No unused backup name found after {0} attempts")]
    BackupNameSpaceExhausted(usize),

    #[error("Command '{command}' failed: {detail}")]
    Command { command: String, detail: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
