use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// PDF reading errors
    #[error("Error reading the PDF: {0}")]
    Pdf(#[from] PdfError),
    /// Board API errors
    #[error("Board API error: {0}")]
    Api(#[from] ApiError),
    /// Import precondition and business errors
    #[error("{0}")]
    Business(#[from] BusinessError),
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// PDF reading errors
#[derive(Debug, Error)]
pub enum PdfError {
    /// The file could not be read from disk
    #[error("could not read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// lopdf could not parse the document
    #[error("could not parse {filename}: {source}")]
    ParseFailed {
        filename: String,
        #[source]
        source: lopdf::Error,
    },
    /// Text extraction failed on one page
    #[error("could not extract text from page {page} of {filename}: {source}")]
    TextExtractionFailed {
        filename: String,
        page: u32,
        #[source]
        source: lopdf::Error,
    },
}

/// Board API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network request failed
    #[error("request to {endpoint} failed: {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// The service answered with GraphQL errors
    #[error("{}", .messages.join("; "))]
    ServiceErrors { messages: Vec<String> },
    /// Non-success HTTP status without an error body
    #[error("{endpoint} answered with HTTP {status}")]
    BadStatus { endpoint: String, status: u16 },
    /// Response body was not the expected JSON
    #[error("could not parse the response: {source}")]
    JsonParseFailed {
        #[source]
        source: serde_json::Error,
    },
}

/// Import precondition and business errors
#[derive(Debug, Error)]
pub enum BusinessError {
    /// File name does not carry an episode number
    #[error("Could not get the episode number from the file name: {filename}")]
    MissingEpisode { filename: String },
    /// Board lookup returned no board
    #[error("Board not found. Check the board ID ({board_id}).")]
    BoardNotFound { board_id: String },
    /// create_item returned no id
    #[error("Could not create the item for episode {episode}.")]
    ItemNotCreated { episode: String },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required value missing
    #[error("{name} is not set. Configure {env_var} or pass it on the command line.")]
    Missing {
        name: &'static str,
        env_var: &'static str,
    },
    /// Config file could not be read
    #[error("could not read config file {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// Config file is not valid TOML
    #[error("could not parse config file {path}: {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Api(ApiError::JsonParseFailed { source: err })
    }
}

// ========== Convenience constructors ==========

impl AppError {
    /// Network request failure
    pub fn api_request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        })
    }

    /// GraphQL error list
    pub fn service_errors(messages: Vec<String>) -> Self {
        AppError::Api(ApiError::ServiceErrors { messages })
    }

    pub fn missing_episode(filename: impl Into<String>) -> Self {
        AppError::Business(BusinessError::MissingEpisode {
            filename: filename.into(),
        })
    }

    pub fn board_not_found(board_id: impl Into<String>) -> Self {
        AppError::Business(BusinessError::BoardNotFound {
            board_id: board_id.into(),
        })
    }
}

/// Application result type
pub type AppResult<T> = Result<T, AppError>;
