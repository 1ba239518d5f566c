use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Transport error: {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Jolokia error (status {status}): {message}")]
    Jolokia { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP server error: {0}")]
    Server(String),
}

impl ExporterError {
    /// True for failures reaching the endpoint, as opposed to reading its body.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::HttpStatus { .. })
    }
}

impl From<serde_json::Error> for ExporterError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        // A well-formed document of the wrong shape surfaces as a data error.
        match err.classify() {
            Category::Data => Self::ShapeMismatch(err.to_string()),
            Category::Io | Category::Syntax | Category::Eof => Self::Decode(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for ExporterError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExporterError>;
