// ABOUTME: Error types for the carousel-slides application
// ABOUTME: Provides structured error handling for stores, generation and export

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CarouselError {
    #[error("Failed to read or write file: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Input validation error: {0}")]
    Validation(String),

    #[error("Index {index} is out of range for {len} slides")]
    InvalidIndex { index: usize, len: usize },

    #[error("Slide not found: {0}")]
    SlideNotFound(String),

    #[error("A generation is already in progress")]
    Busy,

    #[error("Remote text service error: {0}")]
    Remote(String),

    #[error("Failed to persist '{key}': {message}")]
    Storage { key: String, message: String },

    #[error("Image is too large after resizing ({size} bytes, limit {limit}). Please choose a smaller image.")]
    ImageTooLarge { size: usize, limit: usize },

    #[error("Headless browser error: {message}")]
    BrowserError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("No visible slides to export")]
    NoVisibleSlides,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CarouselError {
    /// Build a storage error for the given key
    pub fn storage(key: &str, message: impl std::fmt::Display) -> Self {
        CarouselError::Storage {
            key: key.to_string(),
            message: message.to_string(),
        }
    }

    /// Build a browser error without an underlying source
    pub fn browser(message: impl Into<String>) -> Self {
        CarouselError::BrowserError {
            message: message.into(),
            source: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CarouselError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = CarouselError::InvalidIndex { index: 7, len: 1 };
        assert_eq!(err.to_string(), "Index 7 is out of range for 1 slides");

        let err = CarouselError::storage("carouselSlides", "disk full");
        assert_eq!(err.to_string(), "Failed to persist 'carouselSlides': disk full");
    }

    #[test]
    fn test_library_errors_convert_into_anyhow() {
        let err = anyhow::Error::from(CarouselError::NoVisibleSlides);
        assert!(matches!(
            err.downcast_ref::<CarouselError>(),
            Some(CarouselError::NoVisibleSlides)
        ));
    }
}
