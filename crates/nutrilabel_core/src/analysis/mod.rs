//! Photo analysis boundary.
//!
//! # Responsibility
//! - Define the estimator contract the photo flow depends on.
//! - Parse untyped estimator payloads into a typed estimate, once.
//!
//! # Invariants
//! - Nothing in this module touches the entry store.
//! - Failures carry no partial estimate.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod estimate;
pub mod http;

pub use estimate::NutritionEstimate;
pub use http::HttpNutritionAnalyzer;

/// Image handed to an analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    /// MIME type sent with the upload, e.g. `image/jpeg`.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Guesses the content type from the file extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }
}

/// Photo analysis failure.
#[derive(Debug)]
pub enum AnalysisError {
    /// Another analysis is still in flight.
    Busy,
    EmptyImage,
    /// Request could not be sent or the response could not be read.
    Network(String),
    /// Estimator answered with a non-success HTTP status.
    Status(u16),
    /// Estimator answered with something other than a JSON object.
    InvalidPayload(String),
}

impl Display for AnalysisError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Busy => write!(f, "a photo is already being analyzed"),
            Self::EmptyImage => write!(f, "image is empty"),
            Self::Network(details) => write!(f, "network error: {details}"),
            Self::Status(code) => write!(f, "server error: {code}"),
            Self::InvalidPayload(details) => write!(f, "invalid analysis response: {details}"),
        }
    }
}

impl Error for AnalysisError {}

/// Turns an image into an untyped nutrition payload.
pub trait NutritionAnalyzer {
    fn analyze(&self, image: &ImageUpload) -> Result<serde_json::Value, AnalysisError>;
}

impl<T: NutritionAnalyzer + ?Sized> NutritionAnalyzer for &T {
    fn analyze(&self, image: &ImageUpload) -> Result<serde_json::Value, AnalysisError> {
        (**self).analyze(image)
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "heic" => "image/heic",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::ImageUpload;

    #[test]
    fn image_upload_guesses_content_type() {
        assert_eq!(ImageUpload::new("lunch.JPG", vec![1]).content_type, "image/jpeg");
        assert_eq!(ImageUpload::new("plate.png", vec![1]).content_type, "image/png");
        assert_eq!(
            ImageUpload::new("noext", vec![1]).content_type,
            "application/octet-stream"
        );
    }
}
