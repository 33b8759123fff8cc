//! HTTP estimator client.
//!
//! Posts the image as multipart field `image` to `{base_url}/analyzeImage`
//! and returns the JSON body untouched. No timeout beyond the HTTP client
//! default is applied.

use super::{AnalysisError, ImageUpload, NutritionAnalyzer};
use log::{error, info};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use std::time::Instant;

const ANALYZE_PATH: &str = "/analyzeImage";
const IMAGE_FIELD: &str = "image";

/// Blocking estimator client.
pub struct HttpNutritionAnalyzer {
    base_url: String,
    client: Client,
}

impl HttpNutritionAnalyzer {
    /// # Errors
    /// - `Network` when the HTTP client backend cannot be initialized.
    pub fn new(base_url: impl Into<String>) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .build()
            .map_err(|err| AnalysisError::Network(err.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{ANALYZE_PATH}", self.base_url)
    }
}

impl NutritionAnalyzer for HttpNutritionAnalyzer {
    fn analyze(&self, image: &ImageUpload) -> Result<serde_json::Value, AnalysisError> {
        let started_at = Instant::now();
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)
            .map_err(|err| AnalysisError::Network(err.to_string()))?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let response = self
            .client
            .post(self.endpoint())
            .multipart(form)
            .send()
            .map_err(|err| {
                error!(
                    "event=photo_upload module=analysis status=error duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                AnalysisError::Network(err.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(
                "event=photo_upload module=analysis status=error http_status={} duration_ms={}",
                status.as_u16(),
                started_at.elapsed().as_millis()
            );
            return Err(AnalysisError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|err| AnalysisError::Network(err.to_string()))?;
        info!(
            "event=photo_upload module=analysis status=ok bytes={} duration_ms={}",
            image.bytes.len(),
            started_at.elapsed().as_millis()
        );
        serde_json::from_str(&body).map_err(|err| AnalysisError::InvalidPayload(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::HttpNutritionAnalyzer;
    use crate::analysis::{AnalysisError, ImageUpload, NutritionAnalyzer};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Serves one canned response and hands back the raw request it received.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {status_line}\r\n\
                 content-type: application/json\r\n\
                 content-length: {}\r\n\
                 connection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            request
        });
        (base_url, handle)
    }

    fn read_request(stream: &mut impl Read) -> String {
        let mut raw = Vec::new();
        let mut chunk = [0_u8; 4096];
        loop {
            let read = stream.read(&mut chunk).unwrap();
            if read == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..read]);
            let text = String::from_utf8_lossy(&raw);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if raw.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&raw).into_owned()
    }

    fn upload() -> ImageUpload {
        ImageUpload::new("plate.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0])
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let analyzer = HttpNutritionAnalyzer::new("https://example.test/").unwrap();
        assert_eq!(analyzer.endpoint(), "https://example.test/analyzeImage");
    }

    #[test]
    fn posts_image_field_and_returns_json_body() {
        let (base_url, server) = serve_once("200 OK", r#"{"food_name":"Salad","calories":120}"#);
        let analyzer = HttpNutritionAnalyzer::new(base_url).unwrap();

        let payload = analyzer.analyze(&upload()).unwrap();
        assert_eq!(payload["food_name"], "Salad");
        assert_eq!(payload["calories"], 120);

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /analyzeImage "));
        assert!(request.contains(r#"name="image""#));
        assert!(request.contains(r#"filename="plate.jpg""#));
        assert!(request.contains("image/jpeg"));
    }

    #[test]
    fn non_success_status_is_reported() {
        let (base_url, server) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#);
        let analyzer = HttpNutritionAnalyzer::new(base_url).unwrap();

        assert!(matches!(
            analyzer.analyze(&upload()),
            Err(AnalysisError::Status(500))
        ));
        server.join().unwrap();
    }

    #[test]
    fn non_json_body_is_invalid_payload() {
        let (base_url, server) = serve_once("200 OK", "<html>teapot</html>");
        let analyzer = HttpNutritionAnalyzer::new(base_url).unwrap();

        assert!(matches!(
            analyzer.analyze(&upload()),
            Err(AnalysisError::InvalidPayload(_))
        ));
        server.join().unwrap();
    }

    #[test]
    fn unreachable_host_is_network_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let analyzer = HttpNutritionAnalyzer::new(format!("http://127.0.0.1:{port}")).unwrap();

        assert!(matches!(
            analyzer.analyze(&upload()),
            Err(AnalysisError::Network(_))
        ));
    }
}
