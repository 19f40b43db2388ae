use std::time::Duration;

use url::Url;

use super::{Publish, PublishError};
use crate::storage::BucketLayout;

/// Base URL of the Cloud Storage JSON API upload endpoint
pub const GCS_UPLOAD_API: &str = "https://storage.googleapis.com/upload/storage/v1";

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// A [`Publish`] implementation that uploads objects to Google Cloud Storage.
///
/// Objects are written with a single media upload authorised by an OAuth access token, such as
/// the one printed by `gcloud auth print-access-token`. Obtaining the token is left to the caller.
pub struct GcsPublisher {
    agent: ureq::Agent,
    layout: BucketLayout,
    access_token: Option<String>,
    api_base: String,
}

impl GcsPublisher {
    /// Creates a new [`GcsPublisher`] for the bucket of `layout`.
    ///
    /// A missing `access_token` is only reported when publishing.
    pub fn new(layout: BucketLayout, access_token: Option<String>) -> Self {
        let agent = ureq::config::Config::builder()
            .timeout_global(Some(UPLOAD_TIMEOUT))
            .http_status_as_error(false)
            .build()
            .new_agent();

        Self {
            agent,
            layout,
            access_token,
            api_base: GCS_UPLOAD_API.to_string(),
        }
    }

    /// Use a different upload endpoint, e.g. a storage emulator.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// The media upload URL for the object `key`
    fn upload_url(&self, key: &str) -> Result<Url, url::ParseError> {
        Url::parse_with_params(
            &format!(
                "{}/b/{}/o",
                self.api_base.trim_end_matches('/'),
                self.layout.bucket
            ),
            &[("uploadType", "media"), ("name", key)],
        )
    }
}

impl Publish for GcsPublisher {
    fn publish(
        &mut self,
        key: &str,
        body: &str,
        content_type: &str,
    ) -> Result<String, PublishError> {
        let Some(access_token) = self.access_token.as_deref() else {
            return Err(PublishError::Auth(
                "no access token configured, set GCS_ACCESS_TOKEN".to_string(),
            ));
        };

        let url = self.upload_url(key)?;
        log::debug!("Uploading {} bytes to {url}", body.len());

        let mut response = self
            .agent
            .post(url.as_str())
            .header("Authorization", &format!("Bearer {access_token}"))
            .header("Content-Type", content_type)
            .send(body)?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let message = response.body_mut().read_to_string().unwrap_or_default();
            return Err(status_error(status, &self.layout.bucket, message));
        }

        let destination = self.layout.gs_uri(key);
        log::info!("Uploaded {destination}");
        Ok(destination)
    }
}

/// Map an unsuccessful upload status to a [`PublishError`].
fn status_error(status: u16, bucket: &str, message: String) -> PublishError {
    match status {
        401 | 403 => PublishError::Auth(format!("status {status}: {message}")),
        404 => PublishError::NotFound {
            bucket: bucket.to_string(),
        },
        _ => PublishError::Rejected { status, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publish::HTML_CONTENT_TYPE;
    use pretty_assertions::assert_eq;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    const SUMMARY_KEY: &str = "results/runs/cas12a/summary.html";

    struct CapturedRequest {
        head: String,
        body: String,
    }

    /// Answer a single request on a loopback port with `status_line` and return the API base
    /// pointing at it.
    fn serve_once(status_line: &'static str) -> (String, JoinHandle<CapturedRequest>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let api_base = format!(
            "http://{}/upload/storage/v1",
            listener.local_addr().unwrap()
        );

        let server = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);

            let mut head = String::new();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line.is_empty() || line == "\r\n" {
                    break;
                }
                head.push_str(&line);
            }

            let length = head
                .lines()
                .find_map(|line| {
                    line.to_ascii_lowercase()
                        .strip_prefix("content-length:")
                        .map(|value| value.trim().parse::<usize>().unwrap())
                })
                .unwrap_or(0);
            let mut body = vec![0; length];
            reader.read_exact(&mut body).unwrap();

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok"
            );
            reader.get_mut().write_all(response.as_bytes()).unwrap();

            CapturedRequest {
                head,
                body: String::from_utf8(body).unwrap(),
            }
        });

        (api_base, server)
    }

    fn publisher_for(api_base: String) -> GcsPublisher {
        GcsPublisher::new(BucketLayout::default(), Some("tok".to_string()))
            .with_api_base(api_base)
    }

    #[test]
    fn test_should_build_upload_url() {
        let publisher = GcsPublisher::new(BucketLayout::default(), None);
        let url = publisher
            .upload_url("results/runs/cas12a/summary.html")
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://storage.googleapis.com/upload/storage/v1/b/atelasbio/o?uploadType=media&name=results%2Fruns%2Fcas12a%2Fsummary.html"
        );
    }

    #[test]
    fn test_should_use_custom_api_base() {
        let publisher = GcsPublisher::new(BucketLayout::new("localhost", "test"), None)
            .with_api_base("http://localhost:4443/upload/storage/v1/");
        let url = publisher.upload_url("results/summary.html").unwrap();

        assert_eq!(url.host_str(), Some("localhost"));
        assert_eq!(url.path(), "/upload/storage/v1/b/test/o");
    }

    #[test]
    fn test_should_fail_without_access_token() {
        let mut publisher = GcsPublisher::new(BucketLayout::default(), None);

        let result = publisher.publish("results/summary.html", "<html></html>", HTML_CONTENT_TYPE);
        assert!(matches!(result, Err(PublishError::Auth(_))));
    }

    #[test]
    fn test_should_report_unreachable_store_as_network_error() {
        let mut publisher = GcsPublisher::new(BucketLayout::default(), Some("token".to_string()))
            .with_api_base("http://127.0.0.1:9/upload/storage/v1");

        let result = publisher.publish("results/summary.html", "<html></html>", HTML_CONTENT_TYPE);
        assert!(matches!(result, Err(PublishError::Network(_))));
    }

    #[test]
    fn test_should_map_status_codes() {
        assert!(matches!(
            status_error(401, "atelasbio", String::new()),
            PublishError::Auth(_)
        ));
        assert!(matches!(
            status_error(403, "atelasbio", String::new()),
            PublishError::Auth(_)
        ));
        match status_error(404, "atelasbio", String::new()) {
            PublishError::NotFound { bucket } => assert_eq!(bucket, "atelasbio"),
            other => panic!("Expected not found, got {other:?}"),
        }
        assert!(matches!(
            status_error(503, "atelasbio", "unavailable".to_string()),
            PublishError::Rejected { status: 503, .. }
        ));
    }

    #[test]
    fn test_should_upload_page_with_headers() {
        let (api_base, server) = serve_once("200 OK");

        let destination = publisher_for(api_base)
            .publish(SUMMARY_KEY, "<html>page</html>", HTML_CONTENT_TYPE)
            .unwrap();
        assert_eq!(destination, "gs://atelasbio/results/runs/cas12a/summary.html");

        let request = server.join().unwrap();
        assert_eq!(
            request.head.lines().next(),
            Some(
                "POST /upload/storage/v1/b/atelasbio/o?uploadType=media&name=results%2Fruns%2Fcas12a%2Fsummary.html HTTP/1.1"
            )
        );
        let head = request.head.to_ascii_lowercase();
        assert!(head.contains("authorization: bearer tok\r\n"));
        assert!(head.contains("content-type: text/html; charset=utf-8\r\n"));
        assert_eq!(request.body, "<html>page</html>");
    }

    #[test]
    fn test_should_report_missing_bucket() {
        let (api_base, server) = serve_once("404 Not Found");

        let result =
            publisher_for(api_base).publish(SUMMARY_KEY, "<html></html>", HTML_CONTENT_TYPE);
        server.join().unwrap();
        match result {
            Err(PublishError::NotFound { bucket }) => assert_eq!(bucket, "atelasbio"),
            other => panic!("Expected not found, got {other:?}"),
        }
    }

    #[test]
    fn test_should_reject_upload_on_server_error() {
        let (api_base, server) = serve_once("500 Internal Server Error");

        let result =
            publisher_for(api_base).publish(SUMMARY_KEY, "<html></html>", HTML_CONTENT_TYPE);
        server.join().unwrap();
        match result {
            Err(PublishError::Rejected { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "ok");
            }
            other => panic!("Expected rejected upload, got {other:?}"),
        }
    }
}
