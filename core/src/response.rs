use chrono::{DateTime, Utc};
use http::{StatusCode, header::HeaderMap};

const RATE_LIMIT_LIMIT: &str = "x-featureratelimit-limit";
const RATE_LIMIT_REMAINING: &str = "x-featureratelimit-remaining";
const RATE_LIMIT_RESET: &str = "x-featureratelimit-reset";

/// A raw response as returned by a transport.
#[derive(Clone, Debug)]
pub struct Response {
    pub status_code: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Response {
    #[must_use]
    pub fn new<B: Into<String>>(status_code: StatusCode, body: B) -> Self {
        Self {
            status_code,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// The hourly admin API quota reported by the service, if all three headers are present.
    #[must_use]
    pub fn rate_limit(&self) -> Option<RateLimit> {
        let header = |name: &str| {
            self.headers
                .get(name)
                .and_then(|value| value.to_str().ok())
        };

        let limit = header(RATE_LIMIT_LIMIT)?.parse().ok()?;
        let remaining = header(RATE_LIMIT_REMAINING)?.parse().ok()?;
        let reset = DateTime::parse_from_rfc2822(header(RATE_LIMIT_RESET)?)
            .ok()?
            .with_timezone(&Utc);

        Some(RateLimit {
            limit,
            remaining,
            reset,
        })
    }

    /// The message from a structured error body (`{"error": {"message": ...}}`).
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        serde_json::from_str::<ErrorBody>(&self.body)
            .ok()
            .map(|body| body.error.message)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: DateTime<Utc>,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    error: ErrorMessage,
}

#[derive(serde::Deserialize)]
struct ErrorMessage {
    message: String,
}

/// A typed result that can be decoded from a successful response.
pub trait ApiResult: serde::de::DeserializeOwned {
    /// Receives the rate limit headers; only admin API results keep them.
    fn set_rate_limit(&mut self, _rate_limit: Option<RateLimit>) {}
}

#[cfg(test)]
mod tests {
    use super::Response;
    use http::{HeaderValue, StatusCode};

    #[test]
    fn parse_rate_limit() -> Result<(), Box<dyn std::error::Error>> {
        let mut response = Response::new(StatusCode::OK, "{}");
        response.headers.insert(
            "x-featureratelimit-limit",
            HeaderValue::from_static("500"),
        );
        response.headers.insert(
            "x-featureratelimit-remaining",
            HeaderValue::from_static("499"),
        );
        response.headers.insert(
            "x-featureratelimit-reset",
            HeaderValue::from_static("Wed, 17 Jul 2024 15:00:00 GMT"),
        );

        let rate_limit = response.rate_limit().ok_or("missing rate limit")?;

        assert_eq!(rate_limit.limit, 500);
        assert_eq!(rate_limit.remaining, 499);
        assert_eq!(rate_limit.reset.timestamp(), 1_721_228_400);
        Ok(())
    }

    #[test]
    fn missing_rate_limit_headers() {
        let response = Response::new(StatusCode::OK, "{}");

        assert_eq!(response.rate_limit(), None);
    }

    #[test]
    fn structured_error_message() {
        let response = Response::new(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"message":"Resource not found - missing"}}"#,
        );
        let unstructured = Response::new(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");

        assert_eq!(
            response.error_message().as_deref(),
            Some("Resource not found - missing")
        );
        assert_eq!(unstructured.error_message(), None);
    }
}
