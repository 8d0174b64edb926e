//! HTTP transports.
//!
//! Requests are fully prepared before they reach a transport, so the blocking and async
//! transports only differ in how they perform the round-trip.

use crate::request::{Body, HeaderError, Request};
use crate::response::Response;
use http::header::CONTENT_TYPE;
use std::future::Future;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP client error")]
    Http(#[from] reqwest::Error),
    #[error("Invalid header")]
    Header(#[from] HeaderError),
}

pub trait Transport {
    fn send(&self, request: &Request<'_>) -> Result<Response, Error>;
}

pub trait AsyncTransport {
    fn send_async(
        &self,
        request: &Request<'_>,
    ) -> impl Future<Output = Result<Response, Error>> + Send;
}

impl AsyncTransport for reqwest::Client {
    async fn send_async(&self, request: &Request<'_>) -> Result<Response, Error> {
        let builder = self
            .request(request.method.clone(), request.url.clone())
            .headers(request.header_map()?);

        let builder = match request.body.as_ref() {
            Some(body @ Body::Form(_)) => builder
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(body.encode_form()),
            Some(Body::Multipart { fields, file }) => {
                let form = fields.iter().fold(
                    reqwest::multipart::Form::new(),
                    |form, field| form.text(field.name.to_string(), field.value.to_string()),
                );
                let part = reqwest::multipart::Part::bytes(file.data.to_vec())
                    .file_name(file.file_name.to_string());

                builder.multipart(form.part("file", part))
            }
            None => builder,
        };

        let response = builder.send().await?;
        let status_code = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        Ok(Response {
            status_code,
            headers,
            body,
        })
    }
}

impl Transport for reqwest::blocking::Client {
    fn send(&self, request: &Request<'_>) -> Result<Response, Error> {
        let builder = self
            .request(request.method.clone(), request.url.clone())
            .headers(request.header_map()?);

        let builder = match request.body.as_ref() {
            Some(body @ Body::Form(_)) => builder
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(body.encode_form()),
            Some(Body::Multipart { fields, file }) => {
                let form = fields.iter().fold(
                    reqwest::blocking::multipart::Form::new(),
                    |form, field| form.text(field.name.to_string(), field.value.to_string()),
                );
                let part = reqwest::blocking::multipart::Part::bytes(file.data.to_vec())
                    .file_name(file.file_name.to_string());

                builder.multipart(form.part("file", part))
            }
            None => builder,
        };

        let response = builder.send()?;
        let status_code = response.status();
        let headers = response.headers().clone();
        let body = response.text()?;

        Ok(Response {
            status_code,
            headers,
            body,
        })
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use super::{AsyncTransport, Error, Transport};
    use crate::request::Request;
    use crate::response::Response;
    use bounded_static::ToBoundedStatic;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses and records every request it receives.
    #[derive(Debug, Default)]
    pub struct StubTransport {
        responses: Mutex<VecDeque<Response>>,
        requests: Mutex<Vec<Request<'static>>>,
    }

    impl StubTransport {
        pub fn new<I: IntoIterator<Item = Response>>(responses: I) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().collect()),
                requests: Mutex::new(vec![]),
            }
        }

        pub fn requests(&self) -> Vec<Request<'static>> {
            self.requests
                .lock()
                .map(|requests| requests.clone())
                .unwrap_or_default()
        }

        pub fn invocations(&self) -> usize {
            self.requests().len()
        }

        fn respond(&self, request: &Request<'_>) -> Response {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request.to_static());
            }

            self.responses
                .lock()
                .ok()
                .and_then(|mut responses| responses.pop_front())
                .unwrap_or_else(|| {
                    Response::new(
                        http::StatusCode::NOT_FOUND,
                        r#"{"error":{"message":"No stub response"}}"#,
                    )
                })
        }
    }

    impl Transport for StubTransport {
        fn send(&self, request: &Request<'_>) -> Result<Response, Error> {
            Ok(self.respond(request))
        }
    }

    impl AsyncTransport for StubTransport {
        async fn send_async(&self, request: &Request<'_>) -> Result<Response, Error> {
            Ok(self.respond(request))
        }
    }
}
