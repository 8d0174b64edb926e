use crate::{
    account::Account,
    api::{
        access_mode::{UpdateResourceAccessModeParams, UpdateResourceAccessModeResult},
        archive::{ArchiveFormat, ArchiveMode, ArchiveParams, ArchiveResult},
        upload::{FileSource, UploadParams, UploadResult},
        usage::{self, UsageResult},
    },
    request::{
        Body, Field, FilePart, Request,
        params::{ParamMap, Params, ValidationError},
    },
    resource::ResourceType,
    response::{ApiResult, Response},
    signature,
    transformation::Transformation,
    transport::{AsyncTransport, Transport},
};
use base64::Engine;
use chrono::{DateTime, NaiveDate, Utc};
use http::{Method, StatusCode};
use std::borrow::Cow;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";
const AUTHORIZATION: &str = "authorization";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Transport error")]
    Transport(#[from] crate::transport::Error),
    #[error("Invalid endpoint URL")]
    Url(#[from] url::ParseError),
    #[error("Invalid API base URL")]
    BaseUrl,
    #[error("Invalid JSON response")]
    Json(#[from] serde_json::Error),
    #[error("API error ({status_code}): {message}")]
    Api {
        status_code: StatusCode,
        message: String,
    },
    #[error("Unexpected status")]
    UnexpectedStatus {
        status_code: StatusCode,
        body: Option<String>,
    },
}

/// A client for a single cloud.
///
/// Every operation validates its parameters once, builds one request, and sends it through the
/// transport. Operations are available in blocking form when `T: Transport` and as `_async`
/// twins when `T: AsyncTransport`; both share request preparation and response decoding.
#[derive(Clone, Debug)]
pub struct Cloudinary<T> {
    account: Account,
    api_base: String,
    transport: T,
}

impl<T> Cloudinary<T> {
    pub fn new(account: Account, transport: T) -> Self {
        Self {
            account,
            api_base: DEFAULT_API_BASE.to_string(),
            transport,
        }
    }

    /// Creates a client for the account in `CLOUDINARY_URL` with a default transport.
    pub fn from_env() -> Result<Self, crate::account::Error>
    where
        T: Default,
    {
        Ok(Self::new(Account::from_env()?, T::default()))
    }

    #[must_use]
    pub fn with_api_base<S: Into<String>>(mut self, api_base: S) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub const fn account(&self) -> &Account {
        &self.account
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// A signed URL that generates and downloads an archive when fetched.
    pub fn download_archive_url(&self, params: &ArchiveParams) -> Result<Url, Error> {
        self.download_archive_url_at(params, Utc::now())
    }

    /// A signed URL for a zip of all assets with the given tag.
    pub fn download_zip_url(
        &self,
        tag: &str,
        transformation: Option<&Transformation>,
        resource_type: ResourceType,
    ) -> Result<Url, Error> {
        let params = ArchiveParams::new()
            .tags([tag])
            .resource_type(resource_type)
            .target_format(ArchiveFormat::Zip)
            .transformations(transformation.into_iter().cloned().collect());

        self.download_archive_url(&params)
    }

    fn download_archive_url_at(
        &self,
        params: &ArchiveParams,
        timestamp: DateTime<Utc>,
    ) -> Result<Url, Error> {
        let params = params.clone().mode(ArchiveMode::Download);
        params.check()?;

        let mut url = self.endpoint(&[params.resource_type.as_str(), "generate_archive"])?;
        let signed = self.sign(params.to_params(), timestamp);

        url.query_pairs_mut().extend_pairs(signed.form_fields());

        Ok(url)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = Url::parse(&self.api_base)?;

        url.path_segments_mut()
            .map_err(|()| Error::BaseUrl)?
            .pop_if_empty()
            .push(&self.account.cloud_name)
            .extend(segments);

        Ok(url)
    }

    /// Adds the timestamp, signature, and API key expected by the upload API.
    fn sign(&self, mut params: ParamMap, timestamp: DateTime<Utc>) -> ParamMap {
        params.insert("timestamp", timestamp.timestamp());

        let signature = signature::sign(
            &params,
            &self.account.api_secret,
            self.account.signature_algorithm,
        );

        params.insert("signature", signature);
        params.insert("api_key", self.account.api_key.as_str());
        params
    }

    fn basic_auth(&self) -> String {
        let credentials = format!("{}:{}", self.account.api_key, self.account.api_secret);

        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(credentials)
        )
    }

    fn archive_request(
        &self,
        params: &ArchiveParams,
        timestamp: DateTime<Utc>,
    ) -> Result<Request<'static>, Error> {
        let params = params.clone().mode(ArchiveMode::Create);
        params.check()?;

        let url = self.endpoint(&[params.resource_type.as_str(), "generate_archive"])?;
        let signed = self.sign(params.to_params(), timestamp);

        Ok(Request::new(Method::POST, url).with_body(Body::Form(form_fields(&signed))))
    }

    fn access_mode_request(
        &self,
        params: &UpdateResourceAccessModeParams,
    ) -> Result<Request<'static>, Error> {
        params.check()?;

        let url = self.endpoint(&[
            "resources",
            params.resource_type.as_str(),
            params.delivery_type.as_str(),
            "update_access_mode",
        ])?;

        Ok(Request::new(Method::POST, url)
            .with_header(AUTHORIZATION, self.basic_auth())
            .with_body(Body::Form(form_fields(&params.to_params()))))
    }

    fn usage_request(&self, date: Option<NaiveDate>) -> Result<Request<'static>, Error> {
        let url = match date {
            Some(date) => self.endpoint(&["usage", usage::date_segment(date).as_str()])?,
            None => self.endpoint(&["usage"])?,
        };

        Ok(Request::new(Method::GET, url).with_header(AUTHORIZATION, self.basic_auth()))
    }

    fn upload_request<'a>(
        &self,
        params: &'a UploadParams,
        timestamp: DateTime<Utc>,
    ) -> Result<Request<'a>, Error> {
        params.check()?;

        let url = self.endpoint(&[params.resource_type.as_str(), "upload"])?;
        let fields = form_fields(&self.sign(params.to_params(), timestamp));

        let body = match &params.file {
            FileSource::Remote(_) => Body::Form(fields),
            FileSource::Bytes { file_name, data } => Body::Multipart {
                fields,
                file: FilePart {
                    file_name: Cow::Borrowed(file_name.as_str()),
                    data: Cow::Borrowed(data.as_slice()),
                },
            },
        };

        Ok(Request::new(Method::POST, url).with_body(body))
    }
}

impl<T: Transport> Cloudinary<T> {
    fn call<R: ApiResult>(&self, request: &Request<'_>) -> Result<R, Error> {
        tracing::debug!(method = %request.method, url = %request.url, "Sending request");

        let response = self.transport.send(request)?;

        decode(response)
    }

    pub fn create_archive(&self, params: &ArchiveParams) -> Result<ArchiveResult, Error> {
        let request = self.archive_request(params, Utc::now())?;

        self.call(&request)
    }

    pub fn create_zip(&self, params: &ArchiveParams) -> Result<ArchiveResult, Error> {
        self.create_archive(&params.clone().target_format(ArchiveFormat::Zip))
    }

    pub fn update_resource_access_mode(
        &self,
        params: &UpdateResourceAccessModeParams,
    ) -> Result<UpdateResourceAccessModeResult, Error> {
        let request = self.access_mode_request(params)?;

        self.call(&request)
    }

    pub fn usage(&self) -> Result<UsageResult, Error> {
        self.call(&self.usage_request(None)?)
    }

    /// The usage report for a specific day.
    pub fn usage_on(&self, date: NaiveDate) -> Result<UsageResult, Error> {
        self.call(&self.usage_request(Some(date))?)
    }

    pub fn upload(&self, params: &UploadParams) -> Result<UploadResult, Error> {
        let request = self.upload_request(params, Utc::now())?;

        self.call(&request)
    }
}

impl<T: AsyncTransport + Sync> Cloudinary<T> {
    async fn call_async<R: ApiResult>(&self, request: &Request<'_>) -> Result<R, Error> {
        tracing::debug!(method = %request.method, url = %request.url, "Sending request");

        let response = self.transport.send_async(request).await?;

        decode(response)
    }

    pub async fn create_archive_async(
        &self,
        params: &ArchiveParams,
    ) -> Result<ArchiveResult, Error> {
        let request = self.archive_request(params, Utc::now())?;

        self.call_async(&request).await
    }

    pub async fn create_zip_async(&self, params: &ArchiveParams) -> Result<ArchiveResult, Error> {
        self.create_archive_async(&params.clone().target_format(ArchiveFormat::Zip))
            .await
    }

    pub async fn update_resource_access_mode_async(
        &self,
        params: &UpdateResourceAccessModeParams,
    ) -> Result<UpdateResourceAccessModeResult, Error> {
        let request = self.access_mode_request(params)?;

        self.call_async(&request).await
    }

    pub async fn usage_async(&self) -> Result<UsageResult, Error> {
        let request = self.usage_request(None)?;

        self.call_async(&request).await
    }

    pub async fn usage_on_async(&self, date: NaiveDate) -> Result<UsageResult, Error> {
        let request = self.usage_request(Some(date))?;

        self.call_async(&request).await
    }

    pub async fn upload_async(&self, params: &UploadParams) -> Result<UploadResult, Error> {
        let request = self.upload_request(params, Utc::now())?;

        self.call_async(&request).await
    }
}

fn form_fields(params: &ParamMap) -> Vec<Field<'static>> {
    params
        .form_fields()
        .into_iter()
        .map(|(name, value)| Field::new(name, value))
        .collect()
}

fn decode<R: ApiResult>(response: Response) -> Result<R, Error> {
    let status_code = response.status_code;

    tracing::debug!(status = %status_code, "Received response");

    if status_code.is_success() {
        let mut result = serde_json::from_str::<R>(&response.body)?;
        result.set_rate_limit(response.rate_limit());

        Ok(result)
    } else if let Some(message) = response.error_message() {
        tracing::warn!(status = %status_code, message = %message, "API error");

        Err(Error::Api {
            status_code,
            message,
        })
    } else {
        tracing::warn!(status = %status_code, "Unexpected status");

        // The body is kept for better error messages, but may be empty.
        let body = Some(response.body).filter(|body| !body.is_empty());

        Err(Error::UnexpectedStatus { status_code, body })
    }
}
