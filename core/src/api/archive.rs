//! Archive (zip/tgz bundle) generation.

use crate::request::params::{ParamMap, Params, ValidationError, has_values};
use crate::resource::ResourceType;
use crate::response::ApiResult;
use crate::transformation::{self, Transformation};
use chrono::{DateTime, Utc};

const SELECTORS: &[&str] = &[
    "public_ids",
    "tags",
    "prefixes",
    "fully_qualified_public_ids",
];

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ArchiveMode {
    /// Store the archive as a raw asset and return its details.
    #[default]
    Create,
    /// Generate the archive on the fly and stream it back.
    Download,
}

impl ArchiveMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Download => "download",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ArchiveFormat {
    Zip,
    Tgz,
}

impl ArchiveFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Tgz => "tgz",
        }
    }
}

/// Parameters for `generate_archive`.
///
/// Assets can be selected by public ID, tag, prefix, or fully-qualified public ID
/// (`resource_type/type/public_id`); at least one selector is required. Archives that mix asset
/// types must use `ResourceType::Auto` and select by ID.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArchiveParams {
    pub public_ids: Vec<String>,
    pub tags: Vec<String>,
    pub prefixes: Vec<String>,
    pub fully_qualified_public_ids: Vec<String>,
    pub resource_type: ResourceType,
    pub delivery_type: Option<String>,
    pub mode: ArchiveMode,
    pub target_format: Option<ArchiveFormat>,
    pub target_public_id: Option<String>,
    pub target_tags: Vec<String>,
    pub transformations: Vec<Transformation>,
    pub flatten_folders: bool,
    pub flatten_transformations: bool,
    pub use_original_filename: bool,
    pub skip_transformation_name: bool,
    pub allow_missing: bool,
    pub keep_derived: bool,
    pub async_processing: bool,
    pub notification_url: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ArchiveParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn public_ids<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.public_ids = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn tags<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.tags = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn prefixes<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.prefixes = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn fully_qualified_public_ids<I: IntoIterator<Item = S>, S: Into<String>>(
        mut self,
        values: I,
    ) -> Self {
        self.fully_qualified_public_ids = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn resource_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_type = resource_type;
        self
    }

    /// The delivery type (`upload`, `private`, `authenticated`, ...).
    #[must_use]
    pub fn delivery_type<S: Into<String>>(mut self, delivery_type: S) -> Self {
        self.delivery_type = Some(delivery_type.into());
        self
    }

    #[must_use]
    pub const fn mode(mut self, mode: ArchiveMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub const fn target_format(mut self, target_format: ArchiveFormat) -> Self {
        self.target_format = Some(target_format);
        self
    }

    #[must_use]
    pub fn target_public_id<S: Into<String>>(mut self, target_public_id: S) -> Self {
        self.target_public_id = Some(target_public_id.into());
        self
    }

    /// Tags to assign to the generated archive asset.
    #[must_use]
    pub fn target_tags<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.target_tags = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn transformations(mut self, transformations: Vec<Transformation>) -> Self {
        self.transformations = transformations;
        self
    }

    #[must_use]
    pub const fn flatten_folders(mut self, value: bool) -> Self {
        self.flatten_folders = value;
        self
    }

    #[must_use]
    pub const fn flatten_transformations(mut self, value: bool) -> Self {
        self.flatten_transformations = value;
        self
    }

    #[must_use]
    pub const fn use_original_filename(mut self, value: bool) -> Self {
        self.use_original_filename = value;
        self
    }

    #[must_use]
    pub const fn skip_transformation_name(mut self, value: bool) -> Self {
        self.skip_transformation_name = value;
        self
    }

    #[must_use]
    pub const fn allow_missing(mut self, value: bool) -> Self {
        self.allow_missing = value;
        self
    }

    #[must_use]
    pub const fn keep_derived(mut self, value: bool) -> Self {
        self.keep_derived = value;
        self
    }

    /// Generate the archive in the background (sent as `async`).
    #[must_use]
    pub const fn async_processing(mut self, value: bool) -> Self {
        self.async_processing = value;
        self
    }

    #[must_use]
    pub fn notification_url<S: Into<String>>(mut self, url: S) -> Self {
        self.notification_url = Some(url.into());
        self
    }

    /// Expiry of a download URL.
    #[must_use]
    pub const fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

impl Params for ArchiveParams {
    fn check(&self) -> Result<(), ValidationError> {
        let public_ids = has_values(&self.public_ids);
        let tags = has_values(&self.tags);
        let prefixes = has_values(&self.prefixes);
        let fully_qualified_public_ids = has_values(&self.fully_qualified_public_ids);

        if !(public_ids || tags || prefixes || fully_qualified_public_ids) {
            return Err(ValidationError::MissingSelector(SELECTORS));
        }

        let auto = self.resource_type == ResourceType::Auto;

        if (fully_qualified_public_ids && !auto) || (auto && (tags || prefixes)) {
            return Err(ValidationError::MultipleResourceTypes);
        }

        Ok(())
    }

    fn to_params(&self) -> ParamMap {
        let mut params = ParamMap::new();

        params.insert_list("public_ids", &self.public_ids);
        params.insert_list("tags", &self.tags);
        params.insert_list("prefixes", &self.prefixes);
        params.insert_list("fully_qualified_public_ids", &self.fully_qualified_public_ids);

        if self.resource_type != ResourceType::Image {
            params.insert("resource_type", self.resource_type.as_str());
        }
        if self.mode != ArchiveMode::Create {
            params.insert("mode", self.mode.as_str());
        }

        params.insert_opt("type", self.delivery_type.as_deref());
        params.insert_opt("target_format", self.target_format.map(ArchiveFormat::as_str));
        params.insert_opt("target_public_id", self.target_public_id.as_deref());
        params.insert_list("target_tags", &self.target_tags);
        params.insert_opt("transformations", transformation::join(&self.transformations));

        params.insert_flag("flatten_folders", self.flatten_folders);
        params.insert_flag("flatten_transformations", self.flatten_transformations);
        params.insert_flag("use_original_filename", self.use_original_filename);
        params.insert_flag("skip_transformation_name", self.skip_transformation_name);
        params.insert_flag("allow_missing", self.allow_missing);
        params.insert_flag("keep_derived", self.keep_derived);
        params.insert_flag("async", self.async_processing);

        params.insert_opt("notification_url", self.notification_url.as_deref());
        params.insert_opt(
            "expires_at",
            self.expires_at.map(|expires_at| expires_at.timestamp()),
        );

        params
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct ArchiveResult {
    pub url: Option<String>,
    pub secure_url: Option<String>,
    pub public_id: Option<String>,
    pub asset_id: Option<String>,
    pub version: Option<u64>,
    pub file_count: u32,
    pub resource_count: u32,
    pub bytes: u64,
    pub resource_type: Option<String>,
    #[serde(rename = "type")]
    pub delivery_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

impl ApiResult for ArchiveResult {}
