use crate::api::access_mode::AccessMode;
use crate::request::params::{ParamMap, Params, ValidationError};
use crate::resource::ResourceType;
use crate::response::ApiResult;
use crate::transformation::{self, Transformation};
use chrono::{DateTime, Utc};
use std::path::Path;

/// The asset to upload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FileSource {
    /// A remote URL (or data URI) that the service fetches itself.
    Remote(String),
    /// File contents sent as a multipart part.
    Bytes { file_name: String, data: Vec<u8> },
}

impl FileSource {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, std::io::Error> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());

        Ok(Self::Bytes { file_name, data })
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Remote(url) => url.is_empty(),
            Self::Bytes { data, .. } => data.is_empty(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UploadParams {
    pub resource_type: ResourceType,
    pub file: FileSource,
    pub public_id: Option<String>,
    pub folder: Option<String>,
    pub tags: Vec<String>,
    pub delivery_type: Option<String>,
    pub use_filename: bool,
    pub unique_filename: Option<bool>,
    pub overwrite: Option<bool>,
    pub eager: Vec<Transformation>,
    pub access_mode: Option<AccessMode>,
    pub invalidate: bool,
}

impl UploadParams {
    /// Parameters for uploading a single file as the given resource type.
    #[must_use]
    pub const fn new(resource_type: ResourceType, file: FileSource) -> Self {
        Self {
            resource_type,
            file,
            public_id: None,
            folder: None,
            tags: vec![],
            delivery_type: None,
            use_filename: false,
            unique_filename: None,
            overwrite: None,
            eager: vec![],
            access_mode: None,
            invalidate: false,
        }
    }

    #[must_use]
    pub fn public_id<S: Into<String>>(mut self, public_id: S) -> Self {
        self.public_id = Some(public_id.into());
        self
    }

    #[must_use]
    pub fn folder<S: Into<String>>(mut self, folder: S) -> Self {
        self.folder = Some(folder.into());
        self
    }

    #[must_use]
    pub fn tags<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.tags = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn delivery_type<S: Into<String>>(mut self, delivery_type: S) -> Self {
        self.delivery_type = Some(delivery_type.into());
        self
    }

    #[must_use]
    pub const fn use_filename(mut self, value: bool) -> Self {
        self.use_filename = value;
        self
    }

    #[must_use]
    pub const fn unique_filename(mut self, value: bool) -> Self {
        self.unique_filename = Some(value);
        self
    }

    #[must_use]
    pub const fn overwrite(mut self, value: bool) -> Self {
        self.overwrite = Some(value);
        self
    }

    #[must_use]
    pub fn eager(mut self, transformations: Vec<Transformation>) -> Self {
        self.eager = transformations;
        self
    }

    #[must_use]
    pub const fn access_mode(mut self, access_mode: AccessMode) -> Self {
        self.access_mode = Some(access_mode);
        self
    }

    #[must_use]
    pub const fn invalidate(mut self, value: bool) -> Self {
        self.invalidate = value;
        self
    }
}

impl Params for UploadParams {
    fn check(&self) -> Result<(), ValidationError> {
        if self.file.is_empty() {
            Err(ValidationError::Missing("file"))
        } else {
            Ok(())
        }
    }

    /// Local file contents are not included; they are attached to the request separately.
    fn to_params(&self) -> ParamMap {
        let mut params = ParamMap::new();

        if let FileSource::Remote(url) = &self.file {
            params.insert("file", url.as_str());
        }

        params.insert_opt("public_id", self.public_id.as_deref());
        params.insert_opt("folder", self.folder.as_deref());
        params.insert_opt("tags", (!self.tags.is_empty()).then(|| self.tags.join(",")));
        params.insert_opt("type", self.delivery_type.as_deref());
        params.insert_flag("use_filename", self.use_filename);
        params.insert_opt("unique_filename", self.unique_filename);
        params.insert_opt("overwrite", self.overwrite);
        params.insert_opt("eager", transformation::join(&self.eager));
        params.insert_opt("access_mode", self.access_mode.map(AccessMode::as_str));
        params.insert_flag("invalidate", self.invalidate);

        params
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct UploadResult {
    pub asset_id: Option<String>,
    pub public_id: String,
    pub version: Option<u64>,
    pub signature: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: Option<String>,
    pub resource_type: Option<ResourceType>,
    #[serde(rename = "type")]
    pub delivery_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub bytes: u64,
    pub etag: Option<String>,
    pub url: Option<String>,
    pub secure_url: Option<String>,
    pub original_filename: Option<String>,
    pub access_mode: Option<AccessMode>,
}

impl UploadResult {
    /// The `resource_type/type/public_id` form used to select assets across resource types.
    #[must_use]
    pub fn fully_qualified_public_id(&self) -> String {
        format!(
            "{}/{}/{}",
            self.resource_type.unwrap_or_default(),
            self.delivery_type.as_deref().unwrap_or("upload"),
            self.public_id
        )
    }
}

impl ApiResult for UploadResult {}

#[cfg(test)]
mod tests {
    use super::{FileSource, UploadParams, UploadResult};
    use crate::api::access_mode::AccessMode;
    use crate::request::params::{ParamValue, Params, ValidationError};
    use crate::resource::ResourceType;
    use crate::transformation::Transformation;

    #[test]
    fn empty_file_is_rejected() {
        let params = UploadParams::new(ResourceType::Raw, FileSource::Remote(String::new()));

        assert_eq!(params.check(), Err(ValidationError::Missing("file")));
    }

    #[test]
    fn remote_file_serialization() {
        let params = UploadParams::new(
            ResourceType::Image,
            FileSource::Remote("https://example.com/cat.png".to_string()),
        )
        .tags(["a", "b"])
        .unique_filename(false)
        .eager(vec![Transformation::new().crop("scale").width(2)])
        .access_mode(AccessMode::Authenticated);

        let map = params.to_params();
        let rendered = map
            .iter()
            .map(|(key, value)| format!("{key}={}", value.joined()))
            .collect::<Vec<_>>();

        assert_eq!(
            rendered,
            vec![
                "access_mode=authenticated",
                "eager=c_scale,w_2",
                "file=https://example.com/cat.png",
                "tags=a,b",
                "unique_filename=false",
            ]
        );
    }

    #[test]
    fn local_file_is_not_a_param() {
        let params = UploadParams::new(
            ResourceType::Video,
            FileSource::Bytes {
                file_name: "clip.mp4".to_string(),
                data: vec![0, 1, 2],
            },
        )
        .use_filename(true);

        let map = params.to_params();

        assert!(!map.contains_key("file"));
        assert_eq!(
            map.get("use_filename"),
            Some(&ParamValue::Text("true".to_string()))
        );
    }

    #[test]
    fn file_source_from_path() -> Result<(), Box<dyn std::error::Error>> {
        let path = std::env::temp_dir().join(format!("upload-{}.txt", std::process::id()));
        std::fs::write(&path, b"hello")?;

        let source = FileSource::from_path(&path);
        std::fs::remove_file(&path)?;

        let expected_name = path.file_name().ok_or("missing file name")?.to_string_lossy();

        assert_eq!(
            source?,
            FileSource::Bytes {
                file_name: expected_name.into_owned(),
                data: b"hello".to_vec(),
            }
        );
        assert!(FileSource::from_path(&path).is_err());
        Ok(())
    }

    #[test]
    fn fully_qualified_public_id() -> Result<(), Box<dyn std::error::Error>> {
        let result: UploadResult = serde_json::from_str(
            r#"{"public_id":"docs/report","resource_type":"raw","type":"private","bytes":3,"width":null}"#,
        )?;

        assert_eq!(result.fully_qualified_public_id(), "raw/private/docs/report");
        Ok(())
    }
}
