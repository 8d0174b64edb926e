use crate::request::params::{ParamMap, Params, ValidationError, has_value, has_values};
use crate::resource::ResourceType;
use crate::response::{ApiResult, RateLimit};
use std::fmt::Display;
use std::str::FromStr;

pub const MAX_PUBLIC_IDS: usize = 100;
const SELECTORS: &[&str] = &["public_ids", "tag", "prefix"];
const ADMIN_RESOURCE_TYPES: &[&str] = &["image", "video", "raw"];

#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    #[default]
    Public,
    Authenticated,
}

impl AccessMode {
    pub const VALUES: &'static [&'static str] = &["public", "authenticated"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Authenticated => "authenticated",
        }
    }
}

impl Display for AccessMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "authenticated" => Ok(Self::Authenticated),
            other => Err(ValidationError::InvalidValue {
                field: "access_mode",
                value: other.to_string(),
                allowed: Self::VALUES,
            }),
        }
    }
}

/// Parameters for updating the access mode of existing resources.
///
/// Resources are selected by exactly one of: a list of public IDs, a tag, or a public ID prefix.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpdateResourceAccessModeParams {
    pub public_ids: Vec<String>,
    pub tag: Option<String>,
    pub prefix: Option<String>,
    pub access_mode: AccessMode,
    pub resource_type: ResourceType,
    pub delivery_type: String,
}

impl Default for UpdateResourceAccessModeParams {
    fn default() -> Self {
        Self {
            public_ids: vec![],
            tag: None,
            prefix: None,
            access_mode: AccessMode::default(),
            resource_type: ResourceType::default(),
            delivery_type: "upload".to_string(),
        }
    }
}

impl UpdateResourceAccessModeParams {
    #[must_use]
    pub fn new(access_mode: AccessMode) -> Self {
        Self {
            access_mode,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn public_ids<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.public_ids = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[must_use]
    pub fn prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub const fn access_mode(mut self, access_mode: AccessMode) -> Self {
        self.access_mode = access_mode;
        self
    }

    #[must_use]
    pub const fn resource_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_type = resource_type;
        self
    }

    #[must_use]
    pub fn delivery_type<S: Into<String>>(mut self, delivery_type: S) -> Self {
        self.delivery_type = delivery_type.into();
        self
    }

    fn selectors(&self) -> impl Iterator<Item = &'static str> {
        [
            has_values(&self.public_ids).then_some("public_ids"),
            has_value(self.tag.as_deref()).then_some("tag"),
            has_value(self.prefix.as_deref()).then_some("prefix"),
        ]
        .into_iter()
        .flatten()
    }
}

impl Params for UpdateResourceAccessModeParams {
    fn check(&self) -> Result<(), ValidationError> {
        let mut selectors = self.selectors();

        match (selectors.next(), selectors.next()) {
            (None, _) => return Err(ValidationError::MissingSelector(SELECTORS)),
            (Some(first), Some(second)) => {
                return Err(ValidationError::ConflictingSelectors { first, second });
            }
            (Some(_), None) => {}
        }

        if self.public_ids.len() > MAX_PUBLIC_IDS {
            return Err(ValidationError::TooMany {
                field: "public_ids",
                count: self.public_ids.len(),
                max: MAX_PUBLIC_IDS,
            });
        }

        if self.resource_type == ResourceType::Auto {
            return Err(ValidationError::InvalidValue {
                field: "resource_type",
                value: self.resource_type.to_string(),
                allowed: ADMIN_RESOURCE_TYPES,
            });
        }

        Ok(())
    }

    /// The resource type and delivery type are part of the endpoint path, not the parameters.
    fn to_params(&self) -> ParamMap {
        let mut params = ParamMap::new();

        params.insert_list("public_ids", &self.public_ids);
        params.insert_opt("tag", self.tag.as_deref().filter(|tag| !tag.is_empty()));
        params.insert_opt(
            "prefix",
            self.prefix.as_deref().filter(|prefix| !prefix.is_empty()),
        );
        params.insert("access_mode", self.access_mode.as_str());

        params
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize)]
pub struct AccessModeUpdate {
    pub public_id: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct UpdateResourceAccessModeResult {
    pub updated: Vec<AccessModeUpdate>,
    pub failed: Vec<AccessModeUpdate>,
    #[serde(skip)]
    pub rate_limit: Option<RateLimit>,
}

impl ApiResult for UpdateResourceAccessModeResult {
    fn set_rate_limit(&mut self, rate_limit: Option<RateLimit>) {
        self.rate_limit = rate_limit;
    }
}
