use crate::request::params::ValidationError;
use std::fmt::Display;
use std::str::FromStr;

/// An asset category recognized by the service.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    serde::Deserialize,
    serde::Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    #[default]
    Image,
    Video,
    Raw,
    /// Lets the service detect the type (uploads), or spans several types (archives).
    Auto,
}

impl ResourceType {
    pub const VALUES: &'static [&'static str] = &["image", "video", "raw", "auto"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Raw => "raw",
            Self::Auto => "auto",
        }
    }
}

impl Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            "raw" => Ok(Self::Raw),
            "auto" => Ok(Self::Auto),
            other => Err(ValidationError::InvalidValue {
                field: "resource_type",
                value: other.to_string(),
                allowed: Self::VALUES,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ResourceType;

    #[test]
    fn parse_resource_type() {
        assert_eq!("video".parse::<ResourceType>(), Ok(ResourceType::Video));
        assert_eq!(ResourceType::Raw.to_string(), "raw");

        let error = "document".parse::<ResourceType>().unwrap_err();

        assert_eq!(
            error.to_string(),
            "Invalid value for resource_type: \"document\" (expected one of: image, video, raw, auto)"
        );
    }
}
