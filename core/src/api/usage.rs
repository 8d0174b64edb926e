use crate::response::{ApiResult, RateLimit};
use chrono::{DateTime, NaiveDate, Utc};

/// Account usage report.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct UsageResult {
    pub plan: Option<String>,
    pub last_updated: Option<NaiveDate>,
    pub date_requested: Option<DateTime<Utc>>,
    pub transformations: Option<Usage>,
    pub objects: Option<Usage>,
    pub bandwidth: Option<Usage>,
    pub storage: Option<Usage>,
    pub impressions: Option<Usage>,
    pub seconds_delivered: Option<Usage>,
    pub credits: Option<Credits>,
    pub requests: Option<u64>,
    pub resources: Option<u64>,
    pub derived_resources: Option<u64>,
    pub media_limits: Option<MediaLimits>,
    #[serde(skip)]
    pub rate_limit: Option<RateLimit>,
}

impl ApiResult for UsageResult {
    fn set_rate_limit(&mut self, rate_limit: Option<RateLimit>) {
        self.rate_limit = rate_limit;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct Usage {
    pub usage: Option<f64>,
    pub limit: Option<f64>,
    pub used_percent: Option<f64>,
    pub credits_usage: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct Credits {
    pub usage: Option<f64>,
    pub limit: Option<f64>,
    pub used_percent: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct MediaLimits {
    pub image_max_size_bytes: Option<u64>,
    pub video_max_size_bytes: Option<u64>,
    pub raw_max_size_bytes: Option<u64>,
    pub image_max_px: Option<u64>,
    pub asset_max_total_px: Option<u64>,
}

/// Path segment for a historical report (`dd-mm-yyyy`).
pub(crate) fn date_segment(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::UsageResult;
    use chrono::NaiveDate;

    const USAGE_EXAMPLE: &str = r#"{
        "plan": "Free",
        "last_updated": "2024-07-16",
        "date_requested": "2024-07-17T00:00:00Z",
        "transformations": {"usage": 103, "credits_usage": 0.1},
        "objects": {"usage": 54},
        "bandwidth": {"usage": 2415342, "credits_usage": 0.0},
        "storage": {"usage": 35093455, "credits_usage": 0.03},
        "credits": {"usage": 0.13, "limit": 25.0, "used_percent": 0.52},
        "requests": 917,
        "resources": 54,
        "derived_resources": 35,
        "media_limits": {"image_max_size_bytes": 10485760, "raw_max_size_bytes": 10485760},
        "url_2x3_usage": 7
    }"#;

    #[test]
    fn deserialize_usage() -> Result<(), Box<dyn std::error::Error>> {
        let usage: UsageResult = serde_json::from_str(USAGE_EXAMPLE)?;

        assert_eq!(usage.plan.as_deref(), Some("Free"));
        assert_eq!(usage.last_updated, NaiveDate::from_ymd_opt(2024, 7, 16));
        assert_eq!(usage.resources, Some(54));
        assert_eq!(
            usage.storage.and_then(|storage| storage.usage),
            Some(35_093_455.0)
        );
        assert_eq!(
            usage.media_limits.and_then(|limits| limits.image_max_size_bytes),
            Some(10_485_760)
        );
        assert_eq!(usage.rate_limit, None);
        Ok(())
    }

    #[test]
    fn date_segment() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

        assert_eq!(super::date_segment(date), "09-03-2024");
    }
}
