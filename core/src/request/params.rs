use std::borrow::Cow;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("At least one of the following parameters is required: {}", .0.join(", "))]
    MissingSelector(&'static [&'static str]),
    #[error("Only one of the following parameters may be specified: {first}, {second}")]
    ConflictingSelectors {
        first: &'static str,
        second: &'static str,
    },
    #[error(
        "To create an archive with multiple types of assets, set resource_type to \"auto\" and select assets by public_ids or fully_qualified_public_ids"
    )]
    MultipleResourceTypes,
    #[error("Invalid value for {field}: {value:?} (expected one of: {})", .allowed.join(", "))]
    InvalidValue {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },
    #[error("Too many values for {field}: {count} (at most {max})")]
    TooMany {
        field: &'static str,
        count: usize,
        max: usize,
    },
    #[error("Missing required parameter: {0}")]
    Missing(&'static str),
}

/// A single wire value.
///
/// Lists are sent as repeated `key[]` form fields, but are comma-joined when rendered for
/// signing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParamValue {
    Text(String),
    List(Vec<String>),
}

impl ParamValue {
    #[must_use]
    pub fn joined(&self) -> Cow<'_, str> {
        match self {
            Self::Text(value) => Cow::Borrowed(value),
            Self::List(values) => Cow::Owned(values.join(",")),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(value) => value.is_empty(),
            Self::List(values) => values.is_empty(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Text(if value { "true" } else { "false" }.to_string())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

/// Request parameters keyed by their wire names, in key order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParamMap(BTreeMap<&'static str, ParamValue>);

impl ParamMap {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert<V: Into<ParamValue>>(&mut self, key: &'static str, value: V) {
        self.0.insert(key, value.into());
    }

    pub fn insert_opt<V: Into<ParamValue>>(&mut self, key: &'static str, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Inserts the non-empty values of the list, if there are any.
    pub fn insert_list(&mut self, key: &'static str, values: &[String]) {
        if has_values(values) {
            self.insert(
                key,
                values
                    .iter()
                    .filter(|value| !value.is_empty())
                    .cloned()
                    .collect::<Vec<_>>(),
            );
        }
    }

    /// Inserts `"true"` when the flag is set and nothing otherwise.
    pub fn insert_flag(&mut self, key: &'static str, flag: bool) {
        if flag {
            self.insert(key, true);
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParamValue)> {
        self.0.iter().map(|(key, value)| (*key, value))
    }

    /// Flattens the map into form fields, expanding lists into repeated `key[]` entries.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::with_capacity(self.0.len());

        for (key, value) in &self.0 {
            match value {
                ParamValue::Text(value) => fields.push(((*key).to_string(), value.clone())),
                ParamValue::List(values) => {
                    for value in values {
                        fields.push((format!("{key}[]"), value.clone()));
                    }
                }
            }
        }

        fields
    }
}

/// Empty strings do not count as values.
pub(crate) fn has_values(values: &[String]) -> bool {
    values.iter().any(|value| !value.is_empty())
}

pub(crate) fn has_value(value: Option<&str>) -> bool {
    value.is_some_and(|value| !value.is_empty())
}

/// A typed parameter object for a single API call.
pub trait Params {
    /// Validates the combination of fields before any request is built.
    fn check(&self) -> Result<(), ValidationError>;

    /// Maps the fields to wire parameters, omitting unset and default values.
    fn to_params(&self) -> ParamMap;
}
