use bounded_static::{IntoBoundedStatic, ToBoundedStatic};
use http::{
    Method,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use indexmap::IndexMap;
use std::borrow::Cow;
use url::Url;

pub mod params;

#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    #[error("Invalid header name")]
    Name(#[from] http::header::InvalidHeaderName),
    #[error("Invalid header value")]
    Value(#[from] http::header::InvalidHeaderValue),
}

#[derive(Clone, Debug, Eq, PartialEq, bounded_static_derive_more::ToStatic)]
pub struct Field<'a> {
    pub name: Cow<'a, str>,
    pub value: Cow<'a, str>,
}

impl<'a> Field<'a> {
    pub fn new<N: Into<Cow<'a, str>>, V: Into<Cow<'a, str>>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, bounded_static_derive_more::ToStatic)]
pub struct FilePart<'a> {
    pub file_name: Cow<'a, str>,
    pub data: Cow<'a, [u8]>,
}

#[derive(Clone, Debug, Eq, PartialEq, bounded_static_derive_more::ToStatic)]
pub enum Body<'a> {
    Form(Vec<Field<'a>>),
    /// Form fields plus a single file sent under the `file` field name.
    Multipart {
        fields: Vec<Field<'a>>,
        file: FilePart<'a>,
    },
}

impl Body<'_> {
    #[must_use]
    pub fn fields(&self) -> &[Field<'_>] {
        match self {
            Self::Form(fields) | Self::Multipart { fields, .. } => fields,
        }
    }

    /// Returns the value of the first field with the given name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields()
            .iter()
            .find(|field| field.name == name)
            .map(|field| &*field.value)
    }

    /// URL-encodes the form fields (the file part of a multipart body is not included).
    #[must_use]
    pub fn encode_form(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(
                self.fields()
                    .iter()
                    .map(|field| (&*field.name, &*field.value)),
            )
            .finish()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Request<'a> {
    pub url: Url,
    pub method: Method,
    pub headers: IndexMap<Cow<'a, str>, Cow<'a, str>>,
    pub body: Option<Body<'a>>,
}

impl<'a> Request<'a> {
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            url,
            method,
            headers: IndexMap::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_header<K: Into<Cow<'a, str>>, V: Into<Cow<'a, str>>>(
        mut self,
        name: K,
        value: V,
    ) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Body<'a>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header_map(&self) -> Result<HeaderMap, HeaderError> {
        self.headers
            .iter()
            .map(|(name, value)| {
                Ok((
                    HeaderName::try_from(name.as_ref())?,
                    HeaderValue::try_from(value.as_ref())?,
                ))
            })
            .collect()
    }
}

impl IntoBoundedStatic for Request<'_> {
    type Static = Request<'static>;

    fn into_static(self) -> Self::Static {
        Self::Static {
            url: self.url,
            method: self.method,
            headers: self
                .headers
                .into_iter()
                .map(|(key, value)| (key.into_static(), value.into_static()))
                .collect(),
            body: self
                .body
                .map(bounded_static::IntoBoundedStatic::into_static),
        }
    }
}

impl ToBoundedStatic for Request<'_> {
    type Static = Request<'static>;

    fn to_static(&self) -> Self::Static {
        Self::Static {
            url: self.url.clone(),
            method: self.method.clone(),
            headers: self
                .headers
                .iter()
                .map(|(key, value)| (key.to_static(), value.to_static()))
                .collect(),
            body: self
                .body
                .as_ref()
                .map(bounded_static::ToBoundedStatic::to_static),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Body, Field, Request};
    use bounded_static::ToBoundedStatic;

    #[test]
    fn encode_form_body() {
        let body = Body::Form(vec![
            Field::new("public_ids[]", "folder/a b"),
            Field::new("access_mode", "public"),
        ]);

        assert_eq!(
            body.encode_form(),
            "public_ids%5B%5D=folder%2Fa+b&access_mode=public"
        );
        assert_eq!(body.field("access_mode"), Some("public"));
        assert_eq!(body.field("tag"), None);
    }

    #[test]
    fn header_map_rejects_invalid_names() -> Result<(), Box<dyn std::error::Error>> {
        let request = Request::new(http::Method::GET, "https://example.com/".parse()?)
            .with_header("bad header", "value");

        assert!(request.header_map().is_err());
        Ok(())
    }

    #[test]
    fn to_static_keeps_borrowed_file_data() -> Result<(), Box<dyn std::error::Error>> {
        let data = vec![1u8, 2, 3];
        let request = Request::new(http::Method::POST, "https://example.com/".parse()?)
            .with_body(Body::Multipart {
                fields: vec![Field::new("timestamp", "1")],
                file: super::FilePart {
                    file_name: "a.bin".into(),
                    data: data.as_slice().into(),
                },
            });

        let owned = request.to_static();

        assert_eq!(owned, request);
        Ok(())
    }
}
