use std::collections::BTreeMap;
use std::fmt::Display;

/// A delivery transformation, rendered in the service's URL syntax (`c_scale,w_200`).
///
/// Each component's parameters are rendered in key order, and chained components are separated
/// by `/`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Transformation {
    previous: Vec<BTreeMap<&'static str, String>>,
    current: BTreeMap<&'static str, String>,
}

impl Transformation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter by its short key.
    #[must_use]
    pub fn param<V: Display>(mut self, key: &'static str, value: V) -> Self {
        self.current.insert(key, value.to_string());
        self
    }

    #[must_use]
    pub fn width<V: Display>(self, value: V) -> Self {
        self.param("w", value)
    }

    #[must_use]
    pub fn height<V: Display>(self, value: V) -> Self {
        self.param("h", value)
    }

    #[must_use]
    pub fn crop<V: Display>(self, value: V) -> Self {
        self.param("c", value)
    }

    #[must_use]
    pub fn gravity<V: Display>(self, value: V) -> Self {
        self.param("g", value)
    }

    #[must_use]
    pub fn quality<V: Display>(self, value: V) -> Self {
        self.param("q", value)
    }

    #[must_use]
    pub fn fetch_format<V: Display>(self, value: V) -> Self {
        self.param("f", value)
    }

    #[must_use]
    pub fn angle<V: Display>(self, value: V) -> Self {
        self.param("a", value)
    }

    #[must_use]
    pub fn effect<V: Display>(self, value: V) -> Self {
        self.param("e", value)
    }

    /// Closes the current component; later parameters apply on top of the result.
    #[must_use]
    pub fn chain(mut self) -> Self {
        if !self.current.is_empty() {
            self.previous.push(std::mem::take(&mut self.current));
        }
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.previous.is_empty() && self.current.is_empty()
    }
}

impl Display for Transformation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let components = self
            .previous
            .iter()
            .chain(std::iter::once(&self.current))
            .filter(|component| !component.is_empty());

        for (index, component) in components.enumerate() {
            if index > 0 {
                f.write_str("/")?;
            }

            for (param_index, (key, value)) in component.iter().enumerate() {
                if param_index > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{key}_{value}")?;
            }
        }

        Ok(())
    }
}

/// Renders a list of transformations as a single `|`-separated parameter value.
pub(crate) fn join(transformations: &[Transformation]) -> Option<String> {
    let rendered = transformations
        .iter()
        .filter(|transformation| !transformation.is_empty())
        .map(ToString::to_string)
        .collect::<Vec<_>>();

    if rendered.is_empty() {
        None
    } else {
        Some(rendered.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::Transformation;

    #[test]
    fn render_sorted_params() {
        let transformation = Transformation::new().width(2.5).crop("scale");

        assert_eq!(transformation.to_string(), "c_scale,w_2.5");
    }

    #[test]
    fn render_chained() {
        let transformation = Transformation::new()
            .width(100)
            .height(50)
            .crop("fill")
            .chain()
            .angle(90)
            .chain()
            .chain();

        assert_eq!(transformation.to_string(), "c_fill,h_50,w_100/a_90");
    }

    #[test]
    fn join_skips_empty() {
        let transformations = vec![
            Transformation::new().width(10),
            Transformation::new(),
            Transformation::new().effect("sepia"),
        ];

        assert_eq!(
            super::join(&transformations).as_deref(),
            Some("w_10|e_sepia")
        );
        assert_eq!(super::join(&[Transformation::new()]), None);
    }
}
