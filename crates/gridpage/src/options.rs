//! Query compilation options.

use serde::{Deserialize, Serialize};

/// Policies applied when compiling filters.
///
/// Options are passed explicitly to every call; there is no global state.
/// They deserialize from camelCase keys with per-field defaults, so a host
/// can embed them in its own configuration file:
///
/// ```
/// use gridpage::QueryOptions;
///
/// let options: QueryOptions = serde_json::from_str(r#"{ "caseInsensitive": true }"#).unwrap();
/// assert!(options.case_insensitive);
/// assert!(options.range_inclusive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryOptions {
    /// Lower-case both the field and the argument of text and set filters.
    pub case_insensitive: bool,
    /// Treat `inRange` bounds as inclusive (`from <= f <= to`) rather than
    /// exclusive (`from < f < to`).
    pub range_inclusive: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        QueryOptions {
            case_insensitive: false,
            range_inclusive: true,
        }
    }
}

impl QueryOptions {
    pub fn new() -> Self {
        QueryOptions::default()
    }

    pub fn case_insensitive(mut self, enabled: bool) -> Self {
        self.case_insensitive = enabled;
        self
    }

    pub fn range_inclusive(mut self, enabled: bool) -> Self {
        self.range_inclusive = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = QueryOptions::default();
        assert!(!options.case_insensitive);
        assert!(options.range_inclusive);
        assert_eq!(serde_json::from_str::<QueryOptions>("{}").unwrap(), options);
    }

    #[test]
    fn builder() {
        let options = QueryOptions::new()
            .case_insensitive(true)
            .range_inclusive(false);
        assert!(options.case_insensitive);
        assert!(!options.range_inclusive);
    }
}
