//! Typed request parameters.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single request parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(n) => write!(f, "{}", n),
            // `{:?}` keeps the fractional part, so 1.0 is sent as "1.0"
            ParamValue::Float(x) => write!(f, "{:?}", x),
            ParamValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

/// Which side wins when a call parameter and a default share a key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParamPrecedence {
    /// Defaults are applied last and overwrite call parameters.
    #[default]
    DefaultsWin,
    /// Call parameters overwrite defaults.
    ExplicitWins,
}

/// Ordered parameter map sent with a call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge `defaults` into these parameters.
    pub fn merged(mut self, defaults: &Params, precedence: ParamPrecedence) -> Params {
        for (key, value) in &defaults.0 {
            match precedence {
                ParamPrecedence::DefaultsWin => {
                    self.0.insert(key.clone(), value.clone());
                }
                ParamPrecedence::ExplicitWins => {
                    self.0
                        .entry(key.clone())
                        .or_insert_with(|| value.clone());
                }
            }
        }
        self
    }

    /// Stringified key/value pairs for query strings and form bodies.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_win_on_collision() {
        let defaults = Params::new().with("lp", 0);
        let params = Params::new().with("lp", 1).with("text", "x");

        let merged = params.merged(&defaults, ParamPrecedence::DefaultsWin);
        assert_eq!(merged.get("lp"), Some(&ParamValue::Int(0)));
        assert_eq!(merged.get("text"), Some(&ParamValue::from("x")));
    }

    #[test]
    fn test_explicit_wins_on_collision() {
        let defaults = Params::new().with("lp", 0).with("extra", true);
        let params = Params::new().with("lp", 1);

        let merged = params.merged(&defaults, ParamPrecedence::ExplicitWins);
        assert_eq!(merged.get("lp"), Some(&ParamValue::Int(1)));
        assert_eq!(merged.get("extra"), Some(&ParamValue::Bool(true)));
    }

    #[test]
    fn test_pairs_stringify_values() {
        let params = Params::new()
            .with("wn", false)
            .with("min-conf", 0.5)
            .with("n", 50)
            .with("text", "Dexter");

        assert_eq!(
            params.to_pairs(),
            vec![
                ("min-conf".to_string(), "0.5".to_string()),
                ("n".to_string(), "50".to_string()),
                ("text".to_string(), "Dexter".to_string()),
                ("wn".to_string(), "false".to_string()),
            ]
        );
    }

    #[test]
    fn test_floats_keep_fractional_part() {
        let params = Params::new().with("min-conf", 1.0).with("other", 0.25);
        assert_eq!(params.get("min-conf").unwrap().to_string(), "1.0");
        assert_eq!(params.get("other").unwrap().to_string(), "0.25");
    }

    #[test]
    fn test_from_iterator_and_json() {
        let params: Params = [("lp", 0)].into_iter().collect();
        assert_eq!(params.len(), 1);

        let parsed: Params = serde_json::from_str(r#"{"lp": 1, "wn": true}"#).unwrap();
        assert_eq!(parsed.get("lp"), Some(&ParamValue::Int(1)));
        assert_eq!(parsed.get("wn"), Some(&ParamValue::Bool(true)));
    }
}
