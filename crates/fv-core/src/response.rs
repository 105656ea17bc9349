//! Outbound responses and the warnings collected while building them

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value::FuzzedValue;

/// A requested heuristic that could not be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IllegalHeuristic {
    pub name: String,
    pub reason: String,
}

/// Non-fatal findings reported alongside the values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningsSection {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub illegal_generators: Vec<IllegalHeuristic>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub illegal_operators: Vec<IllegalHeuristic>,
    /// Findings from request validation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub request_warnings: Vec<String>,
}

impl WarningsSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_illegal_generator(&mut self, name: impl Into<String>, reason: impl Into<String>) {
        self.illegal_generators.push(IllegalHeuristic {
            name: name.into(),
            reason: reason.into(),
        });
    }

    pub fn add_illegal_operator(&mut self, name: impl Into<String>, reason: impl Into<String>) {
        self.illegal_operators.push(IllegalHeuristic {
            name: name.into(),
            reason: reason.into(),
        });
    }

    pub fn add_request_warnings<I>(&mut self, warnings: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.request_warnings.extend(warnings);
    }

    pub fn is_empty(&self) -> bool {
        self.illegal_generators.is_empty()
            && self.illegal_operators.is_empty()
            && self.request_warnings.is_empty()
    }
}

/// Response to one request: header, warnings and the produced values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response<T> {
    pub name: String,
    pub id: Uuid,
    pub seed: u64,
    #[serde(default)]
    pub warnings: WarningsSection,
    #[serde(default = "Vec::new")]
    pub values: Vec<FuzzedValue<T>>,
}

impl<T> Response<T> {
    /// Response carrying only the header
    pub fn header(name: impl Into<String>, id: Uuid, seed: u64) -> Self {
        Self {
            name: name.into(),
            id,
            seed,
            warnings: WarningsSection::new(),
            values: Vec::new(),
        }
    }

    /// The produced data without provenance
    pub fn raw_values(&self) -> impl Iterator<Item = &T> {
        self.values.iter().map(FuzzedValue::value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_section() {
        let mut warnings = WarningsSection::new();
        assert!(warnings.is_empty());

        warnings.add_illegal_generator("Nope", "unknown generator");
        warnings.add_request_warnings(vec!["maxValues is 0".to_string()]);

        assert!(!warnings.is_empty());
        assert_eq!(warnings.illegal_generators[0].name, "Nope");
        assert!(warnings.illegal_operators.is_empty());
        assert_eq!(warnings.request_warnings.len(), 1);
    }

    #[test]
    fn test_empty_warnings_are_omitted() {
        let response: Response<i64> = Response::header("ports", Uuid::nil(), 3);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["warnings"], serde_json::json!({}));
        assert_eq!(json["seed"], 3);
    }

    #[test]
    fn test_raw_values() {
        let mut response = Response::header("ports", Uuid::nil(), 0);
        response.values.push(FuzzedValue::new(1i64, "A"));
        response.values.push(FuzzedValue::new(2i64, "B"));
        assert_eq!(response.raw_values().copied().collect::<Vec<_>>(), vec![1, 2]);
    }
}
