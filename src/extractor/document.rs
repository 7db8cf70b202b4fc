//! Report document model (Playwright-style JSON reporter output)
//!
//! Every field is optional. Unknown fields are ignored and explicit `null`
//! lists read as empty.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportDocument {
    #[serde(deserialize_with = "nullable")]
    pub suites: Vec<Suite>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Suite {
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub specs: Vec<Spec>,
    #[serde(deserialize_with = "nullable")]
    pub tests: Vec<TestCase>,
    #[serde(deserialize_with = "nullable")]
    pub suites: Vec<Suite>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Spec {
    pub id: Option<Value>,
    pub title: Option<String>,
    /// Flat reports mark a spec with a single pass/fail flag
    pub ok: Option<bool>,
    pub status: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub tests: Vec<TestCase>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestCase {
    pub id: Option<Value>,
    pub title: Option<String>,
    pub project_name: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub results: Vec<AttemptResult>,
}

/// One attempt at running a test
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AttemptResult {
    pub status: Option<String>,
}

/// Render an `id` value as an identity key. Strings and numbers only.
pub(crate) fn id_key(id: Option<&Value>) -> Option<String> {
    match id? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl Spec {
    /// Name shown in listings: title, else id
    pub fn display_name(&self) -> Option<String> {
        self.title
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| id_key(self.id.as_ref()))
    }
}
