//! Wire types for the notebook backend REST API.

use serde::{Deserialize, Deserializer, Serialize};

/// A notebook as exchanged with the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub id: i64,
    pub title: String,
    /// Display date, e.g. `"Aug 29, 2026"`. Formatted client-side at creation.
    pub date: String,
    #[serde(default)]
    pub sources: Vec<SourceFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One uploaded source file attached to a notebook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    pub name: String,
    /// Server-side URL path for the stored file.
    #[serde(default)]
    pub path: Option<String>,
    /// Byte count. The backend stores this stringified, so both a JSON
    /// number and a numeric string are accepted.
    #[serde(default, deserialize_with = "size_from_number_or_string")]
    pub size: u64,
    #[serde(default, rename = "type")]
    pub content_type: Option<String>,
}

fn size_from_number_or_string<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(u64),
        Text(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Number(n) => Ok(n),
        Repr::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Body of a source rename request.
#[derive(Debug, Clone, Serialize)]
pub struct RenameRequest<'a> {
    #[serde(rename = "newName")]
    pub new_name: &'a str,
}

/// Structured error body some endpoints return on failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
