use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// An aid request as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    #[serde(rename = "ID", deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(rename = "FormData", default, deserialize_with = "form_data")]
    pub form_data: Map<String, Value>,
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
    #[serde(rename = "CreatedAt", default, deserialize_with = "lenient_time")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "User", default)]
    pub user: Option<Applicant>,
    #[serde(rename = "StatusHistories", default)]
    pub status_histories: Vec<StatusHistory>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Applicant {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusHistory {
    #[serde(rename = "ID", default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(rename = "Status", default, deserialize_with = "lenient_text")]
    pub status: String,
    #[serde(rename = "Notes", default)]
    pub notes: Option<String>,
    #[serde(rename = "CreatedAt", default, deserialize_with = "lenient_time")]
    pub created_at: Option<DateTime<Utc>>,
}

pub const DOCUMENT_PATH_KEY: &str = "document_path";

impl Submission {
    /// First non-empty form value among `keys`.
    pub fn field(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|key| self.form_data.get(*key))
            .map(value_text)
            .find(|s| !s.trim().is_empty())
    }

    pub fn document_path(&self) -> Option<&str> {
        self.form_data
            .get(DOCUMENT_PATH_KEY)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Stored file name: the last segment of the document path.
    pub fn document_name(&self) -> Option<&str> {
        self.document_path()
            .and_then(|p| p.rsplit('/').next())
            .filter(|s| !s.is_empty())
    }

    pub fn applicant_name(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|u| u.full_name.as_deref())
            .filter(|s| !s.is_empty())
    }

    pub fn applicant_email(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|u| u.email.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Form entries in backend order, without the document path.
    pub fn form_entries(&self) -> Vec<(String, String)> {
        self.form_data
            .iter()
            .filter(|(k, _)| k.as_str() != DOCUMENT_PATH_KEY)
            .map(|(k, v)| (k.clone(), value_text(v)))
            .collect()
    }
}

pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Numbers, strings and null all end up as text; the backend is not consistent about ids.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_text(&value))
}

/// RFC 3339, or a bare `YYYY-MM-DD HH:MM:SS` read as UTC. Anything else is
/// treated as missing so one odd record cannot fail a whole list.
pub(crate) fn lenient_time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::String(raw) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(at.with_timezone(&Utc)));
    }
    Ok(["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc()))
}

/// `FormData` is either an object or the JSON-encoded string the citizen form sent.
fn form_data<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            _ => Ok(Map::new()),
        },
        _ => Ok(Map::new()),
    }
}
