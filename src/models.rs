use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A stored record: a loosely-typed JSON object.
pub type Record = Map<String, Value>;

pub const ID_FIELD: &str = "_id";
pub const TITLE_FIELD: &str = "title";

/// One entry of the catalog's `docs` array.
///
/// Fields of the wrong type degrade to their empty form instead of failing
/// the whole response: a non-string title becomes `""`, non-string author
/// names are dropped, and a fractional year is truncated.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SearchResult {
    #[serde(default, deserialize_with = "lenient_title")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_authors")]
    pub author_name: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_year")]
    pub first_publish_year: Option<i64>,
}

impl SearchResult {
    pub fn new(title: &str) -> Self {
        SearchResult {
            title: title.to_string(),
            author_name: None,
            first_publish_year: None,
        }
    }

    /// Results without a usable title cannot be listed, recorded or bookmarked.
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn authors(&self) -> Option<String> {
        self.author_name
            .as_ref()
            .filter(|names| !names.is_empty())
            .map(|names| names.join(", "))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    /// Entries that are not objects are skipped.
    #[serde(default, deserialize_with = "lenient_docs")]
    pub docs: Vec<SearchResult>,
}

fn lenient_title<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn lenient_authors<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        Value::String(s) => Some(vec![s]),
        _ => None,
    })
}

fn lenient_year<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_docs<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<SearchResult>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Typed view over a history or bookmark record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TitledEntry {
    pub title: String,
    #[serde(rename = "_id", default)]
    pub id: String,
}

impl TitledEntry {
    /// Records without a string `title` are skipped rather than treated as errors.
    pub fn from_records(records: Vec<Record>) -> Vec<TitledEntry> {
        records
            .into_iter()
            .filter_map(|r| serde_json::from_value(Value::Object(r)).ok())
            .collect()
    }
}

/// Single-field strict-equality query.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub key: String,
    pub value: Value,
}

impl Query {
    pub fn new(key: &str, value: impl Into<Value>) -> Self {
        Query {
            key: key.to_string(),
            value: value.into(),
        }
    }

    pub fn title(title: &str) -> Self {
        Query::new(TITLE_FIELD, title)
    }

    pub fn matches(&self, record: &Record) -> bool {
        record.get(&self.key) == Some(&self.value)
    }
}
