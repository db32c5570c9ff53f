use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// One item of a list endpoint (home feed, search, results by taxonomy).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub poster_url: String,
    #[serde(default, deserialize_with = "lenient_year")]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// Full record returned by `/phim/{slug}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, rename = "origin_name", deserialize_with = "null_as_default")]
    pub original_name: String,
    pub slug: String,
    #[serde(default, rename = "content", deserialize_with = "null_as_default")]
    pub synopsis_html: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub poster_url: String,
    #[serde(default, rename = "thumb_url", deserialize_with = "null_as_default")]
    pub backdrop_url: String,
    #[serde(default, deserialize_with = "lenient_year")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quality: String,
    #[serde(default, rename = "lang", deserialize_with = "null_as_default")]
    pub language: String,
    #[serde(default, rename = "category", deserialize_with = "null_as_default")]
    pub genres: Vec<NamedRef>,
    #[serde(default, rename = "country", deserialize_with = "null_as_default")]
    pub countries: Vec<NamedRef>,
    #[serde(default, rename = "actor", deserialize_with = "null_as_default")]
    pub actors: Vec<String>,
    #[serde(default, rename = "director", deserialize_with = "null_as_default")]
    pub directors: Vec<String>,
}

/// A genre, a country, or a synthesized year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyOption {
    #[serde(default, rename = "name", deserialize_with = "null_as_default")]
    pub label: String,
    pub slug: String,
}

impl TaxonomyOption {
    pub fn new(label: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            slug: slug.into(),
        }
    }
}

/// `{ data: { items: [...] } }`
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct ListEnvelope<T> {
    #[serde(default)]
    pub data: Option<ListData<T>>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct ListData<T> {
    #[serde(default, deserialize_with = "skip_bad_items")]
    pub items: Option<Vec<T>>,
}

impl<T> ListEnvelope<T> {
    /// Items of the envelope; `None` when `data` or `items` is absent.
    pub fn into_items(self) -> Option<Vec<T>> {
        self.data.and_then(|data| data.items)
    }
}

/// `{ movie: {...} }`
#[derive(Debug, Deserialize)]
pub struct DetailEnvelope {
    #[serde(default)]
    pub movie: Option<MovieDetail>,
}

/// Explicit `null` reads as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Items that do not decode (no slug, wrong shape) are dropped one by one
/// instead of failing the whole list.
fn skip_bad_items<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(raw) = Option::<Vec<Value>>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let total = raw.len();
    let items: Vec<T> = raw
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if items.len() < total {
        warn!(skipped = total - items.len(), "dropping list items that could not be decoded");
    }
    Ok(Some(items))
}

/// The catalog sends years as numbers, numeric strings, empty strings or null.
fn lenient_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawYear {
        Number(i64),
        Text(String),
        Other(Value),
    }

    let raw = Option::<RawYear>::deserialize(deserializer)?;
    let year = match raw {
        Some(RawYear::Number(n)) => i32::try_from(n).ok(),
        Some(RawYear::Text(s)) => s.trim().parse::<i32>().ok(),
        Some(RawYear::Other(_)) | None => None,
    };
    Ok(year.filter(|y| *y > 0))
}
