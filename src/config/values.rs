//! Value types shared by several step configurations, and the serde adapters for the
//! loose spellings config files use (`infer`, `all`, `None`, a bare string where a
//! list is expected).

use serde::{Deserialize, Deserializer, Serialize};

/// Spellings treated as "no value" when a config writes them as a string
const NONE_KEYWORDS: &[&str] = &["None", "none", "null", "~", ""];

fn is_none_keyword(s: &str) -> bool {
    NONE_KEYWORDS.contains(&s)
}

/// Which feature columns an operation works on
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "KeywordOrList", into = "KeywordOrList")]
pub enum Features {
    /// Infer features from column name prefixes
    #[default]
    Infer,
    /// Explicit list of feature columns
    Columns(Vec<String>),
}

/// Which fields of view to aggregate over
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "KeywordOrSites", into = "KeywordOrSites")]
pub enum FieldsOfView {
    /// Every field of view
    #[default]
    All,
    /// Only the listed site numbers
    Sites(Vec<u32>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum KeywordOrList {
    Keyword(String),
    List(Vec<String>),
}

impl TryFrom<KeywordOrList> for Features {
    type Error = String;

    fn try_from(value: KeywordOrList) -> Result<Self, Self::Error> {
        match value {
            KeywordOrList::Keyword(k) if k == "infer" => Ok(Features::Infer),
            KeywordOrList::Keyword(k) => Err(format!("expected \"infer\" or a list, got {k:?}")),
            KeywordOrList::List(columns) => Ok(Features::Columns(columns)),
        }
    }
}

impl From<Features> for KeywordOrList {
    fn from(value: Features) -> Self {
        match value {
            Features::Infer => KeywordOrList::Keyword("infer".to_string()),
            Features::Columns(columns) => KeywordOrList::List(columns),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum KeywordOrSites {
    Keyword(String),
    Sites(Vec<u32>),
}

impl TryFrom<KeywordOrSites> for FieldsOfView {
    type Error = String;

    fn try_from(value: KeywordOrSites) -> Result<Self, Self::Error> {
        match value {
            KeywordOrSites::Keyword(k) if k == "all" => Ok(FieldsOfView::All),
            KeywordOrSites::Keyword(k) => Err(format!("expected \"all\" or a list, got {k:?}")),
            KeywordOrSites::Sites(sites) => Ok(FieldsOfView::Sites(sites)),
        }
    }
}

impl From<FieldsOfView> for KeywordOrSites {
    fn from(value: FieldsOfView) -> Self {
        match value {
            FieldsOfView::All => KeywordOrSites::Keyword("all".to_string()),
            FieldsOfView::Sites(sites) => KeywordOrSites::Sites(sites),
        }
    }
}

/// `Option<String>` that also reads `None`/`null` spelled as a string
pub(crate) fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !is_none_keyword(s)))
}

/// `Option<Vec<String>>` accepting a bare string for a one-element list
pub(crate) fn optional_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Repr>::deserialize(deserializer)? {
        None => None,
        Some(Repr::One(s)) if is_none_keyword(&s) => None,
        Some(Repr::One(s)) => Some(vec![s]),
        Some(Repr::Many(v)) => Some(v),
    })
}

/// A list that may be written as a single bare value
pub(crate) fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match Repr::deserialize(deserializer)? {
        Repr::Many(v) => v,
        Repr::One(t) => vec![t],
    })
}

/// Random seed: an integer, or `None`/`null` for an unseeded draw
pub(crate) fn optional_seed<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Seed(u64),
        Keyword(String),
    }

    match Option::<Repr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Repr::Seed(seed)) => Ok(Some(seed)),
        Some(Repr::Keyword(k)) if is_none_keyword(&k) => Ok(None),
        Some(Repr::Keyword(k)) => Err(serde::de::Error::custom(format!(
            "expected an integer seed or None, got {k:?}"
        ))),
    }
}

/// `Option<f64>` that also reads `None` spelled as a string
pub(crate) fn optional_float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Keyword(String),
    }

    match Option::<Repr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Repr::Number(n)) => Ok(Some(n)),
        Some(Repr::Keyword(k)) if is_none_keyword(&k) => Ok(None),
        Some(Repr::Keyword(k)) => Err(serde::de::Error::custom(format!(
            "expected a number or None, got {k:?}"
        ))),
    }
}
