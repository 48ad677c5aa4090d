//! Catalog documents as they are stored on disk.
//!
//! Every field is optional. Unknown fields are ignored when reading and
//! absent fields are left out when writing.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, de};

use crate::storage::{Merge, merge_options};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct IssuerRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EmissionRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PictureRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Fields shared by coins and banknotes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ArtifactFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_issue_date")]
    pub issue_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obverse: Option<PictureRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse: Option<PictureRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_count: Option<i32>,
}

impl Merge for ArtifactFields {
    fn merge_from(&mut self, other: &Self) {
        merge_options!(self, other;
            display_name, value, unit, substance, color,
            issue_date, obverse, reverse, instance_count,
        );
    }
}

/// Accepts `1952-01-28T10:00:00`, `1952-01-28T10:00:00+02:00` and
/// `1952-01-28`. An offset is dropped, keeping the local date and time as
/// written.
pub fn parse_issue_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    text.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|date| date.naive_local()))
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn deserialize_issue_date<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(text) => parse_issue_date(&text)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid issue date '{text}'"))),
        None => Ok(None),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CoinRecord {
    #[serde(flatten)]
    pub artifact: ArtifactFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diameter: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mint_year: Option<i32>,
}

impl Merge for CoinRecord {
    fn merge_from(&mut self, other: &Self) {
        self.artifact.merge_from(&other.artifact);
        merge_options!(self, other; diameter, edge, mint_year);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BanknoteRecord {
    #[serde(flatten)]
    pub artifact: ArtifactFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embossing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_year: Option<i32>,
}

impl Merge for BanknoteRecord {
    fn merge_from(&mut self, other: &Self) {
        self.artifact.merge_from(&other.artifact);
        merge_options!(self, other; width, height, embossing, print_year);
    }
}
