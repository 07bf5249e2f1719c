use std::collections::BTreeMap;

use serde::Deserializer;
use serde_derive::{Deserialize, Serialize};

/// One row of `GET /gov/{country}` from disease.sh.
///
/// With `allowNull=true` upstream sends `null` for unknown numbers; those read as zero.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GovernmentDiseaseData {
    /// UNIX timestamp of the last update, in milliseconds.
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) updated: u64,
    /// Province or state name, `"Total"` for the whole country.
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) province: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) cases: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) case_previous_day_change: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) cases_per_hundred_thousand: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) seven_day_cases_per_hundred_thousand: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) deaths: u64,
}

/// Response of `GET /historical/{country}`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub(crate) struct HistoricalData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) country: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) province: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) timeline: Timeline,
}

/// Daily cumulative series keyed by upstream date strings (`m/d/yy`).
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub(crate) struct Timeline {
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) cases: BTreeMap<String, u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) deaths: BTreeMap<String, u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) recovered: BTreeMap<String, u64>,
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    let value: Option<T> = serde::Deserialize::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}
