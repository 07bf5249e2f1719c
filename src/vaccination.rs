use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_derive::{Deserialize, Serialize};

use crate::disease::null_as_default;

/// Response of the RKI vaccination API. The flattened fields cover Germany as a whole.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub(crate) struct VaccinationData {
    #[serde(flatten)]
    pub(crate) country: StateVaccinationData,
    #[serde(rename = "lastUpdate", default, deserialize_with = "null_as_default")]
    pub(crate) last_update: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) states: BTreeMap<String, StateVaccinationData>,
}

impl VaccinationData {
    /// `lastUpdate` as an instant, when upstream sent a parseable RFC 3339 value.
    pub(crate) fn last_update_time(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.last_update)
            .ok()
            .map(|time| time.with_timezone(&Utc))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub(crate) struct StateVaccinationData {
    #[serde(flatten)]
    pub(crate) counts: VaccinationCountData,
    /// Inhabitants of the region.
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) total: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) quote: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) vaccinations_per_1000_inhabitants: f64,
    #[serde(rename = "2nd_vaccination", default, deserialize_with = "null_as_default")]
    pub(crate) second_vaccination: VaccinationCountData,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub(crate) struct VaccinationCountData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) vaccinated: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) difference_to_the_previous_day: u64,
}
