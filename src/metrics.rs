//! Prometheus gauges for the exported COVID-19 numbers.
//!
//! Every gauge carries a single `state` label: a federal state name, or the
//! configured national label for country-wide values.

use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};

use crate::constants::{METRICS_NAMESPACE, STATE_LABEL, UPSTREAM_TOTAL_PROVINCE};
use crate::disease::GovernmentDiseaseData;
use crate::error::Result;
use crate::vaccination::{StateVaccinationData, VaccinationData};

pub(crate) struct CovidMetrics {
    registry: Registry,

    disease_cases: GaugeVec,
    disease_deaths: GaugeVec,
    disease_case_previous_day_change: GaugeVec,
    disease_cases_per_hundred_thousand: GaugeVec,
    disease_seven_day_cases_per_hundred_thousand: GaugeVec,
    disease_updated_timestamp_seconds: GaugeVec,

    vaccination_total: GaugeVec,
    vaccination_quote: GaugeVec,
    vaccination_per_1000_inhabitants: GaugeVec,
    vaccination_vaccinated: GaugeVec,
    vaccination_difference_to_previous_day: GaugeVec,
    vaccination_second_wave_vaccinated: GaugeVec,
    vaccination_second_wave_difference_to_previous_day: GaugeVec,
    vaccination_last_update_timestamp_seconds: GaugeVec,
}

impl CovidMetrics {
    pub(crate) fn new() -> Result<Self> {
        let registry = Registry::new();

        let gauge = |subsystem: &str, name: &str, help: &str| -> Result<GaugeVec> {
            let opts = Opts::new(name, help)
                .namespace(METRICS_NAMESPACE)
                .subsystem(subsystem);
            let vec = GaugeVec::new(opts, &[STATE_LABEL])?;
            registry.register(Box::new(vec.clone()))?;
            Ok(vec)
        };

        Ok(CovidMetrics {
            disease_cases: gauge("disease", "cases", "The number of confirmed cases")?,
            disease_deaths: gauge(
                "disease",
                "deaths",
                "The number of deaths in relation with COVID-19",
            )?,
            disease_case_previous_day_change: gauge(
                "disease",
                "case_previous_day_change",
                "The number of new cases since the previous day",
            )?,
            disease_cases_per_hundred_thousand: gauge(
                "disease",
                "cases_per_hundred_thousand",
                "The number of cases per 100,000 inhabitants",
            )?,
            disease_seven_day_cases_per_hundred_thousand: gauge(
                "disease",
                "seven_day_cases_per_hundred_thousand",
                "The number of new cases in the last week per 100,000 inhabitants",
            )?,
            disease_updated_timestamp_seconds: gauge(
                "disease",
                "updated_timestamp_seconds",
                "UNIX time of the last upstream update of the disease data",
            )?,
            vaccination_total: gauge(
                "vaccination",
                "total",
                "The number of people that need to get vaccinated in total",
            )?,
            vaccination_quote: gauge(
                "vaccination",
                "quote",
                "The quote of people that have been vaccinated",
            )?,
            vaccination_per_1000_inhabitants: gauge(
                "vaccination",
                "per_1000_inhabitants",
                "The number of vaccinations per 1000 inhabitants",
            )?,
            vaccination_vaccinated: gauge(
                "vaccination",
                "vaccinated",
                "The number of people that are already vaccinated",
            )?,
            vaccination_difference_to_previous_day: gauge(
                "vaccination",
                "difference_to_previous_day",
                "The number of vaccinations performed during the last 24h period",
            )?,
            vaccination_second_wave_vaccinated: gauge(
                "vaccination",
                "second_wave_vaccinated",
                "The number of people that already received the second vaccination",
            )?,
            vaccination_second_wave_difference_to_previous_day: gauge(
                "vaccination",
                "second_wave_difference_to_previous_day",
                "The number of second vaccinations performed during the last 24h period",
            )?,
            vaccination_last_update_timestamp_seconds: gauge(
                "vaccination",
                "last_update_timestamp_seconds",
                "UNIX time of the last upstream update of the vaccination data",
            )?,
            registry,
        })
    }

    /// Writes one set of gauges per province row. Returns the number of regions updated.
    pub(crate) fn apply_disease(
        &self,
        rows: &[GovernmentDiseaseData],
        national_label: &str,
    ) -> usize {
        for row in rows {
            let label = region_label(&row.province, national_label);
            let labels = [label.as_str()];

            self.disease_cases
                .with_label_values(&labels)
                .set(row.cases as f64);
            self.disease_deaths
                .with_label_values(&labels)
                .set(row.deaths as f64);
            self.disease_case_previous_day_change
                .with_label_values(&labels)
                .set(row.case_previous_day_change as f64);
            self.disease_cases_per_hundred_thousand
                .with_label_values(&labels)
                .set(row.cases_per_hundred_thousand);
            self.disease_seven_day_cases_per_hundred_thousand
                .with_label_values(&labels)
                .set(row.seven_day_cases_per_hundred_thousand);
            // upstream reports milliseconds
            self.disease_updated_timestamp_seconds
                .with_label_values(&labels)
                .set(row.updated as f64 / 1000.0);
        }
        rows.len()
    }

    /// Writes the country-wide values under `national_label`, then each state.
    /// Returns the number of regions updated.
    pub(crate) fn apply_vaccination(&self, data: &VaccinationData, national_label: &str) -> usize {
        self.set_vaccination(national_label, &data.country);
        if let Some(time) = data.last_update_time() {
            self.vaccination_last_update_timestamp_seconds
                .with_label_values(&[national_label])
                .set(time.timestamp() as f64);
        }

        for (state, state_data) in &data.states {
            self.set_vaccination(state, state_data);
        }
        data.states.len() + 1
    }

    fn set_vaccination(&self, state: &str, data: &StateVaccinationData) {
        let labels = [state];

        self.vaccination_total
            .with_label_values(&labels)
            .set(data.total as f64);
        self.vaccination_quote
            .with_label_values(&labels)
            .set(data.quote);
        self.vaccination_per_1000_inhabitants
            .with_label_values(&labels)
            .set(data.vaccinations_per_1000_inhabitants);
        self.vaccination_vaccinated
            .with_label_values(&labels)
            .set(data.counts.vaccinated as f64);
        self.vaccination_difference_to_previous_day
            .with_label_values(&labels)
            .set(data.counts.difference_to_the_previous_day as f64);
        self.vaccination_second_wave_vaccinated
            .with_label_values(&labels)
            .set(data.second_vaccination.vaccinated as f64);
        self.vaccination_second_wave_difference_to_previous_day
            .with_label_values(&labels)
            .set(data.second_vaccination.difference_to_the_previous_day as f64);
    }

    /// Current values in the Prometheus text exposition format.
    pub(crate) fn encode(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = String::new();
        encoder.encode_utf8(&self.registry.gather(), &mut buffer)?;
        Ok(buffer)
    }

    pub(crate) fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }
}

/// Label for a disease.sh province: line breaks removed, the country-wide
/// row renamed to `national_label`.
pub(crate) fn region_label(province: &str, national_label: &str) -> String {
    let province = province.replace('\n', "");
    if province == UPSTREAM_TOTAL_PROVINCE {
        national_label.to_string()
    } else {
        province
    }
}
