use std::time::Duration;

pub(crate) const DISEASE_API_URL: &str = "https://disease.sh/v3/covid-19";
pub(crate) const VACCINATION_API_URL: &str = "https://rki-vaccination-data.vercel.app";

pub(crate) const ALLOW_NULL_PARAMETER: &str = "allowNull";
pub(crate) const LAST_DAYS_PARAMETER: &str = "lastdays";
pub(crate) const DEFAULT_LAST_DAYS: &str = "30";

pub(crate) const DEFAULT_PORT: u16 = 8080;
pub(crate) const DEFAULT_BIND: &str = "0.0.0.0";
pub(crate) const DEFAULT_DELAY: &str = "5m";
pub(crate) const DEFAULT_COUNTRY: &str = "de";
pub(crate) const DEFAULT_NATIONAL_LABEL: &str = "Germany";

/// Province name disease.sh uses for the country-wide row.
pub(crate) const UPSTREAM_TOTAL_PROVINCE: &str = "Total";

pub(crate) const METRICS_NAMESPACE: &str = "covid";
pub(crate) const STATE_LABEL: &str = "state";

pub(crate) const MIN_DELAY: Duration = Duration::from_secs(1);
pub(crate) const MAX_DELAY: Duration = Duration::from_secs(24 * 60 * 60);
