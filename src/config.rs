use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::Parser;

use crate::constants::{
    DEFAULT_BIND, DEFAULT_COUNTRY, DEFAULT_DELAY, DEFAULT_NATIONAL_LABEL, DEFAULT_PORT,
    DISEASE_API_URL, MAX_DELAY, MIN_DELAY, VACCINATION_API_URL,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Prometheus exporter for COVID-19 disease and vaccination data")]
pub(crate) struct Args {
    /// Port the metrics endpoint listens on
    #[arg(long, env = "COVID_EXPORTER_PORT", default_value_t = DEFAULT_PORT)]
    pub(crate) port: u16,

    /// Address the metrics endpoint binds to
    #[arg(long, env = "COVID_EXPORTER_BIND", default_value = DEFAULT_BIND)]
    pub(crate) bind: IpAddr,

    /// Delay between data fetching round trips: s/m/h segments (e.g. 90s, 5m, 1h30m) or bare seconds, at most 1 day
    #[arg(long, env = "COVID_EXPORTER_DELAY", default_value = DEFAULT_DELAY, value_parser = parse_delay)]
    pub(crate) delay: Duration,

    /// Country code passed to the disease API
    #[arg(long, env = "COVID_EXPORTER_COUNTRY", default_value = DEFAULT_COUNTRY)]
    pub(crate) country: String,

    /// Ask the disease API for null instead of zero on missing values
    #[arg(long, env = "COVID_EXPORTER_ALLOW_NULL")]
    pub(crate) allow_null: bool,

    /// `state` label used for country-wide values
    #[arg(long, env = "COVID_EXPORTER_NATIONAL_LABEL", default_value = DEFAULT_NATIONAL_LABEL)]
    pub(crate) national_label: String,

    #[arg(long, env = "COVID_EXPORTER_DISEASE_URL", default_value = DISEASE_API_URL)]
    pub(crate) disease_url: String,

    #[arg(long, env = "COVID_EXPORTER_VACCINATION_URL", default_value = VACCINATION_API_URL)]
    pub(crate) vaccination_url: String,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Config {
    pub(crate) listen: SocketAddr,
    pub(crate) delay: Duration,
    pub(crate) country: String,
    pub(crate) allow_null: bool,
    pub(crate) national_label: String,
    pub(crate) disease_url: String,
    pub(crate) vaccination_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            delay: Duration::from_secs(5 * 60),
            country: DEFAULT_COUNTRY.to_string(),
            allow_null: false,
            national_label: DEFAULT_NATIONAL_LABEL.to_string(),
            disease_url: DISEASE_API_URL.to_string(),
            vaccination_url: VACCINATION_API_URL.to_string(),
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            listen: SocketAddr::new(args.bind, args.port),
            delay: args.delay,
            country: args.country,
            allow_null: args.allow_null,
            national_label: args.national_label,
            disease_url: args.disease_url,
            vaccination_url: args.vaccination_url,
        }
    }
}

/// Parses a delay such as `90s`, `5m`, `1h30m` or a bare number of seconds.
pub(crate) fn parse_delay(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    let invalid = || format!("invalid delay `{value}`");
    let too_large = || format!("delay `{value}` is larger than {}s", MAX_DELAY.as_secs());

    if value.is_empty() {
        return Err(invalid());
    }

    let seconds = if value.bytes().all(|b| b.is_ascii_digit()) {
        value.parse::<u64>().map_err(|_| too_large())?
    } else {
        let mut seconds: u64 = 0;
        let mut rest = value;
        while !rest.is_empty() {
            let digits = rest
                .find(|c: char| !c.is_ascii_digit())
                .ok_or_else(|| format!("missing unit in delay `{value}`, expected s, m or h"))?;
            if digits == 0 {
                return Err(invalid());
            }
            let (number, tail) = rest.split_at(digits);
            let unit_len = tail.find(|c: char| c.is_ascii_digit()).unwrap_or(tail.len());
            let (unit, next) = tail.split_at(unit_len);

            let factor = match unit {
                "s" => 1,
                "m" => 60,
                "h" => 60 * 60,
                _ => return Err(format!("unknown unit in delay `{value}`, expected s, m or h")),
            };
            let number: u64 = number.parse().map_err(|_| too_large())?;
            seconds = number
                .checked_mul(factor)
                .and_then(|part| seconds.checked_add(part))
                .ok_or_else(too_large)?;
            rest = next;
        }
        seconds
    };

    let delay = Duration::from_secs(seconds);
    if delay < MIN_DELAY {
        return Err(format!("delay must be at least {}s", MIN_DELAY.as_secs()));
    }
    if delay > MAX_DELAY {
        return Err(too_large());
    }
    Ok(delay)
}
