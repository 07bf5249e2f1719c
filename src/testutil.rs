use std::net::SocketAddr;

use axum::extract::Path;
use axum::routing::get;
use axum::Router;

pub(crate) const GOVERNMENT_BODY: &str = r#"[
    {"updated": 1610000000000, "province": "Baden-\nWürttemberg", "cases": 250000,
     "casePreviousDayChange": 1500, "casesPerHundredThousand": 2250,
     "sevenDayCasesPerHundredThousand": 120, "deaths": 5000},
    {"updated": 1610000000000, "province": "Total", "cases": 1900000,
     "casePreviousDayChange": 18000, "casesPerHundredThousand": 2300,
     "sevenDayCasesPerHundredThousand": 160, "deaths": 40000}
]"#;

pub(crate) const VACCINATION_BODY: &str = r#"{
    "vaccinated": 532878,
    "difference_to_the_previous_day": 55780,
    "vaccinations_per_1000_inhabitants": 6.41,
    "total": 83166711,
    "quote": 0.64,
    "2nd_vaccination": {"vaccinated": 1200, "difference_to_the_previous_day": 300},
    "lastUpdate": "2021-01-10T13:00:00.000Z",
    "states": {
        "Bayern": {
            "vaccinated": 110000,
            "difference_to_the_previous_day": 12000,
            "vaccinations_per_1000_inhabitants": 8.4,
            "total": 13124737,
            "quote": 0.84,
            "2nd_vaccination": {"vaccinated": 50, "difference_to_the_previous_day": 5}
        }
    }
}"#;

/// disease.sh and RKI lookalike serving canned bodies on both APIs' paths.
pub(crate) fn mock_upstream() -> Router {
    Router::new()
        .route("/gov/:country", get(|| async { GOVERNMENT_BODY }))
        .route("/api", get(|| async { VACCINATION_BODY }))
        .route(
            "/historical/:country",
            get(|Path(country): Path<String>| async move {
                format!(
                    r#"{{"country": "{country}", "province": ["mainland"],
                        "timeline": {{"cases": {{"1/9/21": 1891581, "1/10/21": 1908527}},
                                      "deaths": {{"1/9/21": 39878, "1/10/21": 40343}},
                                      "recovered": {{}}}}}}"#
                )
            }),
        )
}

/// Serves `app` on an ephemeral local port and returns its base URL.
pub(crate) fn spawn_upstream(app: Router) -> String {
    let server = axum::Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0)))
        .serve(app.into_make_service());
    let addr = server.local_addr();
    tokio::spawn(server);
    format!("http://{addr}")
}
