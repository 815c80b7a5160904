#![allow(clippy::expect_used)]
//! Calendar values crossing crate boundaries: serde through the HTTP
//! client, validation helpers and configuration.

use serde::{Deserialize, Serialize};
use serde_json::json;

use stz_test::fetch::normalize_url;
use stz_test::shared::constants::INVALID_DATE;
use stz_test::util::validate::{is_adult, is_minor, is_valid_birth_date};

use super::helpers::*;

#[derive(Debug, Serialize, Deserialize)]
struct Appointment {
    title: String,
    starts: Chronos,
    ends: Chronos,
}

#[derive(Debug, Deserialize)]
struct EchoedBody {
    body: String,
}

#[test_log::test(tokio::test)]
async fn chronos_survives_a_json_round_trip_over_http() {
    let server = TestServer::echo().await;
    let client = test_client();

    let starts = utc("2024-06-15T09:00:00Z");
    let appointment = Appointment {
        title: "standup".to_string(),
        starts,
        ends: starts.add(15, Unit::Minute),
    };
    let payload = serde_json::to_value(&appointment).expect("serializes");
    assert_eq!(payload["starts"], "2024-06-15T09:00:00.000Z");

    let response = client
        .post::<EchoedBody>(
            &server.url("/appointments"),
            Some(&payload),
            &RequestOptions::default(),
        )
        .await
        .expect("POST should succeed");

    let echoed: Appointment = serde_json::from_str(&response.data.body).expect("deserializes");
    assert_eq!(echoed.title, "standup");
    assert_eq!(echoed.starts, appointment.starts);
    assert_eq!(echoed.ends.value_of(), appointment.ends.value_of());
    assert_eq!(echoed.ends.diff(echoed.starts, Unit::Minute, false), 15.0);
}

#[test_log::test]
fn invalid_chronos_serializes_as_null() {
    let value = serde_json::to_value(chronos("not a date")).expect("serializes");
    assert_eq!(value, json!(null));

    let parsed: Chronos = serde_json::from_value(json!(null)).expect("null is accepted");
    assert!(!parsed.is_valid());
    assert_eq!(parsed.to_iso_string(), INVALID_DATE);
}

#[test_log::test]
fn chronos_in_query_parameters() {
    let day = utc("2024-02-29T23:59:59.999Z");
    let params = QueryParams::new()
        .with("from", day.start_of(Unit::Month).format("YYYY-MM-DD"))
        .with("to", day.end_of(Unit::Month).format("YYYY-MM-DD"));

    assert_eq!(
        normalize_url("/report", &params),
        "/report?from=2024-02-01&to=2024-02-29"
    );
}

#[test]
fn birth_date_validation_uses_calendar_values() {
    let reference = utc("2024-02-29");

    assert!(is_valid_birth_date("2004-02-29"));
    assert!(!is_valid_birth_date("2003-02-29"));
    assert!(is_adult("2005-02-28", 19, &reference));
    assert!(is_minor("2005-03-01", 19, &reference));
    assert!(!is_adult("2000-01-01", 19, &chronos("garbage")));
}

#[test]
fn settings_feed_the_client() {
    let settings = Settings::default();
    assert!(FetchClient::from_settings(&settings).is_ok());
    assert_eq!(settings.http.user_agent, "stz-fetch");
}

#[test]
fn relative_phrases_between_fixed_values() {
    let start = utc("2024-01-01T00:00:00Z");

    assert_eq!(start.add(3, Unit::Hour).from(start), "in 3 hours");
    assert_eq!(start.subtract(2, Unit::Day).from(start), "2 days ago");
    assert_eq!(start.to(start.add(90, Unit::Second)), "in a minute");
}
