//! End-to-end tests for the users API over the in-memory repository.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{DateTime, Datelike, Local, TimeZone, Utc};
use mockable::{Clock, DefaultClock};
use rstest::rstest;
use serde_json::{Value, json};

use user_registry::Trace;
use user_registry::domain::UserRegistryService;
use user_registry::inbound::http;
use user_registry::inbound::http::health::HealthState;
use user_registry::inbound::http::state::HttpState;
use user_registry::outbound::memory::InMemoryUserRepository;

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: Utc
            .with_ymd_and_hms(2025, 6, 15, 12, 0, 0)
            .single()
            .expect("valid fixture timestamp"),
    })
}

async fn registry_app(
    clock: Arc<dyn Clock>,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    let service = Arc::new(UserRegistryService::new(
        Arc::new(InMemoryUserRepository::default()),
        clock,
    ));
    let state = web::Data::new(HttpState::new(service.clone(), service));
    actix_test::init_service(
        App::new()
            .app_data(state)
            .app_data(web::Data::new(HealthState::new()))
            .wrap(Trace)
            .configure(http::configure),
    )
    .await
}

async fn send(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body: Value = actix_test::read_body_json(response).await;
    (status, body)
}

fn create(body: Value) -> actix_test::TestRequest {
    actix_test::TestRequest::post().uri("/users").set_json(body)
}

#[actix_rt::test]
async fn age_input_is_stored_as_january_first_of_birth_year() {
    let app = registry_app(Arc::new(DefaultClock)).await;
    let expected = format!("{}-01-01", Utc::now().year() - 30);

    let (status, body) = send(
        &app,
        create(json!({
            "name": "Jonas Jonaitis",
            "email": "jonas@example.com",
            "birth_date": 30,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.get("success"), Some(&json!(true)));
    assert_eq!(
        body.pointer("/user/birth_date").and_then(Value::as_str),
        Some(expected.as_str())
    );
}

#[actix_rt::test]
async fn invalid_record_reports_every_field() {
    let app = registry_app(fixture_clock()).await;

    let (status, body) = send(
        &app,
        create(json!({ "name": "A", "email": "bad", "birth_date": "not-a-date" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.get("success"), Some(&json!(false)));
    let message = body.get("message").and_then(Value::as_str).expect("message");
    assert!(message.contains("name"), "{message}");
    assert!(message.contains("email"), "{message}");
    assert!(message.contains("birth_date"), "{message}");
    let fields: Vec<&str> = body
        .pointer("/details/errors")
        .and_then(Value::as_array)
        .expect("structured errors")
        .iter()
        .filter_map(|error| error.get("field").and_then(Value::as_str))
        .collect();
    assert_eq!(fields, vec!["name", "name", "email", "birth_date"]);
}

#[rstest]
#[case("42")]
#[case("00000000-0000-0000-0000-000000000042")]
#[actix_rt::test]
async fn update_of_unknown_id_is_not_found(#[case] id: &str) {
    let app = registry_app(fixture_clock()).await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/users/{id}"))
            .set_json(json!({
                "name": "Jonas Jonaitis",
                "email": "jonas@example.com",
                "birth_date": "1990-04-02",
            })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let message = body.get("message").and_then(Value::as_str).expect("message");
    assert!(message.contains(id), "{message}");
}

#[actix_rt::test]
async fn duplicate_email_is_rejected_and_not_stored() {
    let app = registry_app(fixture_clock()).await;
    let record = json!({
        "name": "Jonas Jonaitis",
        "email": "jonas@example.com",
        "birth_date": "1990-04-02",
    });

    let (first, _) = send(&app, create(record.clone())).await;
    assert_eq!(first, StatusCode::CREATED);

    let (second, body) = send(&app, create(record)).await;
    assert_eq!(second, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.get("code").and_then(Value::as_str),
        Some("duplicate_email")
    );

    let (_, listed) = send(&app, actix_test::TestRequest::get().uri("/users")).await;
    assert_eq!(
        listed
            .get("users")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(1)
    );
}

#[actix_rt::test]
async fn full_lifecycle_round_trips_through_both_prefixes() {
    let app = registry_app(fixture_clock()).await;

    let (_, created) = send(
        &app,
        create(json!({
            "name": "  Ona   Onaite ",
            "email": " ona@example.com ",
            "birth_date": "1991-04-02T08:30:00Z",
        })),
    )
    .await;
    let id = created
        .pointer("/user/id")
        .and_then(Value::as_str)
        .expect("assigned id")
        .to_owned();
    assert_eq!(
        created.pointer("/user/name").and_then(Value::as_str),
        Some("Ona   Onaite")
    );
    assert_eq!(
        created.pointer("/user/email").and_then(Value::as_str),
        Some("ona@example.com")
    );
    assert_eq!(
        created.pointer("/user/birth_date").and_then(Value::as_str),
        Some("1991-04-02")
    );

    let (status, updated) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/users/{id}"))
            .set_json(json!({
                "name": "Ona Jonaitiene",
                "email": "ona@example.com",
                "birth_date": "40",
            })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        updated.pointer("/user/birth_date").and_then(Value::as_str),
        Some("1985-01-01")
    );
    assert_eq!(
        updated.pointer("/user/id").and_then(Value::as_str),
        Some(id.as_str())
    );

    let (status, deleted) = send(
        &app,
        actix_test::TestRequest::delete().uri(&format!("/users/{id}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted.get("success"), Some(&json!(true)));

    let (status, _) = send(
        &app,
        actix_test::TestRequest::delete().uri(&format!("/users/{id}")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = send(&app, actix_test::TestRequest::get().uri("/api/users")).await;
    assert_eq!(listed.get("users"), Some(&json!([])));
}

#[actix_rt::test]
async fn future_birth_date_is_rejected() {
    let app = registry_app(fixture_clock()).await;

    let (status, body) = send(
        &app,
        create(json!({
            "name": "Jonas Jonaitis",
            "email": "jonas@example.com",
            "birth_date": "2025-06-16",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.pointer("/details/errors/0/code").and_then(Value::as_str),
        Some("future_date")
    );
}
