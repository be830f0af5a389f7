use std::cell::RefCell;
use std::net::{Ipv4Addr, SocketAddr, TcpListener};
use std::path::PathBuf;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use server::{app, AppState};
use shared::api::ITINERARY_ROUTE;
use shared::controller::{FormInput, FormView, ItineraryController, SubmitOutcome};
use shared::view::{self, Node};
use tower::ServiceExt;
use travelgpt::{HttpTransport, Planner};

fn offline_app(max_days: i64) -> axum::Router {
    app(
        AppState {
            planner: Planner::offline(),
            max_days,
        },
        Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/static")),
    )
}

async fn post_itinerary(body: &str) -> (StatusCode, Option<Value>) {
    let request = Request::builder()
        .method("POST")
        .uri(ITINERARY_ROUTE)
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap();

    let response = offline_app(7).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();

    (status, serde_json::from_slice(&bytes).ok())
}

#[tokio::test]
async fn healthz_is_ok() {
    let response = offline_app(7)
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn returns_rule_based_itinerary_without_providers() {
    let (status, body) = post_itinerary(
        &json!({ "destination": "Rome", "days": 2, "interests": "culture" }).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["generated"]["source"], json!("rule-based (offline)"));
    assert_eq!(body["generated"]["meta"]["destination"], json!("Rome"));
    assert_eq!(body["generated"]["meta"]["days"], json!(2));
    assert_eq!(body["generated"]["itinerary"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["generated"]["itinerary"][0]["items"][0],
        json!({ "time": "Morning", "activity": "City museum" })
    );
}

#[tokio::test]
async fn missing_fields_get_defaults() {
    let (status, body) = post_itinerary("{}").await;

    assert_eq!(status, StatusCode::OK);
    let meta = &body.unwrap()["generated"]["meta"];
    assert_eq!(meta["destination"], json!("Unknown"));
    assert_eq!(meta["days"], json!(3));
    assert_eq!(meta["interests"], json!(["culture", "food"]));
}

#[tokio::test]
async fn long_trips_are_clamped() {
    let (_, body) =
        post_itinerary(&json!({ "destination": "Rome", "days": 500 }).to_string()).await;

    let generated = &body.unwrap()["generated"];
    assert_eq!(generated["meta"]["days"], json!(7));
    assert_eq!(generated["itinerary"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let (status, _) = post_itinerary("{ not json").await;

    assert!(status.is_client_error());
}

#[tokio::test]
async fn serves_the_frontend_from_the_static_dir() {
    let response = offline_app(7)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("travelgpt static fixture"));
}

struct RecordingView {
    form: RefCell<FormInput>,
    shown: RefCell<Vec<Node>>,
}

impl FormView for RecordingView {
    fn read_form(&self) -> FormInput {
        self.form.borrow().clone()
    }

    fn write_form(&self, input: &FormInput) {
        *self.form.borrow_mut() = input.clone();
    }

    fn show(&self, node: Node) {
        self.shown.borrow_mut().push(node);
    }
}

#[tokio::test]
async fn controller_round_trip_over_http() {
    let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).unwrap();
    let addr = listener.local_addr().unwrap();
    let server = axum::Server::from_tcp(listener)
        .unwrap()
        .serve(offline_app(7).into_make_service());
    tokio::spawn(server);

    let page = RecordingView {
        form: RefCell::new(FormInput::default()),
        shown: RefCell::new(vec![]),
    };
    let transport = HttpTransport::new(&format!("http://{addr}/")).unwrap();
    let controller = ItineraryController::new(transport, page);

    controller.populate_sample();
    let outcome = controller.submit().await;

    assert_eq!(outcome, SubmitOutcome::Rendered);
    let shown = controller.view().shown.borrow();
    assert_eq!(shown[0], view::progress());
    let html = shown.last().unwrap().to_html();
    assert!(html.contains("Bali, Indonesia — 4 day(s)"));
    assert!(html.contains("<strong>Day 4</strong>"));
    assert!(html.contains("<li><strong>Afternoon:</strong> Sunset viewpoint</li>"));
}

#[tokio::test]
async fn controller_reports_unreachable_service() {
    let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let page = RecordingView {
        form: RefCell::new(FormInput::sample()),
        shown: RefCell::new(vec![]),
    };
    let transport = HttpTransport::new(&format!("http://{addr}")).unwrap();
    let controller = ItineraryController::new(transport, page);

    assert_eq!(controller.submit().await, SubmitOutcome::Failed);
    assert_eq!(controller.view().shown.borrow().last(), Some(&view::failure()));
}
