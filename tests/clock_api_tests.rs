use std::sync::{Arc, Mutex};

use actix_web::{App, http::StatusCode, test, web};
use anyhow::Result;
use futures_util::future::BoxFuture;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use terminal_api::procedures::{ProcRow, ProcValue, ProcedureCaller};
use terminal_api::services::TerminalService;
use terminal_api::{AppState, handlers};

struct MockCaller {
    rows: Vec<ProcRow>,
    fail: bool,
    calls: Mutex<Vec<(String, Vec<ProcValue>)>>,
}

impl MockCaller {
    fn returning(rows: Vec<ProcRow>) -> Arc<Self> {
        Arc::new(Self {
            rows,
            fail: false,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            rows: Vec::new(),
            fail: true,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(String, Vec<ProcValue>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProcedureCaller for MockCaller {
    fn call<'a>(
        &'a self,
        proc_name: &'a str,
        values: &'a [ProcValue],
    ) -> BoxFuture<'a, Result<Vec<ProcRow>>> {
        self.calls
            .lock()
            .unwrap()
            .push((proc_name.to_string(), values.to_vec()));
        let rows = self.rows.clone();
        let fail = self.fail;
        Box::pin(async move {
            if fail {
                anyhow::bail!("login timeout expired");
            }
            Ok(rows)
        })
    }
}

macro_rules! init_app {
    ($caller:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState {
                    terminal: TerminalService::new($caller.clone()),
                }))
                .configure(handlers::configure),
        )
        .await
    };
}

async fn json_body(resp: actix_web::dev::ServiceResponse) -> Value {
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).expect("response body should be JSON")
}

fn collection_row(id: i64) -> ProcRow {
    let mut row = ProcRow::new();
    row.insert("work_order_collection_id".to_string(), json!(id));
    row
}

#[actix_rt::test]
async fn clock_in_success_returns_collection_id() {
    let caller = MockCaller::returning(vec![collection_row(99)]);
    let app = init_app!(caller);

    let req = test::TestRequest::post()
        .uri("/clock-in")
        .set_json(json!({
            "workOrderAssemblyId": 12345,
            "userId": "42",
            "divisionFK": 1,
            "deviceDate": "2024-01-01T12:00:00+00:00"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Clock in recorded");
    assert_eq!(body["workOrderCollectionId"], 99);

    let calls = caller.calls();
    assert_eq!(calls.len(), 1);
    let (proc, values) = &calls[0];
    assert_eq!(proc, "dbo.uspClockIn");
    assert_eq!(values[0], ProcValue::Int(12345));
    assert_eq!(values[1], ProcValue::Int(42));
    assert_eq!(values[2], ProcValue::Int(1));
    assert!(matches!(values[3], ProcValue::Timestamp(_)));
}

#[actix_rt::test]
async fn clock_in_rejects_invalid_user_id_before_any_call() {
    let caller = MockCaller::returning(vec![collection_row(99)]);
    let app = init_app!(caller);

    for bad in [json!("0"), json!("12a"), json!(-3)] {
        let req = test::TestRequest::post()
            .uri("/clock-in")
            .set_json(json!({
                "workOrderAssemblyId": 12345,
                "userId": bad,
                "divisionFK": 1
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = json_body(resp).await;
        assert_eq!(body["status"], "error");
    }

    assert!(caller.calls().is_empty());
}

#[actix_rt::test]
async fn clock_in_rejects_malformed_device_date() {
    let caller = MockCaller::returning(Vec::new());
    let app = init_app!(caller);

    let req = test::TestRequest::post()
        .uri("/clock-in")
        .set_json(json!({
            "workOrderAssemblyId": 12345,
            "userId": 42,
            "divisionFK": 1,
            "deviceDate": "next tuesday"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(caller.calls().is_empty());
}

#[actix_rt::test]
async fn clock_out_complete_flag_selects_message() {
    for (complete, status, message) in [
        (true, "success", "Clock out completed"),
        (false, "pending", "Clock out pending"),
    ] {
        let caller = MockCaller::returning(Vec::new());
        let app = init_app!(caller);

        let req = test::TestRequest::post()
            .uri("/clock-out")
            .set_json(json!({
                "workOrderCollectionId": 777,
                "quantity": "12.5",
                "quantityScrapped": 0,
                "scrapReasonPK": 3,
                "complete": complete,
                "comment": "shift change",
                "deviceTime": "2024-01-01T16:30:00Z",
                "divisionFK": 1
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = json_body(resp).await;
        assert_eq!(body["status"], status);
        assert_eq!(body["message"], message);

        let calls = caller.calls();
        assert_eq!(calls[0].0, "dbo.uspClockOut");
        assert_eq!(calls[0].1[0], ProcValue::Int(777));
        assert_eq!(calls[0].1[1], ProcValue::Decimal("12.5".parse().unwrap()));
        assert_eq!(calls[0].1[4], ProcValue::Bool(complete));
    }
}

#[actix_rt::test]
async fn clock_out_rejects_non_boolean_complete() {
    let caller = MockCaller::returning(Vec::new());
    let app = init_app!(caller);

    let req = test::TestRequest::post()
        .uri("/clock-out")
        .set_json(json!({
            "workOrderCollectionId": 777,
            "quantity": 1,
            "quantityScrapped": 0,
            "scrapReasonPK": 0,
            "complete": 1,
            "divisionFK": 1
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(caller.calls().is_empty());
}

#[actix_rt::test]
async fn user_status_coerces_mixed_row_types() {
    let mut row = ProcRow::new();
    row.insert("user_id".to_string(), json!(42));
    row.insert("first_name".to_string(), json!("Ada"));
    row.insert("last_name".to_string(), json!("Lovelace"));
    row.insert("work_order_collection_id".to_string(), json!(777));
    row.insert("work_order_number".to_string(), json!(1001));
    row.insert("work_order_assembly_number".to_string(), json!(12));
    row.insert("clock_in_time".to_string(), json!("2024-01-01T07:45:00"));
    row.insert("part_number".to_string(), json!("P-77"));
    row.insert("operation_code".to_string(), json!("OP-10"));
    row.insert("operation_name".to_string(), json!("Deburr"));

    let caller = MockCaller::returning(vec![row]);
    let app = init_app!(caller);

    let req = test::TestRequest::get().uri("/users/42").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["userId"], 42);
    assert_eq!(body["firstName"], "Ada");
    assert_eq!(body["workOrderNumber"], "1001");
    assert_eq!(body["clockInTime"], "2024-01-01T07:45:00");
    assert_eq!(body["operationName"], "Deburr");

    let calls = caller.calls();
    assert_eq!(calls[0].0, "dbo.uspGetUserStatus");
    assert_eq!(calls[0].1, vec![ProcValue::Int(42)]);
}

#[actix_rt::test]
async fn user_status_returns_not_found_without_rows() {
    let caller = MockCaller::returning(Vec::new());
    let app = init_app!(caller);

    let req = test::TestRequest::get().uri("/users/42").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn user_status_rejects_non_positive_user_id() {
    let caller = MockCaller::returning(Vec::new());
    let app = init_app!(caller);

    let req = test::TestRequest::get().uri("/users/0").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(caller.calls().is_empty());
}

#[actix_rt::test]
async fn upstream_failure_is_propagated_as_server_error() {
    let caller = MockCaller::failing();
    let app = init_app!(caller);

    let req = test::TestRequest::post()
        .uri("/clock-in")
        .set_json(json!({
            "workOrderAssemblyId": 12345,
            "userId": 42,
            "divisionFK": 1
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(resp).await;
    assert_eq!(body["status"], "error");
}
