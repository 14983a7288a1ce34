use super::*;
use axum::http::{Method, StatusCode};
use chrono::{TimeZone, Utc};
use serde_json::json;
use shared::domain::{ProjectStatus, ToolStatus};

use crate::{
    api::HttpToolRoomClient,
    fake_backend::{client_for, spawn_fake_backend, FakeBackend},
    store::{CheckoutForm, FormError, MutationKind, ProjectForm, ToolForm},
};

async fn loaded_controller() -> (Controller<HttpToolRoomClient>, FakeBackend) {
    let (url, backend) = spawn_fake_backend().await;
    let mut controller = Controller::new(client_for(&url));
    controller.load_all().await;
    backend.clear_requests().await;
    (controller, backend)
}

#[tokio::test]
async fn add_tool_posts_once_then_refetches_tools_and_dashboard() {
    let (mut controller, backend) = loaded_controller().await;
    controller.state_mut().tool_form = ToolForm {
        name: "Hammer Drill".to_string(),
        category: "Power Tools".to_string(),
        location: "Van 2".to_string(),
        ..ToolForm::default()
    };

    let output = controller.submit(FormKind::Tool).await.expect("submit");

    assert_eq!(output.kind(), MutationKind::CreateTool);
    assert_eq!(
        backend.request_lines().await,
        ["POST /api/tools", "GET /api/tools", "GET /api/dashboard"]
    );
    let requests = backend.requests().await;
    assert_eq!(
        requests[0].body,
        Some(json!({
            "name": "Hammer Drill",
            "category": "Power Tools",
            "location": "Van 2"
        }))
    );

    let state = controller.state();
    assert!(!state.is_loading());
    assert_eq!(state.tool_form, ToolForm::default());
    assert_eq!(state.tools.len(), 1);
    assert_eq!(state.dashboard.as_ref().map(|d| d.total_tools), Some(1));
}

#[tokio::test]
async fn checked_out_tool_disappears_from_the_checkout_selector() {
    let (url, backend) = spawn_fake_backend().await;
    let drill = backend.seed_tool("Drill", "Power Tools").await;
    let saw = backend.seed_tool("Saw", "Hand Tools").await;
    let project = backend.seed_project("Depot", ProjectStatus::Active).await;
    let worker = backend.seed_worker("Ada").await;
    let mut controller = Controller::new(client_for(&url));
    controller.load_all().await;
    assert_eq!(controller.state().available_tools().count(), 2);

    controller.state_mut().checkout_form = CheckoutForm {
        tool_id: drill.id.to_string(),
        project_id: project.id.to_string(),
        worker_id: worker.id.to_string(),
        expected_return: "2024-07-01".to_string(),
    };
    controller
        .submit(FormKind::Checkout)
        .await
        .expect("checkout");

    let state = controller.state();
    let available: Vec<_> = state.available_tools().map(|tool| tool.id.clone()).collect();
    assert_eq!(available, [saw.id]);
    assert_eq!(state.active_checkouts.len(), 1);
    assert_eq!(state.checkout_form, CheckoutForm::default());
    assert_eq!(state.dashboard.as_ref().map(|d| d.checked_out_tools), Some(1));
}

#[tokio::test]
async fn rejected_checkout_raises_alert_with_backend_detail() {
    let (mut controller, backend) = loaded_controller().await;
    backend
        .fail_next(
            Method::POST,
            "/api/checkout",
            StatusCode::BAD_REQUEST,
            json!({ "detail": "Tool unavailable" }),
        )
        .await;
    let form = CheckoutForm {
        tool_id: "t1".to_string(),
        project_id: "p1".to_string(),
        worker_id: "w1".to_string(),
        expected_return: String::new(),
    };
    controller.state_mut().checkout_form = form.clone();

    let err = controller
        .submit(FormKind::Checkout)
        .await
        .expect_err("injected failure");

    assert!(matches!(err, ControllerError::Mutation(_)));
    assert_eq!(backend.request_lines().await, ["POST /api/checkout"]);
    let state = controller.state();
    assert!(!state.is_loading());
    assert_eq!(state.checkout_form, form);
    let alert = state.alert().expect("alert");
    assert!(alert.message.contains("Tool unavailable"));
}

#[tokio::test]
async fn return_posts_checkout_id_and_refetches_dependent_collections() {
    let (url, backend) = spawn_fake_backend().await;
    let tool = backend.seed_tool("Drill", "Power Tools").await;
    let project = backend.seed_project("Depot", ProjectStatus::Active).await;
    let worker = backend.seed_worker("Ada").await;
    let mut controller = Controller::new(client_for(&url));
    controller.state_mut().checkout_form = CheckoutForm {
        tool_id: tool.id.to_string(),
        project_id: project.id.to_string(),
        worker_id: worker.id.to_string(),
        expected_return: String::new(),
    };
    controller
        .submit(FormKind::Checkout)
        .await
        .expect("checkout");
    let checkout_id = controller.state().active_checkouts[0].checkout.id.clone();
    backend.clear_requests().await;

    controller
        .return_checkout(checkout_id.clone(), None)
        .await
        .expect("return");

    let requests = backend.requests().await;
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[0].path, "/api/return");
    assert_eq!(
        requests[0].body,
        Some(json!({ "checkout_id": checkout_id.as_str() }))
    );
    assert_eq!(
        backend.request_lines().await,
        [
            "POST /api/return",
            "GET /api/tools",
            "GET /api/checkouts/active",
            "GET /api/dashboard"
        ]
    );
    let state = controller.state();
    assert!(state
        .active_checkouts
        .iter()
        .all(|row| row.checkout.id != checkout_id));
    assert!(state.tools.iter().all(|tool| tool.status == ToolStatus::Available));
}

#[tokio::test]
async fn failed_fetch_keeps_previous_collection() {
    let (url, backend) = spawn_fake_backend().await;
    backend.seed_tool("Drill", "Power Tools").await;
    let mut controller = Controller::new(client_for(&url));
    controller.load_all().await;
    assert_eq!(controller.state().tools.len(), 1);

    backend.seed_tool("Saw", "Hand Tools").await;
    backend
        .fail_next(
            Method::GET,
            "/api/tools",
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "detail": "database unavailable" }),
        )
        .await;
    controller.refresh(&[Resource::Tools]).await;

    assert_eq!(controller.state().tools.len(), 1);
    assert!(controller.state().alert().is_none());

    controller.refresh(&[Resource::Tools]).await;
    assert_eq!(controller.state().tools.len(), 2);
}

#[tokio::test]
async fn blank_form_never_reaches_the_backend() {
    let (mut controller, backend) = loaded_controller().await;

    let err = controller
        .submit(FormKind::Worker)
        .await
        .expect_err("empty form");

    assert!(matches!(
        err,
        ControllerError::Store(StoreError::Form(FormError::MissingField("name")))
    ));
    assert!(backend.requests().await.is_empty());
    assert!(!controller.state().is_loading());
}

#[tokio::test]
async fn unreachable_backend_alert_uses_the_fallback_text() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let mut controller = Controller::new(client_for(&format!("http://{addr}")));
    controller.state_mut().project_form = ProjectForm {
        name: "Depot".to_string(),
        start_date: "2024-06-01".to_string(),
        ..ProjectForm::default()
    };

    controller
        .submit(FormKind::Project)
        .await
        .expect_err("nothing listening");

    let state = controller.state();
    assert!(!state.is_loading());
    assert_eq!(
        state.alert().map(|alert| alert.message.as_str()),
        Some("Error: Failed to add project")
    );
    assert_eq!(state.project_form.name, "Depot");
}

#[tokio::test]
async fn fetch_resource_works_through_a_trait_object() {
    let (url, backend) = spawn_fake_backend().await;
    backend.seed_worker("Ada").await;
    let client = client_for(&url);
    let api: &dyn ToolRoomApi = &client;

    match fetch_resource(api, Resource::Workers).await {
        StoreEvent::Loaded(Loaded::Workers(workers)) => {
            assert_eq!(workers.len(), 1);
            assert_eq!(workers[0].name, "Ada");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn load_all_keeps_one_row_per_record_in_backend_order() {
    let (url, backend) = spawn_fake_backend().await;
    let mut projects = Vec::new();
    for name in ["Depot", "Annex", "Substation"] {
        projects.push(backend.seed_project(name, ProjectStatus::Active).await);
    }
    let mut workers = Vec::new();
    for name in ["Ada", "Grace", "Linus"] {
        workers.push(backend.seed_worker(name).await);
    }
    let mut checkouts = Vec::new();
    for day in 1..=6u32 {
        let tool = backend.seed_tool(&format!("Tool {day}"), "Power Tools").await;
        let project = &projects[day as usize % projects.len()];
        let worker = &workers[day as usize % workers.len()];
        let checkout_date = Utc
            .with_ymd_and_hms(2024, 6, day, 9, 0, 0)
            .single()
            .expect("date");
        let record = backend
            .seed_checkout(&tool.id, &project.id, &worker.id, checkout_date)
            .await;
        checkouts.push((record.id, tool.name, project.name.clone(), worker.name.clone()));
    }

    let mut controller = Controller::new(client_for(&url));
    controller.load_all().await;
    let state = controller.state();

    let project_ids: Vec<_> = state.projects.iter().map(|p| p.id.clone()).collect();
    let expected: Vec<_> = projects.iter().map(|p| p.id.clone()).collect();
    assert_eq!(project_ids, expected);

    let worker_ids: Vec<_> = state.workers.iter().map(|w| w.id.clone()).collect();
    let expected: Vec<_> = workers.iter().map(|w| w.id.clone()).collect();
    assert_eq!(worker_ids, expected);

    let active: Vec<_> = state
        .active_checkouts
        .iter()
        .map(|row| {
            (
                row.checkout.id.clone(),
                row.tool_name().to_string(),
                row.project_name().to_string(),
                row.worker_name().to_string(),
            )
        })
        .collect();
    assert_eq!(active, checkouts);

    let summary = state.dashboard.as_ref().expect("dashboard");
    assert_eq!(summary.checked_out_tools, 6);
    let recent: Vec<_> = summary
        .recent_checkouts
        .iter()
        .map(|row| {
            (
                row.checkout.id.clone(),
                row.tool_name.clone(),
                row.project_name.clone(),
                row.worker_name.clone(),
            )
        })
        .collect();
    let newest_five: Vec<_> = checkouts.iter().rev().take(5).cloned().collect();
    assert_eq!(recent, newest_five);
}
