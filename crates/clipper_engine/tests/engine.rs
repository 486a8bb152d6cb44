use std::time::{Duration, Instant};

use clipper_engine::{
    ClientSettings, EngineConfig, EngineEvent, EngineHandle, FailureKind, FullAutoRequest,
    JobState, PollSettings,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine_for(server: &MockServer) -> EngineHandle {
    EngineHandle::new(EngineConfig {
        client: ClientSettings {
            base_url: server.uri(),
            ..ClientSettings::default()
        },
        poll: PollSettings {
            interval: Duration::from_millis(10),
        },
    })
    .expect("engine")
}

fn request() -> FullAutoRequest {
    FullAutoRequest {
        url: "https://video.example/watch?v=9".to_string(),
        api_key: String::new(),
        model: "gemini-2.5-flash".to_string(),
        watermark: String::new(),
        burn_subtitle: false,
        analysis_method: "ai".to_string(),
    }
}

/// Waits for the first event matching `pred`, skipping others.
fn wait_for(engine: &EngineHandle, pred: impl Fn(&EngineEvent) -> bool) -> Option<EngineEvent> {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if let Some(event) = engine.recv_timeout(Duration::from_millis(50)) {
            if pred(&event) {
                return Some(event);
            }
        }
    }
    None
}

#[tokio::test(flavor = "multi_thread")]
async fn second_submission_is_refused_while_first_runs() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/full-auto"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "job_id": "busy"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/job-status/busy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true, "status": "running", "step": 1, "total_steps": 5
        })))
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    engine.submit_job(request());
    assert!(wait_for(&engine, |event| matches!(event, EngineEvent::JobAccepted { .. })).is_some());

    engine.submit_job(request());
    assert!(
        wait_for(&engine, |event| matches!(event, EngineEvent::JobRejected { .. })).is_some()
    );

    engine.cancel_job();
    assert_eq!(
        wait_for(&engine, |event| *event == EngineEvent::JobCancelled),
        Some(EngineEvent::JobCancelled)
    );

    let submissions = server
        .received_requests()
        .await
        .expect("recorded")
        .into_iter()
        .filter(|request| request.url.path() == "/api/full-auto")
        .count();
    assert_eq!(submissions, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn listing_results_carry_their_sequence() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true, "current_path": "/data", "parent_path": null, "files": []
        })))
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    engine.list_directory(7, "");
    match wait_for(&engine, |event| matches!(event, EngineEvent::ListingLoaded { .. })) {
        Some(EngineEvent::ListingLoaded { seq, listing }) => {
            assert_eq!(seq, 7);
            assert_eq!(listing.current_path, "/data");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_action_is_reported_with_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/clip"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    engine.call_action("clip", json!({"video": "a.mp4", "start": "00:00:01"}));
    match wait_for(&engine, |event| matches!(event, EngineEvent::ActionCompleted { .. })) {
        Some(EngineEvent::ActionCompleted { endpoint, result }) => {
            assert_eq!(endpoint, "clip");
            assert_eq!(result.unwrap_err().kind, FailureKind::HttpStatus(500));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn cancel_after_job_ended_is_still_acknowledged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/full-auto"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "job_id": "quick"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/job-status/quick"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true, "status": "done", "step": 5, "total_steps": 5
        })))
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    engine.submit_job(request());
    assert!(wait_for(&engine, |event| matches!(
        event,
        EngineEvent::JobStatus(report) if report.state == JobState::Done
    ))
    .is_some());

    // Give the task a moment to return after its final report.
    tokio::time::sleep(Duration::from_millis(50)).await;
    engine.cancel_job();
    assert_eq!(
        wait_for(&engine, |event| *event == EngineEvent::JobCancelled),
        Some(EngineEvent::JobCancelled)
    );

    engine.submit_job(request());
    assert!(wait_for(&engine, |event| matches!(event, EngineEvent::JobAccepted { .. })).is_some());
}
