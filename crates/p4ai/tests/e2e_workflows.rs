// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! End-to-end workflow tests for p4ai
//!
//! These tests run the description and review workflows against a scripted
//! `p4` and either a scripted service or a mock HTTP webhook.


use std::time::Duration;

use fixtures::{
    ScriptedP4, ScriptedService, added_lines, capture_progress, describe_dump, describe_summary,
    workspace_diff,
};
use httpmock::prelude::*;
use p4ai::progress::ProgressEvent;
use p4ai::settings::Settings;
use p4ai::workflow::{Workflow, WorkflowOptions};
use p4ai_perforce::P4Client;
use p4ai_perforce::acquire::FAILURE_MARKER;
use p4ai_review::{ErrorKind, RequestType, ServiceError, Severity, WebhookClient};
use serde_json::json;
use similar_asserts::assert_eq;

fn review_reply(score: i64, summary: &str, severities: &[&str]) -> serde_json::Value {
    let comments: Vec<serde_json::Value> = severities
        .iter()
        .enumerate()
        .map(|(i, severity)| {
            json!({
                "file_path": "//depot/Game/Player.cpp",
                "line_number": i + 1,
                "severity": severity,
                "category": "bug",
                "message": format!("{summary} finding {i}"),
                "suggestion": ""
            })
        })
        .collect();
    json!({
        "success": true,
        "overall_score": score,
        "summary": summary,
        "comments": comments,
        "statistics": {"critical": 9, "warning": 9, "info": 9, "suggestion": 9}
    })
}

fn pending_edit_p4() -> ScriptedP4 {
    ScriptedP4::default()
        .reply(
            "describe -s 12345",
            describe_summary(
                12345,
                "pending",
                &[
                    ("//depot/Game/Player.cpp", 7, "edit"),
                    ("//depot/Game/Hud.cpp", 2, "edit"),
                ],
            ),
        )
        .reply(
            "diff -du3 //depot/Game/Player.cpp",
            workspace_diff("//depot/Game/Player.cpp", 7, &added_lines(3)),
        )
        .reply(
            "diff -du999999 //depot/Game/Player.cpp",
            workspace_diff("//depot/Game/Player.cpp", 7, &added_lines(3)),
        )
        .reply(
            "diff -du3 //depot/Game/Hud.cpp",
            workspace_diff("//depot/Game/Hud.cpp", 2, &added_lines(1)),
        )
        .reply(
            "diff -du999999 //depot/Game/Hud.cpp",
            workspace_diff("//depot/Game/Hud.cpp", 2, &added_lines(1)),
        )
}

// ============================================================================
// Review
// ============================================================================

#[tokio::test]
async fn e2e_review_single_batch() {
    let mut settings = Settings::default();
    settings.set("expert_profile", "unreal").expect("profile");
    let service = ScriptedService::default().then_reply(review_reply(
        85,
        "Mostly fine.",
        &["warning", "info"],
    ));
    let workflow = Workflow::new(P4Client::new(pending_edit_p4()), service)
        .with_options(WorkflowOptions::from(&settings));

    let result = workflow.review(12345).await;

    assert!(result.success, "error: {}", result.error);
    assert_eq!(result.overall_score, 85);
    assert_eq!(result.summary, "Mostly fine.");
    assert_eq!(result.comments.len(), 2);
    assert_eq!(result.statistics.warning, 1);
    assert_eq!(result.statistics.info, 1);
    assert_eq!(result.statistics.critical, 0);
    assert_eq!(result.batches_total, 1);
    assert_eq!(result.comments[0].suggestion, None);

    let requests = workflow_requests(&workflow);
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.request_type, RequestType::Review);
    assert_eq!(request.session_key, "cl_12345");
    assert_eq!(request.batch_info.total, 1);
    assert!(request.expert_context.contains("Unreal Engine"));
    assert_eq!(request.files.len(), 2);
    assert_eq!(request.files[0].diff, added_lines(3));
}

fn workflow_requests(
    workflow: &Workflow<ScriptedP4, ScriptedService>,
) -> Vec<p4ai_review::WebhookRequest> {
    workflow_service(workflow).requests()
}

fn workflow_service(workflow: &Workflow<ScriptedP4, ScriptedService>) -> &ScriptedService {
    workflow.service()
}

#[tokio::test]
async fn e2e_review_batches_with_failed_batch() {
    let paths: Vec<String> = (0..25).map(|i| format!("//depot/Game/Item{i:02}.cpp")).collect();
    let files: Vec<(&str, u32, &str)> = paths.iter().map(|p| (p.as_str(), 3, "edit")).collect();
    let body = added_lines(20);
    let bodies: Vec<(&str, u32, &str)> = paths.iter().map(|p| (p.as_str(), 3, body.as_str())).collect();

    let p4 = ScriptedP4::default()
        .reply("describe -s 900", describe_summary(900, "submitted", &files))
        .reply("describe -du3 900", describe_dump(900, &bodies));
    let service = ScriptedService::default()
        .then_reply(review_reply(90, "First.", &["info"]))
        .then_fail(ServiceError::Timeout { secs: 60 })
        .then_reply(review_reply(70, "Third.", &["critical", "suggestion"]));
    let (progress, events) = capture_progress();
    let workflow = Workflow::new(P4Client::new(p4), service).with_progress(progress);

    let result = workflow.review(900).await;

    assert!(result.success);
    assert_eq!(result.batches_total, 3);
    assert_eq!(result.batches_failed, 1);
    assert_eq!(result.overall_score, 80);
    assert_eq!(result.summary, "First. Third.");
    assert_eq!(result.comments.len(), 3);
    assert_eq!(result.comments[1].severity, Severity::Critical);
    assert_eq!(result.statistics.total(), 3);

    let requests = workflow_requests(&workflow);
    let sizes: Vec<usize> = requests.iter().map(|r| r.files.len()).collect();
    assert_eq!(sizes, vec![10, 10, 5]);
    assert_eq!(requests[2].files[0].depot_path, "//depot/Game/Item20.cpp");
    assert!(requests.iter().all(|r| r.batch_info.total == 3));

    let events = events.lock().expect("lock").clone();
    assert_eq!(
        events,
        vec![
            ProgressEvent::FetchingChangelist { number: 900 },
            ProgressEvent::CollectingDiffs { files: 25 },
            ProgressEvent::BatchesPlanned { total: 3 },
            ProgressEvent::ReviewingBatch {
                current: 1,
                total: 3
            },
            ProgressEvent::ReviewingBatch {
                current: 2,
                total: 3
            },
            ProgressEvent::Warning {
                message: "Batch 2/3 failed: Request timed out after 60s".to_string()
            },
            ProgressEvent::ReviewingBatch {
                current: 3,
                total: 3
            },
            ProgressEvent::MergingResults,
        ]
    );
}

#[tokio::test]
async fn e2e_review_every_batch_failed_still_completes() {
    let service = ScriptedService::default().then_fail(ServiceError::Http { status: 503 });
    let workflow = Workflow::new(P4Client::new(pending_edit_p4()), service);

    let result = workflow.review(12345).await;

    assert!(result.success);
    assert_eq!(result.batches_failed, 1);
    assert_eq!(result.overall_score, 0);
    assert_eq!(result.summary, "review complete");
    assert!(result.comments.is_empty());
}

#[tokio::test]
async fn e2e_review_pending_edit_diff_failure() {
    let p4 = ScriptedP4::default()
        .reply(
            "describe -s 12345",
            describe_summary(
                12345,
                "pending",
                &[
                    ("//depot/Game/Player.cpp", 7, "edit"),
                    ("//depot/Game/Old.cpp", 4, "delete"),
                    ("//depot/Game/Hud.cpp", 2, "edit"),
                ],
            ),
        )
        .fail("diff -du3 //depot/Game/Player.cpp", "TCP connect to perforce:1666 failed.")
        .reply(
            "diff -du3 //depot/Game/Hud.cpp",
            workspace_diff("//depot/Game/Hud.cpp", 2, &added_lines(1)),
        )
        .reply(
            "diff -du999999 //depot/Game/Hud.cpp",
            workspace_diff("//depot/Game/Hud.cpp", 2, &added_lines(1)),
        );
    let service = ScriptedService::default().then_reply(review_reply(60, "Partial.", &[]));
    let (progress, events) = capture_progress();
    let workflow = Workflow::new(P4Client::new(p4), service).with_progress(progress);

    let result = workflow.review(12345).await;

    assert!(result.success);
    let request = &workflow_requests(&workflow)[0];
    assert!(request.files[0].diff.starts_with(FAILURE_MARKER));
    assert!(request.files[0].diff.contains("TCP connect"));
    assert!(request.files[1].diff.contains("deleted"));
    assert_eq!(request.files[2].diff, added_lines(1));

    let events = events.lock().expect("lock").clone();
    assert!(events.contains(&ProgressEvent::Warning {
        message: "Diff unavailable for //depot/Game/Player.cpp".to_string()
    }));
}

#[tokio::test]
async fn e2e_review_unknown_changelist() {
    let p4 = ScriptedP4::default().fail("describe -s 404", "404 - no such changelist.");
    let service = ScriptedService::default();
    let workflow = Workflow::new(P4Client::new(p4), service);

    let result = workflow.review(404).await;

    assert!(!result.success);
    assert_eq!(result.error_kind, Some(ErrorKind::Protocol));
    assert!(result.error.starts_with("Perforce error:"));
    assert!(workflow_requests(&workflow).is_empty());
}

#[tokio::test]
async fn e2e_review_unreachable_server() {
    let workflow = Workflow::new(P4Client::new(ScriptedP4::default()), ScriptedService::default());

    let result = workflow.review(1).await;

    assert!(!result.success);
    assert_eq!(result.error_kind, Some(ErrorKind::Transport));
}

#[tokio::test]
async fn e2e_review_empty_changelist() {
    let p4 = ScriptedP4::default().reply("describe -s 5", describe_summary(5, "pending", &[]));
    let workflow = Workflow::new(P4Client::new(p4), ScriptedService::default());

    let result = workflow.review(5).await;

    assert!(!result.success);
    assert_eq!(result.error_kind, Some(ErrorKind::Content));
    assert_eq!(result.error, "No files changed in changelist 5");
}

#[tokio::test]
async fn e2e_review_over_http() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/webhook/p4ai")
                .body_includes("\"request_type\":\"review\"")
                .body_includes("\"session_key\":\"cl_12345\"");
            then.status(200)
                .json_body(review_reply(92, "Clean change.", &["suggestion"]));
        })
        .await;

    let service =
        WebhookClient::new(server.url("/webhook/p4ai"), Duration::from_secs(5)).expect("client");
    let workflow = Workflow::new(P4Client::new(pending_edit_p4()), service);

    let result = workflow.review(12345).await;

    mock.assert_async().await;
    assert!(result.success);
    assert_eq!(result.overall_score, 92);
    assert_eq!(result.statistics.suggestion, 1);
}

// ============================================================================
// Description
// ============================================================================

const CHANGE_FORM: &str = "\
Change:\t12345

Client:\thong-ws

User:\thong

Status:\tpending

Description:
\tWork in progress

Files:
\t//depot/Game/Player.cpp\t# edit
\t//depot/Game/Hud.cpp\t# edit
";

#[tokio::test]
async fn e2e_description_applied() {
    let p4 = pending_edit_p4()
        .reply("change -o 12345", CHANGE_FORM)
        .reply("change -i", "Change 12345 updated.\n");
    let service = ScriptedService::default().then_reply(json!({
        "success": true,
        "description": "Add stamina regeneration\n\n- Player ticks stamina",
        "summary": "Stamina"
    }));
    let (progress, events) = capture_progress();
    let workflow = Workflow::new(P4Client::new(p4), service).with_progress(progress);

    let result = workflow.generate_description(12345, true).await;

    assert!(result.success, "error: {}", result.error);
    assert!(result.applied);
    assert_eq!(result.summary, "Stamina");

    let form = workflow
        .client()
        .runner()
        .stdin_of("change -i")
        .expect("form sent");
    assert!(form.contains("Description:\n\tAdd stamina regeneration\n\t\n\t- Player ticks stamina\n"));
    assert!(!form.contains("Work in progress"));

    let request = &workflow_requests(&workflow)[0];
    assert_eq!(request.request_type, RequestType::Description);
    assert_eq!(request.changelist.current_description, "Work in progress");

    let events = events.lock().expect("lock").clone();
    assert_eq!(events.last(), Some(&ProgressEvent::ApplyingDescription));
}

#[tokio::test]
async fn e2e_description_not_applied() {
    let service = ScriptedService::default().then_reply(json!({
        "success": true,
        "description": "Tidy HUD",
        "summary": ""
    }));
    let workflow = Workflow::new(P4Client::new(pending_edit_p4()), service);

    let result = workflow.generate_description(12345, false).await;

    assert!(result.success);
    assert!(!result.applied);
    assert_eq!(result.description, "Tidy HUD");
    let commands = workflow.client().runner().commands();
    assert!(!commands.iter().any(|c| c.starts_with("change")));
}

#[tokio::test]
async fn e2e_description_empty() {
    let service = ScriptedService::default().then_reply(json!({
        "success": true,
        "description": "   ",
        "summary": "nothing"
    }));
    let workflow = Workflow::new(P4Client::new(pending_edit_p4()), service);

    let result = workflow.generate_description(12345, true).await;

    assert!(!result.success);
    assert_eq!(result.error_kind, Some(ErrorKind::Content));
}

#[tokio::test]
async fn e2e_description_rejected_by_service() {
    let service = ScriptedService::default()
        .then_reply(json!({"success": false, "error": "Workflow execution failed"}));
    let workflow = Workflow::new(P4Client::new(pending_edit_p4()), service);

    let result = workflow.generate_description(12345, true).await;

    assert!(!result.success);
    assert_eq!(result.error_kind, Some(ErrorKind::Protocol));
    assert_eq!(result.error, "AI service error: Workflow execution failed");
}

#[tokio::test]
async fn e2e_description_apply_failure_keeps_text() {
    let p4 = pending_edit_p4()
        .reply("change -o 12345", CHANGE_FORM)
        .fail("change -i", "Change 12345 belongs to another client.");
    let service = ScriptedService::default().then_reply(json!({
        "success": true,
        "description": "Add stamina",
        "summary": "Stamina"
    }));
    let workflow = Workflow::new(P4Client::new(p4), service);

    let result = workflow.generate_description(12345, true).await;

    assert!(!result.success);
    assert!(!result.applied);
    assert_eq!(result.description, "Add stamina");
    assert!(result.error.contains("another client"));
}
