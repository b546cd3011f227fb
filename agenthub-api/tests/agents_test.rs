mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use common::{agent_body, create_agent, setup_test_app};
use serde_json::{json, Value};
use std::time::Duration;

#[actix_rt::test]
async fn test_create_and_get_agent() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    let req = TestRequest::post()
        .uri("/api/agents")
        .set_json(agent_body("Researcher"))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    let agent_id = body["agentId"].as_str().unwrap().to_string();
    assert!(!agent_id.is_empty());

    let req = TestRequest::get()
        .uri(&format!("/api/agents/{}", agent_id))
        .to_request();
    let agent: Value = test::call_and_read_body_json(&test_app.app, req).await;

    assert_eq!(agent["id"], agent_id.as_str());
    assert_eq!(agent["name"], "Researcher");
    assert_eq!(agent["status"], "inactive");
    assert_eq!(agent["model"], "qwen-plus");
    assert_eq!(agent["temperature"], 0.7);
    assert_eq!(agent["maxTokens"], 2048);
    assert_eq!(agent["tools"], json!(["search", "calculator"]));
    assert_eq!(agent["systemPrompt"], "You are a helpful assistant.");
    Ok(())
}

#[actix_rt::test]
async fn test_tools_default_to_empty() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    let agent_id = create_agent(
        &test_app.app,
        json!({ "name": "Plain", "systemPrompt": "Be plain." }),
    )
    .await;

    let agent = test_app.state.database.get_agent(&agent_id)?.unwrap();
    assert!(agent.tools.is_empty());
    assert!(agent.description.is_none());
    Ok(())
}

#[actix_rt::test]
async fn test_create_requires_name_and_system_prompt() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    for body in [
        json!({ "systemPrompt": "No name" }),
        json!({ "name": "No prompt" }),
        json!({ "name": "", "systemPrompt": "" }),
    ] {
        let req = TestRequest::post()
            .uri("/api/agents")
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&test_app.app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let error: Value = test::read_body_json(resp).await;
        assert!(error["error"]
            .as_str()
            .unwrap()
            .starts_with("Missing required field"));
    }

    assert!(test_app.state.database.get_all_agents()?.is_empty());
    Ok(())
}

#[actix_rt::test]
async fn test_create_rejects_unsupported_model() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    let req = TestRequest::post()
        .uri("/api/agents")
        .set_json(json!({ "name": "x", "systemPrompt": "y", "model": "gpt-4o" }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(test_app.state.database.get_all_agents()?.is_empty());
    Ok(())
}

#[actix_rt::test]
async fn test_list_agents_newest_first() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    let first = create_agent(&test_app.app, agent_body("First")).await;
    let second = create_agent(&test_app.app, agent_body("Second")).await;

    let req = TestRequest::get().uri("/api/agents").to_request();
    let agents: Vec<Value> = test::call_and_read_body_json(&test_app.app, req).await;

    let ids: Vec<&str> = agents.iter().map(|a| a["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec![second.as_str(), first.as_str()]);
    Ok(())
}

#[actix_rt::test]
async fn test_get_unknown_agent_is_404() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    let req = TestRequest::get()
        .uri("/api/agents/does-not-exist")
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let error: Value = test::read_body_json(resp).await;
    assert!(error["error"].as_str().unwrap().contains("not found"));
    Ok(())
}

#[actix_rt::test]
async fn test_update_status_keeps_identity() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let agent_id = create_agent(&test_app.app, agent_body("Updatable")).await;
    let before = test_app.state.database.get_agent(&agent_id)?.unwrap();

    actix_rt::time::sleep(Duration::from_millis(5)).await;

    let req = TestRequest::put()
        .uri(&format!("/api/agents/{}", agent_id))
        .set_json(json!({
            "status": "active",
            "id": "hijacked",
            "createdAt": "1999-01-01T00:00:00Z",
            "updatedAt": "1999-01-01T00:00:00Z"
        }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);

    let after = test_app.state.database.get_agent(&agent_id)?.unwrap();
    assert_eq!(after.id, agent_id);
    assert_eq!(after.status.as_str(), "active");
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at > before.updated_at);
    assert!(test_app.state.database.get_agent("hijacked")?.is_none());
    Ok(())
}

#[actix_rt::test]
async fn test_partial_update_leaves_other_fields() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let agent_id = create_agent(&test_app.app, agent_body("Partial")).await;

    let req = TestRequest::put()
        .uri(&format!("/api/agents/{}", agent_id))
        .set_json(json!({ "systemPrompt": "New prompt", "tools": [] }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let agent = test_app.state.database.get_agent(&agent_id)?.unwrap();
    assert_eq!(agent.system_prompt, "New prompt");
    assert!(agent.tools.is_empty());
    assert_eq!(agent.name, "Partial");
    assert_eq!(agent.description.as_deref(), Some("Test agent"));
    Ok(())
}

#[actix_rt::test]
async fn test_update_rejects_unknown_fields() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let agent_id = create_agent(&test_app.app, agent_body("Strict")).await;

    let req = TestRequest::put()
        .uri(&format!("/api/agents/{}", agent_id))
        .set_json(json!({ "system_prompt": "snake case is not accepted" }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let error: Value = test::read_body_json(resp).await;
    assert!(error["error"].as_str().unwrap().contains("system_prompt"));
    Ok(())
}

#[actix_rt::test]
async fn test_empty_update_is_noop_success() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let agent_id = create_agent(&test_app.app, agent_body("Untouched")).await;
    let before = test_app.state.database.get_agent(&agent_id)?.unwrap();

    let req = TestRequest::put()
        .uri(&format!("/api/agents/{}", agent_id))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let after = test_app.state.database.get_agent(&agent_id)?.unwrap();
    assert_eq!(after, before);
    Ok(())
}

#[actix_rt::test]
async fn test_update_unknown_agent_is_404() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    let req = TestRequest::put()
        .uri("/api/agents/missing")
        .set_json(json!({ "name": "Ghost" }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = TestRequest::put()
        .uri("/api/agents/missing")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[actix_rt::test]
async fn test_activate_and_deactivate() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let agent_id = create_agent(&test_app.app, agent_body("Toggle")).await;

    let req = TestRequest::post()
        .uri(&format!("/api/agents/{}/activate", agent_id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&test_app.app, req).await;
    assert_eq!(body["success"], true);
    let agent = test_app.state.database.get_agent(&agent_id)?.unwrap();
    assert_eq!(agent.status.as_str(), "active");

    let req = TestRequest::post()
        .uri(&format!("/api/agents/{}/deactivate", agent_id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&test_app.app, req).await;
    assert_eq!(body["success"], true);
    let agent = test_app.state.database.get_agent(&agent_id)?.unwrap();
    assert_eq!(agent.status.as_str(), "inactive");

    let req = TestRequest::post()
        .uri("/api/agents/missing/activate")
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[actix_rt::test]
async fn test_delete_agent() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let agent_id = create_agent(&test_app.app, agent_body("Doomed")).await;

    let req = TestRequest::delete()
        .uri(&format!("/api/agents/{}", agent_id))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(test_app.state.database.get_agent(&agent_id)?.is_none());

    let req = TestRequest::delete()
        .uri(&format!("/api/agents/{}", agent_id))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}
