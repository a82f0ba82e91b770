mod common;

use anyhow::Result;
use folio_admin::domain::forms::{ExperienceForm, ProjectForm, SkillForm};
use folio_admin::domain::model::{Certification, EntityId, Experience, Project, Skill, SkillCategory};
use folio_admin::domain::ports::Outcome;
use folio_admin::{EntityManager, FolioError, ManagerState};
use httpmock::prelude::*;
use serde_json::json;

#[tokio::test]
async fn test_load_replaces_items_in_server_order() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/experience");
            then.status(200).json_body(json!([
                {"_id": "e2", "role": "Payroll Lead", "company": "Beta", "duration": "2020-2022", "description": "Ran payroll"},
                {"_id": "e1", "role": "HR Officer", "company": "Acme", "duration": "2018-2020", "description": "Hiring"}
            ]));
        })
        .await;

    let mut manager: EntityManager<Experience> =
        EntityManager::new(common::client_for(&server), common::recorder());
    manager.load().await?;
    manager.load().await?;

    let ids: Vec<&str> = manager.items().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["e2", "e1"]);
    Ok(())
}

#[tokio::test]
async fn test_load_failure_keeps_previous_items_and_notifies() -> Result<()> {
    let server = MockServer::start_async().await;
    let mut ok = server
        .mock_async(|when, then| {
            when.method(GET).path("/certifications");
            then.status(200).json_body(json!([
                {"_id": "c1", "title": "SHRM-CP", "issuer": "SHRM", "year": "2021"}
            ]));
        })
        .await;

    let notifier = common::recorder();
    let mut manager: EntityManager<Certification> =
        EntityManager::new(common::client_for(&server), notifier.clone());
    manager.load().await?;
    assert_eq!(manager.items()[0].name, "SHRM-CP");
    assert_eq!(manager.items()[0].date, "2021");

    ok.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/certifications");
            then.status(503);
        })
        .await;

    assert!(manager.load().await.is_err());
    assert_eq!(manager.items().len(), 1);
    let last = notifier.last().expect("failure notice");
    assert_eq!(last.action, "Failed to load certifications");
    Ok(())
}

/// Experience reconciles by re-fetching the whole collection.
#[tokio::test]
async fn test_create_reloads_collection() -> Result<()> {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/experience").json_body(json!({
                "role": "HR Manager",
                "company": "Acme",
                "duration": "2022-now",
                "description": "People ops"
            }));
            then.status(201).json_body(json!({"_id": "e9"}));
        })
        .await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/experience");
            then.status(200).json_body(json!([
                {"_id": "e9", "role": "HR Manager", "company": "Acme", "duration": "2022-now", "description": "People ops"}
            ]));
        })
        .await;

    let notifier = common::recorder();
    let mut manager: EntityManager<Experience> =
        EntityManager::new(common::client_for(&server), notifier.clone());

    manager
        .submit_with(ExperienceForm {
            role: "HR Manager".into(),
            company: "Acme".into(),
            duration: "2022-now".into(),
            description: "People ops".into(),
        })
        .await?;

    assert_eq!(manager.items().len(), 1);
    assert_eq!(manager.state(), &ManagerState::Idle);
    assert_eq!(manager.draft(), &ExperienceForm::default());

    let actions: Vec<String> = notifier.notices().into_iter().map(|n| n.action).collect();
    assert_eq!(actions.first().map(String::as_str), Some("Adding experience"));
    assert_eq!(actions.last().map(String::as_str), Some("Added experience"));

    create.assert_async().await;
    list.assert_async().await;
    Ok(())
}

/// Skills reconcile from the mutation response instead of reloading.
#[tokio::test]
async fn test_skill_create_and_update_apply_response() -> Result<()> {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/skills");
            then.status(200).json_body(json!([
                {"_id": "s1", "name": "Recruiting", "category": "hr"}
            ]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/skills")
                .json_body(json!({"name": "Budgeting", "category": "finance"}));
            then.status(201)
                .json_body(json!({"_id": "s2", "name": "Budgeting", "category": "finance"}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/skills/s1")
                .json_body(json!({"name": "Talent Acquisition", "category": "hr"}));
            then.status(200)
                .json_body(json!({"_id": "s1", "name": "Talent Acquisition", "category": "hr"}));
        })
        .await;

    let mut manager: EntityManager<Skill> =
        EntityManager::new(common::client_for(&server), common::recorder());
    manager.load().await?;

    let draft = manager.begin_create();
    draft.name = "Budgeting".into();
    draft.category = SkillCategory::Finance;
    manager.submit().await?;

    // Category sticks for the next addition.
    assert_eq!(manager.draft().category, SkillCategory::Finance);
    assert_eq!(manager.draft().name, "");

    manager.begin_edit(&EntityId::new("s1"))?.name = "Talent Acquisition".into();
    manager.submit().await?;

    let names: Vec<&str> = manager.items().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Talent Acquisition", "Budgeting"]);
    assert_eq!(list.hits_async().await, 1);

    assert_eq!(manager.by_category(SkillCategory::Finance).len(), 1);
    let grouped = manager.grouped();
    assert_eq!(grouped[0].0, SkillCategory::Hr);
    assert_eq!(grouped[0].1[0].name, "Talent Acquisition");
    assert!(grouped[2].1.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_project_payload_splits_technologies() -> Result<()> {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/projects").json_body(json!({
                "title": "Payroll revamp",
                "description": "Moved payroll to SAP",
                "link": "",
                "image": "https://cdn/p.png",
                "technologies": ["Excel", "SAP", "PowerBI"]
            }));
            then.status(201);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/projects");
            then.status(200).json_body(json!([]));
        })
        .await;

    let mut manager: EntityManager<Project> =
        EntityManager::new(common::client_for(&server), common::recorder());
    manager
        .submit_with(ProjectForm {
            title: "Payroll revamp".into(),
            technologies: "Excel, SAP,  PowerBI,".into(),
            description: "Moved payroll to SAP".into(),
            link: String::new(),
            image: "https://cdn/p.png".into(),
        })
        .await?;

    create.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_edit_prepopulates_draft() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/projects");
            then.status(200).json_body(json!([
                {"_id": "p1", "title": "Dashboards", "description": "KPIs", "technologies": ["PowerBI", "Excel"], "link": ""}
            ]));
        })
        .await;

    let mut manager: EntityManager<Project> =
        EntityManager::new(common::client_for(&server), common::recorder());
    manager.load().await?;

    let draft = manager.begin_edit(&EntityId::new("p1"))?.clone();
    assert_eq!(draft.technologies, "PowerBI, Excel");
    assert_eq!(draft.link, "");
    assert_eq!(manager.state(), &ManagerState::Editing(EntityId::new("p1")));

    let err = manager.begin_edit(&EntityId::new("missing")).unwrap_err();
    assert!(matches!(err, FolioError::NotFound { .. }));
    // Unknown id leaves the existing edit alone.
    assert_eq!(manager.state(), &ManagerState::Editing(EntityId::new("p1")));

    manager.cancel();
    assert_eq!(manager.state(), &ManagerState::Idle);
    assert_eq!(manager.draft(), &ProjectForm::default());
    Ok(())
}

#[tokio::test]
async fn test_validation_rejects_before_network() -> Result<()> {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/skills");
            then.status(201);
        })
        .await;

    let mut manager: EntityManager<Skill> =
        EntityManager::new(common::client_for(&server), common::recorder());
    let err = manager
        .submit_with(SkillForm {
            name: "   ".into(),
            category: SkillCategory::Soft,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, FolioError::Validation { ref field, .. } if field == "name"));
    assert_eq!(create.hits_async().await, 0);
    Ok(())
}

#[tokio::test]
async fn test_failed_update_keeps_state_and_draft() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/experience");
            then.status(200).json_body(json!([
                {"_id": "e1", "role": "HR Officer", "company": "Acme", "duration": "2018-2020", "description": "Hiring"}
            ]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/experience/e1");
            then.status(400).json_body(json!({"message": "Duration is malformed"}));
        })
        .await;

    let notifier = common::recorder();
    let mut manager: EntityManager<Experience> =
        EntityManager::new(common::client_for(&server), notifier.clone());
    manager.load().await?;
    manager.begin_edit(&EntityId::new("e1"))?.duration = "soon".into();

    let err = manager.submit().await.unwrap_err();
    assert_eq!(err.server_message(), Some("Duration is malformed"));
    assert_eq!(manager.state(), &ManagerState::Editing(EntityId::new("e1")));
    assert_eq!(manager.draft().duration, "soon");
    assert_eq!(manager.items()[0].duration, "2018-2020");

    let last = notifier.last().expect("failure notice");
    assert_eq!(last.action, "Failed to save experience");
    assert!(matches!(last.outcome, Outcome::Failure(ref m) if m.contains("Duration is malformed")));
    Ok(())
}

#[tokio::test]
async fn test_delete_requires_confirmation() -> Result<()> {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/projects");
            then.status(200).json_body(json!([
                {"_id": "p1", "title": "One"},
                {"_id": "p2", "title": "Two"}
            ]));
        })
        .await;
    let remove = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/projects/p1");
            then.status(200).json_body(json!({"message": "Deleted"}));
        })
        .await;

    let mut manager: EntityManager<Project> =
        EntityManager::new(common::client_for(&server), common::recorder());
    manager.load().await?;
    let id = EntityId::new("p1");

    let err = manager.delete(&id, &common::no).await.unwrap_err();
    assert!(matches!(err, FolioError::Cancelled { .. }));
    assert_eq!(remove.hits_async().await, 0);
    assert_eq!(manager.items().len(), 2);

    manager.delete(&id, &common::yes).await?;
    assert_eq!(remove.hits_async().await, 1);
    let ids: Vec<&str> = manager.items().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p2"]);
    // Removal is local; no re-fetch.
    assert_eq!(list.hits_async().await, 1);
    Ok(())
}

#[tokio::test]
async fn test_delete_failure_keeps_item() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/skills");
            then.status(200)
                .json_body(json!([{"_id": "s1", "name": "Coaching", "category": "soft"}]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/skills/s1");
            then.status(500);
        })
        .await;

    let notifier = common::recorder();
    let mut manager: EntityManager<Skill> =
        EntityManager::new(common::client_for(&server), notifier.clone());
    manager.load().await?;

    assert!(manager.delete(&EntityId::new("s1"), &common::yes).await.is_err());
    assert_eq!(manager.items().len(), 1);
    assert_eq!(
        notifier.last().map(|n| n.action),
        Some("Failed to delete skill".to_string())
    );
    Ok(())
}

/// A plain-text 2xx still counts as a landed write and triggers the reload.
#[tokio::test]
async fn test_plain_text_success_body_still_reloads() -> Result<()> {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/experience");
            then.status(201).body("Created");
        })
        .await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/experience");
            then.status(200).json_body(json!([
                {"_id": "e1", "role": "HR Manager", "company": "Acme", "duration": "2022-now", "description": "People ops"}
            ]));
        })
        .await;

    let notifier = common::recorder();
    let mut manager: EntityManager<Experience> =
        EntityManager::new(common::client_for(&server), notifier.clone());
    manager
        .submit_with(ExperienceForm {
            role: "HR Manager".into(),
            company: "Acme".into(),
            duration: "2022-now".into(),
            description: "People ops".into(),
        })
        .await?;

    assert_eq!(create.hits_async().await, 1);
    assert_eq!(list.hits_async().await, 1);
    assert_eq!(manager.items().len(), 1);
    assert_eq!(
        notifier.last().map(|n| n.outcome),
        Some(Outcome::Success)
    );
    Ok(())
}

/// Skills fall back to a reload when the create response cannot be read.
#[tokio::test]
async fn test_skill_unreadable_response_falls_back_to_reload() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/skills");
            then.status(201).body("OK");
        })
        .await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/skills");
            then.status(200)
                .json_body(json!([{"_id": "s7", "name": "Budgeting", "category": "finance"}]));
        })
        .await;

    let mut manager: EntityManager<Skill> =
        EntityManager::new(common::client_for(&server), common::recorder());
    manager
        .submit_with(SkillForm {
            name: "Budgeting".into(),
            category: SkillCategory::Finance,
        })
        .await?;

    assert_eq!(list.hits_async().await, 1);
    assert_eq!(manager.items()[0].id.as_str(), "s7");
    Ok(())
}

/// One record with a `null` or numeric field does not sink the collection.
#[tokio::test]
async fn test_load_tolerates_null_and_numeric_fields() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/experience");
            then.status(200).json_body(json!([
                {"_id": "e1", "role": "HR Officer", "company": null, "duration": 2019, "description": "Hiring"},
                {"_id": "e2", "role": "Payroll Lead", "company": "Beta", "duration": "2020-2022", "description": "Payroll"}
            ]));
        })
        .await;

    let mut manager: EntityManager<Experience> =
        EntityManager::new(common::client_for(&server), common::recorder());
    manager.load().await?;

    assert_eq!(manager.items().len(), 2);
    assert_eq!(manager.items()[0].company, "");
    assert_eq!(manager.items()[0].duration, "2019");
    Ok(())
}
