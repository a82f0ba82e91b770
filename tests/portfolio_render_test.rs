mod common;

use anyhow::Result;
use folio_admin::{fetch_portfolio, render_text};
use httpmock::prelude::*;
use serde_json::json;

#[tokio::test]
async fn test_fetch_and_render_full_document() -> Result<()> {
    let server = MockServer::start_async().await;
    let portfolio_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/portfolio");
            then.status(200).json_body(json!({
                "hero": {
                    "title": "Jane Doe",
                    "subtitle": "HR & Finance Professional",
                    "cta": "Download CV",
                    "resumeLink": "https://cdn/cv.pdf"
                },
                "about": {
                    "title": "About Me",
                    "description": "Ten years in people operations.",
                    "education": {"degree": "BBA", "major": "Finance", "institution": "Dhaka University", "gpa": "3.8"}
                },
                "skills": {"hr": ["Recruiting"], "finance": ["Budgeting", "IFRS"], "soft": []},
                "experience": [
                    {"_id": "e1", "role": "HR Manager", "company": "Acme", "duration": "2020-now", "description": "People ops"}
                ],
                "projects": [
                    {"_id": "p1", "title": "Payroll revamp", "description": "SAP rollout", "technologies": ["SAP", "Excel"], "link": ""}
                ],
                "certifications": [
                    {"_id": "c1", "name": "SHRM-CP", "issuer": "SHRM", "date": "2021", "link": "https://cdn/shrm.pdf"}
                ],
                "contact": {"email": "jane@example.com", "location": "Dhaka"}
            }));
        })
        .await;

    let client = common::client_for(&server);
    let text = render_text(&fetch_portfolio(&client).await);

    assert!(text.starts_with("# Jane Doe\nHR & Finance Professional\n"));
    assert!(text.contains("Download CV: https://cdn/cv.pdf"));
    assert!(text.contains("- HR Manager @ Acme (2020-now)"));
    assert!(text.contains("### Financial Analysis\nBudgeting, IFRS"));
    assert!(!text.contains("### Professional Skills"));
    assert!(!text.contains("Finance & Accounting"));
    assert!(text.contains("- Payroll revamp [SAP, Excel]"));
    assert!(text.contains("- SHRM-CP | SHRM | 2021"));
    assert!(text.contains("View Credential: https://cdn/shrm.pdf"));
    assert!(text.contains("BBA in Finance"));
    assert!(text.contains("GPA: 3.8"));
    assert!(text.contains("Phone: Phone not available"));
    assert!(text.contains("Location: Dhaka"));

    let order = ["## About Me", "## Experience", "## Skills", "## Projects", "## Certifications", "## Education", "## Contact"];
    let positions: Vec<usize> = order
        .iter()
        .map(|heading| text.find(heading).expect(heading))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", text);

    portfolio_mock.assert_async().await;
    Ok(())
}

/// Both certification shapes in circulation render the same line.
#[tokio::test]
async fn test_certification_shapes_render_identically() -> Result<()> {
    let server = MockServer::start_async().await;
    let mut cms = server
        .mock_async(|when, then| {
            when.method(GET).path("/portfolio");
            then.status(200).json_body(json!({
                "certifications": [{"_id": "c1", "title": "CIPD L5", "issuer": "CIPD", "year": "2022"}]
            }));
        })
        .await;

    let client = common::client_for(&server);
    let from_title = render_text(&fetch_portfolio(&client).await);

    cms.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/portfolio");
            then.status(200).json_body(json!({
                "certifications": [{"_id": "c1", "name": "CIPD L5", "issuer": "CIPD", "date": "2022"}]
            }));
        })
        .await;
    let from_name = render_text(&fetch_portfolio(&client).await);

    assert_eq!(from_title, from_name);
    assert!(from_name.contains("- CIPD L5 | CIPD | 2022"));
    Ok(())
}

#[tokio::test]
async fn test_backend_error_falls_back_to_placeholders() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/portfolio");
            then.status(500).json_body(json!({"message": "db down"}));
        })
        .await;

    let client = common::client_for(&server);
    let text = render_text(&fetch_portfolio(&client).await);

    assert!(text.starts_with("# Portfolio\n"));
    assert!(text.contains("View Resume: #resume"));
    assert!(text.contains("Email: Email not available"));
    assert!(text.contains("Location: Location not specified"));
    assert!(!text.contains("## Experience"));
    Ok(())
}

#[tokio::test]
async fn test_null_and_empty_bodies_are_no_data() -> Result<()> {
    let server = MockServer::start_async().await;
    let mut null_body = server
        .mock_async(|when, then| {
            when.method(GET).path("/portfolio");
            then.status(200).body("null");
        })
        .await;

    let client = common::client_for(&server);
    assert_eq!(fetch_portfolio(&client).await, Default::default());

    null_body.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/portfolio");
            then.status(200).body("");
        })
        .await;
    assert_eq!(fetch_portfolio(&client).await, Default::default());
    Ok(())
}

#[tokio::test]
async fn test_unreachable_backend_still_renders() {
    let client = folio_admin::ApiClient::new("http://127.0.0.1:1", folio_admin::Session::in_memory())
        .expect("client");
    let text = render_text(&fetch_portfolio(&client).await);
    assert!(text.contains("Phone: Phone not available"));
}

/// A numeric year or a null field in one record leaves the rest of the page
/// intact.
#[tokio::test]
async fn test_loose_field_types_keep_the_page() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/portfolio");
            then.status(200).json_body(json!({
                "hero": {"title": "Jane", "subtitle": null},
                "certifications": [{"_id": "c1", "title": "SHRM-CP", "issuer": "SHRM", "year": 2021}],
                "experience": null
            }));
        })
        .await;

    let client = common::client_for(&server);
    let portfolio = fetch_portfolio(&client).await;
    assert_eq!(portfolio.hero.title, "Jane");
    assert_eq!(portfolio.certifications.len(), 1);

    let text = render_text(&portfolio);
    assert!(text.starts_with("# Jane\n"));
    assert!(text.contains("- SHRM-CP | SHRM | 2021"));
    Ok(())
}

/// When a record carries both shapes, `title` and `year` are shown.
#[tokio::test]
async fn test_certification_title_and_year_take_precedence() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/portfolio");
            then.status(200).json_body(json!({
                "certifications": [{
                    "_id": "c1", "name": "AdminName", "title": "CmsTitle",
                    "issuer": "HRCI", "date": "2022", "year": "2021"
                }]
            }));
        })
        .await;

    let client = common::client_for(&server);
    let text = render_text(&fetch_portfolio(&client).await);
    assert!(text.contains("- CmsTitle | HRCI | 2021"));
    assert!(!text.contains("AdminName"));
    Ok(())
}
