//! End-to-end workflow tests against a live, migrated database.
//! Each test skips itself when DATABASE_URL is not configured.

mod common;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_suffix() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos()
}

async fn login(client: &Client, base_url: &str, email: &str, password: &str) -> Result<String> {
    let res = client
        .post(format!("{}/login", base_url))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::OK,
        "login as {} failed: {}",
        email,
        res.status()
    );
    let body = res.json::<Value>().await?;
    body["token"]
        .as_str()
        .map(str::to_string)
        .context("login response missing token")
}

async fn admin_token(client: &Client, base_url: &str) -> Result<String> {
    login(client, base_url, "admin@example.com", "admin123").await
}

#[tokio::test]
async fn assignment_workflow_end_to_end() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    common::run_seed()?;

    let server = common::ensure_server().await?;
    let client = Client::new();
    let base = &server.base_url;
    let suffix = unique_suffix();

    let admin = admin_token(&client, base).await?;

    // Admin creates a salesperson user
    let sales_email = format!("sales-{}@example.com", suffix);
    let res = client
        .post(format!("{}/users", base))
        .bearer_auth(&admin)
        .json(&json!({
            "name": "Field Sales",
            "email": sales_email,
            "password": "sales-password",
            "role": "salesperson"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let salesperson = res.json::<Value>().await?;
    let salesperson_id = salesperson["id"].as_str().unwrap().to_string();

    // The login token embeds the created identity
    let sales = login(&client, base, &sales_email, "sales-password").await?;
    let res = client
        .get(format!("{}/me", base))
        .bearer_auth(&sales)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let me = res.json::<Value>().await?;
    assert_eq!(me["email"], sales_email.as_str());
    assert_eq!(me["role"], "salesperson");

    // Salesperson reports location
    let res = client
        .post(format!("{}/salesperson/location", base))
        .bearer_auth(&sales)
        .json(&json!({ "latitude": 40.0, "longitude": -73.0 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // Admin creates a lead next to the salesperson
    let res = client
        .post(format!("{}/leads", base))
        .bearer_auth(&admin)
        .json(&json!({
            "name": format!("Lead {}", suffix),
            "latitude": 40.01,
            "longitude": -73.01,
            "priority": "high"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let lead = res.json::<Value>().await?;
    let lead_id = lead["id"].as_str().unwrap().to_string();
    assert_eq!(lead["status"], "new");

    // Nearby lookup from the lead's position finds our salesperson first
    let res = client
        .get(format!("{}/salespersons/nearby?lat=40.01&lng=-73.01", base))
        .bearer_auth(&admin)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let nearby = res.json::<Vec<Value>>().await?;
    assert_eq!(nearby[0]["id"], salesperson_id.as_str());
    let distances: Vec<f64> = nearby.iter().map(|s| s["distance_km"].as_f64().unwrap()).collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]), "distances not sorted: {:?}", distances);

    // Admin assigns the lead
    let res = client
        .post(format!("{}/assign", base))
        .bearer_auth(&admin)
        .json(&json!({ "lead_id": lead_id, "salesperson_id": salesperson_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let assignment = res.json::<Value>().await?;
    assert_eq!(assignment["status"], "pending");
    assert!(assignment["completed_at"].is_null());
    let assignment_id = assignment["id"].as_str().unwrap().to_string();

    // A second active assignment for the same lead is refused
    let res = client
        .post(format!("{}/assign", base))
        .bearer_auth(&admin)
        .json(&json!({ "lead_id": lead_id, "salesperson_id": salesperson_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Filtered list returns exactly one pending record for this salesperson
    let res = client
        .get(format!(
            "{}/assignments?salesperson_id={}",
            base, salesperson_id
        ))
        .bearer_auth(&admin)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let listed = res.json::<Vec<Value>>().await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["status"], "pending");
    assert_eq!(listed[0]["lead_id"], lead_id.as_str());

    // Lifecycle: pending -> in_progress -> completed, then terminal
    let res = client
        .put(format!("{}/assignments/{}", base, assignment_id))
        .bearer_auth(&sales)
        .json(&json!({ "status": "in_progress" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .put(format!("{}/assignments/{}", base, assignment_id))
        .bearer_auth(&sales)
        .json(&json!({ "status": "completed" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let completed = res.json::<Value>().await?;
    assert_eq!(completed["status"], "completed");
    assert!(!completed["completed_at"].is_null());

    let res = client
        .put(format!("{}/assignments/{}", base, assignment_id))
        .bearer_auth(&sales)
        .json(&json!({ "status": "in_progress" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT, "completed must be terminal");

    Ok(())
}

#[tokio::test]
async fn role_checks_and_duplicate_email() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    common::run_seed()?;

    let server = common::ensure_server().await?;
    let client = Client::new();
    let base = &server.base_url;
    let suffix = unique_suffix();

    let admin = admin_token(&client, base).await?;

    let email = format!("dup-{}@example.com", suffix);
    let payload = json!({
        "name": "Duplicate Target",
        "email": email,
        "password": "some-password",
        "role": "crm"
    });

    let res = client
        .post(format!("{}/users", base))
        .bearer_auth(&admin)
        .json(&payload)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // Same email again is a conflict, not a second row
    let res = client
        .post(format!("{}/users", base))
        .bearer_auth(&admin)
        .json(&payload)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // A crm user may not manage the user directory
    let crm = login(&client, base, &email, "some-password").await?;
    let res = client
        .get(format!("{}/users", base))
        .bearer_auth(&crm)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .post(format!("{}/users", base))
        .bearer_auth(&crm)
        .json(&json!({
            "name": "Should Fail",
            "email": format!("fail-{}@example.com", suffix),
            "password": "some-password",
            "role": "salesperson"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn lead_pagination_is_stable() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    common::run_seed()?;

    let server = common::ensure_server().await?;
    let client = Client::new();
    let base = &server.base_url;
    let suffix = unique_suffix();

    let admin = admin_token(&client, base).await?;

    // Ensure at least three leads exist
    for i in 0..3 {
        let res = client
            .post(format!("{}/leads", base))
            .bearer_auth(&admin)
            .json(&json!({
                "name": format!("Page Lead {}-{}", suffix, i),
                "latitude": 10.0 + i as f64,
                "longitude": 20.0
            }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let all = client
        .get(format!("{}/leads?limit=1000", base))
        .bearer_auth(&admin)
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert!(all.len() >= 3);

    // skip/limit windows must slice the same creation-ordered sequence
    let first_two = client
        .get(format!("{}/leads?skip=0&limit=2", base))
        .bearer_auth(&admin)
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert_eq!(first_two.len(), 2);
    assert_eq!(first_two[0]["id"], all[0]["id"]);
    assert_eq!(first_two[1]["id"], all[1]["id"]);

    let next_two = client
        .get(format!("{}/leads?skip=2&limit=2", base))
        .bearer_auth(&admin)
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert_eq!(next_two[0]["id"], all[2]["id"]);

    Ok(())
}
