mod common;

use anyhow::Result;
use cms_api_rust::auth::Role;
use reqwest::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn toggle_featured_flips_each_time() -> Result<()> {
    let server = common::TestServer::start().await?;

    let division = json!({ "name": "Acme", "slug": "acme", "featured": false });
    let (status, body) = server.send(Method::POST, "/api/dashboard/divisions", Role::Admin, Some(division)).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], 1);

    let path = "/api/dashboard/divisions/1/toggle-featured";
    let (status, _) = server.send(Method::POST, path, Role::Editor, None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = server.send(Method::POST, path, Role::Admin, None).await?;
    assert_eq!(body["data"]["featured"], true);
    let (_, body) = server.send(Method::POST, path, Role::Admin, None).await?;
    assert_eq!(body["data"]["featured"], false);

    let (status, _) = server.send(Method::POST, "/api/dashboard/divisions/404/toggle-featured", Role::Admin, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn slug_availability_and_updates() -> Result<()> {
    let server = common::TestServer::start().await?;

    let (_, body) = server.get("/api/dashboard/divisions/slug-available?slug=acme", Some(Role::Contributor)).await?;
    assert_eq!(body["data"]["available"], true);

    let acme = json!({ "name": "Acme", "slug": "acme" });
    let beta = json!({ "name": "Beta", "slug": "beta" });
    server.send(Method::POST, "/api/dashboard/divisions", Role::Admin, Some(acme)).await?;
    server.send(Method::POST, "/api/dashboard/divisions", Role::Admin, Some(beta)).await?;

    let (_, body) = server.get("/api/dashboard/divisions/slug-available?slug=acme", Some(Role::Contributor)).await?;
    assert_eq!(body["data"]["available"], false);

    let (status, body) = server
        .send(Method::PATCH, "/api/dashboard/divisions/2", Role::Admin, Some(json!({ "slug": "acme" })))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["slug"].is_string());

    let (status, body) = server
        .send(Method::PATCH, "/api/dashboard/divisions/2", Role::Admin, Some(json!({ "description": "Second" })))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["description"], "Second");
    assert_eq!(body["data"]["slug"], "beta");

    let (status, _) = server.send(Method::DELETE, "/api/dashboard/divisions/2", Role::Admin, None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = server.get("/api/divisions/beta", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
