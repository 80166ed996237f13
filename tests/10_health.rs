mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn root_describes_the_service() -> Result<()> {
    let server = common::TestServer::start().await?;

    let (status, body) = server.get("/", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"]["endpoints"]["dashboard"].is_string());
    Ok(())
}

#[tokio::test]
async fn health_is_ok_on_memory_store() -> Result<()> {
    let server = common::TestServer::start().await?;

    let (status, body) = server.get("/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["storage"], "ok");
    Ok(())
}
