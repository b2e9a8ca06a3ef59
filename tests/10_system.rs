mod common;

use anyhow::Result;
use common::TestServer;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn root_describes_the_service() -> Result<()> {
    let server = TestServer::start().await?;

    let res = reqwest::get(server.url("/")).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Collapp API");
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
    Ok(())
}

#[tokio::test]
async fn health_reports_unreachable_database() -> Result<()> {
    let server = TestServer::start().await?;

    let res = reqwest::get(server.url("/health")).await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["status"], "degraded");
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_an_enveloped_404() -> Result<()> {
    let server = TestServer::start().await?;

    let res = reqwest::get(server.url("/api/v1/nope")).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Without a database the status text falls back to the bracketed key
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], 404);
    assert_eq!(body["status"], "[data_not_found]");
    assert!(body["data"].is_null());
    Ok(())
}
