#![allow(dead_code)]

use std::collections::HashMap;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::sync::OnceCell;

use collapp_api::config::AppConfig;
use collapp_api::database::{seed, Database};
use collapp_api::state::AppState;

pub const TEST_JWT_KEY: &str = "integration-test-signing-key";
pub const ADMIN_PASSWORD: &str = "admin-password";
pub const DEFAULT_PASSWORD: &str = "default-password";

/// The server binary running on its own port, killed on drop.
///
/// Its database points at a closed port, so anything that needs PostgreSQL
/// degrades (health is 503, statuses fall back to `[key]`).
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let server = Self::spawn()?;
        server.wait_ready(Duration::from_secs(15)).await?;
        Ok(server)
    }

    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_collapp-api"));
        cmd.env("APP_ENV", "development")
            .env("SERVER_HOST", "127.0.0.1")
            .env("COLLAPP_API_PORT", port.to_string())
            .env("DATABASE_URL", "postgres://nobody@127.0.0.1:1/none")
            .env("DB_ACQUIRE_TIMEOUT_SECS", "1")
            .env("DB_MAX_IDLE_CONNS", "0")
            .env("JWT_KEY", TEST_JWT_KEY)
            .env("RUST_LOG", "warn")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        let url = format!("{}/health", self.base_url);

        while Instant::now() < deadline {
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static SCHEMA_READY: OnceCell<()> = OnceCell::const_new();

/// The router served in-process against `TEST_DATABASE_URL`, with a freshly
/// created administrator already logged in.
pub struct TestApp {
    pub base_url: String,
    pub state: AppState,
    pub client: reqwest::Client,
    pub admin_id: i32,
    pub admin_email: String,
    pub admin_token: String,
}

impl TestApp {
    /// `None` when `TEST_DATABASE_URL` is unset; the caller should skip.
    pub async fn start() -> Result<Option<Self>> {
        let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
            eprintln!("TEST_DATABASE_URL not set, skipping database test");
            return Ok(None);
        };

        let photo_dir = std::env::temp_dir().join(format!("collapp-photos-{}", uuid::Uuid::new_v4()));
        let vars: HashMap<&str, String> = HashMap::from([
            ("DATABASE_URL", database_url),
            ("DB_MAX_OPEN_CONNS", "5".to_string()),
            ("JWT_KEY", TEST_JWT_KEY.to_string()),
            ("DEFAULT_PASSWORD", DEFAULT_PASSWORD.to_string()),
            ("DEFAULT_LANG", "en".to_string()),
            ("FILES_PHOTO", photo_dir.display().to_string()),
        ]);
        let config = AppConfig::from_lookup(|key| vars.get(key).cloned());
        config.validate()?;

        let db = Database::connect(&config.database).await?;
        SCHEMA_READY
            .get_or_try_init(|| async {
                seed::apply_schema(&db).await?;
                seed::seed_defaults(&db).await?;
                Ok::<_, anyhow::Error>(())
            })
            .await?;

        let admin_email = unique_email("admin");
        let admin_id = seed::ensure_admin(&db, &admin_email, "Test Admin", ADMIN_PASSWORD, "en").await?;

        let state = AppState::new(config, db);
        let app = collapp_api::routes::app(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let client = reqwest::Client::new();
        let admin_token = login(&client, &base_url, &admin_email, ADMIN_PASSWORD)
            .await?
            .0;

        Ok(Some(Self {
            base_url,
            state,
            client,
            admin_id,
            admin_email,
            admin_token,
        }))
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    /// Send with the admin token and return status plus envelope.
    pub async fn call(&self, request: reqwest::RequestBuilder) -> Result<(StatusCode, Value)> {
        let response = request.bearer_auth(&self.admin_token).send().await?;
        let status = response.status();
        let body = response.json::<Value>().await?;
        Ok((status, body))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(String, Value)> {
        login(&self.client, &self.base_url, email, password).await
    }
}

/// Log in and return the access token plus the user view.
pub async fn login(
    client: &reqwest::Client,
    base_url: &str,
    email: &str,
    password: &str,
) -> Result<(String, Value)> {
    let response = client
        .post(format!("{}/api/v1/users/login", base_url))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;
    anyhow::ensure!(
        response.status() == StatusCode::OK,
        "login for {} failed with {}",
        email,
        response.status()
    );

    let body = response.json::<Value>().await?;
    let token = body["data"]["user_token"]
        .as_str()
        .context("login response without user_token")?
        .to_string();
    Ok((token, body["data"].clone()))
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@test.local", prefix, uuid::Uuid::new_v4().simple())
}

pub fn unique_code() -> String {
    // lang codes are at most five characters
    uuid::Uuid::new_v4().simple().to_string()[..5].to_string()
}
