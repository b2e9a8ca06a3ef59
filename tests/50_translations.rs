mod common;

use anyhow::{Context, Result};
use common::{unique_code, TestApp};
use reqwest::StatusCode;
use serde_json::{json, Value};

fn unique_key() -> String {
    format!("test_key_{}", uuid::Uuid::new_v4().simple())
}

#[tokio::test]
async fn translation_round_trip() -> Result<()> {
    let Some(app) = TestApp::start().await? else { return Ok(()) };
    let key = unique_key();

    let (status, body) = app
        .call(app.client.post(app.url("/translation")).json(&json!({
            "translation_key": key,
            "translation_text": [
                {"lang_code": "fr", "lang_text": "Bonjour"},
                {"lang_code": "en", "lang_text": "Hello"},
            ],
        })))
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["status"], "Translation created successfully");
    assert_eq!(body["data"]["translation_code"], key.as_str());

    let id = body["data"]["translation_id"]
        .as_i64()
        .context("translation_id missing")?;
    let texts = body["data"]["translation_text"].as_array().context("texts")?;
    let codes: Vec<&str> = texts.iter().filter_map(|t| t["lang_code"].as_str()).collect();
    assert_eq!(codes, ["en", "fr"]);
    assert!(texts.iter().all(|t| t["lang_translation_id"] == id));

    // Update replaces the whole set of texts
    let (status, body) = app
        .call(
            app.client
                .put(app.url(&format!("/translation/{}", id)))
                .json(&json!({
                    "translation_key": key,
                    "translation_text": [{"lang_code": "de", "lang_text": "Hallo"}],
                })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(
        body["data"]["translation_text"],
        json!([{"lang_translation_id": id, "lang_code": "de", "lang_text": "Hallo"}])
    );

    let (status, body) = app.call(app.client.get(app.url("/translation/"))).await?;
    assert_eq!(status, StatusCode::OK);
    let listed = body["data"].as_array().context("list expected")?;
    assert!(listed.iter().any(|t| t["translation_id"] == id));

    let (status, _) = app
        .call(app.client.delete(app.url(&format!("/translation/{}", id))))
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call(app.client.get(app.url(&format!("/translation/{}", id))))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn duplicate_keys_are_bad_requests() -> Result<()> {
    let Some(app) = TestApp::start().await? else { return Ok(()) };
    let key = unique_key();
    let body = json!({
        "translation_key": key,
        "translation_text": [{"lang_code": "en", "lang_text": "Once"}],
    });

    let (status, _) = app
        .call(app.client.post(app.url("/translation")).json(&body))
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, response) = app
        .call(app.client.post(app.url("/translation")).json(&body))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["status"], "Bad Request");
    assert_eq!(
        response["data"],
        Value::String(format!("Translation key already exists ({})", key))
    );
    Ok(())
}

#[tokio::test]
async fn nested_text_fields_are_validated() -> Result<()> {
    let Some(app) = TestApp::start().await? else { return Ok(()) };

    let (status, body) = app
        .call(app.client.post(app.url("/translation")).json(&json!({
            "translation_key": unique_key(),
            "translation_text": [{"lang_code": "", "lang_text": ""}],
        })))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"].get("translation_text").is_some(), "{}", body);
    Ok(())
}

#[tokio::test]
async fn translate_falls_back_to_bracketed_key() -> Result<()> {
    let Some(app) = TestApp::start().await? else { return Ok(()) };
    let translations = &app.state.services.translations;
    let key = unique_key();
    let lang = unique_code();

    assert_eq!(translations.translate(&key, "en").await, format!("[{}]", key));

    let (status, _) = app
        .call(app.client.post(app.url("/translation")).json(&json!({
            "translation_key": key,
            "translation_text": [{"lang_code": lang, "lang_text": "Localized"}],
        })))
        .await?;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(translations.translate(&key, &lang).await, "Localized");
    assert_eq!(translations.translate(&key, "en").await, format!("[{}]", key));
    assert_eq!(translations.lookup(&key, &lang).await?, Some("Localized".to_string()));
    Ok(())
}

#[tokio::test]
async fn messages_follow_the_callers_language() -> Result<()> {
    let Some(app) = TestApp::start().await? else { return Ok(()) };
    let lang = unique_code();

    // A language nobody has translated: statuses fall back to the key
    let email = common::unique_email("polyglot");
    let (status, _) = app
        .call(app.client.post(app.url("/users")).json(&json!({
            "user_name": "Polyglot",
            "user_email": email,
            "user_lang_code": lang,
        })))
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (token, _) = app.login(&email, common::DEFAULT_PASSWORD).await?;
    let res = app
        .client
        .get(app.url("/lang"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "[success_get_language]");
    Ok(())
}
