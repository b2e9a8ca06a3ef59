use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::Audit;
use crate::types::DbId;

/// A `lang_key` row with its audit names.
#[derive(Debug, Clone, FromRow)]
pub struct TranslationKey {
    pub langkey_id: DbId,
    pub langkey_key: String,
    #[sqlx(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, FromRow)]
pub struct TranslationTextRow {
    pub langkeytext_id: DbId,
    pub langkeytext_langkey_id: DbId,
    pub langkeytext_lang_code: String,
    pub langkeytext_lang_text: String,
}

/// Wire shape of a translation key together with all of its texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub translation_id: DbId,
    pub translation_code: String,
    pub translation_text: Vec<TranslationText>,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationText {
    pub lang_translation_id: DbId,
    pub lang_code: String,
    pub lang_text: String,
}

impl Translation {
    pub fn assemble(key: TranslationKey, texts: Vec<TranslationTextRow>) -> Self {
        Self {
            translation_id: key.langkey_id,
            translation_code: key.langkey_key,
            translation_text: texts.into_iter().map(TranslationText::from).collect(),
            audit: key.audit,
        }
    }
}

impl From<TranslationTextRow> for TranslationText {
    fn from(row: TranslationTextRow) -> Self {
        Self {
            lang_translation_id: row.langkeytext_langkey_id,
            lang_code: row.langkeytext_lang_code,
            lang_text: row.langkeytext_lang_text,
        }
    }
}

/// Body of `POST /translation` and `PUT /translation/:id`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct TranslationRequest {
    #[validate(length(min = 1, max = 255))]
    pub translation_key: String,

    #[validate(nested)]
    pub translation_text: Vec<TranslationTextRequest>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct TranslationTextRequest {
    #[validate(length(min = 1, max = 5))]
    pub lang_code: String,

    #[validate(length(min = 1))]
    pub lang_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn audit() -> Audit {
        Audit {
            created_by: None,
            created_by_name: None,
            created_at: Utc::now(),
            updated_by: None,
            updated_by_name: None,
            updated_at: None,
        }
    }

    #[test]
    fn assemble_maps_key_and_texts() {
        let key = TranslationKey {
            langkey_id: 3,
            langkey_key: "success_login".to_string(),
            audit: audit(),
        };
        let texts = vec![TranslationTextRow {
            langkeytext_id: 11,
            langkeytext_langkey_id: 3,
            langkeytext_lang_code: "en".to_string(),
            langkeytext_lang_text: "Login successful".to_string(),
        }];

        let translation = Translation::assemble(key, texts);
        assert_eq!(translation.translation_id, 3);
        assert_eq!(translation.translation_code, "success_login");
        assert_eq!(translation.translation_text.len(), 1);
        assert_eq!(translation.translation_text[0].lang_translation_id, 3);
        assert_eq!(translation.translation_text[0].lang_text, "Login successful");
    }

    #[test]
    fn nested_texts_are_validated() {
        let request: TranslationRequest = serde_json::from_value(serde_json::json!({
            "translation_key": "greeting",
            "translation_text": [
                {"lang_code": "en", "lang_text": "Hello"},
                {"lang_code": "", "lang_text": ""}
            ]
        }))
        .unwrap();

        let errors = request.validate().unwrap_err();
        assert!(errors.errors().contains_key("translation_text"));
    }

    #[test]
    fn texts_may_be_empty() {
        let request: TranslationRequest =
            serde_json::from_str(r#"{"translation_key": "greeting"}"#).unwrap();
        assert!(request.validate().is_ok());
        assert!(request.translation_text.is_empty());
    }
}
