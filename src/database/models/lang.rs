use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::Audit;
use crate::types::DbId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Lang {
    pub lang_id: DbId,
    pub lang_code: String,
    pub lang_name: String,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
}

/// Body of `POST /lang` and `PUT /lang/:id`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LangRequest {
    #[validate(length(min = 1, max = 5))]
    pub lang_code: String,

    #[validate(length(min = 1, max = 255))]
    pub lang_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lang_code_is_at_most_five_chars() {
        let ok = LangRequest {
            lang_code: "en-US".to_string(),
            lang_name: "English (US)".to_string(),
        };
        assert!(ok.validate().is_ok());

        let too_long = LangRequest {
            lang_code: "en-GB1".to_string(),
            lang_name: "English".to_string(),
        };
        assert!(too_long.validate().unwrap_err().field_errors().contains_key("lang_code"));
    }
}
