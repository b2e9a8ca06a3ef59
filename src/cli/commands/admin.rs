use clap::Subcommand;
use serde_json::json;
use validator::ValidateEmail;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::{seed, Database};

#[derive(Subcommand)]
pub enum AdminCommands {
    #[command(about = "Create the administrator, or reset its password if the email exists")]
    Ensure {
        #[arg(long, help = "Login email")]
        email: String,

        #[arg(long, default_value = "Administrator", help = "Display name")]
        name: String,

        #[arg(long, help = "Password (defaults to DEFAULT_PASSWORD)")]
        password: Option<String>,

        #[arg(long, help = "Language code (defaults to DEFAULT_LANG)")]
        lang: Option<String>,
    },
}

pub async fn handle(
    db: &Database,
    config: &AppConfig,
    cmd: AdminCommands,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        AdminCommands::Ensure {
            email,
            name,
            password,
            lang,
        } => {
            if !email.validate_email() {
                anyhow::bail!("'{}' is not a valid email address", email);
            }

            let password = password.unwrap_or_else(|| config.accounts.default_password.clone());
            if password.is_empty() {
                anyhow::bail!("Administrator password must not be empty");
            }
            let lang = lang.unwrap_or_else(|| config.accounts.default_lang.clone());

            let user_id = seed::ensure_admin(db, &email, &name, &password, &lang).await?;

            output_success(
                &output_format,
                &format!("Administrator '{}' ready (user_id {})", email, user_id),
                Some(json!({ "user_id": user_id, "user_email": email })),
            )
        }
    }
}
