use clap::Args;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::{seed, Database};

#[derive(Args)]
pub struct BootstrapArgs {
    #[arg(long, help = "Only apply the schema, skip seeding")]
    pub schema_only: bool,
}

pub async fn handle(
    db: &Database,
    _config: &AppConfig,
    args: BootstrapArgs,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    seed::apply_schema(db).await?;

    if args.schema_only {
        return output_success(&output_format, "Schema applied", None);
    }

    let report = seed::seed_defaults(db).await?;

    output_success(
        &output_format,
        &format!(
            "Schema applied, {} language(s) and {} message text(s) added",
            report.languages_added, report.texts_added
        ),
        Some(json!({
            "languages_added": report.languages_added,
            "texts_added": report.texts_added,
        })),
    )
}
