use std::time::Duration;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::IngestArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `depsctl ingest`.
pub async fn handle(
    args: &IngestArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let deadline = args
        .deadline_secs
        .map(Duration::from_secs)
        .or_else(|| ctx.config.ingest.deadline());

    let summary = match deadline {
        Some(deadline) => {
            ctx.service
                .ingest_project_with_deadline(&args.name, &args.version, deadline)
                .await?
        }
        None => ctx.service.ingest_project(&args.name, &args.version).await?,
    };

    output(&summary, flags.format)
}
