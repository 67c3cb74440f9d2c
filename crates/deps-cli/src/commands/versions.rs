use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `depsctl versions`.
pub async fn handle(name: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let versions = ctx.service.list_project_versions(name).await?;
    output(&versions, flags.format)
}
