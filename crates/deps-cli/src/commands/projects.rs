use crate::cli::GlobalFlags;
use crate::cli::subcommands::ProjectsCommands;
use crate::context::AppContext;
use crate::output::{Ack, output};

/// Handle `depsctl projects`.
pub async fn handle(
    action: &ProjectsCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ProjectsCommands::List => {
            let projects = ctx.service.list_projects().await?;
            output(&projects, flags.format)
        }
        ProjectsCommands::Delete { name, version } => {
            ctx.service.delete_project(name, version).await?;
            output(
                &Ack {
                    status: "deleted",
                    project: name,
                    version,
                    dependency: None,
                },
                flags.format,
            )
        }
        ProjectsCommands::ByDependency { dependency } => {
            let projects = ctx.service.find_projects_by_dependency(dependency).await?;
            output(&projects, flags.format)
        }
    }
}
