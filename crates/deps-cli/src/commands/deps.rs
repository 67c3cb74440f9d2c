use deps_core::entities::Dependency;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::DepsCommands;
use crate::context::AppContext;
use crate::output::{Ack, output};

/// Handle `depsctl deps`.
pub async fn handle(
    action: &DepsCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        DepsCommands::List { name, version } => {
            let listed = ctx.service.list_dependencies(name, version).await?;
            output(&listed, flags.format)
        }
        DepsCommands::ByScore { score } => {
            let names = ctx.service.find_dependency_names_by_score(*score).await?;
            output(&names, flags.format)
        }
        DepsCommands::Add(args) => {
            let dependency = Dependency::new(&args.dependency, args.score, args.updated_at);
            ctx.service
                .add_dependency(&args.name, &args.version, &dependency)
                .await?;
            output(
                &Ack {
                    status: "added",
                    project: &args.name,
                    version: &args.version,
                    dependency: Some(&args.dependency),
                },
                flags.format,
            )
        }
        DepsCommands::Update(args) => {
            let dependency = Dependency::new(&args.dependency, args.score, args.updated_at);
            ctx.service
                .update_dependency(&args.name, &args.version, &dependency)
                .await?;
            output(
                &Ack {
                    status: "updated",
                    project: &args.name,
                    version: &args.version,
                    dependency: Some(&args.dependency),
                },
                flags.format,
            )
        }
        DepsCommands::Remove {
            name,
            version,
            dependency,
        } => {
            ctx.service
                .remove_dependency(name, version, dependency)
                .await?;
            output(
                &Ack {
                    status: "removed",
                    project: name,
                    version,
                    dependency: Some(dependency),
                },
                flags.format,
            )
        }
    }
}
