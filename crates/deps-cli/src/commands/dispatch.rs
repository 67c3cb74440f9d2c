use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Ingest(args) => commands::ingest::handle(&args, ctx, flags).await,
        Commands::Versions { name } => commands::versions::handle(&name, ctx, flags).await,
        Commands::Projects { action } => commands::projects::handle(&action, ctx, flags).await,
        Commands::Deps { action } => commands::deps::handle(&action, ctx, flags).await,
    }
}
