use anyhow::Context;
use deps_client::DepsDevClient;
use deps_config::DepsConfig;
use deps_db::DepsStore;
use deps_ingest::IngestService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: IngestService<DepsDevClient, DepsStore>,
    pub config: DepsConfig,
}

impl AppContext {
    /// Open the store and build the metadata client from `config`.
    pub async fn init(config: DepsConfig) -> anyhow::Result<Self> {
        let store = DepsStore::open_local(&config.database.path, config.database.busy_timeout())
            .await
            .with_context(|| format!("failed to open database at {}", config.database.path))?;

        let client = DepsDevClient::new(
            config.deps_dev.base_url(),
            config.deps_dev.timeout(),
            &config.deps_dev.user_agent,
        )
        .context("failed to build deps.dev client")?;

        let service = IngestService::new(client, store, config.deps_dev.ecosystem.clone());
        tracing::debug!(
            address = config.deps_dev.base_url(),
            ecosystem = %config.deps_dev.ecosystem,
            database = %config.database.path,
            "context initialized"
        );
        Ok(Self { service, config })
    }
}
