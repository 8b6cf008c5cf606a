pub mod fetch_trades;
pub mod ledger_report;
pub mod submit_strategy;

use crate::{
    data_sources::engine::engine_ws_api::EngineWsApi,
    handlers::job_handler::JobHandler,
    models::database::{artifact_store::ArtifactStore, db::DB},
    utils::config::AppConfig,
};
use actix::Actor;
use anyhow::Result;

/// Starts the DB actor and wires a handler from configuration.
pub async fn build_handler(config: &AppConfig) -> Result<JobHandler> {
    let db = DB::new(config.database_url.as_deref()).await?;
    let db_addr = db.start();

    let artifacts = ArtifactStore::new(&config.code_root, &config.code_extension);
    let engine = EngineWsApi::new(config.engine_config()?, artifacts);

    Ok(JobHandler::new(db_addr, engine))
}
