use cryptoledger::application::handlers::report_handler::build_daily_report;
use cryptoledger::application::services::ledger_service::LedgerService;
use cryptoledger::config::LedgerConfig;
use cryptoledger::domain::entities::transaction::Transaction;
use cryptoledger::domain::repositories::importer::AssetRangeImporter;
use cryptoledger::domain::services::reconciliation::FillTransactionIdProcessor;
use cryptoledger::domain::value_objects::price::Price;
use cryptoledger::infrastructure::file_importer::FileImporter;
use cryptoledger::persistence::json_cache::JsonItemCache;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cryptoledger=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = LedgerConfig::from_env();
    if std::env::args().any(|arg| arg == "--force-update") {
        config.force_update = true;
    }
    config.validate()?;

    info!(
        "Ledger for {}/{} valued in {}, starting {:?}",
        config.asset_base, config.asset_quote, config.target_symbol, config.time_start
    );

    let importers: Vec<Arc<dyn AssetRangeImporter>> = if Path::new(&config.import_dir).is_dir() {
        FileImporter::open_dir(&config.import_dir)
            .await?
            .into_iter()
            .map(|importer| Arc::new(importer) as Arc<dyn AssetRangeImporter>)
            .collect()
    } else {
        warn!(
            "Import directory {} not found, working from the cache only",
            config.import_dir
        );
        Vec::new()
    };
    info!("Registered {} importers", importers.len());

    let transaction_cache = Arc::new(JsonItemCache::<Transaction>::open(&config.cache_path)?);
    let price_cache = Arc::new(JsonItemCache::<Price>::open(&config.cache_path)?);

    let ledger = Arc::new(LedgerService::new(
        importers,
        transaction_cache,
        price_cache,
        Box::new(FillTransactionIdProcessor::new()),
        config.clone(),
    )?);

    if config.force_update || !ledger.has_cached_transactions() {
        info!("Preparing import...");
        let result = ledger.update_all_from_source().await?;
        info!(
            "{} transactions and {} prices imported",
            result.transaction_count, result.price_count
        );
    }

    let transactions = ledger.query_transactions();
    let pipeline = ledger.conversion_pipeline();
    let report = build_daily_report(&transactions, &pipeline, &config.target_symbol)?;

    if report.days.is_empty() {
        info!("No transactions in the ledger");
    } else {
        print!("{}", report);
    }

    Ok(())
}
