use anyhow::Context;
use cart_match::adapters::ingredients::load_ingredients;
use cart_match::config::toml_config::LoggingConfig;
use cart_match::utils::error::ErrorSeverity;
use cart_match::utils::{logger, validation::Validate};
use cart_match::{
    populate_if_empty, AliasNormalizer, CartMatchError, CatalogRefresher, CatalogStore, CliConfig,
    EngineConfig, IngredientRequest, MatchResolver, MatchingEngine,
};
use clap::Parser;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 先讀配置，日誌設定才能套用 [logging]
    let config = cli.engine_config();
    let logging = match &config {
        Ok(config) => cli.logging(&config.logging),
        Err(_) => cli.logging(&LoggingConfig::default()),
    };
    if logging.json {
        logger::init_json_logger(cli.verbose, logging.level.as_deref());
    } else {
        logger::init_cli_logger(cli.verbose, logging.level.as_deref());
    }

    tracing::info!("Starting cart-match CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        let exit_code = match e.downcast_ref::<CartMatchError>() {
            Some(err) => {
                tracing::error!(
                    "❌ cart-match failed: {} (Category: {:?}, Severity: {:?})",
                    err,
                    err.category(),
                    err.severity()
                );
                eprintln!("❌ {}", err.user_friendly_message());
                eprintln!("💡 Suggestion: {}", err.recovery_suggestion());
                match err.severity() {
                    ErrorSeverity::Medium => 2,
                    ErrorSeverity::High => 1,
                    ErrorSeverity::Critical => 3,
                }
            }
            None => {
                tracing::error!("❌ cart-match failed: {:#}", e);
                eprintln!("❌ {:#}", e);
                1
            }
        };

        std::process::exit(exit_code);
    }
}

async fn run(cli: CliConfig, config: EngineConfig) -> anyhow::Result<()> {
    cli.validate()?;

    let requests = load_ingredients(&cli.ingredients)
        .with_context(|| format!("reading ingredient list {}", cli.ingredients))?;

    let store = Arc::new(CatalogStore::new());
    let source = config.catalog_source()?;
    let resolver = MatchResolver::new(AliasNormalizer::new(), config.match_settings());
    let engine = MatchingEngine::new(Arc::clone(&store), resolver);

    if !cli.watch {
        if !populate_if_empty(&store, source.as_ref()).await {
            tracing::warn!("⚠️ Catalog is empty; every ingredient will be reported unmatched");
        }
        return print_plan(&engine, &requests, &cli.cart_id);
    }

    let handle = CatalogRefresher::new(Arc::clone(&store), source, config.refresh_interval()).spawn();
    watch_plans(&store, &engine, &requests, &cli.cart_id, tokio::signal::ctrl_c()).await?;
    handle.shutdown().await;
    Ok(())
}

/// Re-prints the plan whenever the catalog version changes, until `stop`
/// resolves. Returns how many plans were printed.
async fn watch_plans<F>(
    store: &CatalogStore,
    engine: &MatchingEngine,
    requests: &[IngredientRequest],
    cart_id: &str,
    stop: F,
) -> anyhow::Result<usize>
where
    F: Future,
{
    let mut printed_version = 0;
    let mut printed = 0;
    let mut poll = tokio::time::interval(Duration::from_secs(1));
    // 只建立一次，印出計畫期間收到的訊號也不會遺失
    tokio::pin!(stop);

    loop {
        tokio::select! {
            _ = poll.tick() => {
                let version = store.version();
                if version != printed_version {
                    printed_version = version;
                    print_plan(engine, requests, cart_id)?;
                    printed += 1;
                }
            }
            _ = &mut stop => {
                tracing::info!("Stop signal received, stopping");
                return Ok(printed);
            }
        }
    }
}

fn print_plan(engine: &MatchingEngine, requests: &[IngredientRequest], cart_id: &str) -> anyhow::Result<()> {
    let plan = engine.plan_cart(requests, cart_id)?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart_match::{AvailabilityStatus, Product};

    fn rice() -> Vec<Product> {
        vec![Product::new("prod_001", "Long Grain Rice (5kg)", "grains", 3500.0, AvailabilityStatus::Available)]
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_reprints_on_new_version_and_honours_late_stop() {
        let store = Arc::new(CatalogStore::with_products(rice()));
        let engine = MatchingEngine::new(Arc::clone(&store), MatchResolver::default());
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

        let writer = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(1500)).await;
                store.replace(rice());
                tokio::time::sleep(Duration::from_millis(1000)).await;
                let _ = stop_tx.send(());
            })
        };

        let requests = [IngredientRequest::new("Rice", 1.0, "kg")];
        let printed = watch_plans(&store, &engine, &requests, "cart_watch", stop_rx)
            .await
            .unwrap();
        writer.await.unwrap();

        assert_eq!(printed, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_stops_when_signal_already_fired() {
        let store = Arc::new(CatalogStore::with_products(rice()));
        let engine = MatchingEngine::new(Arc::clone(&store), MatchResolver::default());

        let printed = watch_plans(&store, &engine, &[], "cart_watch", std::future::ready(()))
            .await
            .unwrap();

        assert!(printed <= 1);
    }
}
