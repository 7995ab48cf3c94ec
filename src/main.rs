use std::sync::Arc;

use clap::Parser;
use cost_estimator::utils::monitor::StartupMonitor;
use cost_estimator::utils::{logger, validation::Validate};
use cost_estimator::web::{self, AppState};
use cost_estimator::{
    CliConfig, Dataset, EstimatorError, EstimatorService, FeatureCatalog, ModelTrainer, Settings,
};

fn exit_with(error: &EstimatorError) -> ! {
    tracing::error!("❌ Startup failed: {}", error);
    tracing::error!("💡 Suggestion: {}", error.recovery_suggestion());
    eprintln!("❌ {}", error.user_friendly_message());
    eprintln!("💡 {}", error.recovery_suggestion());
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting cost-estimator");

    let settings = Settings::resolve(&cli).unwrap_or_else(|e| exit_with(&e));
    if cli.verbose {
        tracing::debug!("Settings: {:?}", settings);
    }

    // 驗證配置
    if let Err(e) = settings.validate() {
        exit_with(&e);
    }

    let mut monitor = StartupMonitor::new(cli.monitor);
    if monitor.is_enabled() {
        tracing::info!("🔍 System monitoring enabled");
    }

    let dataset = Dataset::from_csv_path(&settings.dataset_path).unwrap_or_else(|e| exit_with(&e));
    tracing::info!(
        "📁 Loaded {} projects from {}",
        dataset.len(),
        settings.dataset_path
    );
    monitor.phase_done("Dataset loaded");

    let trainer = ModelTrainer::new(settings.trainer.clone());
    let trained = trainer.train(&dataset).unwrap_or_else(|e| exit_with(&e));
    tracing::info!(
        "🌲 Trained {} trees on {} rows",
        trained.model.n_estimators(),
        trained.report.train_rows
    );
    tracing::info!(
        "📈 Held-out evaluation on {} rows - MSE: {:.4}, R²: {:.4}",
        trained.report.test_rows,
        trained.report.mse,
        trained.report.r2
    );
    println!("Mean Squared Error: {}", trained.report.mse);
    println!("R² Score: {}", trained.report.r2);
    monitor.phase_done("Model trained");

    let catalog = FeatureCatalog::from_file(&settings.feature_details_path)
        .unwrap_or_else(|e| exit_with(&e));
    tracing::info!("📖 Loaded {} feature descriptions", catalog.len());
    monitor.phase_done("Feature details loaded");
    monitor.log_final_stats();

    // 訓練資料不再需要
    drop(dataset);

    let state = Arc::new(AppState::new(EstimatorService::new(trained.model), catalog));

    let address = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .unwrap_or_else(|e| exit_with(&EstimatorError::IoError(e)));

    tracing::info!("✅ Listening on http://{}", address);
    println!("✅ Listening on http://{}", address);

    web::run_server(listener, state).await?;

    tracing::info!("Server stopped");
    Ok(())
}
