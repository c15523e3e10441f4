use clap::Parser;
use toon_savings::utils::error::{ErrorSeverity, SavingsError};
use toon_savings::utils::{logger, validation::Validate};
use toon_savings::{
    render_summary, AnalysisEngine, CliConfig, FormatComparator, LocalStorage, ReportPipeline,
    TokenCounter, ToonCodec,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting toon-savings CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let catalog = config.load_catalog().unwrap_or_else(|e| fail(e));
    let tokenizer = TokenCounter::for_encoding(&config.encoding).unwrap_or_else(|e| fail(e));
    if tokenizer.is_estimate() {
        tracing::info!("💡 Token counts are estimated at ~4 characters per token");
    }
    tracing::debug!("Loaded {} model profiles", catalog.len());

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 建立比較器、存儲與管道
    let comparator = FormatComparator::new(ToonCodec::default(), tokenizer, config.encoding.clone());
    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = ReportPipeline::new(storage, config, comparator, catalog);

    let engine = AnalysisEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output) => {
            tracing::info!("✅ Analysis completed successfully!");
            print!("{}", render_summary(&output.report));
            if let Some(path) = output.output_path {
                println!("📁 Report saved to: {}", path);
            }
        }
        Err(e) => fail(e),
    }

    Ok(())
}

fn fail(e: SavingsError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Analysis failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
