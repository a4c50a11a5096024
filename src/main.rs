use clap::Parser;
use ltv_insights::core::ConfigProvider;
use ltv_insights::utils::error::ErrorSeverity;
use ltv_insights::utils::{logger, validation::Validate};
use ltv_insights::{
    CliConfig, DeliveryDispatcher, EmailDispatch, EmailRequest, LocalStorage, LtvEngine, LtvError,
    Mailer, ReportFormatter, TomlConfig,
};

async fn run(config: &CliConfig) -> ltv_insights::Result<()> {
    let toml_config = config
        .config
        .as_deref()
        .map(|path| {
            tracing::info!("📁 Loading configuration from: {}", path);
            TomlConfig::from_file(path)
        })
        .transpose()?;

    if let Some(toml_config) = &toml_config {
        toml_config.validate()?;
    }

    let provider = config.resolve(toml_config.as_ref());

    let storage = LocalStorage::new(provider.output_path().to_string());
    let mailer = Mailer::from_settings(&provider.email_settings())?;
    let formatter = ReportFormatter::new(provider.report_settings());
    let engine = LtvEngine::new(DeliveryDispatcher::new(storage, mailer, formatter));

    let form = config.form(toml_config.as_ref().and_then(|t| t.form()).as_ref());
    let analysis = engine.analyze(&form)?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        println!(
            "✅ {}",
            engine.dispatcher().formatter().summary_line(&analysis.result)
        );
        for point in &analysis.projection {
            println!(
                "   Year {}: LTV {:.2}, ROI {:.2}%, Profit {:.2}",
                point.year, point.cumulative_ltv, point.roi, point.profit
            );
        }
    }

    let report = engine.report(&analysis)?;

    if !config.no_download {
        let document = engine.download(&report, provider.file_name()).await?;
        println!("📁 Report saved to: {}/{}", provider.output_path(), document.file_name);
    }

    if let Some(csv_name) = &config.projection_csv {
        engine
            .dispatcher()
            .download_projection(&report, csv_name)
            .await?;
        println!("📈 Projection saved to: {}/{}", provider.output_path(), csv_name);
    }

    if let Some(address) = &config.email {
        let request = EmailRequest::new(address.as_str(), config.name.clone());
        let mut dispatch = EmailDispatch::new();
        dispatch.send(engine.dispatcher(), &report, &request).await?;
        println!("📧 Report emailed to {}", request.address.trim());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting ltv-insights CLI");
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

    if let Err(e) = run(&config).await {
        tracing::error!(
            "❌ ltv-insights failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        if matches!(
            e,
            LtvError::DivisionByZero { .. } | LtvError::NonFiniteResult { .. }
        ) {
            println!("ROI: N/A");
        }
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
