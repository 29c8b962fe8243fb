use alumni_map::adapters::console::{parse_console_command, ConsoleCommand, CONSOLE_HELP};
use alumni_map::core::aggregator::{distinct_options, summarize};
use alumni_map::core::normalizer::normalize_table;
use alumni_map::core::RowSource;
use alumni_map::domain::ports::ConfigProvider;
use alumni_map::utils::error::{AppError, ErrorSeverity};
use alumni_map::utils::{logger, validation::Validate};
use alumni_map::{
    CliConfig, ConsoleMap, ConsolePresenter, FileCsvSource, HtmlPresenter, HttpCsvSource,
    MapEngine, RefreshOutcome, ViewCoordinator, ViewSettings,
};
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting alumni-map");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    let source: Arc<dyn RowSource> = if config.source().contains("://") {
        match HttpCsvSource::from_config(&config) {
            Ok(source) => Arc::new(source),
            Err(e) => fail(&e),
        }
    } else {
        Arc::new(FileCsvSource::new(config.source()))
    };

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - fetching once without rendering");
        if let Err(e) = dry_run(source.as_ref(), &config).await {
            fail(&e);
        }
        return Ok(());
    }

    let map = match &cli.export {
        Some(path) => ConsoleMap::with_export(path),
        None => ConsoleMap::new(),
    };
    let panel = match &cli.html {
        Some(path) => HtmlPresenter::with_snapshot(path),
        None => HtmlPresenter::new(),
    };

    let mut coordinator = ViewCoordinator::new(
        map,
        (ConsolePresenter::stdout(), panel),
        ViewSettings::from_config(&config),
    );
    coordinator.set_query(cli.initial_query());

    let mut engine = MapEngine::new(source, coordinator, config.refresh_interval());

    if cli.once {
        return match engine.refresh_once().await {
            RefreshOutcome::Failed { message } => {
                eprintln!("❌ {}", message);
                std::process::exit(2);
            }
            _ => Ok(()),
        };
    }

    let (event_tx, event_rx) = mpsc::channel(32);
    let (quit_tx, quit_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match parse_console_command(&line) {
                Ok(Some(ConsoleCommand::Ui(event))) => {
                    if event_tx.send(event).await.is_err() {
                        break;
                    }
                }
                Ok(Some(ConsoleCommand::Help)) => println!("{}", CONSOLE_HELP),
                Ok(Some(ConsoleCommand::Quit)) => {
                    let _ = quit_tx.send(());
                    return;
                }
                Ok(None) => {}
                Err(e) => eprintln!("❌ {} (type 'help')", e.user_friendly_message()),
            }
        }
    });

    let shutdown = async {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = quit_rx => {}
        }
    };

    let stats = engine.run(event_rx, shutdown).await;
    tracing::info!(
        "✅ Done: {} refreshes applied, {} failed, {} stale, {} skipped, {} events",
        stats.applied,
        stats.failed,
        stats.stale,
        stats.skipped,
        stats.events
    );

    Ok(())
}

async fn dry_run(source: &dyn RowSource, config: &impl ConfigProvider) -> alumni_map::Result<()> {
    let table = source.fetch().await?;
    let report = normalize_table(&table, config.schema_mode())?;
    let summary = summarize(&report.records);
    let options = distinct_options(&report.records);

    println!("Source:    {}", source.describe());
    println!("Layout:    {}", report.schema);
    println!("Rows:      {} read, {} kept, {} skipped", table.rows.len(), report.records.len(), report.dropped);
    println!("Countries: {}", summary.distinct_countries);
    println!("Years:     {}", summary.year_range_label());
    println!(
        "Filters:   {} years, {} countries",
        options.years.len(),
        options.countries.len()
    );
    Ok(())
}

fn fail(e: &AppError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
