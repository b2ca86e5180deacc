use biblio_etl::core::classifier::classify;
use biblio_etl::core::router::output_file_name;
use biblio_etl::utils::logger;
use biblio_etl::{
    CliConfig, ExcelSink, ExcelSource, IntakeRouter, ReportError, ReportPipeline, Settings,
};
use chrono::Local;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let _guard = logger::init_logger(cli.verbose);

    tracing::info!("Starting biblio-etl");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let settings = match Settings::resolve(&cli) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!("❌ Configuration validation failed: {}", err);
            eprintln!("❌ {}", err);
            std::process::exit(1);
        }
    };

    let pipeline = ReportPipeline::new(ExcelSource, ExcelSink, settings.branches.clone());

    // Single-file mode: classify the given file by name, transform it and
    // exit. Nothing is relocated.
    if let Some(input) = &cli.input {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let kind = classify(&name).ok_or(ReportError::ClassificationUnknown { name })?;

        std::fs::create_dir_all(&settings.output)?;
        let output = settings.output.join(output_file_name(kind, Local::now()));
        let summary = pipeline.process(kind, input, &output)?;

        tracing::info!(
            "✅ {} records written across {} sheets",
            summary.rows_kept,
            summary.sheets
        );
        println!("✅ Report saved to: {}", output.display());
        return Ok(());
    }

    let router = IntakeRouter::new(pipeline, &settings)?;

    if cli.once {
        let summary = router.run_once()?;
        println!(
            "✅ Pass complete: {} processed, {} failed",
            summary.processed, summary.failed
        );
    } else {
        router.watch().await?;
    }

    Ok(())
}
