use anyhow::{Context, Result};
use clap::Parser;
use sampling_lab::{
    data, load_records, logging, Cli, Config, JsonReporter, Lab, Reporter, TerminalReporter,
};
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    // Load config and apply CLI overrides
    let mut config = Config::load_or_default(&cli.config)?;
    cli.apply_to_config(&mut config)
        .context("Invalid command-line override")?;

    // 1. Load the population
    let records = load_records(&config.data.path, config.data.skip_malformed)
        .with_context(|| format!("Failed to load {}", config.data.path.display()))?;
    let times = data::finishing_times(&records);
    info!("Loaded {} runners", times.len());

    // 2. Run the experiments
    let mut lab = Lab::new(config, cli.experiments());
    let report = lab.run(&times).context("Experiment failed")?;

    // 3. Report results
    let reporter = if cli.no_color {
        TerminalReporter::without_colors()
    } else {
        TerminalReporter::new()
    };
    reporter.report(&report)?;

    if let Some(path) = &cli.json {
        JsonReporter::new(path)
            .report(&report)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote JSON report to {}", path.display());
    }

    Ok(())
}
