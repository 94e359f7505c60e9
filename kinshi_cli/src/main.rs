mod report;

use std::{
    fs::File,
    io::{self, BufReader, Write},
    path::PathBuf,
};

use anyhow::{bail, Context};
use clap::Parser;
use osu_parser::ParseOptions;
use osu_schema::Chart;
use osz_archive::{EntryHandle, OszArchive};
use strain_calc::{StrainConfig, WindowSpec};

#[derive(Debug, Parser)]
#[command(name = "kinshi")]
#[command(about = "Aim and speed strain of osu! beatmaps", long_about = None)]
struct Cli {
    /// Beatmap archive (.osz)
    archive: PathBuf,

    /// Chart to analyse. Lists the charts in the archive when omitted.
    index: Option<usize>,

    /// Aggregation window length in ms
    #[arg(long, default_value_t = WindowSpec::DEFAULT_SIZE_MS)]
    window_size: f64,

    /// Start of the first window in ms
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    window_origin: f64,

    /// Print one JSON report instead of the tab-separated blocks
    #[arg(long)]
    json: bool,

    /// Stop storing hit objects after this many
    #[arg(long)]
    max_objects: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Usage errors exit with 1 like every other failure.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => {
            e.print().context("failed to write help")?;
            return Ok(());
        }
        Err(e) => {
            e.print().context("failed to write usage error")?;
            std::process::exit(1);
        }
    };

    run(cli)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let window = WindowSpec::new(cli.window_size, cli.window_origin).context("invalid window")?;
    let options = ParseOptions {
        max_hit_objects: cli.max_objects,
    };

    let mut archive = OszArchive::open(&cli.archive)
        .with_context(|| format!("failed to open: {}", cli.archive.display()))?;
    let entries = archive.chart_entries();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let Some(index) = cli.index else {
        return list_charts(&mut out, &mut archive, &entries, &options);
    };

    let entry = entries.get(index).with_context(|| {
        format!(
            "beatmap index {index} out of range ({} charts in {})",
            entries.len(),
            cli.archive.display()
        )
    })?;
    let chart = load_chart(&mut archive, entry, &options)?;

    if chart.hit_objects.is_empty() {
        bail!("beatmap has no HitObjects: {}", entry.name);
    }
    if !chart.is_standard_mode() {
        bail!(
            "only standard mode maps are supported: {} is mode {}",
            entry.name,
            chart.meta.game_mode
        );
    }

    let config = StrainConfig::default();
    let strains = strain_calc::compute(&chart, &config);
    let windows = strain_calc::aggregate(&chart, &strains, window, &config);

    if cli.json {
        report::write_json(&mut out, &chart, &strains, &windows)?;
    } else {
        report::write_text(&mut out, &chart, &strains, &windows).context("failed to write output")?;
    }
    out.flush().context("failed to write output")?;
    Ok(())
}

fn list_charts(
    out: &mut impl Write,
    archive: &mut OszArchive<BufReader<File>>,
    entries: &[EntryHandle],
    options: &ParseOptions,
) -> anyhow::Result<()> {
    for (i, entry) in entries.iter().enumerate() {
        match load_chart(archive, entry, options) {
            Ok(chart) => report::write_listing(out, i, &chart).context("failed to write output")?,
            Err(e) => log::error!("skipping {}: {e:#}", entry.name),
        }
    }
    Ok(())
}

fn load_chart(
    archive: &mut OszArchive<BufReader<File>>,
    entry: &EntryHandle,
    options: &ParseOptions,
) -> anyhow::Result<Chart> {
    let bytes = archive
        .read_entry(entry)
        .with_context(|| format!("failed to read chart: {}", entry.name))?;
    let parsed = osu_parser::parse_bytes_with_options(&bytes, options)
        .with_context(|| format!("failed to parse chart: {}", entry.name))?;

    for warning in &parsed.warnings {
        log::warn!("{}: {warning}", entry.name);
    }
    let counts = parsed.chart.kind_counts();
    log::info!(
        "{}: {} circles, {} sliders, {} spinners",
        entry.name,
        counts.circles,
        counts.sliders,
        counts.spinners
    );
    Ok(parsed.chart)
}
