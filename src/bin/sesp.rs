//! sesp - Sensitivity/Specificity CLI
//!
//! Command-line interface for scoring and filtering GWAS-associated variants.

use clap::{Args, Parser, Subcommand, ValueEnum};
use sensi_speci::data::{PhenotypeTable, PresenceAbsenceMatrix, VariantTable};
use sensi_speci::error::Result;
use sensi_speci::filter::{filter_variants_with_report, FilterConfig, FilterReport, FilteredVariants};
use sensi_speci::stats::{compute_stats_with_report, StatsReport};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Sensitivity and specificity of GWAS-associated variants
#[derive(Parser)]
#[command(name = "sesp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add sensitivity/specificity columns to a GWAS file
    Stats {
        #[command(flatten)]
        inputs: StatsInputs,

        /// Output path for the augmented GWAS table
        #[arg(short, long)]
        output: PathBuf,

        /// Report format: text, json or yaml
        #[arg(long, value_enum, default_value = "text")]
        format: ReportFormat,
    },

    /// Filter a GWAS file on sensitivity/specificity thresholds
    Filter {
        /// GWAS file with sensitivity/specificity columns
        #[arg(short, long, value_name = "SENSI_SPECI_GWAS_FILE")]
        gwas_file: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        /// Report format: text, json or yaml
        #[arg(long, value_enum, default_value = "text")]
        format: ReportFormat,
    },

    /// Compute sensitivity/specificity, then filter, in one pass
    Run {
        #[command(flatten)]
        inputs: StatsInputs,

        /// Output path for the augmented GWAS table
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        /// Report format: text, json or yaml
        #[arg(long, value_enum, default_value = "text")]
        format: ReportFormat,
    },

    /// Write the default filter configuration as YAML
    Example {
        /// Output path for the example YAML
        #[arg(short, long, default_value = "filter.yaml")]
        output: PathBuf,
    },
}

#[derive(Args)]
struct StatsInputs {
    /// GWAS file to parse
    #[arg(short, long)]
    gwas_file: PathBuf,

    /// Phenotype file to parse
    #[arg(short, long)]
    phenotype_file: PathBuf,

    /// Gene presence/absence file to parse
    #[arg(short = 'a', long)]
    presence_absence_file: PathBuf,

    /// Column name of the phenotype
    #[arg(short = 'c', long)]
    phenotype_col_name: String,
}

#[derive(Args)]
struct FilterArgs {
    /// Filter configuration YAML; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Column name of sensitivity of presence
    #[arg(long, help_heading = "Column names")]
    sensi_presence_col: Option<String>,

    /// Column name of specificity of presence
    #[arg(long, help_heading = "Column names")]
    speci_presence_col: Option<String>,

    /// Column name of sensitivity of absence
    #[arg(long, help_heading = "Column names")]
    sensi_absence_col: Option<String>,

    /// Column name of specificity of absence
    #[arg(long, help_heading = "Column names")]
    speci_absence_col: Option<String>,

    /// Sensitivity of presence threshold (default: 0.083)
    #[arg(long, help_heading = "Thresholds")]
    sensi_presence_thresh: Option<f64>,

    /// Specificity of presence threshold (default: 0.983)
    #[arg(long, help_heading = "Thresholds")]
    speci_presence_thresh: Option<f64>,

    /// Sensitivity of absence threshold (default: 0.083)
    #[arg(long, help_heading = "Thresholds")]
    sensi_absence_thresh: Option<f64>,

    /// Specificity of absence threshold (default: 0.983)
    #[arg(long, help_heading = "Thresholds")]
    speci_absence_thresh: Option<f64>,

    /// Keep only variants with a p-value below this (default: 1, no filtering)
    #[arg(short = 'P', long, help_heading = "P-value")]
    p_value_thresh: Option<f64>,

    /// Column holding p-values (default: lrt-pvalue)
    #[arg(long, help_heading = "P-value")]
    p_value_col: Option<String>,

    /// Directory for the filtered tables (default: current directory)
    #[arg(long, help_heading = "Outputs")]
    output_dir: Option<PathBuf>,

    /// Output path for presence-filtered variants
    #[arg(long, help_heading = "Outputs")]
    presence_output: Option<PathBuf>,

    /// Output path for absence-filtered variants
    #[arg(long, help_heading = "Outputs")]
    absence_output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
    Yaml,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let result = match cli.command {
        Commands::Stats {
            inputs,
            output,
            format,
        } => cmd_stats(&inputs, &output, format),

        Commands::Filter {
            gwas_file,
            filter,
            format,
        } => cmd_filter(&gwas_file, &filter, format),

        Commands::Run {
            inputs,
            output,
            filter,
            format,
        } => cmd_run(&inputs, &output, &filter, format),

        Commands::Example { output } => cmd_example(&output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Compute the augmented table
fn cmd_stats(inputs: &StatsInputs, output: &Path, format: ReportFormat) -> Result<()> {
    let (augmented, report) = run_stats(inputs)?;

    augmented.to_tsv(output)?;
    info!("Wrote {}", output.display());
    print_report(&report, format)
}

/// Filter an augmented table
fn cmd_filter(gwas_file: &Path, args: &FilterArgs, format: ReportFormat) -> Result<()> {
    require_file(gwas_file, "GWAS")?;
    let config = resolve_config(args)?;

    let gwas = VariantTable::from_tsv(gwas_file)?;
    info!("Parsed GWAS file with {} associated variants", gwas.n_rows());

    let (filtered, report) = filter_variants_with_report(&gwas, &config)?;
    let paths = output_paths(gwas_file, args);
    prepare_output_dir(args)?;
    write_filtered(&filtered, &paths)?;
    print_report(&report, format)
}

/// Compute then filter, writing all three tables at the end
fn cmd_run(
    inputs: &StatsInputs,
    output: &Path,
    args: &FilterArgs,
    format: ReportFormat,
) -> Result<()> {
    let config = resolve_config(args)?;
    let (augmented, stats_report) = run_stats(inputs)?;
    let (filtered, filter_report) = filter_variants_with_report(&augmented, &config)?;

    let paths = output_paths(output, args);
    prepare_output_dir(args)?;
    augmented.to_tsv(output)?;
    info!("Wrote {}", output.display());
    write_filtered(&filtered, &paths)?;

    #[derive(Serialize)]
    struct RunReport<'a> {
        stats: &'a StatsReport,
        filter: &'a FilterReport,
    }
    match format {
        ReportFormat::Text => {
            print!("{}", stats_report);
            print!("{}", filter_report);
            Ok(())
        }
        _ => print_serialized(
            &RunReport {
                stats: &stats_report,
                filter: &filter_report,
            },
            format,
        ),
    }
}

/// Write the default configuration
fn cmd_example(output: &Path) -> Result<()> {
    let yaml = FilterConfig::default().to_yaml()?;
    std::fs::write(output, &yaml)?;
    info!("Wrote example filter configuration to {}", output.display());
    println!("{}", yaml);
    Ok(())
}

fn run_stats(inputs: &StatsInputs) -> Result<(VariantTable, StatsReport)> {
    require_file(&inputs.gwas_file, "GWAS")?;
    require_file(&inputs.phenotype_file, "Phenotype")?;
    require_file(&inputs.presence_absence_file, "Presence/absence")?;

    let gwas = VariantTable::from_tsv(&inputs.gwas_file)?;
    let phenotypes = PhenotypeTable::from_tsv(&inputs.phenotype_file)?;
    let matrix = PresenceAbsenceMatrix::from_tsv(&inputs.presence_absence_file)?;
    info!(
        "Loaded {} variants, {} phenotyped samples, {} x {} presence/absence matrix",
        gwas.n_rows(),
        phenotypes.n_samples(),
        matrix.n_variants(),
        matrix.n_samples()
    );

    compute_stats_with_report(&gwas, &phenotypes, &matrix, &inputs.phenotype_col_name)
}

/// Defaults, then the YAML file, then individual flags.
fn resolve_config(args: &FilterArgs) -> Result<FilterConfig> {
    let mut config = match &args.config {
        Some(path) => {
            require_file(path, "Configuration")?;
            FilterConfig::from_yaml(&std::fs::read_to_string(path)?)?
        }
        None => FilterConfig::default(),
    };

    let cols = &mut config.columns;
    override_with(&mut cols.sensi_presence, &args.sensi_presence_col);
    override_with(&mut cols.speci_presence, &args.speci_presence_col);
    override_with(&mut cols.sensi_absence, &args.sensi_absence_col);
    override_with(&mut cols.speci_absence, &args.speci_absence_col);

    let th = &mut config.thresholds;
    override_with(&mut th.sensi_presence, &args.sensi_presence_thresh);
    override_with(&mut th.speci_presence, &args.speci_presence_thresh);
    override_with(&mut th.sensi_absence, &args.sensi_absence_thresh);
    override_with(&mut th.speci_absence, &args.speci_absence_thresh);

    override_with(&mut config.p_value.threshold, &args.p_value_thresh);
    override_with(&mut config.p_value.column, &args.p_value_col);

    config.validate()?;
    info!(
        "Thresholds defined for SE1, SP1, SE0, SP0: [{}, {}, {}, {}]",
        config.thresholds.sensi_presence,
        config.thresholds.speci_presence,
        config.thresholds.sensi_absence,
        config.thresholds.speci_absence
    );
    info!("P-value threshold defined: {}", config.p_value.threshold);
    Ok(config)
}

fn override_with<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}

/// Presence and absence output paths, named after `source` unless given
/// explicitly.
fn output_paths(source: &Path, args: &FilterArgs) -> (PathBuf, PathBuf) {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "gwas".to_string());
    let dir = args.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));

    let presence_path = args
        .presence_output
        .clone()
        .unwrap_or_else(|| dir.join(format!("presence_filtered_{}.txt", stem)));
    let absence_path = args
        .absence_output
        .clone()
        .unwrap_or_else(|| dir.join(format!("absence_filtered_{}.txt", stem)));
    (presence_path, absence_path)
}

fn prepare_output_dir(args: &FilterArgs) -> Result<()> {
    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_filtered(filtered: &FilteredVariants, paths: &(PathBuf, PathBuf)) -> Result<()> {
    let (presence_path, absence_path) = paths;
    info!(
        "Writing GWAS files: {}, {}",
        presence_path.display(),
        absence_path.display()
    );
    filtered.presence.to_tsv(presence_path)?;
    filtered.absence.to_tsv(absence_path)?;
    Ok(())
}

fn require_file(path: &Path, label: &str) -> Result<()> {
    if !path.is_file() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} file {} not found", label, path.display()),
        )
        .into());
    }
    Ok(())
}

fn print_report<R: Serialize + std::fmt::Display>(report: &R, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Text => {
            print!("{}", report);
            Ok(())
        }
        _ => print_serialized(report, format),
    }
}

fn print_serialized<R: Serialize>(report: &R, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Yaml => print!("{}", serde_yaml::to_string(report)?),
        _ => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}
