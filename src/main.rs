use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use trustscan::core::BinaryArtifact;
use trustscan::entropy::entropy_score;
use trustscan::triage::report::parse_report;
use trustscan::triage::scanners::{parse_ssdeep_output, parse_yara_output};
use trustscan::{AnalysisConfig, Analyzer, ExternalFindings};

/// Trust scoring for binary artifacts.
///
/// External scanners (YARA, ssdeep, a sandbox) are not run here; their
/// output is passed in as files.
#[derive(Parser, Debug)]
#[command(name = "trustscan", version, about = "Binary artifact risk assessment", long_about = None)]
struct Cli {
    /// Emit logs as JSON on stderr.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a binary file and print the summary as JSON.
    Analyze {
        /// Path to the binary.
        file: PathBuf,

        /// Matched YARA rule name. May be repeated.
        #[arg(long = "rule")]
        rules: Vec<String>,

        /// File holding `yara` stdout for this binary.
        #[arg(long)]
        yara_output: Option<PathBuf>,

        /// File holding `ssdeep` stdout for this binary.
        #[arg(long)]
        ssdeep_output: Option<PathBuf>,

        /// Sandbox behavior report (JSON) for this binary.
        #[arg(long)]
        report: Option<PathBuf>,

        /// Analysis configuration (JSON). Missing keys use defaults.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Analyze a sandbox report on its own.
    Report {
        /// Path to the report JSON.
        file: PathBuf,

        /// Analysis configuration (JSON). Missing keys use defaults.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the byte entropy of a file.
    Entropy {
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        trustscan::logging::init_tracing_json();
    } else {
        trustscan::logging::init_tracing();
    }

    match cli.command {
        Command::Analyze { file, rules, yara_output, ssdeep_output, report, config } => {
            analyze_command(&file, rules, yara_output, ssdeep_output, report, config)?
        }
        Command::Report { file, config } => report_command(&file, config)?,
        Command::Entropy { file } => entropy_command(&file)?,
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(p) => AnalysisConfig::from_path(p)
            .with_context(|| format!("Failed to load config: {}", p.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

fn analyze_command(
    file: &Path,
    mut rules: Vec<String>,
    yara_output: Option<PathBuf>,
    ssdeep_output: Option<PathBuf>,
    report: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config.as_deref())?;

    if let Some(path) = &yara_output {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read YARA output: {}", path.display()))?;
        rules.extend(parse_yara_output(&text));
    }

    let fuzzy_hash = match &ssdeep_output {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read ssdeep output: {}", path.display()))?;
            parse_ssdeep_output(&text)
        }
        None => None,
    };

    let behavior_report = match &report {
        Some(path) => {
            let bytes = fs::read(path)
                .with_context(|| format!("Failed to read report: {}", path.display()))?;
            Some(parse_report(&bytes).with_context(|| format!("Invalid report: {}", path.display()))?)
        }
        None => None,
    };

    let artifact = BinaryArtifact::from_path(file, &config.io)
        .with_context(|| format!("Failed to load binary: {}", file.display()))?;
    let findings = ExternalFindings { yara_rules: rules, behavior_report, cuckoo_score: None, fuzzy_hash };

    let analyzer = Analyzer::new(config);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start runtime")?;
    let summary = runtime.block_on(analyzer.analyze_artifact_with_deadline(&artifact, &findings));

    println!("{}", summary.to_json_string().context("Failed to serialize summary")?);
    Ok(())
}

fn report_command(file: &Path, config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config.as_deref())?;
    let bytes =
        fs::read(file).with_context(|| format!("Failed to read report: {}", file.display()))?;
    let filename = file.file_name().and_then(|os| os.to_str()).unwrap_or_default();

    let summary = Analyzer::new(config)
        .analyze_report_bytes(filename, &bytes)
        .with_context(|| format!("Invalid report: {}", file.display()))?;

    println!("{}", summary.to_json_string().context("Failed to serialize summary")?);
    Ok(())
}

fn entropy_command(file: &Path) -> Result<()> {
    let data = fs::read(file).with_context(|| format!("Failed to read file: {}", file.display()))?;
    println!("{:.3}", entropy_score(&data));
    Ok(())
}
