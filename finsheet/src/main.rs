use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use finsheet_core::dashboard::{self, Dashboard};
use finsheet_core::{DashboardConfig, MatchPolicy, Verdict, Workbook, reader};
use log::debug;
use std::path::{Path, PathBuf};

mod formatter;

#[derive(Parser)]
#[command(name = "finsheet")]
#[command(about = "Financial and forensic metric dashboards for per-company workbooks")]
#[command(long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the Excel/ODS file, one sheet per company
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List companies (sheet names)
    Companies,

    /// Extract the series of rows whose label contains any keyword
    Extract {
        /// Keywords, matched case-insensitively as substrings
        #[arg(value_name = "KEYWORD", required = true)]
        keywords: Vec<String>,

        /// Restrict to these companies
        #[arg(long = "company", value_name = "NAME")]
        companies: Vec<String>,

        /// Return every matching row instead of the first
        #[arg(long)]
        all: bool,
    },

    /// Risk verdict from the latest M, Z and F scores
    Verdict {
        #[arg(long = "company", value_name = "NAME")]
        companies: Vec<String>,
    },

    /// Accruals, forensic scores, revenue and profit for every company
    Dashboard {
        #[arg(long = "company", value_name = "NAME")]
        companies: Vec<String>,

        /// File with analyst notes to attach to the report
        #[arg(long, value_name = "NOTES")]
        notes: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON output
    Json,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<i32> {
    let config = load_config(cli.config.as_deref())?;
    config.validate().context("Invalid configuration")?;

    let workbook = reader::read_workbook(&cli.file)
        .with_context(|| format!("Failed to read file: {}", cli.file.display()))?;

    match &cli.command {
        Command::Companies => {
            let companies = workbook.companies();
            match cli.format {
                OutputFormat::Human => formatter::print_companies(&cli.file, &companies),
                OutputFormat::Json => formatter::print_json(&companies)?,
            }
            Ok(0)
        }
        Command::Extract {
            keywords,
            companies,
            all,
        } => {
            let policy = if *all {
                MatchPolicy::All
            } else {
                MatchPolicy::First
            };
            let results = run_extract(&workbook, &config, keywords, companies, policy)?;
            match cli.format {
                OutputFormat::Human => formatter::print_extractions(keywords, &results),
                OutputFormat::Json => formatter::print_json(&results)?,
            }
            Ok(0)
        }
        Command::Verdict { companies } => {
            dashboard::warn_unknown_sheets(&config, &workbook);
            let mut cards = Vec::new();
            for sheet in dashboard::select_sheets(&workbook, companies)? {
                let card = dashboard::score_card(sheet, &config)?;
                cards.push(formatter::CompanyVerdict {
                    company: sheet.name.clone(),
                    verdict: Verdict::assess(&card),
                    card,
                });
            }
            match cli.format {
                OutputFormat::Human => formatter::print_verdicts(&cards),
                OutputFormat::Json => formatter::print_json(&cards)?,
            }

            // Exit non-zero when any company is flagged
            let flagged = cards
                .iter()
                .any(|c| c.verdict == Some(Verdict::HighRisk));
            Ok(if flagged { 1 } else { 0 })
        }
        Command::Dashboard { companies, notes } => {
            let mut report = Dashboard::build(&workbook, &config, companies)?;
            if let Some(notes_path) = notes {
                let text = std::fs::read_to_string(notes_path).with_context(|| {
                    format!("Failed to read notes from {}", notes_path.display())
                })?;
                report = report.with_notes(text);
            }
            match cli.format {
                OutputFormat::Human => formatter::print_dashboard(&cli.file, &report),
                OutputFormat::Json => formatter::print_json(&report)?,
            }
            Ok(0)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    if let Some(config_path) = path {
        return DashboardConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()));
    }

    // Try to load default config from current directory if it exists
    let default_config_path = PathBuf::from("finsheet.toml");
    if default_config_path.exists() {
        debug!("Using {}", default_config_path.display());
        DashboardConfig::from_file(&default_config_path).with_context(|| {
            format!(
                "Failed to load config from {}",
                default_config_path.display()
            )
        })
    } else {
        Ok(DashboardConfig::default())
    }
}

fn run_extract(
    workbook: &Workbook,
    config: &DashboardConfig,
    keywords: &[String],
    companies: &[String],
    policy: MatchPolicy,
) -> Result<Vec<formatter::CompanyExtraction>> {
    dashboard::warn_unknown_sheets(config, workbook);
    let mut results = Vec::new();

    for sheet in dashboard::select_sheets(workbook, companies)? {
        let extractor = dashboard::extractor_for(config, sheet)?;
        results.push(formatter::CompanyExtraction {
            company: sheet.name.clone(),
            extraction: extractor.extract(sheet, keywords.to_vec(), policy),
        });
    }

    Ok(results)
}
