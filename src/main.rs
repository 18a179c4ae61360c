use anyhow::{anyhow, bail, Context, Result};
use crossterm::style::Stylize;
use industry_lens::config::config::{Config, API_KEY_ENV};
use industry_lens::content::{ContentProvider, GeminiProvider, Region};
use industry_lens::icons::IconSet;
use industry_lens::services::SearchOrchestrator;
use industry_lens::table_display::display_search;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// What the command line asked for
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    help: bool,
    generate_config: bool,
    config_path: Option<PathBuf>,
    print: Option<String>,
    region: Option<Region>,
    /// Industry to search right away in the TUI
    industry: Option<String>,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut cli = CliArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => cli.help = true,
            "--generate-config" => cli.generate_config = true,
            "--config" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config needs a file path"))?;
                cli.config_path = Some(PathBuf::from(path));
            }
            "--print" => {
                let industry = iter
                    .next()
                    .ok_or_else(|| anyhow!("--print needs an industry"))?;
                cli.print = Some(industry.clone());
            }
            "--region" => {
                let label = iter
                    .next()
                    .ok_or_else(|| anyhow!("--region needs a region name"))?;
                cli.region = Some(Region::from_label(label)?);
            }
            other if other.starts_with('-') => bail!("Unknown option: {}", other),
            other => {
                if cli.industry.is_some() {
                    bail!("Unexpected argument: {}", other);
                }
                cli.industry = Some(other.to_string());
            }
        }
    }

    Ok(cli)
}

fn print_help() {
    println!("{}", "Industry Lens - Industry intelligence in your terminal".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  industry-lens [OPTIONS] [INDUSTRY]");
    println!();
    println!("{}", "Options:".yellow());
    println!(
        "  {} <INDUSTRY>  - Print insights, news and quiz, then exit",
        "--print".green()
    );
    println!(
        "  {} <REGION>   - Region for the search (default from config)",
        "--region".green()
    );
    println!("  {} <FILE>     - Use an alternate config file", "--config".green());
    println!(
        "  {}      - Write a commented config file with defaults",
        "--generate-config".green()
    );
    println!("  {}               - Show this help", "--help".green());
    println!();
    println!("{}", "Regions:".yellow());
    let labels: Vec<&str> = Region::ALL.iter().map(|r| r.label()).collect();
    println!("  {}", labels.join(", "));
    println!();
    println!("{}", "Environment:".yellow());
    println!("  {}  - API key (overrides the config file)", API_KEY_ENV.green());
}

fn generate_config() -> Result<()> {
    let path = Config::get_config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Error creating config directory {}", parent.display()))?;
    }
    std::fs::write(&path, Config::create_default_with_comments())
        .with_context(|| format!("Error writing config file {}", path.display()))?;

    println!("Configuration file created at: {}", path.display());
    println!("Edit it to set your API key, model and default region.");
    Ok(())
}

fn run(cli: CliArgs) -> Result<()> {
    let config = match &cli.config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            error!(target: "config", "Failed to load config, using defaults: {}", e);
            Config::default()
        }),
    };

    let provider: Arc<dyn ContentProvider> = Arc::new(GeminiProvider::new(&config.provider)?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    if let Some(industry) = cli.print {
        let region = cli
            .region
            .unwrap_or_else(|| config.behavior.default_region());
        let mut orchestrator = SearchOrchestrator::new(provider, runtime.handle().clone());
        if !orchestrator.submit_query(&industry, region) {
            bail!("Industry must not be blank");
        }

        eprintln!("Analyzing {} in {}...", industry.trim(), region);
        runtime.block_on(orchestrator.settle());
        display_search(
            orchestrator.state(),
            &IconSet::new(config.display.use_glyphs),
        );
        return Ok(());
    }

    let mut config = config;
    if let Some(region) = cli.region {
        config.behavior.default_region = region.label().to_string();
    }
    industry_lens::ui::run_tui(
        &config,
        provider,
        runtime.handle().clone(),
        cli.industry.as_deref(),
    )
}

fn main() {
    // Initialize unified logging (tracing + dual logging)
    industry_lens::utils::logging::init_tracing_with_dual_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            eprintln!("Run with --help for usage.");
            std::process::exit(2);
        }
    };

    if cli.help {
        print_help();
        return;
    }

    if cli.generate_config {
        if let Err(e) = generate_config() {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
        return;
    }

    if cli.print.is_none() {
        if let Some(dual_logger) = industry_lens::utils::dual_logging::get_dual_logger() {
            eprintln!("📝 Debug logs will be written to:");
            eprintln!("   {}", dual_logger.log_path().display());
            eprintln!("   Tail with: tail -f {}", dual_logger.log_path().display());
            eprintln!();
        }
    }

    info!(target: "ui", "Starting industry-lens {}", env!("CARGO_PKG_VERSION"));
    if let Err(e) = run(cli) {
        error!(target: "ui", "Fatal: {:#}", e);
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_print_with_region() {
        let cli = parse_args(&args(&["--print", "Fintech", "--region", "india"])).unwrap();
        assert_eq!(cli.print.as_deref(), Some("Fintech"));
        assert_eq!(cli.region, Some(Region::India));
        assert_eq!(cli.industry, None);
    }

    #[test]
    fn test_positional_industry_and_config() {
        let cli = parse_args(&args(&["--config", "/tmp/x.toml", "Logistics"])).unwrap();
        assert_eq!(cli.config_path, Some(PathBuf::from("/tmp/x.toml")));
        assert_eq!(cli.industry.as_deref(), Some("Logistics"));
    }

    #[test]
    fn test_bad_arguments() {
        assert!(parse_args(&args(&["--region", "Atlantis"])).is_err());
        assert!(parse_args(&args(&["--print"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
        assert!(parse_args(&args(&["a", "b"])).is_err());
    }
}
