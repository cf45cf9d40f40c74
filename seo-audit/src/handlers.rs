use anyhow::{Context, bail};
use clap::ArgMatches;
use colored::Colorize;
use seo_audit_core::audit::{AuditOptions, execute_audit};
use seo_audit_core::config::{AuditConfig, expand_path};
use seo_audit_core::registry;
use seo_audit_core::report::{render_report, resolve_output_path, save_report};
use seo_audit_core::{AuditError, AuditReport, CheckSelection, ReportFormat};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::{Level, debug};
use url::Url;

/// Exit code for a run whose page could not be fetched
pub const EXIT_AUDIT_FAILED: i32 = 2;

/// Parse a single line as a URL, adding https:// when no scheme is given
pub fn parse_url_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let candidate = if line.contains("://") {
        line.to_string()
    } else {
        format!("https://{}", line)
    };

    match Url::parse(&candidate) {
        Ok(url) if url.host_str().is_some() => Some(candidate),
        _ => None,
    }
}

fn split_ids(list: &str) -> Vec<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect()
}

/// Work out which checks to run. `--checks` wins over the config's
/// `default_checks`; `--skip` is applied last.
pub fn build_selection(
    checks: Option<&str>,
    skip: Option<&str>,
    config: &AuditConfig,
) -> Result<CheckSelection, AuditError> {
    let selection = match checks {
        Some(list) => CheckSelection::from_ids(split_ids(list))?,
        None => config.default_selection()?,
    };

    let selection = match skip {
        Some(list) => selection.without(split_ids(list))?,
        None => selection,
    };

    if selection.is_empty() {
        return Err(AuditError::NoChecksSelected);
    }
    Ok(selection)
}

/// Command-line overrides for values that also live in the config file
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub relay: Option<String>,
    pub direct: bool,
    pub timeout_secs: Option<u64>,
    pub max_concurrent_probes: Option<usize>,
}

impl ConfigOverrides {
    pub fn apply(&self, mut config: AuditConfig) -> Result<AuditConfig, AuditError> {
        if self.direct {
            config.relay_endpoint = None;
        } else if let Some(relay) = &self.relay {
            config.relay_endpoint = Some(relay.clone());
        }
        if let Some(timeout) = self.timeout_secs {
            config.timeout_secs = timeout;
        }
        if let Some(probes) = self.max_concurrent_probes {
            config.max_concurrent_probes = probes;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Everything the `audit` subcommand was asked to do
#[derive(Debug, Clone)]
pub struct AuditArgs {
    pub url: String,
    pub checks: Option<String>,
    pub skip: Option<String>,
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub overrides: ConfigOverrides,
    pub verbose: u8,
    pub quiet: bool,
}

impl AuditArgs {
    pub fn from_matches(args: &ArgMatches) -> anyhow::Result<Self> {
        let raw_url = args
            .get_one::<String>("url")
            .context("--url is required")?;
        let Some(url) = parse_url_line(raw_url) else {
            bail!(AuditError::InvalidUrl(raw_url.clone()));
        };

        let format_name = args
            .get_one::<String>("format")
            .map(String::as_str)
            .unwrap_or("text");
        let format = ReportFormat::from_str(format_name)
            .with_context(|| format!("Unknown report format: {}", format_name))?;

        Ok(Self {
            url,
            checks: args.get_one::<String>("checks").cloned(),
            skip: args.get_one::<String>("skip").cloned(),
            format,
            output: args.get_one::<PathBuf>("output").cloned(),
            config_path: args.get_one::<PathBuf>("config").cloned(),
            overrides: ConfigOverrides {
                relay: args.get_one::<String>("relay").cloned(),
                direct: args.get_flag("direct"),
                timeout_secs: args.get_one::<u64>("timeout").copied(),
                max_concurrent_probes: args.get_one::<usize>("concurrency").copied(),
            },
            verbose: args.get_count("verbose"),
            quiet: args.get_flag("quiet"),
        })
    }

    /// Load the config file (or defaults) and apply command-line overrides
    pub fn resolve_config(&self) -> anyhow::Result<AuditConfig> {
        let config = AuditConfig::load_or_default(self.config_path.as_deref())
            .context("Failed to load configuration")?;
        Ok(self.overrides.apply(config)?)
    }
}

pub fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

fn init_logging(verbose: u8) {
    // Logs go to stderr so stdout stays clean for JSON and CSV output
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(log_level(verbose))
        .with_target(false)
        .try_init();
}

/// Run the audit described by `args` and return the finished report.
pub async fn run_audit(args: &AuditArgs, show_progress: bool) -> anyhow::Result<AuditReport> {
    let config = args.resolve_config()?;
    let selection = build_selection(args.checks.as_deref(), args.skip.as_deref(), &config)?;
    debug!(
        "Auditing {} with {} checks via {}",
        args.url,
        selection.len(),
        config.relay_endpoint.as_deref().unwrap_or("direct fetch")
    );

    let options = AuditOptions {
        url: args.url.clone(),
        selection,
        config,
        show_progress,
    };
    Ok(execute_audit(options, None).await?)
}

/// Render `report` and either save it or print it. Returns the saved path.
pub fn emit_report(
    report: &AuditReport,
    format: ReportFormat,
    output: Option<&Path>,
) -> anyhow::Result<Option<PathBuf>> {
    match output {
        Some(path) => {
            let path = resolve_output_path(path, format);
            let content = render_report(report, format, false)?;
            save_report(&content, &path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            Ok(Some(path))
        }
        None => {
            let color = format == ReportFormat::Text && std::io::stdout().is_terminal();
            let content = render_report(report, format, color)?;
            println!("{}", content);
            Ok(None)
        }
    }
}

/// `audit` subcommand. Returns the process exit code.
pub async fn handle_audit(sub_matches: &ArgMatches) -> anyhow::Result<i32> {
    let args = AuditArgs::from_matches(sub_matches)?;
    init_logging(args.verbose);

    let show_progress = !args.quiet && std::io::stderr().is_terminal();
    let report = run_audit(&args, show_progress).await?;

    if let Some(path) = emit_report(&report, args.format, args.output.as_deref())?
        && !args.quiet
    {
        eprintln!(
            "{} Report saved to {}",
            "✓".green().bold(),
            path.display().to_string().bright_white()
        );
    }

    if report.failed {
        Ok(EXIT_AUDIT_FAILED)
    } else {
        Ok(0)
    }
}

/// `checks` subcommand: the registry grouped by category
pub fn handle_checks() {
    for (category, checks) in registry::grouped() {
        println!("{}", category.bright_blue().bold());
        for check in checks {
            let deferred = if registry::is_deferred(check.id) {
                " (network)".bright_black().to_string()
            } else {
                String::new()
            };
            println!(
                "  {} {} {}{}",
                "•".blue(),
                format!("{:<28}", check.id).bright_white(),
                check.label,
                deferred
            );
        }
        println!();
    }
}

/// Write a default configuration file at `path`. Refuses to overwrite an
/// existing file unless `force` is set.
pub fn write_default_config(path: &Path, force: bool) -> anyhow::Result<PathBuf> {
    let target = if path.is_dir() {
        path.join("config.json")
    } else {
        path.to_path_buf()
    };

    if target.exists() && !force {
        bail!(
            "Configuration already exists at {} (use --force to overwrite)",
            target.display()
        );
    }

    AuditConfig::default()
        .save(&target)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    Ok(target)
}

/// `init` subcommand
pub fn handle_init(args: &ArgMatches) -> anyhow::Result<()> {
    let raw_path = args
        .get_one::<String>("PATH")
        .context("missing configuration path")?;
    let force = args.get_flag("force");
    let path = expand_path(raw_path);

    println!(
        "{} Target: {}",
        "→".blue(),
        path.display().to_string().bright_white()
    );
    if force && path.exists() {
        println!("{} Overwriting existing configuration", "→".yellow().bold());
    }

    let written = write_default_config(&path, force)?;
    println!(
        "{} Configuration written to {}",
        "✓".green().bold(),
        written.display().to_string().bright_white()
    );
    Ok(())
}
