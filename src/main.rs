use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{self, Read, Write};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use epg_matcher::{
    classification::{aggregate, AggregateStats},
    config::{defaults::DEFAULT_LOG_LEVEL, Config},
    evaluation::{BatchEvaluator, StreamRecord},
    patterns::{self, PatternValidator, ValidationResult},
};

#[derive(Parser)]
#[command(name = "epg-matcher")]
#[command(version)]
#[command(about = "Stream-name pattern matching, highlighting and filter statistics")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path [default: $EPG_MATCHER_CONFIG or epg-matcher.toml]
    #[arg(short, long)]
    config: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a single pattern (external dialect)
    Validate { pattern: String },

    /// Translate a pattern between named-group dialects
    Translate {
        pattern: String,
        #[arg(long, value_enum, default_value_t = Dialect::Internal)]
        to: Dialect,
    },

    /// Validate every pattern field of the configuration
    Check,

    /// Highlight segments and verdicts for a JSON stream feed
    Highlight {
        /// JSON array of {name, builtin_filter_reason}; `-` reads stdin
        #[arg(short, long, default_value = "-")]
        input: String,
        /// Skip builtin filtering even when the configuration does not
        #[arg(long)]
        skip_builtin_filter: bool,
    },

    /// Aggregate statistics for a JSON stream feed
    Stats {
        #[arg(short, long, default_value = "-")]
        input: String,
        /// Skip builtin filtering even when the configuration does not
        #[arg(long)]
        skip_builtin_filter: bool,
        /// Report both builtin-filter settings side by side
        #[arg(long)]
        compare: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Dialect {
    Internal,
    External,
}

#[derive(Serialize)]
struct ValidateOutput<'a> {
    pattern: &'a str,
    internal: String,
    #[serde(flatten)]
    result: &'a ValidationResult,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    group_names: Vec<String>,
}

#[derive(Serialize)]
struct StatsComparison {
    builtin_filter_applied: AggregateStats,
    builtin_filter_skipped: AggregateStats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!("epg_matcher={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match cli.command {
        Command::Translate { pattern, to } => {
            let translated = match to {
                Dialect::Internal => patterns::to_internal(&pattern),
                Dialect::External => patterns::to_external(&pattern),
            };
            println!("{translated}");
            Ok(())
        }
        Command::Validate { pattern } => {
            let config = load_config(cli.config.as_deref())?;
            let result = PatternValidator::new(config.engine.limits()).validate(&pattern);
            let group_names = result
                .compiled
                .as_ref()
                .map(|c| c.group_names().to_vec())
                .unwrap_or_default();
            write_json(&ValidateOutput {
                pattern: &pattern,
                internal: patterns::to_internal(&pattern),
                result: &result,
                group_names,
            })
        }
        Command::Check => {
            let config = load_config(cli.config.as_deref())?;
            let evaluator = BatchEvaluator::new(&config.patterns, &config.engine);
            write_json(&evaluator.field_validations())?;
            if evaluator.pattern_set().has_errors() {
                anyhow::bail!("one or more configured patterns are invalid");
            }
            Ok(())
        }
        Command::Highlight {
            input,
            skip_builtin_filter,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let streams = read_streams(&input)?;
            let skip = effective_skip(skip_builtin_filter, &config);
            let evaluator = BatchEvaluator::new(&config.patterns, &config.engine);
            write_json(&evaluator.evaluate(&streams, skip))
        }
        Command::Stats {
            input,
            skip_builtin_filter,
            compare,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let streams = read_streams(&input)?;
            let evaluator = BatchEvaluator::new(&config.patterns, &config.engine);
            let records = evaluator.classify_all(&streams);
            if compare {
                write_json(&StatsComparison {
                    builtin_filter_applied: aggregate(&records, false),
                    builtin_filter_skipped: aggregate(&records, true),
                })
            } else {
                let skip = effective_skip(skip_builtin_filter, &config);
                write_json(&aggregate(&records, skip))
            }
        }
    }
}

fn load_config(path: Option<&str>) -> Result<Config> {
    let loaded = match path {
        Some(path) => Config::load_from_file(path),
        None => Config::load(),
    };
    let path = path.map_or_else(Config::default_path, str::to_string);
    let config = loaded.with_context(|| format!("Failed to load configuration from {path}"))?;
    info!("Configuration loaded from: {}", path);
    Ok(config)
}

/// `--skip-builtin-filter` can only turn skipping on.
fn effective_skip(cli_flag: bool, config: &Config) -> bool {
    cli_flag || config.patterns.skip_builtin_filter
}

fn read_streams(input: &str) -> Result<Vec<StreamRecord>> {
    let contents = if input == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read stream feed {input}"))?
    };
    let streams = StreamRecord::parse_feed(&contents)
        .with_context(|| format!("Invalid stream feed {input}"))?;
    info!("Read {} streams from {}", streams.len(), input);
    Ok(streams)
}

fn write_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_flag_forces_skipping_on() {
        let mut config = Config::default();
        assert!(!effective_skip(false, &config));
        assert!(effective_skip(true, &config));

        config.patterns.skip_builtin_filter = true;
        assert!(effective_skip(false, &config));
        assert!(effective_skip(true, &config));
    }

    #[test]
    fn test_cli_config_is_optional() {
        let cli = Cli::try_parse_from(["epg-matcher", "check"]).unwrap();
        assert!(cli.config.is_none());

        let cli = Cli::try_parse_from(["epg-matcher", "-c", "custom.toml", "check"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
    }
}
