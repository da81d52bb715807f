//! Utils

use clap::Parser;

use crate::intents::Intent;

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Arguments for the bundle demo
#[derive(Debug, Parser)]
pub struct ExampleBundleArgs {
    /// Fixture set to load the catalog, config and default selection from
    #[clap(short, long, default_value = "leather-goods")]
    pub fixture: String,

    /// Intents to replay, e.g. `toggle:1 inc:1 dec:4 remove:5`
    #[clap(value_parser = parse_intent)]
    pub intents: Vec<Intent>,

    /// Submit the bundle after replaying the intents
    #[clap(short, long)]
    pub checkout: bool,

    /// Log level (trace, debug, info, warn, error)
    #[clap(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[clap(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

fn parse_intent(s: &str) -> Result<Intent, String> {
    s.parse().map_err(|err: crate::intents::IntentError| err.to_string())
}
