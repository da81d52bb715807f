//! Bundle Example
//!
//! Loads a fixture set, replays user intents against the bundle and prints the result.
//!
//! Use `-f` to load a fixture set by name
//! Use `-c` to submit the bundle to a logging cart afterwards
//! Pass intents as positional arguments, e.g. `toggle:1 inc:1 dec:4`

use std::{io, time::Instant};

use anyhow::Result;
use clap::Parser;
use jiff::Timestamp;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use bundle_builder::{
    checkout::{Confirmation, LoggingCart},
    fixtures::BundleFixture,
    utils::{ExampleBundleArgs, LogFormat},
};

fn init_logging(args: &ExampleBundleArgs) -> Result<()> {
    let filter = EnvFilter::try_new(&args.log_level)?;
    let registry = tracing_subscriber::registry().with(filter);

    match args.log_format {
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_writer(io::stderr),
            )
            .try_init()?,
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(io::stderr),
            )
            .try_init()?,
    }

    Ok(())
}

/// Bundle Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = ExampleBundleArgs::parse();

    init_logging(&args)?;

    let fixture = BundleFixture::from_set(&args.fixture)?;
    let mut bundle = fixture.bundle();

    for intent in &args.intents {
        bundle.apply(intent);
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    bundle.snapshot()?.write_to(&mut handle)?;

    if args.checkout {
        let confirmation =
            bundle.checkout_into(&mut LoggingCart, Timestamp::now(), Instant::now())?;

        println!(
            "\n {} (until {:?})",
            Confirmation::LABEL,
            confirmation.expires_at()
        );
    }

    Ok(())
}
