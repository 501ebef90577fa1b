//! Footprint report for one survey submission.
//!
//! Usage: `footprint-report [answers.json | -]`
//! Reads a JSON object keyed by question (stdin when no path or `-`) and
//! prints the report as JSON. Logs go to stderr; set `RUST_LOG` to tune.

use std::io::Read;

use anyhow::Context;
use serde_json::json;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use water_footprint::{FootprintCalculator, SurveyResponse};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("footprint=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn read_input(arg: Option<String>) -> anyhow::Result<String> {
    match arg.as_deref() {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading survey response from stdin")?;
            Ok(buf)
        }
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading survey response from {path}")),
    }
}

fn main() -> anyhow::Result<()> {
    // Load .env in local/dev (FOOTPRINT_CONFIG_PATH etc.); no-op otherwise.
    let _ = dotenvy::dotenv();
    init_tracing();

    let calc = FootprintCalculator::from_default_config()?;
    let answers = SurveyResponse::from_json_str(&read_input(std::env::args().nth(1))?)?;

    let out = match calc.report(&answers) {
        Some(report) => serde_json::to_value(&report)?,
        None => json!({ "calculated_footprint": null, "reason": "insufficient data" }),
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
