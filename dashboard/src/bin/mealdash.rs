//! Meal dashboard CLI.
//!
//! Loads one dashboard view and prints it as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Against the configured backend
//! mealdash overview
//! mealdash students --date 2026-03-02
//!
//! # Offline, with sample data
//! MEALDASH_TRANSPORT=local mealdash schedule
//! ```
//!
//! Views: `overview`, `schedule`, `students`, `menu`, `distribution`, `stock`.
//! Actions: `update-stock <name> <quantity>`, `launch-ai`.
//!
//! # Environment Variables
//!
//! - `MEALDASH_*`: client configuration (see `mealdash::config`)
//! - `RUST_LOG`: Log level (default: info)

use std::env;

use anyhow::{bail, Context};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use mealdash::config::ClientConfig;
use mealdash::services::DashboardService;

const USAGE: &str = "usage: mealdash <overview|schedule|students|menu|distribution|stock> [--date YYYY-MM-DD]\n       mealdash update-stock <name> <quantity>\n       mealdash launch-ai";

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Value following `--date`, if any.
fn date_arg(args: &[String]) -> Option<&str> {
    args.iter()
        .position(|a| a == "--date")
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        bail!(USAGE);
    };

    let config = ClientConfig::load().context("loading configuration")?;
    info!(
        "using {} transport at {}",
        config.transport.as_str(),
        config.base_url
    );
    let service = DashboardService::from_config(&config)?;
    let date = date_arg(&args);

    match command {
        "overview" => print_json(&service.overview().await?),
        "schedule" => print_json(&service.cooking_schedule().await?),
        "students" => print_json(&service.student_demands(date).await?),
        "menu" => print_json(&service.menu().await?),
        "distribution" => print_json(&service.distribution(date).await?),
        "stock" => print_json(&service.stock_table().await?),
        "update-stock" => {
            let (Some(name), Some(quantity)) = (args.get(1), args.get(2)) else {
                bail!(USAGE);
            };
            let quantity: f64 = quantity
                .parse()
                .with_context(|| format!("invalid quantity {:?}", quantity))?;
            print_json(&service.update_stock_by_name(name, quantity).await?)
        }
        "launch-ai" => print_json(&service.launch_ai().await?),
        other => bail!("unknown command {:?}\n{}", other, USAGE),
    }
}
