use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{Duration, Utc};
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use replyrate_core::time_parse::parse_utc_timestamp;
use replyrate_report::{collect_report, write_rows, DerivedRow, ReportOutcome};
use replyrate_source::{SupportBeeClient, SupportBeeConfig};

const RANGE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Export support tickets and their response-time metrics to a CSV report.
#[derive(Debug, Parser)]
#[command(name = "replyrate", version)]
struct ReportArgs {
    /// SupportBee account subdomain.
    #[arg(long, env = "SUPPORTBEE_SUBDOMAIN")]
    subdomain: String,
    /// SupportBee API token.
    #[arg(long, env = "SUPPORTBEE_API_TOKEN", hide_env_values = true)]
    auth_token: String,
    /// Range start as ISO-8601 UTC; defaults to 30 days before now.
    #[arg(long)]
    since: Option<String>,
    /// Range end as ISO-8601 UTC; defaults to now.
    #[arg(long)]
    until: Option<String>,
    /// Output CSV path.
    #[arg(long, default_value = "tickets.csv")]
    output: PathBuf,
}

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

/// Validates explicit bounds and fills defaults (last 30 days ending now).
/// Bounds are normalized to the upstream's fixed timestamp layout before any
/// network call happens.
fn resolve_range(since: Option<&str>, until: Option<&str>) -> Result<(String, String)> {
    let now = Utc::now();
    let since = match since {
        Some(raw) => normalize_range_bound("--since", raw)?,
        None => (now - Duration::days(30)).format(RANGE_FORMAT).to_string(),
    };
    let until = match until {
        Some(raw) => normalize_range_bound("--until", raw)?,
        None => now.format(RANGE_FORMAT).to_string(),
    };
    if since > until {
        bail!("--since ({since}) must not be later than --until ({until})");
    }
    Ok((since, until))
}

fn normalize_range_bound(flag: &str, raw: &str) -> Result<String> {
    let instant = parse_utc_timestamp(raw).with_context(|| {
        format!("{flag} must be an ISO-8601 UTC timestamp like 2024-03-01T00:00:00Z, got '{raw}'")
    })?;
    Ok(instant.format(RANGE_FORMAT).to_string())
}

fn write_report_file(path: &Path, rows: &[DerivedRow]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write_rows(BufWriter::new(file), rows)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = ReportArgs::parse();
    let (since, until) = resolve_range(args.since.as_deref(), args.until.as_deref())?;

    let client = SupportBeeClient::new(SupportBeeConfig::new(args.subdomain, args.auth_token))?;
    info!("fetching tickets active between {since} and {until}");
    match collect_report(&client, &since, &until).await? {
        ReportOutcome::NoTickets => {
            warn!("no tickets found in the requested range; nothing written");
        }
        ReportOutcome::Rows(rows) => {
            write_report_file(&args.output, &rows)?;
            info!("wrote {} ticket rows to {}", rows.len(), args.output.display());
        }
    }
    Ok(())
}
