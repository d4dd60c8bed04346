use anyhow::{bail, Context, Result};
use chrono::Utc;
use forum_lifecycle::application::services::{ConsistencyChecker, ConsistencyReport};
use forum_lifecycle::infrastructure::database::{ConnectionPool, SqliteStore};
use forum_lifecycle::shared::config::AppConfig;
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::runtime::Runtime;

#[derive(Debug, Clone, Default)]
struct CliOptions {
    output: Option<PathBuf>,
    pretty: bool,
    strict: bool,
    database_url: Option<String>,
}

#[derive(Debug, serde::Serialize)]
struct CheckOutput {
    generated_at_ms: i64,
    database_url: String,
    consistent: bool,
    #[serde(flatten)]
    report: ConsistencyReport,
}

fn usage() -> &'static str {
    "Usage: lifecycle_check [--database-url <url>] [--output <path>] [--pretty] [--strict]"
}

fn main() -> Result<()> {
    forum_lifecycle::init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = parse_args(args)?;

    let mut config = AppConfig::from_env();
    if let Some(url) = &options.database_url {
        config.database.url = url.clone();
    }
    config.validate().map_err(anyhow::Error::msg)?;

    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    let report = rt.block_on(async {
        run_check(&config)
            .await
            .with_context(|| format!("Failed to check {}", config.database.url))
    })?;

    let output = CheckOutput {
        generated_at_ms: Utc::now().timestamp_millis(),
        database_url: config.database.url.clone(),
        consistent: report.is_consistent(),
        report,
    };
    let payload = to_json(&output, options.pretty)?;
    emit_payload(options.output.as_deref(), &payload)?;

    if options.strict && !output.consistent {
        bail!("{} drift(s) found", output.report.drifts.len());
    }
    Ok(())
}

async fn run_check(config: &AppConfig) -> Result<ConsistencyReport> {
    let pool = ConnectionPool::from_config(&config.database).await?;
    let store = SqliteStore::new(pool.clone());
    store.initialize().await?;
    if !store.health_check().await? {
        bail!("store did not answer a health check");
    }

    let report = ConsistencyChecker::new(Arc::new(store)).check().await?;
    pool.close().await;
    Ok(report)
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    if pretty {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(serde_json::to_string(value)?)
    }
}

fn emit_payload(target: Option<&Path>, payload: &str) -> Result<()> {
    let Some(path) = target else {
        println!("{payload}");
        return Ok(());
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, payload).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Report written to {}", path.display());
    Ok(())
}

fn parse_args<I>(args: I) -> Result<CliOptions>
where
    I: IntoIterator<Item = String>,
{
    let mut options = CliOptions::default();

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" | "--output" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--output requires a path\n{}", usage()))?;
                options.output = Some(PathBuf::from(path));
            }
            "--pretty" => options.pretty = true,
            "--strict" => options.strict = true,
            "--database-url" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("--database-url requires a value\n{}", usage())
                })?;
                options.database_url = Some(value);
            }
            "-h" | "--help" => {
                println!("{}", usage());
                std::process::exit(0);
            }
            other => bail!("Unknown argument: {other}\n{}", usage()),
        }
    }

    Ok(options)
}
