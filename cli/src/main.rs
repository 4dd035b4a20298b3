use clap::Parser;

mod cli;
mod config;

use varsync_core::{GitlabClient, SyncError};

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e:#}");
            2
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> anyhow::Result<i32> {
    let args = cli::Args::parse();
    init_tracing();

    let cfg = config::load(args.config.as_deref())?;
    let project_url = args.project_url.or(cfg.project_url).ok_or_else(|| {
        anyhow::anyhow!("no project URL given (--project-url, VARSYNC_PROJECT_URL, or varsync.toml)")
    })?;
    let token = args.token.or(cfg.token).ok_or_else(|| {
        anyhow::anyhow!("no token given (--token, VARSYNC_TOKEN, or varsync.toml)")
    })?;

    let client = match args.timeout_ms.or(cfg.timeout_ms) {
        Some(timeout_ms) => GitlabClient::with_timeout(&project_url, &token, timeout_ms)?,
        None => GitlabClient::new(&project_url, &token)?,
    };
    tracing::debug!(project_url = %project_url, "client ready");

    match args.command {
        cli::Commands::List => {
            let variables = client.list_variables().await?;
            for variable in &variables {
                println!("{} = {}", variable.key, variable.value);
            }
            Ok(0)
        }
        cli::Commands::Create { key, value } => {
            let variable = client.create_variable(&key, &parse_value(&value)).await?;
            println!("created {} = {}", variable.key, variable.value);
            Ok(0)
        }
        cli::Commands::Update { key, value } => {
            let variable = client.update_variable(&key, &parse_value(&value)).await?;
            println!("updated {} = {}", variable.key, variable.value);
            Ok(0)
        }
        cli::Commands::Set(set) => {
            let text = std::fs::read_to_string(&set.file)?;
            let properties: serde_json::Map<String, serde_json::Value> =
                serde_json::from_str(&text)?;

            match client.set_variables(&properties, set.force).await {
                Ok(applied) => {
                    for variable in &applied {
                        println!("{} = {}", variable.key, variable.value);
                    }
                    println!("{} variable(s) applied", applied.len());
                    Ok(0)
                }
                Err(SyncError::BatchSyncPartialFailure { applied, failures }) => {
                    for failure in &failures {
                        eprintln!("{}: {}", failure.key, failure.error);
                    }
                    eprintln!("{} applied, {} failed", applied.len(), failures.len());
                    Ok(1)
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}

/// Command line values are JSON when they parse as JSON, raw strings
/// otherwise, so `varsync create COUNT 3` stores a number and
/// `varsync create ENV staging` stores a plain string.
fn parse_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

#[cfg(test)]
mod tests {
    use super::parse_value;
    use serde_json::json;

    #[test]
    fn json_values_parse_structured() {
        assert_eq!(parse_value("3"), json!(3));
        assert_eq!(parse_value("true"), json!(true));
        assert_eq!(parse_value(r#"{"hello":"world"}"#), json!({"hello":"world"}));
    }

    #[test]
    fn non_json_values_stay_raw_strings() {
        assert_eq!(parse_value("staging"), json!("staging"));
        assert_eq!(parse_value("us-east-1"), json!("us-east-1"));
    }
}
