use clap::{Parser, Subcommand};
use header_translator::pipeline::{convert_file_to_json, translate_path, JsonConversion};
use header_translator::server::run_http_server;
use header_translator::tabular::JsonOrient;
use header_translator::utils::load_overrides;
use header_translator::{AppConfig, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "header-translator", version, about = "Translate CSV/Excel column headers to English")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Translate the headers (and sheet names) of a CSV or Excel file.
    Translate {
        input: String,
        #[arg(short, long)]
        output: Option<String>,
        /// JSON object of {"original header": "replacement"} pairs.
        #[arg(long)]
        overrides: Option<String>,
    },
    /// Convert a CSV file to JSON.
    ToJson {
        input: String,
        #[arg(short, long)]
        output: Option<String>,
        #[arg(long, default_value = "records")]
        orient: String,
        #[arg(long)]
        indent: Option<usize>,
        #[arg(long)]
        ascii_only: Option<bool>,
    },
    /// Serve the upload/download HTTP API.
    Serve {
        #[arg(long)]
        bind: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
}

fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("header_translator={}", config.logging.level).parse()?);

    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(Some(&cli.config))?;
    init_logging(&config)?;

    match cli.command {
        Command::Translate {
            input,
            output,
            overrides,
        } => {
            let mut state = AppState::from_config(config)?;
            if let Some(path) = overrides {
                state.context.overrides.extend(load_overrides(&path)?);
            }

            let translated = translate_path(&state.context, &input, output.as_deref()).await?;
            for sheet in &translated.sheets {
                println!("{}: {}", sheet.name, sheet.headers().join(", "));
            }
            if !translated.warnings.is_empty() {
                eprintln!("{} header(s) could not be translated:", translated.warnings.len());
                for warning in &translated.warnings {
                    eprintln!("  {}", warning.message);
                }
            }
        }
        Command::ToJson {
            input,
            output,
            orient,
            indent,
            ascii_only,
        } => {
            let state = AppState::from_config(config)?;
            let orient: JsonOrient = orient.parse()?;
            let options = state.json_options(Some(orient), indent, ascii_only);

            let bytes = tokio::fs::read(&input).await?;
            match convert_file_to_json(&input, bytes, &options)? {
                JsonConversion::Converted(json) => match output {
                    Some(path) => {
                        tokio::fs::write(&path, json.rendered.as_bytes()).await?;
                        tracing::info!(output = %path, "Wrote JSON");
                    }
                    None => println!("{}", json.rendered),
                },
                // Already logged by the conversion.
                JsonConversion::Unsupported { .. } => {}
            }
        }
        Command::Serve { bind, port } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let port = port.unwrap_or(config.server.port);
            let state = AppState::from_config(config)?;
            run_http_server(state, &bind, port).await?;
        }
    }

    Ok(())
}
