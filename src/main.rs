//! CLI entry point: translate an HTML document's visible text in place.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use pagetrans::config::{ConfigStore, ConfigUpdate};
use pagetrans::{
    html_to_dom, serialize_document, spawn_executor, ApiClient, TranslationOrchestrator,
};

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";

#[derive(Parser)]
#[command(
    name = "pagetrans",
    version,
    about = "Translate the visible text of a web page via an LLM chat-completion API"
)]
struct Cli {
    /// Input HTML file ("-" for standard input)
    input: Option<PathBuf>,

    /// Write the translated document here instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target language code (defaults to the configured language)
    #[arg(short, long)]
    lang: Option<String>,

    /// Model identifier (defaults to the configured model)
    #[arg(short, long)]
    model: Option<String>,

    /// Path of the configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Charset of the input document (detected as UTF-8 otherwise)
    #[arg(long)]
    encoding: Option<String>,

    /// List the models available to the configured API key and exit
    #[arg(long)]
    list_models: bool,

    /// Check whether the configured API key is accepted and exit
    #[arg(long)]
    validate_key: bool,

    /// Store the given API key in the configuration file and exit
    #[arg(long, value_name = "KEY")]
    set_api_key: Option<String>,

    /// Print the stored configuration and exit
    #[arg(long)]
    show_config: bool,

    /// Restore the built-in default configuration and exit
    #[arg(long)]
    reset_config: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        if atty::is(atty::Stream::Stderr) {
            eprintln!("{ANSI_COLOR_RED}Error:{ANSI_COLOR_RESET} {e}");
        } else {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let store = match &cli.config {
        Some(path) => ConfigStore::new(path),
        None => ConfigStore::open_default(),
    };

    if let Some(api_key) = cli.set_api_key {
        store.update(ConfigUpdate {
            api_key: Some(api_key),
            ..Default::default()
        })?;
        println!("API key saved to {}", store.path().display());
        return Ok(());
    }

    if cli.reset_config {
        store.reset()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    if cli.show_config {
        println!("{}", serde_json::to_string_pretty(&store.get())?);
        return Ok(());
    }

    let client = ApiClient::new();
    let config = store.get();

    if cli.validate_key {
        if client.validate_api_key(&config.api_key).await {
            println!("API key is valid");
            return Ok(());
        }
        println!("API key is missing or was rejected");
        process::exit(1);
    }

    if cli.list_models {
        for model in client.list_models(&config.api_key).await? {
            match model.name {
                Some(name) => println!("{}\t{}", model.id, name),
                None => println!("{}", model.id),
            }
        }
        return Ok(());
    }

    let input = cli
        .input
        .ok_or("no input document given (pass a file path, or \"-\" for stdin)")?;
    let data = if input.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        fs::read(&input)?
    };

    let encoding = cli.encoding.unwrap_or_default();
    let target_lang = cli.lang.unwrap_or(config.default_target_language);
    let model = cli.model.unwrap_or(config.default_model);

    let dom = html_to_dom(&data, encoding.clone());

    let channel = spawn_executor(store, client);
    let orchestrator = TranslationOrchestrator::new(channel);
    let summary = orchestrator
        .translate_page(&dom.document, &target_lang, &model)
        .await?;

    if let Some(error) = &summary.first_error {
        tracing::warn!(
            failed_batches = summary.failed_batches,
            batches = summary.batches,
            "some batches failed: {error}"
        );
    }

    let result = serialize_document(dom, encoding);
    match cli.output {
        Some(path) => fs::write(path, result)?,
        None => io::stdout().write_all(&result)?,
    }

    Ok(())
}
