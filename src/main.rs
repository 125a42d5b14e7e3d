mod config;
mod download;
mod logging;
mod models;
mod page;
mod status;
mod submitter;

use anyhow::Context;
use clap::Parser;
use config::Config;
use download::FileDownloader;
use page::{Page, TriggerControl};
use status::StatusClass;
use std::io::Read;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{Level, debug, info};

#[derive(Parser, Debug)]
#[command(name = "ocr-contribute")]
#[command(about = "Submit corrected OCR text and keep a local copy")]
struct Args {
    /// Path to config file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Save endpoint, overrides `save_url` from the config file
    #[arg(short, long)]
    save_url: Option<String>,

    /// Name of the image the text was recognized from
    #[arg(short, long)]
    image_name: Option<String>,

    /// File holding the original OCR output
    #[arg(long)]
    input_text_file: Option<String>,

    /// File holding the corrected text, `-` for stdin
    #[arg(long, default_value = "-")]
    corrected_text_file: String,

    /// Directory the corrected text is downloaded to
    #[arg(short, long)]
    download_dir: Option<String>,

    /// socks and http proxy, example: socks5://192.168.0.2:10080
    #[arg(long)]
    proxy: Option<String>,

    /// trace, debug, info, warn, error
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[arg(long)]
    log_file: Option<String>,
}

fn read_text(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read corrected text from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))
}

async fn run(args: Args, config: Config) -> anyhow::Result<ExitCode> {
    let Some(trigger) = args
        .save_url
        .or(config.save_url)
        .map(|save_url| TriggerControl { save_url })
    else {
        debug!("No save url configured, nothing to do");
        return Ok(ExitCode::SUCCESS);
    };

    let image_name = args
        .image_name
        .context("--image-name is required when a save url is configured")?;
    let corrected_text = read_text(&args.corrected_text_file)?;
    let input_text = match &args.input_text_file {
        Some(path) => read_text(path)?,
        None => String::new(),
    };
    let page = Page::from_sources(Some(trigger), corrected_text, image_name, input_text);

    let client_builder = reqwest::Client::builder();
    let client_builder = if let Some(proxy) = args.proxy.as_ref().or(config.proxy.as_ref()) {
        let proxy = reqwest::Proxy::all(proxy).context("Failed to create proxy")?;
        client_builder.proxy(proxy)
    } else {
        client_builder
    };
    let http_client = Arc::new(client_builder.build().context("Failed to build HTTP client")?);

    let download_dir = args
        .download_dir
        .map(Into::into)
        .unwrap_or(config.download_dir);
    let downloader = Arc::new(FileDownloader::new(download_dir));
    debug!("Downloads go to {}", downloader.dir().display());

    let Some(submitter) = page.bind(http_client, downloader) else {
        return Ok(ExitCode::SUCCESS);
    };
    info!("Contribution submitter bound to {}", submitter.save_url());

    let result = submitter.trigger().await;
    match page.status.class() {
        StatusClass::Error => eprintln!("{}", page.status.text()),
        _ => println!("{}", page.status.text()),
    }

    Ok(if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let config = Config::load_or_default(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config))?;

    let log_level = Level::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using INFO level.", args.log_level);
        Level::INFO
    });
    let log_file = args.log_file.as_deref().or(config.log_file.as_deref());
    logging::init_logging(log_level, log_file);
    debug!("Configuration loaded: {:?}", config);

    run(args, config).await
}
