use anyhow::Context;
use clap::Parser;
use facescan::cli::{Cli, Commands};
use facescan::client::HttpDiagnosisClient;
use facescan::config::ConfigStore;
use facescan::device::{LocalFile, StillFrameCamera};
use facescan::error::FaceScanError;
use facescan::{report, session_loop};
use facescan_common::{classify, Controller, ResultCard};
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let store = match &cli.config {
        Some(path) => ConfigStore::at(path),
        None => ConfigStore::default_location()?,
    };
    let mut config = store
        .load_with_env()
        .with_context(|| format!("設定の読み込みに失敗: {}", store.path().display()))?;

    match cli.command {
        Commands::Diagnose { image, endpoint, raw, share, page_url } => {
            if !image.exists() {
                return Err(FaceScanError::FileNotFound(image.display().to_string()).into());
            }
            if let Some(endpoint) = endpoint {
                config.diagnosis.endpoint = endpoint;
            }
            config.validate()?;

            println!("📸 facescan - 診断\n");
            let client = HttpDiagnosisClient::new(&config.diagnosis)?;
            tracing::info!(endpoint = client.endpoint(), "diagnosis endpoint");
            let mut controller = Controller::new(StillFrameCamera::default(), client, config.capture.clone());

            controller
                .select_file(Some(LocalFile::new(&image)))
                .await
                .map_err(FaceScanError::from)?;

            let spinner = session_loop::spinner("診断中...");
            let outcome = controller.diagnose().await;
            spinner.finish_and_clear();
            if let Err(e) = outcome {
                let e = FaceScanError::from(e);
                println!("⚠ {}", e.user_message());
                return Err(e.into());
            }

            let text = controller.result_text().to_string();
            if raw {
                println!("{}", text);
            } else {
                print!("{}", report::render_card(&ResultCard::from_text(&text)));
            }
            if share {
                println!();
                print!("{}", report::render_share(&config.share, &page_url, &text)?);
            }
        }

        Commands::Classify { file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("読み込みに失敗: {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let fields = classify(&text);
            println!("{}", serde_json::to_string_pretty(&fields)?);
        }

        Commands::Session { camera_frame, page_url } => {
            config.validate()?;
            println!("📸 facescan - 対話モード\n");
            let client = HttpDiagnosisClient::new(&config.diagnosis)?;
            let mut controller = Controller::new(StillFrameCamera::new(camera_frame), client, config.capture.clone());
            session_loop::run_session(&mut controller, &config, &page_url).await?;
        }

        Commands::Config { set_endpoint, show } => {
            if let Some(endpoint) = set_endpoint {
                config = store.set_endpoint(endpoint)?;
                println!("✔ 診断APIのURLを設定しました");
            }

            if show {
                println!("設定 ({}):", store.path().display());
                println!("  診断API: {}", config.diagnosis.endpoint);
                println!("  タイムアウト: {}秒", config.diagnosis.timeout_secs);
                println!("  撮影形式: {} (品質 {})", config.capture.mime_type, config.capture.quality);
                println!("  結果表示: {:?}", config.ui.result_style);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "facescan=debug,facescan_common=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
