use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use filedeck::config::Config;
use filedeck::fs::Workdir;
use filedeck::http;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_usage() {
    eprintln!("Usage: filedeck -c <config-file>");
    eprintln!();
    eprintln!("If the config file does not exist, defaults are written to it.");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 || args[1] != "-c" || args[2].is_empty() {
        print_usage();
        std::process::exit(1);
    }
    let config_path = PathBuf::from(&args[2]);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("filedeck {} starting", VERSION);

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            warn!(
                "Config not loadable ({e}); writing defaults to {}",
                config_path.display()
            );
            let config = Config::default();
            if let Err(e) = config.save(&config_path) {
                eprintln!("Unable to save default config: {e}");
                std::process::exit(1);
            }
            config
        }
    };

    let workdir = match Workdir::open(&config.workdir) {
        Ok(workdir) => workdir,
        Err(e) => {
            eprintln!("Working directory {}: {e}", config.workdir);
            std::process::exit(1);
        }
    };

    let addr: SocketAddr = format!("{}:{}", config.address, config.port).parse()?;
    info!(
        "Serving {} on {}{}",
        config.workdir,
        addr,
        if config.tls { " (TLS)" } else { "" }
    );

    let tls = config.tls;
    let cert = config.server_cert.clone();
    let key = config.server_key.clone();
    let app = http::router(config, workdir);

    if tls {
        let rustls = axum_server::tls_rustls::RustlsConfig::from_pem_file(&cert, &key).await?;
        axum_server::bind_rustls(addr, rustls)
            .serve(app.into_make_service())
            .await?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;
    }

    Ok(())
}
