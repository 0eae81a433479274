use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use dn42_map::{Config, Pipeline};

/// dn42-map generates an annotated AS-peering graph from dn42 MRT RIB
/// dumps, either once or as a long-running HTTP API.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Opts {
    /// Path to the JSON config file.
    #[clap(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Override `output_file` from the config.
    #[clap(long)]
    output_file: Option<PathBuf>,

    /// Override `mrt_collector.master4_url` from the config.
    #[clap(long)]
    master4_url: Option<String>,

    /// Override `mrt_collector.master6_url` from the config.
    #[clap(long)]
    master6_url: Option<String>,

    /// Disable the HTTP API regardless of `api.enabled` in the config;
    /// run a single generation and exit.
    #[clap(long)]
    no_api: bool,
}

fn main() {
    env_logger::init();
    let opts = Opts::parse();

    let mut config = match Config::load(&opts.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to load config: {e}");
            std::process::exit(1);
        }
    };

    if let Some(output_file) = opts.output_file {
        config.output_file = output_file.to_string_lossy().into_owned();
    }
    if let Some(url) = opts.master4_url {
        config.mrt_collector.master4_url = url;
    }
    if let Some(url) = opts.master6_url {
        config.mrt_collector.master6_url = url;
    }

    let api_enabled = config.api.enabled && !opts.no_api;
    let listen_addr: SocketAddr = config.api.listen_addr.parse().unwrap_or_else(|e| {
        eprintln!("invalid api.listen_addr {:?}: {e}", config.api.listen_addr);
        std::process::exit(1);
    });
    let auth_token = config.api.auth_token.clone();

    let pipeline = Pipeline::new(config);

    if api_enabled {
        #[cfg(feature = "api")]
        {
            let runtime = tokio::runtime::Runtime::new().expect("failed to start tokio runtime");
            runtime.block_on(async move {
                if let Err(e) = dn42_map::serve::serve(listen_addr, pipeline, auth_token).await {
                    log::error!("HTTP server exited: {e}");
                    std::process::exit(1);
                }
            });
        }
        #[cfg(not(feature = "api"))]
        {
            eprintln!("api.enabled is true but this binary was built without the `api` feature");
            std::process::exit(1);
        }
    } else {
        log::info!("API server mode is disabled. Generating map...");
        let now = chrono::Utc::now().timestamp() as u64;
        if let Err(e) = pipeline.generate(now) {
            eprintln!("generation failed: {e}");
            std::process::exit(1);
        }
    }
}
