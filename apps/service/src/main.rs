#![warn(clippy::all, clippy::pedantic)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use clap::Parser;
use logger::init_tracing;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use watchpost::{HealthPoller, PacketObserver, PollerConfig, QueryFacade, StatusStore, TelemetryStore};

mod config;
mod error;
mod routes;
mod supervisor;

use config::{Config, Overrides};
use error::AppError;

#[derive(Debug, Parser)]
#[command(name = "watchpost-service", version, about = "Service health and traffic monitor")]
struct Cli {
    /// Path to the config file ([services] table plus optional [monitor] overrides)
    #[arg(long, default_value = "urls_config.toml")]
    config: PathBuf,

    /// Listen address for the read-only HTTP interface [default: 127.0.0.1:5000]
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// Seconds between poll cycles for each endpoint [default: 30]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    poll_interval: Option<u64>,

    /// Seconds before a single probe gives up [default: 5]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    probe_timeout: Option<u64>,

    /// Capture interface name (default: first usable non-loopback)
    #[arg(long)]
    interface: Option<String>,

    /// Disable passive packet observation
    #[arg(long)]
    no_capture: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            poll_interval: self.poll_interval,
            probe_timeout: self.probe_timeout,
            listen: self.listen,
        }
    }
}

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    init_tracing();

    let cli = Cli::parse();

    // Config load failure is fatal: without a service table there is
    // nothing to monitor.
    let config = Config::load(&cli.config).inspect_err(|err| {
        error!(config = %cli.config.display(), "failed to load configuration: {err}");
    })?;
    let settings = config.resolve(cli.overrides()).inspect_err(|err| {
        error!("rejected settings: {err}");
    })?;
    let registry = config.registry().clone();
    info!(services = registry.len(), "loaded service registry");

    let statuses = Arc::new(StatusStore::for_registry(&registry));
    let telemetry = Arc::new(TelemetryStore::new());
    let facade = QueryFacade::new(Arc::clone(&statuses), Arc::clone(&telemetry));

    let token = CancellationToken::new();

    let poller_config = PollerConfig {
        period: settings.poll_interval,
        probe_timeout: settings.probe_timeout,
    };
    let poller = Arc::new(HealthPoller::new(Arc::clone(&statuses), poller_config)?);
    let poller_handle = tokio::spawn(poller.run(registry, token.child_token()));

    let capture_handle = if cli.no_capture {
        info!("packet observation disabled by flag");
        None
    } else {
        let observer = PacketObserver::new(Arc::clone(&telemetry));
        Some(tokio::spawn(supervisor::run_capture(
            observer,
            cli.interface.clone(),
            token.child_token(),
        )))
    };

    info!(listen = %settings.listen, "serving read-only monitor interface");
    let served = run_server(settings.listen, facade).await;

    // Server exit (ctrl-c) drives engine shutdown: in-flight probes
    // finish and store their results, nothing new starts.
    token.cancel();
    if let Err(err) = poller_handle.await {
        error!("poller task failed: {err}");
    }
    if let Some(handle) = capture_handle {
        if let Err(err) = handle.await {
            error!("capture task failed: {err}");
        }
    }

    served
}

async fn run_server(addr: SocketAddr, facade: QueryFacade) -> Result<(), AppError> {
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(facade.clone()))
            .wrap_fn(|req, srv| routes::log_request(req, srv))
            .configure(routes::routes)
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}
