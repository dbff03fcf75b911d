//! # HTTP File Server - Entry Point
//! src/main.rs
//!
//! Parsea la configuración, inicializa el logging, prepara el directorio de
//! archivos y arranca el servidor.

use std::sync::Arc;

use http_fileserver::config::Config;
use http_fileserver::server::Server;
use http_fileserver::storage::FileStorage;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let config = Config::new();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| "http_fileserver=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("http_fileserver v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "invalid configuration");
        std::process::exit(1);
    }
    config.log_summary();

    // El directorio se crea si no existe
    let storage = match FileStorage::open(&config.directory) {
        Ok(storage) => storage,
        Err(e) => {
            tracing::error!(
                directory = %config.directory.display(),
                error = %e,
                "cannot prepare files directory"
            );
            std::process::exit(1);
        }
    };

    let server = Server::new(config, Arc::new(storage));

    // Esto bloquea el thread; solo vuelve si falla el bind
    if let Err(e) = server.run() {
        tracing::error!(error = %e, "fatal server error");
        std::process::exit(1);
    }
}
