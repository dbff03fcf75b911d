//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Servidor que maneja múltiples conexiones simultáneas usando threads.
//! Cada conexión se procesa en su propio thread y atiende un único request;
//! al terminar el thread el `TcpStream` se libera y la conexión se cierra.
//!
//! Los threads solo comparten el `Router` (inmutable) y el `Storage`.

use super::reader::read_request;
use super::ServerError;
use crate::config::Config;
use crate::http::{Request, Response, StatusCode};
use crate::router::Router;
use crate::storage::Storage;
use std::io::Write;
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Contador global para los IDs de conexión
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identificador único de una conexión, para los logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn next() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Límites que se aplican a cada conexión
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Deadline de cada lectura del socket (`None` = sin límite)
    pub read_timeout: Option<Duration>,

    /// Deadline de cada escritura del socket (`None` = sin límite)
    pub write_timeout: Option<Duration>,

    /// Tamaño máximo de cabecera + body
    pub max_request_bytes: usize,
}

impl From<&Config> for ConnectionSettings {
    fn from(config: &Config) -> Self {
        Self {
            read_timeout: config.read_timeout(),
            write_timeout: config.write_timeout(),
            max_request_bytes: config.max_request_bytes,
        }
    }
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Servidor HTTP concurrente, un thread por conexión
pub struct Server {
    config: Config,
    router: Arc<Router>,
    storage: Arc<dyn Storage>,
}

impl Server {
    /// Crea un servidor con las rutas por defecto sobre `storage`
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Self {
        Self {
            config,
            router: Arc::new(Router::default_routes()),
            storage,
        }
    }

    /// Reemplaza la tabla de rutas
    pub fn with_router(mut self, router: Router) -> Self {
        self.router = Arc::new(router);
        self
    }

    /// Hace bind en la dirección configurada y atiende conexiones
    ///
    /// Solo retorna si falla el bind.
    pub fn run(&self) -> Result<(), ServerError> {
        let address = self.config.address();
        let listener = TcpListener::bind(&address)?;
        tracing::info!(address = %address, "listening for connections");

        self.serve(listener)
    }

    /// Atiende conexiones de un listener ya creado
    pub fn serve(&self, listener: TcpListener) -> Result<(), ServerError> {
        let settings = ConnectionSettings::from(&self.config);

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let router = Arc::clone(&self.router);
                    let storage = Arc::clone(&self.storage);
                    let id = ConnectionId::next();

                    let peer = stream
                        .peer_addr()
                        .map(|addr| addr.to_string())
                        .unwrap_or_else(|_| "unknown".to_string());
                    tracing::debug!(conn = %id, peer = %peer, "connection accepted");

                    thread::spawn(move || {
                        let span = tracing::info_span!("conn", id = id.as_u64(), peer = %peer);
                        let _guard = span.enter();

                        let result =
                            Self::handle_connection(stream, &router, storage.as_ref(), &settings);
                        if let Err(e) = result {
                            tracing::warn!(error = %e, "connection dropped");
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to accept connection");
                }
            }
        }

        Ok(())
    }

    /// Atiende una conexión completa: leer, parsear, enrutar, responder
    ///
    /// La conexión se cierra al soltar `stream`, en cualquier salida. Un
    /// request malformado se contesta con 400; un error de I/O se propaga
    /// sin intentar responder.
    pub fn handle_connection(
        mut stream: TcpStream,
        router: &Router,
        storage: &dyn Storage,
        settings: &ConnectionSettings,
    ) -> Result<(), ServerError> {
        let start = Instant::now();

        stream.set_read_timeout(settings.read_timeout)?;
        stream.set_write_timeout(settings.write_timeout)?;

        let response = match read_request(&mut stream, settings.max_request_bytes) {
            Ok(raw) if raw.is_empty() => {
                tracing::debug!("peer closed without sending a request");
                return Ok(());
            }
            Ok(raw) => Self::respond(&raw, router, storage),
            Err(ServerError::BadRequest(e)) => {
                tracing::warn!(error = %e, "rejecting request");
                bad_request(&e)
            }
            Err(e) => return Err(e),
        };

        stream.write_all(&response.to_bytes())?;
        stream.flush()?;

        tracing::info!(
            status = response.status().as_u16(),
            bytes = response.body().len(),
            latency_ms = start.elapsed().as_secs_f64() * 1000.0,
            "response sent"
        );

        Ok(())
    }

    /// Parsea y enruta un request ya leído
    fn respond(raw: &[u8], router: &Router, storage: &dyn Storage) -> Response {
        match Request::parse(raw) {
            Ok(request) => {
                tracing::info!(
                    method = %request.method(),
                    path = request.path(),
                    query = request.query(),
                    version = request.version(),
                    "request"
                );
                router.route(&request, storage)
            }
            Err(e) => {
                tracing::warn!(error = %e, "parse error");
                bad_request(&e)
            }
        }
    }
}

/// Respuesta 400 con la descripción del error
fn bad_request(error: &impl std::fmt::Display) -> Response {
    Response::text(StatusCode::BadRequest, &format!("Invalid: {}", error))
}
