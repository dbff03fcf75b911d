//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor con soporte para argumentos CLI y variables
//! de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./http_fileserver --port 4221 --directory /tmp/public \
//!   --read-timeout-ms 5000
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 FILES_DIR=./data RUST_LOG=http_fileserver=debug ./http_fileserver
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errores de validación de la configuración
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("host must not be empty")]
    EmptyHost,

    #[error("files directory must not be empty")]
    EmptyDirectory,

    #[error("max request bytes must be >= 1")]
    ZeroRequestLimit,
}

/// Configuración del servidor HTTP
#[derive(Debug, Clone, Parser)]
#[command(name = "http_fileserver")]
#[command(about = "Servidor HTTP/1.1 mínimo con rutas echo, user-agent y archivos")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "4221", env = "HTTP_PORT")]
    pub port: u16,

    /// Directorio donde se guardan/leen los archivos de `/files/`
    #[arg(short, long, default_value = "./public", env = "FILES_DIR")]
    pub directory: PathBuf,

    // === Timeouts ===

    /// Deadline de lectura del socket en milisegundos (0 = sin límite)
    #[arg(long = "read-timeout-ms", default_value = "30000", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    /// Deadline de escritura del socket en milisegundos (0 = sin límite)
    #[arg(long = "write-timeout-ms", default_value = "30000", env = "WRITE_TIMEOUT_MS")]
    pub write_timeout_ms: u64,

    // === Límites ===

    /// Tamaño máximo de un request (cabecera + body) en bytes
    #[arg(long = "max-request-bytes", default_value = "16777216", env = "MAX_REQUEST_BYTES")]
    pub max_request_bytes: usize,

    // === Logging ===

    /// Filtro de tracing (sintaxis de EnvFilter)
    #[arg(long = "log-filter", default_value = "http_fileserver=info", env = "RUST_LOG")]
    pub log_filter: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use http_fileserver::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:4221");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Deadline de lectura, `None` si está deshabilitado
    pub fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    /// Deadline de escritura, `None` si está deshabilitado
    pub fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.directory.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDirectory);
        }
        if self.max_request_bytes == 0 {
            return Err(ConfigError::ZeroRequestLimit);
        }

        Ok(())
    }

    /// Registra un resumen de la configuración en el log
    pub fn log_summary(&self) {
        tracing::info!(
            address = %self.address(),
            directory = %self.directory.display(),
            read_timeout_ms = self.read_timeout_ms,
            write_timeout_ms = self.write_timeout_ms,
            max_request_bytes = self.max_request_bytes,
            "configuration loaded"
        );
    }
}

/// Convierte milisegundos a `Duration`; 0 significa sin límite
fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4221,
            directory: PathBuf::from("./public"),
            read_timeout_ms: 30_000,
            write_timeout_ms: 30_000,
            max_request_bytes: 16 * 1024 * 1024,
            log_filter: "http_fileserver=info".to_string(),
        }
    }
}
