//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Transporte del servidor:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones, un thread por conexión
//! 3. Lee un request completo (`reader`)
//! 4. Lo parsea, lo enruta y escribe la respuesta
//! 5. Cierra la conexión

pub mod reader;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use tcp::{ConnectionId, ConnectionSettings, Server};

use crate::http::ParseError;
use thiserror::Error;

/// Errores de una conexión o del listener
#[derive(Debug, Error)]
pub enum ServerError {
    /// Fallo de lectura/escritura en el socket (incluye timeouts)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Request malformado; se contesta 400
    #[error("bad request: {0}")]
    BadRequest(#[from] ParseError),
}
