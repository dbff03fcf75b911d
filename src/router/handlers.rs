//! # Handlers de las Rutas
//! src/router/handlers.rs
//!
//! Cada handler recibe el request, el resto del path después del prefijo de
//! su ruta y el storage compartido.
//!
//! | Ruta | Respuesta |
//! |---|---|
//! | `/` | 200 vacío |
//! | `/echo/{texto}` | 200 `text/plain` con el texto |
//! | `/user-agent` | 200 `text/plain` con el User-Agent o `Unknown` |
//! | `GET /files/{nombre}` | 200 `application/octet-stream`, 404 o 500 |
//! | `POST /files/{nombre}` | 201 `ok` o 500 |

use crate::http::{Request, Response, StatusCode};
use crate::storage::{Storage, StorageError};

/// Valor de `/user-agent` cuando el cliente no manda el header
pub const UNKNOWN_USER_AGENT: &str = "Unknown";

/// `GET /` - 200 sin body ni headers extra
pub fn root_handler(_req: &Request, _rest: &str, _storage: &dyn Storage) -> Response {
    Response::new(StatusCode::Ok)
}

/// `/echo/{texto}` - devuelve el resto del path
pub fn echo_handler(_req: &Request, rest: &str, _storage: &dyn Storage) -> Response {
    Response::text(StatusCode::Ok, rest)
}

/// `/user-agent` - devuelve el User-Agent del cliente
pub fn user_agent_handler(req: &Request, _rest: &str, _storage: &dyn Storage) -> Response {
    let user_agent = req.header("User-Agent").unwrap_or(UNKNOWN_USER_AGENT);
    Response::text(StatusCode::Ok, user_agent)
}

/// `GET /files/{nombre}` - lee un archivo del storage
pub fn read_file_handler(_req: &Request, file_name: &str, storage: &dyn Storage) -> Response {
    match storage.read(file_name) {
        Ok(data) => {
            tracing::debug!(file_name, bytes = data.len(), "file read");
            Response::new(StatusCode::Ok)
                .with_header("Content-Type", "application/octet-stream")
                .with_body_bytes(data)
        }
        Err(e) => storage_error_response(&e),
    }
}

/// `POST /files/{nombre}` - escribe el body del request en el storage
pub fn write_file_handler(req: &Request, file_name: &str, storage: &dyn Storage) -> Response {
    match storage.write(file_name, req.body()) {
        Ok(()) => {
            tracing::debug!(file_name, bytes = req.body().len(), "file written");
            Response::new(StatusCode::Created).with_body("ok")
        }
        Err(e) => storage_error_response(&e),
    }
}

/// Traduce un error de storage a su status code
fn storage_error_response(error: &StorageError) -> Response {
    let status = match error {
        StorageError::NotFound { .. } => StatusCode::NotFound,
        StorageError::Internal { .. } => StatusCode::InternalServerError,
    };

    if status.is_server_error() {
        tracing::warn!(%error, "storage failure");
    } else {
        tracing::debug!(%error, "storage miss");
    }

    Response::new(status)
}
