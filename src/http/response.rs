//! # Construcción de Respuestas HTTP
//!
//! API para construir respuestas de forma programática y convertirlas a
//! bytes para enviar al cliente.
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! `Content-Length` nunca se guarda a mano: se calcula al serializar a
//! partir del body y pisa cualquier valor que se haya puesto con ese nombre.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use http_fileserver::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_header("Content-Type", "text/plain")
//!     .with_body("hello");
//!
//! let bytes = response.to_bytes();
//! assert!(bytes.ends_with(b"\r\n\r\nhello"));
//! ```

use super::StatusCode;
use std::collections::HashMap;

/// Versión de protocolo con la que responde el servidor
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// Nombre del header que se recalcula al serializar
pub const CONTENT_LENGTH: &str = "Content-Length";

/// Representa una respuesta HTTP completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Versión de la status line
    version: String,

    /// Código de estado HTTP (200, 404, etc.)
    status: StatusCode,

    /// Headers HTTP; el orden de emisión no está definido
    headers: HashMap<String, String>,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,
}

impl Response {
    /// Crea una nueva respuesta con el código de estado especificado
    ///
    /// Por defecto, la respuesta no tiene headers ni body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            version: HTTP_VERSION.to_string(),
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Respuesta `text/plain` con el body dado
    ///
    /// ```
    /// use http_fileserver::http::{Response, StatusCode};
    ///
    /// let response = Response::text(StatusCode::Ok, "hello");
    /// assert_eq!(response.header("Content-Type"), Some("text/plain"));
    /// ```
    pub fn text(status: StatusCode, body: &str) -> Self {
        Self::new(status)
            .with_header("Content-Type", "text/plain")
            .with_body(body)
    }

    /// Agrega un header a la respuesta
    ///
    /// Si el header ya existe, se sobrescribe.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Agrega un header a una respuesta existente (versión mutable)
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    /// Establece el cuerpo de la respuesta desde un string
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.as_bytes().to_vec();
        self
    }

    /// Establece el cuerpo de la respuesta desde bytes
    ///
    /// Útil para archivos binarios leídos del storage.
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// - Status line: `HTTP/1.1 200 OK\r\n`
    /// - Headers: `Header-Name: Value\r\n`, con `Content-Length` recalculado
    /// - Línea vacía: `\r\n`
    /// - Body: contenido binario, sin terminador
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(128 + self.body.len());

        // 1. Status line
        let status_line = format!("{} {}\r\n", self.version, self.status);
        result.extend_from_slice(status_line.as_bytes());

        // 2. Headers (Content-Length siempre al final y calculado)
        for (name, value) in &self.headers {
            if name == CONTENT_LENGTH {
                continue;
            }
            let header_line = format!("{}: {}\r\n", name, value);
            result.extend_from_slice(header_line.as_bytes());
        }
        let length_line = format!("{}: {}\r\n", CONTENT_LENGTH, self.body.len());
        result.extend_from_slice(length_line.as_bytes());

        // 3. Línea vacía que separa headers del body
        result.extend_from_slice(b"\r\n");

        // 4. Body (si existe)
        result.extend_from_slice(&self.body);

        result
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene la versión de la status line
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene una referencia a los headers
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header específico
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
