//! # Módulo HTTP
//!
//! Implementa el subconjunto de HTTP/1.1 que usa el servidor, sin librerías
//! de alto nivel:
//!
//! - Parsing de requests
//! - Construcción y serialización de responses
//! - Códigos de estado
//!
//! Una conexión lleva un único request y una única respuesta; no hay
//! keep-alive, chunked ni compresión.
//!
//! ### Formato de Request
//!
//! ```text
//! GET /echo/hello HTTP/1.1\r\n
//! User-Agent: curl/8.0\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```

pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
