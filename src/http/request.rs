//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser HTTP escrito desde cero para el subconjunto que soporta el servidor.
//!
//! ## Formato de un Request
//!
//! ```text
//! POST /files/a.txt?x=1 HTTP/1.1\r\n
//! Host: localhost:4221\r\n
//! Content-Length: 2\r\n
//! \r\n
//! hi
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /path?query VERSION`
//! 2. **Headers**: Pares `Name: Value` (uno por línea)
//! 3. **Empty Line**: `\r\n` que separa headers del body
//! 4. **Body**: Solo se conserva para POST, acotado por `Content-Length`

use std::collections::HashMap;
use thiserror::Error;

/// Separador de líneas en HTTP
pub const CRLF: &str = "\r\n";

/// Header que delimita el body
const CONTENT_LENGTH: &str = "Content-Length";

/// Secuencia que separa la cabecera del body
pub const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Método HTTP del request
///
/// El método no se valida: cualquier token se acepta y los que no son
/// verbos conocidos se guardan tal cual en `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    PATCH,
    OPTIONS,
    Other(String),
}

impl Method {
    /// Convierte un token de la request line en un método
    pub fn from_token(token: &str) -> Self {
        match token {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "PATCH" => Method::PATCH,
            "OPTIONS" => Method::OPTIONS,
            other => Method::Other(other.to_string()),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::PATCH => "PATCH",
            Method::OPTIONS => "OPTIONS",
            Method::Other(token) => token,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Representa un request HTTP parseado
///
/// Se construye una vez por conexión y no se modifica después.
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP
    method: Method,

    /// Path sin la query (nunca contiene `?`)
    path: String,

    /// Query string cruda, vacía si no había `?`
    query: String,

    /// Versión tal como llegó (ej: "HTTP/1.1")
    version: String,

    /// Headers HTTP, con el nombre exactamente como llegó
    headers: HashMap<String, String>,

    /// Body del request, solo para POST
    body: Vec<u8>,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Request vacío
    #[error("Empty request")]
    EmptyRequest,

    /// La cabecera no es UTF-8 válido
    #[error("Request head is not valid UTF-8")]
    InvalidEncoding,

    /// La request line no tiene la forma `METHOD TARGET VERSION`
    #[error("Invalid request line: {0:?}")]
    InvalidRequestLine(String),

    /// El request supera el tamaño máximo configurado
    #[error("Request exceeds {0} bytes")]
    RequestTooLarge(usize),
}

impl Request {
    /// Parsea un request HTTP desde bytes
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use http_fileserver::http::Request;
    ///
    /// let raw = b"GET /echo/abc?x=1 HTTP/1.1\r\nUser-Agent: curl/8.0\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/echo/abc");
    /// assert_eq!(request.query(), "x=1");
    /// assert_eq!(request.header("User-Agent"), Some("curl/8.0"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        if buffer.iter().all(u8::is_ascii_whitespace) {
            return Err(ParseError::EmptyRequest);
        }

        let (head, rest) = split_head(buffer);
        let head = std::str::from_utf8(head).map_err(|_| ParseError::InvalidEncoding)?;

        let mut lines = head.split(CRLF);
        let request_line = lines.next().unwrap_or_default();
        let (method, target, version) = Self::parse_request_line(request_line)?;
        let (path, query) = split_path_and_query(target);

        let mut headers = parse_headers(lines);
        let body = Self::parse_body(&method, &mut headers, rest);

        Ok(Request {
            method,
            path: path.to_string(),
            query: query.to_string(),
            version: version.to_string(),
            headers,
            body,
        })
    }

    /// Parsea la request line: exactamente tres tokens separados por un espacio
    fn parse_request_line(line: &str) -> Result<(Method, &str, &str), ParseError> {
        let parts: Vec<&str> = line.split(' ').collect();

        match parts.as_slice() {
            [method, target, version]
                if !method.is_empty() && !target.is_empty() && !version.is_empty() =>
            {
                Ok((Method::from_token(method), target, version))
            }
            _ => Err(ParseError::InvalidRequestLine(line.to_string())),
        }
    }

    /// Extrae el body para POST y sincroniza el header `Content-Length`
    ///
    /// El body se acota al `Content-Length` declarado; si falta o no es un
    /// número se toma todo lo que sigue a la línea vacía.
    fn parse_body(method: &Method, headers: &mut HashMap<String, String>, rest: &[u8]) -> Vec<u8> {
        if *method != Method::POST {
            return Vec::new();
        }

        let body = match content_length(headers) {
            Some(len) => rest[..len.min(rest.len())].to_vec(),
            None => rest.to_vec(),
        };

        // El valor del cliente se reemplaza, escriba como escriba el nombre
        headers.retain(|name, _| !name.eq_ignore_ascii_case(CONTENT_LENGTH));
        headers.insert(CONTENT_LENGTH.to_string(), body.len().to_string());
        body
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Obtiene el path del request (sin query)
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene la query string cruda
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Obtiene la versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene todos los headers
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header específico (sensible a mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    /// Obtiene el body del request
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Separa la cabecera del resto del buffer
///
/// Si no hay línea vacía todo el buffer es cabecera.
pub fn split_head(buffer: &[u8]) -> (&[u8], &[u8]) {
    match find_head_end(buffer) {
        Some(pos) => (&buffer[..pos], &buffer[pos + HEAD_TERMINATOR.len()..]),
        None => (buffer, &[]),
    }
}

/// Posición donde empieza `\r\n\r\n`, si existe
pub fn find_head_end(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(HEAD_TERMINATOR.len())
        .position(|window| window == HEAD_TERMINATOR)
}

/// Lee el `Content-Length` declarado en una cabecera ya delimitada
///
/// Lo usa el lector del socket para saber cuántos bytes de body esperar
/// antes de parsear el request completo.
pub fn declared_content_length(head: &[u8]) -> Option<usize> {
    let head = std::str::from_utf8(head).ok()?;
    let headers = parse_headers(head.split(CRLF).skip(1));
    content_length(&headers)
}

/// Busca `Content-Length` sin distinguir mayúsculas y lo parsea
///
/// El mapa de headers es sensible a mayúsculas, pero el framing del body
/// tiene que reconocer `content-length` igual que `Content-Length`.
fn content_length(headers: &HashMap<String, String>) -> Option<usize> {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(CONTENT_LENGTH))
        .and_then(|(_, value)| value.trim().parse().ok())
}

/// Separa el request-target en path y query por el primer `?`
fn split_path_and_query(target: &str) -> (&str, &str) {
    target.split_once('?').unwrap_or((target, ""))
}

/// Parsea las líneas de headers
///
/// Solo se aceptan líneas que se parten en exactamente dos piezas con
/// `": "`; el resto se ignora. Ante nombres repetidos gana el último.
fn parse_headers<'a>(lines: impl Iterator<Item = &'a str>) -> HashMap<String, String> {
    let mut headers = HashMap::new();

    for line in lines {
        let parts: Vec<&str> = line.split(": ").collect();
        if let [name, value] = parts.as_slice() {
            headers.insert(name.to_string(), value.to_string());
        }
    }

    headers
}
