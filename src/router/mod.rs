//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea cada request a uno de los handlers registrados.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router → Handler (+ Storage) → Response
//! ```
//!
//! Las rutas se evalúan en el orden de registro y gana la primera que
//! coincide. El orden importa: `/echo/` y `/user-agent` se comparan antes
//! de mirar el método, así que tapan cualquier ruta posterior que compartiera
//! prefijo. Si ninguna coincide se responde 404 con body vacío.

pub mod handlers;

use crate::http::{Method, Request, Response, StatusCode};
use crate::storage::Storage;

/// Tipo de función handler
///
/// Recibe el request, el resto del path después del patrón y el storage.
pub type Handler = fn(&Request, &str, &dyn Storage) -> Response;

/// Forma de comparar el path de una ruta
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// El path debe ser exactamente igual
    Exact(String),

    /// El path debe empezar con el prefijo
    Prefix(String),
}

impl PathPattern {
    /// Si el path coincide, retorna lo que queda después del patrón
    pub fn matches<'a>(&self, path: &'a str) -> Option<&'a str> {
        match self {
            PathPattern::Exact(expected) => (path == expected).then_some(""),
            PathPattern::Prefix(prefix) => path.strip_prefix(prefix.as_str()),
        }
    }
}

/// Una entrada de la tabla de rutas
struct Route {
    pattern: PathPattern,

    /// `None` acepta cualquier método
    method: Option<Method>,

    handler: Handler,
}

/// Router que mapea (método, path) a handlers
pub struct Router {
    /// Tabla ordenada; la primera coincidencia gana
    routes: Vec<Route>,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Router con las cinco rutas del servidor, en su orden de precedencia
    ///
    /// # Ejemplo
    /// ```
    /// use http_fileserver::router::Router;
    /// use http_fileserver::http::{Request, StatusCode};
    /// use http_fileserver::storage::MemoryStorage;
    ///
    /// let router = Router::default_routes();
    /// let storage = MemoryStorage::new();
    ///
    /// let request = Request::parse(b"GET /echo/hi HTTP/1.1\r\n\r\n").unwrap();
    /// let response = router.route(&request, &storage);
    ///
    /// assert_eq!(response.status(), StatusCode::Ok);
    /// assert_eq!(response.body(), b"hi");
    /// ```
    pub fn default_routes() -> Self {
        let mut router = Self::new();

        router.register(PathPattern::Exact("/".into()), None, handlers::root_handler);
        router.register(PathPattern::Prefix("/echo/".into()), None, handlers::echo_handler);
        router.register(
            PathPattern::Prefix("/user-agent".into()),
            None,
            handlers::user_agent_handler,
        );
        router.register(
            PathPattern::Prefix("/files/".into()),
            Some(Method::GET),
            handlers::read_file_handler,
        );
        router.register(
            PathPattern::Prefix("/files/".into()),
            Some(Method::POST),
            handlers::write_file_handler,
        );

        router
    }

    /// Registra una ruta al final de la tabla
    pub fn register(&mut self, pattern: PathPattern, method: Option<Method>, handler: Handler) {
        self.routes.push(Route {
            pattern,
            method,
            handler,
        });
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    ///
    /// Si ninguna ruta coincide, retorna 404 Not Found sin body.
    pub fn route(&self, request: &Request, storage: &dyn Storage) -> Response {
        let path = request.path();

        for route in &self.routes {
            let Some(rest) = route.pattern.matches(path) else {
                continue;
            };

            if let Some(method) = &route.method {
                if method != request.method() {
                    continue;
                }
            }

            return (route.handler)(request, rest, storage);
        }

        tracing::debug!(method = %request.method(), path, "no route matched");
        Response::new(StatusCode::NotFound)
    }

    /// Número de rutas registradas
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
