//! # HTTP File Server
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo implementado desde cero: un request por
//! conexión, cinco rutas fijas y un storage intercambiable para archivos.
//!
//! ## Arquitectura
//!
//! - `http`: Parsing de requests, serialización de responses, status codes
//! - `storage`: Trait `Storage` con backends en disco y en memoria
//! - `router`: Tabla ordenada de rutas y sus handlers
//! - `server`: Listener TCP, un thread por conexión
//! - `config`: Argumentos CLI y variables de entorno
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use std::sync::Arc;
//! use http_fileserver::config::Config;
//! use http_fileserver::server::Server;
//! use http_fileserver::storage::FileStorage;
//!
//! let config = Config::default();
//! let storage = FileStorage::open(&config.directory).unwrap();
//! let server = Server::new(config, Arc::new(storage));
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod http;
pub mod router;
pub mod server;
pub mod storage;
