//! # Storage de Archivos
//! src/storage/mod.rs
//!
//! Abstracción de capacidad para leer y escribir blobs con nombre. Las rutas
//! `/files/*` solo hablan con el trait `Storage`, nunca con el filesystem.
//!
//! Implementaciones:
//! - `FileStorage`: un directorio raíz en disco
//! - `MemoryStorage`: un `HashMap` protegido por `Mutex`
//!
//! Ninguna escritura es atómica: dos escritores concurrentes sobre el mismo
//! nombre pueden intercalarse y gana el último en terminar.

pub mod fs;
pub mod memory;

pub use fs::FileStorage;
pub use memory::MemoryStorage;

use std::path::{Component, Path};
use thiserror::Error;

/// Resultado tipado de una operación de storage
///
/// Los handlers hacen `match` sobre la variante para elegir el status code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// No existe ninguna entrada con ese nombre
    #[error("file not found: {file_name}")]
    NotFound { file_name: String },

    /// La entrada existe pero no se pudo abrir, leer o escribir
    #[error("internal storage error: {reason}")]
    Internal { reason: String },
}

impl StorageError {
    pub fn not_found(file_name: &str) -> Self {
        StorageError::NotFound {
            file_name: file_name.to_string(),
        }
    }

    pub fn internal(reason: impl ToString) -> Self {
        StorageError::Internal {
            reason: reason.to_string(),
        }
    }
}

/// Capacidades {read, write} sobre blobs con nombre
pub trait Storage: Send + Sync {
    /// Lee el contenido completo de `file_name`
    ///
    /// # Errores
    ///
    /// * `NotFound` si no existe
    /// * `Internal` si existe pero no se puede leer
    fn read(&self, file_name: &str) -> Result<Vec<u8>, StorageError>;

    /// Crea o trunca `file_name` y escribe `data` tal cual
    ///
    /// # Errores
    ///
    /// * `Internal` ante cualquier fallo de I/O
    fn write(&self, file_name: &str, data: &[u8]) -> Result<(), StorageError>;
}

/// Verifica que un nombre de archivo no salga del directorio raíz
///
/// Se rechazan nombres vacíos, absolutos o con componentes `..` / `.`.
pub fn is_safe_name(file_name: &str) -> bool {
    !file_name.is_empty()
        && Path::new(file_name)
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_names() {
        assert!(is_safe_name("a.txt"));
        assert!(is_safe_name("dir/a.txt"));
        assert!(is_safe_name("..hidden"));
    }

    #[test]
    fn test_unsafe_names() {
        assert!(!is_safe_name(""));
        assert!(!is_safe_name("../etc/passwd"));
        assert!(!is_safe_name("a/../../b"));
        assert!(!is_safe_name("/etc/passwd"));
        assert!(!is_safe_name("./a.txt"));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            StorageError::not_found("a.txt").to_string(),
            "file not found: a.txt"
        );
        assert_eq!(
            StorageError::internal("disk on fire").to_string(),
            "internal storage error: disk on fire"
        );
    }
}
