//! # Storage en Disco
//! src/storage/fs.rs
//!
//! Guarda cada blob como un archivo bajo un directorio raíz. La raíz se
//! recibe en el constructor; no hay estado global.

use super::{is_safe_name, Storage, StorageError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Storage respaldado por un directorio del filesystem
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Directorio donde viven los archivos
    root: PathBuf,
}

impl FileStorage {
    /// Crea un storage sobre `root` sin tocar el disco
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Crea un storage sobre `root`, creando el directorio si no existe
    ///
    /// # Ejemplo
    /// ```no_run
    /// use http_fileserver::storage::FileStorage;
    ///
    /// let storage = FileStorage::open("./public").unwrap();
    /// assert!(storage.root().is_dir());
    /// ```
    pub fn open(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Obtiene el directorio raíz
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ruta completa de `file_name`, o `None` si el nombre escapa de la raíz
    fn resolve(&self, file_name: &str) -> Option<PathBuf> {
        is_safe_name(file_name).then(|| self.root.join(file_name))
    }
}

impl Storage for FileStorage {
    fn read(&self, file_name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self
            .resolve(file_name)
            .ok_or_else(|| StorageError::not_found(file_name))?;

        // fs::read lee hasta EOF, sin límite de buffer
        fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::not_found(file_name),
            _ => StorageError::internal(e),
        })
    }

    fn write(&self, file_name: &str, data: &[u8]) -> Result<(), StorageError> {
        let path = self
            .resolve(file_name)
            .ok_or_else(|| StorageError::internal(format!("invalid file name: {file_name}")))?;

        fs::write(&path, data).map_err(StorageError::internal)
    }
}
