//! # Storage en Memoria
//! src/storage/memory.rs
//!
//! Mismo contrato que `FileStorage` pero sin disco. Sirve para tests del
//! router y para embeber el servidor sin directorio de datos.

use super::{is_safe_name, Storage, StorageError};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Storage en memoria protegido por un `Mutex`
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Obtiene el número de archivos almacenados
    ///
    /// Un lock envenenado no borra los datos, así que se cuentan igual.
    pub fn len(&self) -> usize {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn read(&self, file_name: &str) -> Result<Vec<u8>, StorageError> {
        if !is_safe_name(file_name) {
            return Err(StorageError::not_found(file_name));
        }

        let files = self
            .files
            .lock()
            .map_err(|_| StorageError::internal("storage lock poisoned"))?;

        files
            .get(file_name)
            .cloned()
            .ok_or_else(|| StorageError::not_found(file_name))
    }

    fn write(&self, file_name: &str, data: &[u8]) -> Result<(), StorageError> {
        if !is_safe_name(file_name) {
            return Err(StorageError::internal(format!("invalid file name: {file_name}")));
        }

        let mut files = self
            .files
            .lock()
            .map_err(|_| StorageError::internal("storage lock poisoned"))?;

        files.insert(file_name.to_string(), data.to_vec());
        Ok(())
    }
}
