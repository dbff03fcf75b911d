//! # Lectura de Requests desde el Socket
//! src/server/reader.rs
//!
//! Lee bytes hasta tener la cabecera completa (`\r\n\r\n`) y después tantos
//! bytes de body como declare `Content-Length`. Un solo `read` no alcanza:
//! el request puede llegar partido en varios segmentos.

use super::ServerError;
use crate::http::request::{declared_content_length, find_head_end, HEAD_TERMINATOR};
use crate::http::ParseError;
use std::io::{ErrorKind, Read};

/// Tamaño de cada lectura del socket
const CHUNK_SIZE: usize = 4096;

/// Lee un request completo de `reader`
///
/// Retorna un buffer vacío si el peer cerró sin mandar nada. Si el peer
/// cierra antes de completar el body se retorna lo que haya llegado.
///
/// # Errores
///
/// * `ServerError::BadRequest(RequestTooLarge)` si se superan `max_bytes`
/// * `ServerError::Io` ante fallos o timeouts del socket
pub fn read_request<R: Read>(reader: &mut R, max_bytes: usize) -> Result<Vec<u8>, ServerError> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; CHUNK_SIZE];

    // Total esperado (cabecera + body), conocido al ver la línea vacía
    let mut expected: Option<usize> = None;

    loop {
        if expected.is_none() {
            if let Some(head_end) = find_head_end(&buffer) {
                let body_len = declared_content_length(&buffer[..head_end]).unwrap_or(0);
                // Saturar: un Content-Length enorme cae en el límite de abajo
                expected = Some((head_end + HEAD_TERMINATOR.len()).saturating_add(body_len));
            }
        }

        match expected {
            Some(total) if total > max_bytes => {
                return Err(ParseError::RequestTooLarge(max_bytes).into());
            }
            Some(total) if buffer.len() >= total => break,
            None if buffer.len() > max_bytes => {
                return Err(ParseError::RequestTooLarge(max_bytes).into());
            }
            _ => {}
        }

        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        buffer.extend_from_slice(&chunk[..n]);
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reader que entrega como máximo `step` bytes por llamada
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        step: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let end = (self.pos + self.step).min(self.data.len());
            let n = (end - self.pos).min(buf.len());
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn test_reads_get_request() {
        let raw = b"GET / HTTP/1.1\r\nHost: x\r\n\r\n".to_vec();
        let read = read_request(&mut Cursor::new(raw.clone()), 1024).unwrap();

        assert_eq!(read, raw);
    }

    #[test]
    fn test_reads_body_split_across_reads() {
        let mut raw = b"POST /files/a HTTP/1.1\r\nContent-Length: 5000\r\n\r\n".to_vec();
        raw.extend(std::iter::repeat(b'x').take(5000));
        let mut reader = Trickle {
            data: raw.clone(),
            pos: 0,
            step: 7,
        };

        let read = read_request(&mut reader, 1 << 20).unwrap();

        assert_eq!(read, raw);
    }

    #[test]
    fn test_stops_at_declared_length() {
        let raw = b"POST /files/a HTTP/1.1\r\nContent-Length: 2\r\n\r\nhi".to_vec();
        let mut reader = Trickle {
            data: raw.clone(),
            pos: 0,
            step: 1,
        };

        let read = read_request(&mut reader, 1024).unwrap();

        assert_eq!(read, raw);
        assert_eq!(reader.pos, raw.len());
    }

    #[test]
    fn test_peer_closed_without_data() {
        let read = read_request(&mut Cursor::new(Vec::new()), 1024).unwrap();
        assert!(read.is_empty());
    }

    #[test]
    fn test_truncated_body_returns_what_arrived() {
        let raw = b"POST /files/a HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc".to_vec();
        let read = read_request(&mut Cursor::new(raw.clone()), 1024).unwrap();

        assert_eq!(read, raw);
    }

    #[test]
    fn test_declared_length_over_limit() {
        let raw = b"POST /files/a HTTP/1.1\r\nContent-Length: 4096\r\n\r\n".to_vec();
        let result = read_request(&mut Cursor::new(raw), 256);

        assert!(matches!(
            result,
            Err(ServerError::BadRequest(ParseError::RequestTooLarge(256)))
        ));
    }

    #[test]
    fn test_content_length_near_usize_max_is_rejected() {
        let raw = b"POST /files/a HTTP/1.1\r\nContent-Length: 18446744073709551615\r\n\r\nhi";
        let result = read_request(&mut Cursor::new(raw.to_vec()), 1024);

        assert!(matches!(
            result,
            Err(ServerError::BadRequest(ParseError::RequestTooLarge(1024)))
        ));
    }

    #[test]
    fn test_lowercase_content_length_waits_for_body() {
        let raw = b"POST /files/a HTTP/1.1\r\ncontent-length: 300\r\n\r\n".to_vec();
        let mut full = raw.clone();
        full.extend(std::iter::repeat(b'z').take(300));
        let mut reader = Trickle {
            data: full.clone(),
            pos: 0,
            step: 16,
        };

        let read = read_request(&mut reader, 4096).unwrap();

        assert_eq!(read, full);
    }

    #[test]
    fn test_unterminated_head_over_limit() {
        let raw = vec![b'A'; 600];
        let result = read_request(&mut Cursor::new(raw), 256);

        assert!(matches!(
            result,
            Err(ServerError::BadRequest(ParseError::RequestTooLarge(_)))
        ));
    }
}
