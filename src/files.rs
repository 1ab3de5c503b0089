//! Reading procedure sources and writing report definitions

use std::io::Write;
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::RdlError;

/// Read a text file, trying UTF-8 first and falling back to Windows-1252.
pub fn read_text_with_fallback(path: &Path) -> Result<String, RdlError> {
    let source_error = |e: std::io::Error| RdlError::SourceReadError {
        path: path.to_path_buf(),
        source: e,
    };

    let bytes = std::fs::read(path).map_err(source_error)?;
    let text = decode_text(bytes).map_err(source_error)?;
    Ok(text.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(text))
}

/// Decode bytes as UTF-8, or as Windows-1252 when they are not valid UTF-8.
pub fn decode_text(bytes: Vec<u8>) -> std::io::Result<String> {
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, had_errors) = WINDOWS_1252.decode(&bytes);
            if had_errors {
                Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "File contains invalid characters",
                ))
            } else {
                debug!("Decoded input as Windows-1252");
                Ok(decoded.into_owned())
            }
        }
    }
}

/// Write `contents` to `path` so that the target is either fully replaced or
/// left untouched.
///
/// Missing parent directories are created. The data goes to a temporary file
/// in the target directory which is then renamed over the target.
pub fn write_atomically(path: &Path, contents: &str) -> Result<(), RdlError> {
    let write_error = |e: std::io::Error| RdlError::OutputWriteError {
        path: path.to_path_buf(),
        source: e,
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_error)?;

    let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
    file.write_all(contents.as_bytes()).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}
