//! Session persistence: encoding, schema migration and merging of hypothesis collections.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::SessionError;
use crate::model::Session;

mod codec;
mod merge;
mod migrate;

pub use self::codec::{Decoded, decode, deserialize, serialize};
pub use self::merge::{MergeOutcome, MergeWarning, merge};
pub use self::migrate::migrate;

pub const SESSION_EXTENSION: &str = "json";

/// Appends `.json` unless the name already ends with it.
pub fn with_session_extension(path: &Path) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(SESSION_EXTENSION) => path.to_path_buf(),
        _ => {
            let mut s = path.as_os_str().to_owned();
            s.push(".");
            s.push(SESSION_EXTENSION);
            PathBuf::from(s)
        }
    }
}

pub fn read_session(path: &Path) -> Result<Decoded, SessionError> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(SessionError::NotFound(path.to_path_buf()));
        }
        Err(err) => return Err(SessionError::io(path, err)),
    };
    let decoded = decode(&bytes)?;
    tracing::info!(
        path = %path.display(),
        hypotheses = decoded.session.hypotheses.len(),
        rejected = decoded.rejected.len(),
        "loaded session"
    );
    Ok(decoded)
}

pub fn write_session(path: &Path, session: &Session) -> Result<(), SessionError> {
    let bytes = serialize(session)?;
    write_atomic(path, &bytes)?;
    tracing::info!(
        path = %path.display(),
        hypotheses = session.hypotheses.len(),
        "saved session"
    );
    Ok(())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), SessionError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|err| SessionError::io(parent, err))?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).map_err(|err| SessionError::io(&tmp, err))?;
    fs::rename(&tmp, path).map_err(|err| SessionError::io(path, err))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/store/migrate_tests.rs"]
mod migrate_tests;

#[cfg(test)]
#[path = "tests/store/merge_tests.rs"]
mod merge_tests;
