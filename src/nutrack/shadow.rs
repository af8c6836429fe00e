//! # Shadow Files
//!
//! Crash safety for in-place rewrites without a journal.
//!
//! Before a file is rewritten, a *shadow* is written next to it: a byte copy of
//! the original followed by the terminator record `{_END_}|`. The terminator is
//! the last thing written, so its presence proves the copy is complete.
//!
//! ```text
//! data/users.dat            {alice}|{bob}|
//! data/.shadow_users.dat    {alice}|{bob}|{_END_}|
//! ```
//!
//! The shadow is deleted only after the rewrite succeeds. Any pass that finds
//! a lingering shadow therefore knows the rewrite was interrupted:
//!
//! - well-formed shadow: its payload is copied back over the original, then
//!   the shadow is deleted ([`Recovery::Restored`]);
//! - terminator missing, misplaced or first: the shadow itself was cut short,
//!   the original was never touched, and the shadow is deleted
//!   ([`Recovery::Discarded`]).
//!
//! A crash at any step leaves either the original intact or a well-formed
//! shadow on disk, so every step is safe to repeat.

use crate::codec::SEPARATOR;
use crate::error::IoOp;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const SHADOW_PREFIX: &str = ".shadow_";
pub const TERMINATOR: &str = "{_END_}";

#[derive(Error, Debug)]
pub enum ShadowError {
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("{} is empty", .0.display())]
    Empty(PathBuf),

    #[error("{} is incomplete and was discarded", .0.display())]
    Corrupted(PathBuf),

    #[error("{} is not a shadow file", .0.display())]
    WrongShadow(PathBuf),

    #[error("cannot {op} {}: {source}", .path.display())]
    Io {
        op: IoOp,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn io_err(op: IoOp, path: &Path) -> impl FnOnce(io::Error) -> ShadowError + '_ {
    move |source| ShadowError::Io {
        op,
        path: path.to_path_buf(),
        source,
    }
}

/// What [`recover`] did with a lingering shadow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    NoShadow,
    Restored,
    Discarded,
}

/// `dir/name` → `dir/.shadow_name`
pub fn shadow_path(original: &Path) -> PathBuf {
    let name = original
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    original.with_file_name(format!("{}{}", SHADOW_PREFIX, name))
}

/// `dir/.shadow_name` → `dir/name`
pub fn original_path(shadow: &Path) -> Result<PathBuf, ShadowError> {
    let wrong = || ShadowError::WrongShadow(shadow.to_path_buf());
    let name = shadow.file_name().ok_or_else(wrong)?.to_string_lossy();
    let original = name.strip_prefix(SHADOW_PREFIX).ok_or_else(wrong)?;
    if original.is_empty() {
        return Err(wrong());
    }
    Ok(shadow.with_file_name(original))
}

/// Writes the shadow of `original` and returns its path. A lingering shadow
/// is resolved with [`recover`] first, so it is never overwritten while it
/// still holds the only good copy.
pub fn begin_shadow(original: &Path) -> Result<PathBuf, ShadowError> {
    recover(original)?;
    let bytes = read_regular_file(original)?;
    if bytes.is_empty() {
        return Err(ShadowError::Empty(original.to_path_buf()));
    }

    let mut content = bytes;
    if content.last() != Some(&(SEPARATOR as u8)) {
        content.push(SEPARATOR as u8);
    }
    content.extend_from_slice(TERMINATOR.as_bytes());
    content.push(SEPARATOR as u8);

    let shadow = shadow_path(original);
    fs::write(&shadow, content).map_err(io_err(IoOp::Write, &shadow))?;
    Ok(shadow)
}

/// Copies a well-formed shadow's payload over its original and deletes the
/// shadow. A malformed shadow is deleted and reported as `Corrupted`; the
/// original is left as it was.
pub fn commit_shadow(shadow: &Path) -> Result<PathBuf, ShadowError> {
    let original = original_path(shadow)?;
    let bytes = read_regular_file(shadow)?;
    if bytes.is_empty() {
        return Err(ShadowError::Empty(shadow.to_path_buf()));
    }

    let payload = match payload(&bytes) {
        Some(payload) => payload,
        None => {
            fs::remove_file(shadow).map_err(io_err(IoOp::Remove, shadow))?;
            return Err(ShadowError::Corrupted(shadow.to_path_buf()));
        }
    };

    fs::write(&original, payload).map_err(io_err(IoOp::Write, &original))?;
    fs::remove_file(shadow).map_err(io_err(IoOp::Remove, shadow))?;
    Ok(original)
}

/// Everything before the terminator, if the terminator is the single final
/// record and not the first one.
fn payload(bytes: &[u8]) -> Option<&[u8]> {
    let mut tail = TERMINATOR.as_bytes().to_vec();
    tail.push(SEPARATOR as u8);

    let body = bytes.strip_suffix(tail.as_slice())?;
    if body.last() != Some(&(SEPARATOR as u8)) {
        return None;
    }
    let has_early_terminator = body
        .split(|b| *b == SEPARATOR as u8)
        .any(|chunk| chunk == TERMINATOR.as_bytes());
    if has_early_terminator {
        return None;
    }
    Some(body)
}

/// Resolves a lingering shadow of `original`, if any.
pub fn recover(original: &Path) -> Result<Recovery, ShadowError> {
    let shadow = shadow_path(original);
    if !shadow.is_file() {
        return Ok(Recovery::NoShadow);
    }

    match commit_shadow(&shadow) {
        Ok(_) => {
            info!(path = %original.display(), "restored from shadow");
            Ok(Recovery::Restored)
        }
        Err(ShadowError::Corrupted(_)) => {
            warn!(shadow = %shadow.display(), "discarded incomplete shadow");
            Ok(Recovery::Discarded)
        }
        Err(ShadowError::Empty(_)) => {
            fs::remove_file(&shadow).map_err(io_err(IoOp::Remove, &shadow))?;
            warn!(shadow = %shadow.display(), "discarded empty shadow");
            Ok(Recovery::Discarded)
        }
        Err(e) => Err(e),
    }
}

fn read_regular_file(path: &Path) -> Result<Vec<u8>, ShadowError> {
    if !path.is_file() {
        return Err(ShadowError::NotFound(path.to_path_buf()));
    }
    fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ShadowError::NotFound(path.to_path_buf()),
        _ => ShadowError::Io {
            op: IoOp::Read,
            path: path.to_path_buf(),
            source,
        },
    })
}

/// A shadow held for the duration of one rewrite.
///
/// ```no_run
/// # use nutrack::shadow::ShadowGuard;
/// # use std::path::Path;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let path = Path::new("data/users.dat");
/// let guard = ShadowGuard::begin(path)?;
/// std::fs::write(path, "{alice}|")?;
/// guard.finish()?;
/// # Ok(())
/// # }
/// ```
///
/// Dropping the guard without calling [`finish`](ShadowGuard::finish) puts the
/// original content back.
#[derive(Debug)]
pub struct ShadowGuard {
    shadow: PathBuf,
    finished: bool,
}

impl ShadowGuard {
    pub fn begin(original: &Path) -> Result<Self, ShadowError> {
        let shadow = begin_shadow(original)?;
        Ok(Self {
            shadow,
            finished: false,
        })
    }

    pub fn shadow(&self) -> &Path {
        &self.shadow
    }

    /// Marks the rewrite as complete and deletes the shadow.
    pub fn finish(mut self) -> Result<(), ShadowError> {
        self.finished = true;
        fs::remove_file(&self.shadow).map_err(io_err(IoOp::Remove, &self.shadow))
    }
}

impl Drop for ShadowGuard {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        match commit_shadow(&self.shadow) {
            Ok(original) => {
                warn!(path = %original.display(), "rewrite interrupted, original restored")
            }
            Err(e) => warn!(error = %e, "rewrite interrupted, shadow left for next pass"),
        }
    }
}
