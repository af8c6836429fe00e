use super::RecordStore;
use crate::error::{IoOp, NutrackError, Result};
use chrono::Local;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

impl RecordStore {
    /// Archives the user's folder as `<user>-<timestamp>.tar.gz` inside
    /// `into_dir`, which must already exist. Returns the archive path.
    pub fn backup_user(&self, user: &str, into_dir: &Path) -> Result<PathBuf> {
        let user = self.require_user(user)?;
        let user_dir = self.layout.user_dir(&user);
        if !user_dir.is_dir() {
            return Err(NutrackError::NotFound(user_dir));
        }
        if !into_dir.is_dir() {
            return Err(NutrackError::NotFound(into_dir.to_path_buf()));
        }

        let filename = format!("{}-{}.tar.gz", user, Local::now().format("%Y%m%d-%H%M%S"));
        let archive = into_dir.join(filename);
        let file = File::create(&archive).map_err(NutrackError::io(IoOp::Create, &archive))?;
        write_archive(file, &user, &user_dir)
            .map_err(NutrackError::io(IoOp::Copy, &user_dir))?;

        info!(user = %user, archive = %archive.display(), "backed up user");
        Ok(archive)
    }
}

fn write_archive<W: Write>(writer: W, user: &str, user_dir: &Path) -> std::io::Result<()> {
    let enc = GzEncoder::new(writer, Compression::default());
    let mut tar = tar::Builder::new(enc);
    tar.append_dir_all(user, user_dir)?;
    tar.into_inner()?.finish()?;
    Ok(())
}
