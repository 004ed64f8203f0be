//! A directory of `.ps2` card images.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::{debug, info};

use crate::Error;

pub const CARD_EXTENSION: &str = "ps2";
/// File names of the two console slots, in slot order.
pub const SLOT_CARD_NAMES: [&str; 2] = ["Mcd001.ps2", "Mcd002.ps2"];
pub const BLANK_CARD_SIZE: usize = 8 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

#[derive(Debug, Clone)]
pub struct CardLibrary {
    dir: PathBuf,
}

impl CardLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Card files in the library, ordered case-insensitively. A missing
    /// library directory has no cards.
    pub fn cards(&self) -> Result<Vec<CardFile>, Error> {
        if !self.dir.is_dir() {
            debug!("library directory {} does not exist", self.dir.display());
            return Ok(Vec::new());
        }

        let mut cards = std::fs::read_dir(&self.dir)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_card_file(path))
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?.to_owned();
                let metadata = std::fs::metadata(&path).ok()?;
                Some(CardFile {
                    name,
                    size: metadata.len(),
                    modified: metadata.modified().ok(),
                    path,
                })
            })
            .collect::<Vec<_>>();

        cards.sort_by_key(|card| card.name.to_ascii_lowercase());
        Ok(cards)
    }

    /// Copies `source` into the library under its own file name, creating
    /// the library directory when needed.
    pub fn import(&self, source: &Path) -> Result<PathBuf, Error> {
        let name = source
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::ExtensionError(source.display().to_string()))?;
        if !is_card_file(source) {
            return Err(Error::ExtensionError(name.to_owned()));
        }
        if !source.is_file() {
            return Err(Error::MissingCard(source.display().to_string()));
        }

        std::fs::create_dir_all(&self.dir)?;
        let destination = self.dir.join(name);
        if is_same_file(source, &destination)? {
            return Err(Error::SameFileError(destination.display().to_string()));
        }
        std::fs::copy(source, &destination)?;
        info!("imported {} into {}", name, self.dir.display());
        Ok(destination)
    }

    /// Copies the card `name` into `dest_dir`, which must already exist. An
    /// existing file at the destination is only replaced with `force`.
    pub fn export(&self, name: &str, dest_dir: &Path, force: bool) -> Result<PathBuf, Error> {
        let source = self.card_path(name)?;
        let destination = dest_dir.join(name);
        if is_same_file(&source, &destination)? {
            return Err(Error::SameFileError(destination.display().to_string()));
        }
        if destination.exists() && !force {
            return Err(Error::ExistingCard(destination.display().to_string()));
        }
        std::fs::copy(&source, &destination)?;
        info!("exported {} to {}", name, dest_dir.display());
        Ok(destination)
    }

    /// Writes a blank card. Without a `name` the first free slot file
    /// (`Mcd001.ps2`, then `Mcd002.ps2`) is used. Existing cards are never
    /// overwritten.
    pub fn create(&self, name: Option<&str>) -> Result<PathBuf, Error> {
        let name = match name {
            Some(name) => {
                if name.contains(|c| matches!(c, '\\' | '/')) {
                    return Err(Error::NameError(name.to_owned()));
                }
                if !is_card_file(Path::new(name)) {
                    return Err(Error::ExtensionError(name.to_owned()));
                }
                name
            }
            None => SLOT_CARD_NAMES
                .iter()
                .copied()
                .find(|slot| !self.dir.join(slot).exists())
                .ok_or(Error::SlotsInUse)?,
        };

        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|err| match err.kind() {
                std::io::ErrorKind::AlreadyExists => {
                    Error::ExistingCard(path.display().to_string())
                }
                _ => Error::IOError(err),
            })?;
        file.write_all(&vec![0u8; BLANK_CARD_SIZE])?;
        info!("created {}", path.display());
        Ok(path)
    }

    pub fn delete(&self, name: &str) -> Result<(), Error> {
        let path = self.card_path(name)?;
        std::fs::remove_file(&path)?;
        info!("deleted {}", path.display());
        Ok(())
    }

    fn card_path(&self, name: &str) -> Result<PathBuf, Error> {
        if name.contains(|c| matches!(c, '\\' | '/')) {
            return Err(Error::NameError(name.to_owned()));
        }

        let path = self.dir.join(name);
        if !path.is_file() {
            return Err(Error::MissingCard(name.to_owned()));
        }
        Ok(path)
    }
}

/// `false` when `destination` does not exist yet.
fn is_same_file(source: &Path, destination: &Path) -> Result<bool, Error> {
    if !destination.exists() {
        return Ok(false);
    }
    Ok(std::fs::canonicalize(source)? == std::fs::canonicalize(destination)?)
}

pub fn is_card_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(CARD_EXTENSION))
        .unwrap_or(false)
}
