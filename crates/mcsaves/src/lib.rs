pub mod cli;
pub mod config;
pub mod info;
pub mod library;
pub mod logger;

pub use config::{load_config, resolve_config, Config, LibraryConfig, CONFIG_FILE_NAME};
pub use info::CardInfo;
pub use library::{is_card_file, CardFile, CardLibrary};

#[derive(Debug)]
pub enum Error {
    NameError(String),
    ExtensionError(String),
    MissingCard(String),
    ExistingCard(String),
    SameFileError(String),
    SlotsInUse,
    ImportError(Vec<String>),
    IOError(std::io::Error),
    CardError(memcard::Error),
    ConfigError(String),
    SerializeError(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::NameError(name) => {
                write!(f, "Card name {name:?} must not contain path separators")
            }
            Error::ExtensionError(name) => write!(f, "{name} is not a .ps2 memory card"),
            Error::MissingCard(name) => write!(f, "Memory card file not found: {name}"),
            Error::ExistingCard(name) => write!(f, "{name} already exists"),
            Error::SameFileError(name) => {
                write!(f, "Source and destination are the same file: {name}")
            }
            Error::SlotsInUse => write!(f, "Both memory card slots are already in use"),
            Error::ImportError(failed) if failed.is_empty() => write!(f, "No files to import"),
            Error::ImportError(failed) => write!(f, "Failed files: {}", failed.join(", ")),
            Error::IOError(err) => write!(f, "{err}"),
            Error::CardError(err) => write!(f, "{err}"),
            Error::ConfigError(err) => write!(f, "{err}"),
            Error::SerializeError(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IOError(err)
    }
}

impl From<memcard::Error> for Error {
    fn from(err: memcard::Error) -> Self {
        match err {
            memcard::Error::Io(err) => Error::IOError(err),
            other => Error::CardError(other),
        }
    }
}
