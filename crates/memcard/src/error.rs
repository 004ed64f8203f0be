#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    InvalidRecord(String),
    UnknownLocator(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "{err}"),
            Error::InvalidRecord(line) => write!(f, "Malformed save record: {line:?}"),
            Error::UnknownLocator(name) => write!(
                f,
                "Unknown locator {name:?} (expected heuristic, superblock or auto)"
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
