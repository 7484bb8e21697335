use std::{
    io,
    path::{
        Path,
        PathBuf,
    },
};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{}: not a valid JSON document", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: expected an object or array at the top level, found {found}", .path.display())]
    UnsupportedRoot { path: PathBuf, found: &'static str },

    #[error("{}: I/O error", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: failed to build archive", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

impl Error {
    pub fn path(&self) -> &Path {
        match self {
            Self::Format { path, .. } | Self::UnsupportedRoot { path, .. } | Self::Io { path, .. } | Self::Archive { path, .. } => path,
        }
    }
}


/// Attach the file being worked on to a lower level error
pub(crate) trait PathContext<T> {
    fn at(self, path: &Path) -> Result<T>;
}

impl<T> PathContext<T> for io::Result<T> {
    fn at(self, path: &Path) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })
    }
}

impl<T> PathContext<T> for zip::result::ZipResult<T> {
    fn at(self, path: &Path) -> Result<T> {
        self.map_err(|source| match source {
            zip::result::ZipError::Io(source) => Error::Io {
                path: path.to_owned(),
                source,
            },
            source => Error::Archive {
                path: path.to_owned(),
                source,
            },
        })
    }
}
