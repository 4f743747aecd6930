use std::{
    error, fmt, io,
    path::{Path, PathBuf},
};

/// Failure to read, decode or write a single file.
///
/// Batch operations report these per file and keep going.
#[derive(Debug)]
pub enum FileError {
    MissingFile(PathBuf),
    Decode(PathBuf),
    Io(PathBuf, io::Error),
}

impl FileError {
    pub fn from_io(path: &Path, err: io::Error) -> FileError {
        match err.kind() {
            io::ErrorKind::NotFound => FileError::MissingFile(path.to_path_buf()),
            io::ErrorKind::InvalidData => FileError::Decode(path.to_path_buf()),
            _ => FileError::Io(path.to_path_buf(), err),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            FileError::MissingFile(path) | FileError::Decode(path) | FileError::Io(path, _) => {
                path.as_path()
            }
        }
    }
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FileError::MissingFile(path) => write!(f, "file not found: {}", path.display()),
            FileError::Decode(path) => write!(f, "not valid UTF-8: {}", path.display()),
            FileError::Io(path, err) => write!(f, "{}: {}", path.display(), err),
        }
    }
}

impl error::Error for FileError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            FileError::Io(_, err) => Some(err),
            _ => None,
        }
    }
}

/// Reads a whole file as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String, FileError> {
    let bytes = std::fs::read(path).map_err(|e| FileError::from_io(path, e))?;
    String::from_utf8(bytes).map_err(|_| FileError::Decode(path.to_path_buf()))
}
