use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs::File;
use std::io;
use std::path::Path;

/// Open a file for reading, separating "doesn't exist" from other I/O failures.
pub(crate) fn open(path: &Path) -> Result<File> {
    match File::open(path) {
        Ok(file) => Ok(file),
        Err(err) if err.kind() == io::ErrorKind::NotFound => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
        Err(err) => Err(err).or_raise(|| ErrorKind::Io(path.to_path_buf())),
    }
}

pub(crate) fn create(path: &Path) -> Result<File> {
    File::create(path).or_raise(|| ErrorKind::Io(path.to_path_buf()))
}
