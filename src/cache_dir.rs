// One-time setup of the writable cache directory used by the inference runtime.

use std::{
    io,
    path::{Path, PathBuf},
};

/// Name of the default cache directory created next to the executable.
pub const DEFAULT_CACHE_DIR_NAME: &str = ".numba_cache";

/// Creates the cache directory and returns its path.
///
/// An explicitly configured directory is created with all of its parents.
/// Otherwise `.numba_cache` is created next to the running executable.
/// Repeating the call is harmless.
pub fn prepare_cache_dir(configured: Option<&Path>) -> io::Result<PathBuf> {
    let path = match configured {
        Some(path) => path.to_path_buf(),
        None => default_cache_dir()?,
    };

    std::fs::create_dir_all(&path)?;

    Ok(path)
}

fn default_cache_dir() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let parent = exe.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("executable path {} has no parent directory", exe.display()),
        )
    })?;

    Ok(parent.join(DEFAULT_CACHE_DIR_NAME))
}
