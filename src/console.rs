//! # Console Module
//!
//! Locates the Dolphin controller pipe for a console port.
//!
//! Dolphin reads one pipe per controller port, named `slippibot<port>`. On
//! Unix it is a FIFO inside the `Pipes` folder of the Dolphin user directory;
//! on Windows it is a named pipe in the `\\.\pipe\` namespace.

use std::path::{Path, PathBuf};

/// Pipe name prefix Dolphin listens on
pub const PIPE_NAME_PREFIX: &str = "slippibot";

/// Path of the controller pipe for `port`
///
/// # Examples
///
/// ```
/// use gc_pad_bridge::console::pipes_path;
///
/// let path = pipes_path("/home/me/.dolphin", 2);
/// # #[cfg(unix)]
/// assert_eq!(path.to_str().unwrap(), "/home/me/.dolphin/Pipes/slippibot2");
/// ```
#[cfg(not(windows))]
pub fn pipes_path<P: AsRef<Path>>(dolphin_home: P, port: u8) -> PathBuf {
    dolphin_home
        .as_ref()
        .join("Pipes")
        .join(format!("{}{}", PIPE_NAME_PREFIX, port))
}

#[cfg(windows)]
pub fn pipes_path<P: AsRef<Path>>(_dolphin_home: P, port: u8) -> PathBuf {
    PathBuf::from(format!(r"\\.\pipe\{}{}", PIPE_NAME_PREFIX, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(windows))]
    #[test]
    fn test_pipes_path_per_port() {
        for port in 1..=4 {
            let path = pipes_path("/opt/dolphin", port);
            assert_eq!(path, PathBuf::from(format!("/opt/dolphin/Pipes/slippibot{}", port)));
        }
    }

    #[cfg(windows)]
    #[test]
    fn test_pipes_path_windows() {
        assert_eq!(pipes_path("C:\\Dolphin", 3), PathBuf::from(r"\\.\pipe\slippibot3"));
    }
}
