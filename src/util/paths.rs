//! Path utilities for kiosk data directories

use std::path::PathBuf;

/// Get the base kiosk data directory (~/.kiosk)
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".kiosk"))
        .unwrap_or_else(|| PathBuf::from(".kiosk"))
}

/// Get the logs directory (~/.kiosk/logs)
pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Get the default log file path (~/.kiosk/logs/kiosk.log)
pub fn log_file_path() -> PathBuf {
    logs_dir().join("kiosk.log")
}

/// Get the config file path (~/.config/kiosk/config.toml)
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .map(|c| c.join("kiosk"))
        .unwrap_or_else(|| PathBuf::from(".kiosk"))
        .join("config.toml")
}

/// Default identity file used for the device fingerprint
/// (~/.ssh/id_ed25519.pub)
pub fn default_identity_path() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".ssh").join("id_ed25519.pub"))
        .unwrap_or_else(|| PathBuf::from("id_ed25519.pub"))
}
