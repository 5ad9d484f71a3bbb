//! Configuration loading and resolution.

use std::path::PathBuf;

/// Default HTTP listen address.
pub const DEFAULT_ADDR: &str = "127.0.0.1:8001";

/// Resolve the directory holding the sheet files.
///
/// Order: explicit flag, `ASP_DATA_DIR`, `./data` if present, then
/// `$HOME/.asp/data`.
pub fn resolve_data_dir(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    if let Ok(env_path) = std::env::var("ASP_DATA_DIR") {
        if !env_path.is_empty() {
            return PathBuf::from(env_path);
        }
    }

    let cwd_data = PathBuf::from("data");
    if cwd_data.is_dir() {
        return cwd_data;
    }

    resolve_default_data_dir()
}

fn resolve_default_data_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());

    PathBuf::from(home).join(".asp").join("data")
}

/// Resolve the HTTP listen address: explicit flag, `ASP_ADDR`, then the
/// default.
pub fn resolve_addr(explicit: Option<&str>) -> String {
    if let Some(addr) = explicit {
        return addr.to_string();
    }

    match std::env::var("ASP_ADDR") {
        Ok(addr) if !addr.is_empty() => addr,
        _ => DEFAULT_ADDR.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_wins() {
        assert_eq!(resolve_data_dir(Some("/srv/sheets")), PathBuf::from("/srv/sheets"));
        assert_eq!(resolve_addr(Some("0.0.0.0:9000")), "0.0.0.0:9000");
    }

    #[test]
    fn test_default_data_dir_under_home() {
        assert!(resolve_default_data_dir().ends_with(".asp/data"));
    }
}
