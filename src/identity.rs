//! Current user identity
//!
//! Empty `<authors>` and `<owners>` fields are filled with the name of the
//! user running the build. A full display name is preferred when the
//! platform can provide one; otherwise the login name of the effective user
//! is used. Not finding a display name is a normal outcome.
//!
//! On Unix the effective user comes from the user database via `uzers`, so
//! `USER` and friends are not consulted; other platforms only have the
//! environment.

#[cfg(not(unix))]
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use log::debug;
use regex::Regex;

/// Login name used when nothing else is known.
pub const UNKNOWN_USER: &str = "unknown";

/// A source of human-readable display names for login names.
pub trait DisplayNameLookup {
    fn display_name(&self, user: &str) -> Option<String>;
}

/// Looks display names up in the GECOS field of a passwd file.
#[derive(Debug, Clone)]
pub struct PasswdLookup {
    path: PathBuf,
}

impl PasswdLookup {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for PasswdLookup {
    fn default() -> Self {
        Self::new("/etc/passwd")
    }
}

impl DisplayNameLookup for PasswdLookup {
    fn display_name(&self, user: &str) -> Option<String> {
        let contents = fs::read_to_string(&self.path)
            .map_err(|e| debug!("Cannot read {}: {}", self.path.display(), e))
            .ok()?;

        contents
            .lines()
            .map(|line| line.split(':').collect::<Vec<_>>())
            .find(|fields| fields.len() >= 5 && fields[0] == user)
            .and_then(|fields| fields[4].split(',').next().map(str::trim))
            .filter(|name| !name.is_empty())
            .map(normalize_display_name)
    }
}

/// A lookup that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDisplayName;

impl DisplayNameLookup for NoDisplayName {
    fn display_name(&self, _user: &str) -> Option<String> {
        None
    }
}

/// The display-name lookup available on this platform.
pub fn platform_lookup() -> Box<dyn DisplayNameLookup> {
    if cfg!(unix) {
        Box::new(PasswdLookup::default())
    } else {
        Box::new(NoDisplayName)
    }
}

/// Turn directory-style `"Last, First"` into `"First Last"`.
pub fn normalize_display_name(name: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(\S+)\s*,\s*(\S+)\s*$").unwrap_or_else(|e| panic!("invalid pattern: {e}"))
    });
    pattern.replace(name, "$2 $1").trim().to_string()
}

#[cfg(unix)]
fn effective_user_name() -> Option<String> {
    let name = uzers::get_effective_username()?;
    let name = name.to_string_lossy().trim().to_string();
    if name.is_empty() {
        debug!("Effective user {} has no name", uzers::get_effective_uid());
        return None;
    }
    Some(name)
}

#[cfg(not(unix))]
fn effective_user_name() -> Option<String> {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .filter_map(|key| env::var(key).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// The login name of the effective user.
pub fn login_name() -> String {
    effective_user_name().unwrap_or_else(|| UNKNOWN_USER.to_string())
}

/// Resolve the name to record as package author and owner.
pub fn current_user(use_display_name: bool, lookup: &dyn DisplayNameLookup) -> String {
    let login = login_name();
    if use_display_name {
        if let Some(name) = lookup.display_name(&login) {
            debug!("Resolved display name '{}' for '{}'", name, login);
            return name;
        }
        debug!("No display name for '{}', using login name", login);
    }
    login
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tempfile::TempDir;

    struct Fixed(&'static str);

    impl DisplayNameLookup for Fixed {
        fn display_name(&self, _user: &str) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    fn with_user<T>(value: Option<&str>, f: impl FnOnce() -> T) -> T {
        let saved: Vec<_> = ["USER", "USERNAME", "LOGNAME"]
            .iter()
            .map(|k| (*k, env::var(k).ok()))
            .collect();
        for (key, _) in &saved {
            env::remove_var(key);
        }
        if let Some(value) = value {
            env::set_var("USER", value);
        }
        let result = f();
        for (key, previous) in saved {
            match previous {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
        result
    }

    #[cfg(unix)]
    fn effective_user() -> String {
        uzers::get_user_by_uid(uzers::get_effective_uid())
            .map(|user| user.name().to_string_lossy().into_owned())
            .unwrap_or_else(|| UNKNOWN_USER.to_string())
    }

    #[test]
    fn test_normalize_display_name() {
        assert_eq!(normalize_display_name("Doe, Jane"), "Jane Doe");
        assert_eq!(normalize_display_name("  Doe ,Jane "), "Jane Doe");
        assert_eq!(normalize_display_name("Jane Doe"), "Jane Doe");
    }

    #[test]
    fn test_passwd_lookup() {
        let temp = TempDir::new().unwrap();
        let passwd = temp.path().join("passwd");
        fs::write(
            &passwd,
            "root:x:0:0:root:/root:/bin/bash\n\
             jdoe:x:1000:1000:Jane Doe,Room 1,555:/home/jdoe:/bin/sh\n\
             svc:x:1001:1001::/srv:/usr/sbin/nologin\n",
        )
        .unwrap();

        let lookup = PasswdLookup::new(&passwd);
        assert_eq!(lookup.display_name("jdoe"), Some("Jane Doe".to_string()));
        assert_eq!(lookup.display_name("svc"), None);
        assert_eq!(lookup.display_name("nobody"), None);
    }

    #[test]
    fn test_passwd_lookup_missing_file() {
        let lookup = PasswdLookup::new("/nonexistent/passwd");
        assert_eq!(lookup.display_name("root"), None);
    }

    #[test]
    #[serial]
    fn test_current_user_prefers_display_name() {
        let name = with_user(Some("jdoe"), || current_user(true, &Fixed("Jane Doe")));
        assert_eq!(name, "Jane Doe");
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_current_user_without_display_name() {
        let name = with_user(Some("jdoe"), || current_user(false, &Fixed("Jane Doe")));
        assert_eq!(name, effective_user());

        let name = with_user(Some("jdoe"), || current_user(true, &NoDisplayName));
        assert_eq!(name, effective_user());
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_login_name_ignores_environment() {
        assert_eq!(with_user(None, login_name), effective_user());
        assert_eq!(with_user(Some("someone-else"), login_name), effective_user());
    }

    #[cfg(not(unix))]
    #[test]
    #[serial]
    fn test_login_name_from_environment() {
        assert_eq!(with_user(Some("jdoe"), login_name), "jdoe");
        assert_eq!(with_user(None, login_name), UNKNOWN_USER);
    }
}
