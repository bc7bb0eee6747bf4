//! Reading and writing script files.
//!
//! The games store scripts as UTF-8, usually with a byte order mark. Reading
//! strips the mark when present; writing adds it unless
//! [`IoConfig::write_bom`] is off.
//!
//! Writes go through a [`PathGuard`] first, so a tool pointed at the wrong
//! directory cannot overwrite files of the game install.

use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::config::{IoConfig, ScriptConfig};
use crate::error::{Result, ScriptError};
use crate::script::{Script, ScriptParser, ScriptWriter};

/// UTF-8 byte order mark.
pub const BOM: &str = "\u{feff}";

/// Rejects write destinations inside protected locations.
///
/// A destination is protected when its path, with `\` normalized to `/`,
/// contains one of the configured fragments.
///
/// # Example
///
/// ```
/// use pdx_script::PathGuard;
///
/// let guard = PathGuard::new(["Steam/steamapps/common/Hearts of Iron IV"]);
/// assert!(guard.is_protected(r"C:\Steam\steamapps\common\Hearts of Iron IV\common\ideas\x.txt"));
/// assert!(!guard.is_protected("mod/common/ideas/x.txt"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathGuard {
    fragments: Vec<String>,
}

impl PathGuard {
    /// Create a guard for the given path fragments.
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fragments: fragments
                .into_iter()
                .map(|f| normalize(&f.into()))
                .filter(|f| !f.is_empty())
                .collect(),
        }
    }

    /// Create a guard from the protected paths of a file configuration.
    pub fn from_config(config: &IoConfig) -> Self {
        Self::new(config.protected_paths.iter().cloned())
    }

    /// The normalized protected fragments.
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Whether `path` lies inside a protected location.
    pub fn is_protected<P: AsRef<Path>>(&self, path: P) -> bool {
        let path = normalize(&path.as_ref().to_string_lossy());
        self.fragments.iter().any(|f| path.contains(f.as_str()))
    }

    /// Fail with [`ScriptError::ProtectedDestination`] when `path` is protected.
    pub fn check<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if self.is_protected(path) {
            warn!("Refusing to write {}", path.display());
            return Err(ScriptError::ProtectedDestination {
                path: path.display().to_string(),
            });
        }
        Ok(())
    }
}

impl Default for PathGuard {
    fn default() -> Self {
        Self::from_config(&IoConfig::default())
    }
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

/// Strip a leading byte order mark, if any.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix(BOM).unwrap_or(text)
}

/// Read and parse a script file.
///
/// # Errors
///
/// [`ScriptError::Io`] when the file cannot be read, or any parse error.
pub fn read_script<P: AsRef<Path>>(path: P, config: &ScriptConfig) -> Result<Script> {
    let path = path.as_ref();
    debug!("Reading {}", path.display());

    let text = fs::read_to_string(path)?;
    let script = ScriptParser::with_config(config.parser.clone()).parse(strip_bom(&text))?;

    debug!("Read {} statements from {}", script.len(), path.display());
    Ok(script)
}

/// Render a script as file contents, framing and byte order mark included.
pub fn render_script(script: &Script, config: &ScriptConfig) -> String {
    let body = ScriptWriter::with_config(config.writer.clone()).write(script);
    if config.io.write_bom {
        format!("{}{}", BOM, body)
    } else {
        body
    }
}

/// Write a script file, replacing any existing file.
///
/// # Errors
///
/// [`ScriptError::ProtectedDestination`] when `path` is protected, in which
/// case nothing is written, or [`ScriptError::Io`] when the write fails.
pub fn write_script<P: AsRef<Path>>(path: P, script: &Script, config: &ScriptConfig) -> Result<()> {
    let path = path.as_ref();
    PathGuard::from_config(&config.io).check(path)?;

    let contents = render_script(script, config);
    fs::write(path, contents.as_bytes())?;

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IoConfig;
    use crate::script::Statement;
    use tempfile::TempDir;

    fn sample() -> Script {
        Script::from(vec![
            Statement::scalar("tag", "FIN"),
            Statement::list("color", ["1", "2", "3"]),
        ])
    }

    #[test]
    fn test_strip_bom() {
        assert_eq!(strip_bom("\u{feff}a = b"), "a = b");
        assert_eq!(strip_bom("a = b"), "a = b");
    }

    #[test]
    fn test_guard_normalizes_separators() {
        let guard = PathGuard::new([r"games\hoi4"]);
        assert_eq!(guard.fragments(), ["games/hoi4"]);
        assert!(guard.is_protected("/srv/games/hoi4/common/x.txt"));
        assert!(guard.is_protected(r"D:\games\hoi4\x.txt"));
        assert!(!guard.is_protected("/srv/games/eu4/x.txt"));
    }

    #[test]
    fn test_guard_ignores_empty_fragments() {
        let guard = PathGuard::new([""]);
        assert!(guard.fragments().is_empty());
        assert!(!guard.is_protected("anything"));
    }

    #[test]
    fn test_default_guard_protects_game_install() {
        let guard = PathGuard::default();
        assert!(guard
            .check("C:/Program Files/Steam/steamapps/common/Hearts of Iron IV/common/x.txt")
            .is_err());
        assert!(guard.check("mod/common/x.txt").is_ok());
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.txt");
        let config = ScriptConfig::default();

        write_script(&path, &sample(), &config).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with(BOM));
        assert!(raw.ends_with("#EOF\n"));

        assert_eq!(read_script(&path, &config).unwrap(), sample());
    }

    #[test]
    fn test_write_without_bom() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain.txt");
        let config = ScriptConfig::new().with_io(IoConfig::new().with_bom(false));

        write_script(&path, &sample(), &config).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with('#'));
    }

    #[test]
    fn test_write_to_protected_path_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let protected = dir.path().join("vanilla");
        fs::create_dir(&protected).unwrap();
        let path = protected.join("x.txt");

        let io = IoConfig::new().with_protected_paths([protected.to_string_lossy().into_owned()]);
        let config = ScriptConfig::new().with_io(io);

        let result = write_script(&path, &sample(), &config);
        assert!(matches!(result, Err(ScriptError::ProtectedDestination { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = read_script(dir.path().join("missing.txt"), &ScriptConfig::default());
        assert!(matches!(result, Err(ScriptError::Io(_))));
    }

    #[test]
    fn test_read_reports_parse_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.txt");
        fs::write(&path, "a = {\n").unwrap();
        let result = read_script(&path, &ScriptConfig::default());
        assert!(matches!(result, Err(ScriptError::UnclosedBlock { .. })));
    }
}
