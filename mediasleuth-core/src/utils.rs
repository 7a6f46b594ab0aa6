//! Utility functions for command logging, path naming and number formatting.
//!
//! General-purpose helpers used throughout the mediasleuth-core library.

use std::path::Path;
use std::process::Command;

/// Logs a std `Command` at debug level before it runs.
pub fn log_command(cmd: &Command) {
    let program = cmd.get_program().to_string_lossy();
    let args: Vec<_> = cmd.get_args().map(|arg| arg.to_string_lossy()).collect();
    log::debug!("Executing command: {} {}", program, args.join(" "));
}

/// Display names derived from a file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNameParts {
    /// File name up to the first `.`
    pub name: String,
    /// Name of the parent directory
    pub from_folder: String,
    /// Text after the last `.`, empty when there is none
    pub extension: String,
}

/// Splits `path` into the names shown for a record.
#[must_use]
pub fn file_name_parts(path: &Path) -> FileNameParts {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name = file_name
        .split('.')
        .next()
        .unwrap_or_default()
        .to_string();
    let extension = match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.to_string(),
        None => String::new(),
    };
    let from_folder = path
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    FileNameParts {
        name,
        from_folder,
        extension,
    }
}

/// Formats a float with at most three decimals, dropping trailing zeros
/// (23.976023 -> "23.976", 25.0 -> "25").
#[must_use]
pub fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let text = format!("{value:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" { "0".to_string() } else { text.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_file_name_parts() {
        let parts = file_name_parts(&PathBuf::from("/media/deliveries/spot.v2.final.mov"));
        assert_eq!(parts.name, "spot");
        assert_eq!(parts.extension, "mov");
        assert_eq!(parts.from_folder, "deliveries");
    }

    #[test]
    fn test_file_name_without_extension() {
        let parts = file_name_parts(&PathBuf::from("README"));
        assert_eq!(parts.name, "README");
        assert_eq!(parts.extension, "");
        assert_eq!(parts.from_folder, "");
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(24000.0 / 1001.0), "23.976");
        assert_eq!(format_float(25.0), "25");
        assert_eq!(format_float(-12.5), "-12.5");
        assert_eq!(format_float(-0.0001), "0");
    }
}
