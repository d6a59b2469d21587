//! Utility functions shared across the codebase.
//!
//! Version string parsing for the display command probe, plus small
//! formatting helpers used by the log output.

use std::path::Path;

/// Extract a semantic version string from command output.
///
/// Handles both "vX.Y.Z" and "X.Y.Z" patterns and normalizes to "vX.Y.Z".
///
/// # Examples
/// ```
/// use sunzones::utils::extract_version_from_output;
/// assert_eq!(extract_version_from_output("hyprsunset v2.0.0"), Some("v2.0.0".to_string()));
/// assert_eq!(extract_version_from_output("version: 1.5.2"), Some("v1.5.2".to_string()));
/// ```
pub fn extract_version_from_output(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| extract_semver_from_line(line.trim()))
}

fn extract_semver_from_line(line: &str) -> Option<String> {
    use regex::Regex;
    let re = Regex::new(r"v?(\d+\.\d+\.\d+)").ok()?;
    let captures = re.captures(line)?;
    Some(format!("v{}", captures.get(1)?.as_str()))
}

/// Show a path with the home directory abbreviated to `~`.
pub fn path_for_display(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}

/// Format coordinates as "59.3600°N, 18.0000°E".
pub fn format_coordinates(latitude: f64, longitude: f64) -> String {
    let lat_dir = if latitude >= 0.0 { "N" } else { "S" };
    let lon_dir = if longitude >= 0.0 { "E" } else { "W" };
    format!(
        "{:.4}°{}, {:.4}°{}",
        latitude.abs(),
        lat_dir,
        longitude.abs(),
        lon_dir
    )
}
