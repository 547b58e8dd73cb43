use std::io::Write;
use std::process::{Command, Stdio};

use tablegen_core::{Error, Result};

/// Formatter invoked over generated sources when formatting is on.
pub const DEFAULT_FORMATTER: &str = "gofmt";

/// Pipe rendered text through an external source formatter.
///
/// The formatter reads stdin and writes the reformatted source to
/// stdout. Failures surface as errors; callers fall back to the
/// unformatted text so the artifact is still usable.
pub fn format_source(formatter: &str, source: &str) -> Result<String> {
    let mut child = Command::new(formatter)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| Error::Render(format!("formatter '{formatter}' failed to start: {err}")))?;

    child
        .stdin
        .take()
        .ok_or_else(|| Error::Render(format!("formatter '{formatter}' has no stdin")))?
        .write_all(source.as_bytes())?;

    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(Error::Render(format!(
            "formatter '{formatter}' rejected the output: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    String::from_utf8(output.stdout)
        .map_err(|_| Error::Render(format!("formatter '{formatter}' produced non-utf8 output")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_cat() {
        // `cat` stands in for a formatter that echoes its input
        let formatted = format_source("cat", "package main\n").expect("format");
        assert_eq!(formatted, "package main\n");
    }

    #[test]
    fn missing_formatter_is_reported() {
        let err = format_source("definitely-not-a-formatter", "x").unwrap_err();
        assert!(err.to_string().contains("failed to start"));
    }
}
