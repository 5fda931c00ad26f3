//! JSON rendering
//!
//! Each package becomes one line holding the JSON array of its tests,
//! including the phase timings and step breakdowns.

use crate::error::FormatError;
use std::io::Write;
use tfjunit_parser::Report;

/// Write one JSON array of tests per package, newline-delimited
///
/// # Errors
///
/// Returns `FormatError::Json` or `FormatError::Io` if serializing or writing
/// fails.
pub fn write_json<W: Write>(report: &Report, mut writer: W) -> Result<(), FormatError> {
    for package in &report.packages {
        serde_json::to_writer(&mut writer, &package.tests)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;
    use tfjunit_parser::{Package, Test};

    #[test]
    fn test_one_line_per_package() {
        let report = Report {
            packages: vec![
                Package {
                    name: "a".to_string(),
                    tests: vec![Test::new("TestA")],
                    ..Default::default()
                },
                Package {
                    name: "b".to_string(),
                    ..Default::default()
                },
            ],
        };

        let mut out = Vec::new();
        write_json(&report, &mut out).expect("Should write");
        let out = String::from_utf8(out).expect("utf-8");
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "[]");
        let tests: serde_json::Value = serde_json::from_str(lines[0]).expect("valid JSON");
        assert_eq!(tests[0]["name"].as_str(), Some("TestA"));
        assert_eq!(tests[0]["outcome"].as_str(), Some("FAIL"));
    }
}
