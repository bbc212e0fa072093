//! `columns` subcommand
//!
//! Prints the header names of a CSV export. Used when mapping a new
//! provider's column vocabulary onto the adapters.

use attrib_common::{AttribError, Result};
use std::path::Path;

/// Read the header names of a CSV file
pub fn header_names(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AttribError::InputMissing(path.display().to_string()));
    }
    let mut reader = csv::Reader::from_path(path)?;
    Ok(reader.headers()?.iter().map(str::to_string).collect())
}

/// Print the header names of a CSV file, one per line
pub fn run(path: &str) -> Result<()> {
    for name in header_names(path)? {
        println!("{}", name);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_header_names() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Campaign_ID,Channel_Used,Date\n1,google,2023-05-01\n")
            .unwrap();
        assert_eq!(
            header_names(file.path()).unwrap(),
            vec!["Campaign_ID", "Channel_Used", "Date"]
        );
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            header_names("/nonexistent.csv").unwrap_err(),
            AttribError::InputMissing(_)
        ));
    }
}
