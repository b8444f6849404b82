use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Parses a JSON file into a given type `T`.
///
/// Errors are converted into `crate::error::Error` variants:
/// - `Error::IoError` if the file cannot be read.
/// - `Error::DeserializationError` if the JSON is malformed.
pub fn parse_json_file<T: DeserializeOwned>(file_path: impl AsRef<Path>) -> Result<T> {
    let data = fs::read_to_string(file_path)?;
    let parsed_data: T = serde_json::from_str(&data)?;
    Ok(parsed_data)
}

/// Reads a newline-delimited list, one raw line per entry.
///
/// Lines are returned untrimmed; filtering is up to the caller.
pub fn read_lines(file_path: impl AsRef<Path>) -> Result<Vec<String>> {
    let data = fs::read_to_string(file_path)?;
    Ok(data.lines().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config_dto::PipelineConfig;
    use crate::error::Error;
    use std::io::Write;

    #[test]
    fn test_read_lines_keeps_every_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "SRR0000001\n\nSRR0000002\r\n").unwrap();

        let lines = read_lines(file.path()).unwrap();
        assert_eq!(lines, vec!["SRR0000001", "", "SRR0000002"]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = read_lines("non_existent_sample_list.txt");
        assert!(matches!(result, Err(Error::IoError(_))));
    }

    #[test]
    fn test_malformed_config_is_deserialization_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ \"maxFanIn\": ").unwrap();

        let result = parse_json_file::<PipelineConfig>(file.path());
        assert!(matches!(result, Err(Error::DeserializationError(_))));
    }
}
