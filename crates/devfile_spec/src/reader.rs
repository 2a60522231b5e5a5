//! Devfile decoding and encoding.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{SpecError, SpecResult};
use crate::models::Devfile;

/// Reader for devfile documents.
///
/// YAML is a superset of JSON, so both encodings go through the YAML decoder.
pub struct DevfileReader;

impl DevfileReader {
    /// Decode a devfile from raw bytes.
    pub fn from_bytes(data: &[u8]) -> SpecResult<Devfile> {
        let content = std::str::from_utf8(data)
            .map_err(|e| SpecError::Malformed(format!("devfile is not valid UTF-8: {}", e)))?;
        Self::parse_str(content)
    }

    /// Decode a devfile from text.
    pub fn parse_str(content: &str) -> SpecResult<Devfile> {
        if content.trim().is_empty() {
            return Err(SpecError::Malformed("devfile is empty".to_string()));
        }

        let devfile: Devfile = serde_yaml::from_str(content)?;
        debug!(
            "Decoded devfile (schemaVersion {}, {} components, {} commands)",
            devfile.schema_version,
            devfile.components.len(),
            devfile.commands.len()
        );
        Ok(devfile)
    }

    /// Read and decode a devfile from disk.
    pub fn read_file(path: impl AsRef<Path>) -> SpecResult<Devfile> {
        let path = path.as_ref();
        debug!("Reading devfile from {:?}", path);

        let content = fs::read(path)?;
        Self::from_bytes(&content)
    }

    /// Encode a devfile as YAML.
    pub fn to_yaml(devfile: &Devfile) -> SpecResult<String> {
        Ok(serde_yaml::to_string(devfile)?)
    }

    /// Encode a devfile as pretty-printed JSON.
    pub fn to_json(devfile: &Devfile) -> SpecResult<String> {
        Ok(serde_json::to_string_pretty(devfile)?)
    }

    /// Convert a devfile into a JSON tree, as seen by the schema validator.
    pub fn to_value(devfile: &Devfile) -> SpecResult<serde_json::Value> {
        Ok(serde_json::to_value(devfile)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_json_document() {
        let json = r#"{"schemaVersion": "2.2.0", "variables": {"PARAMS": "foo"}}"#;
        let devfile = DevfileReader::parse_str(json).unwrap();
        assert_eq!(devfile.schema_version, "2.2.0");
        assert_eq!(devfile.variables.get("PARAMS").map(String::as_str), Some("foo"));
    }

    #[test]
    fn test_empty_document_is_malformed() {
        let err = DevfileReader::from_bytes(b"  \n").unwrap_err();
        assert!(matches!(err, SpecError::Malformed(_)));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let err = DevfileReader::from_bytes(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, SpecError::Malformed(_)));
    }

    #[test]
    fn test_missing_schema_version_fails() {
        let err = DevfileReader::parse_str("components: []\n").unwrap_err();
        assert!(matches!(err, SpecError::Yaml(_)));
    }

    #[test]
    fn test_non_string_variable_fails() {
        let err = DevfileReader::parse_str("schemaVersion: 2.2.0\nvariables:\n  PORT: [1, 2]\n")
            .unwrap_err();
        assert!(matches!(err, SpecError::Yaml(_)));
    }
}
