//! Round description files: JSON in the shape of [`RoundInput`].

use std::path::Path;

use anyhow::{Context, Result};
use qf_match::round::RoundInput;

/// Read and parse a round file.
pub fn load_round(path: &Path) -> Result<RoundInput> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read round file: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid round file: {}", path.display()))
}

/// Apply command-line overrides of the pool and even-split count.
pub fn apply_overrides(round: &mut RoundInput, pool: Option<f64>, submission_count: Option<u64>) {
    if let Some(pool) = pool {
        round.total_pool = pool;
    }
    if let Some(count) = submission_count {
        round.round_submission_count = Some(count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_round(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_valid_round() {
        let file = write_round(
            r#"{"totalPool": 100, "submissions": {"s1": {"eligible": {"a": 4, "b": 9}}}}"#,
        );
        let round = load_round(file.path()).unwrap();
        assert_eq!(round.total_pool, 100.0);
        assert_eq!(round.submissions["s1"].eligible["b"], 9.0);
        assert_eq!(round.effective_submission_count(), 1);
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let err = load_round(&path).unwrap_err();
        assert!(format!("{err:#}").contains("nope.json"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let file = write_round(r#"{"totalPool": "lots"}"#);
        let err = load_round(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("invalid round file"));
    }

    #[test]
    fn overrides_replace_pool_and_count() {
        let mut round = RoundInput {
            total_pool: 1.0,
            ..Default::default()
        };
        apply_overrides(&mut round, Some(250.0), Some(7));
        assert_eq!(round.total_pool, 250.0);
        assert_eq!(round.effective_submission_count(), 7);

        apply_overrides(&mut round, None, None);
        assert_eq!(round.total_pool, 250.0);
    }
}
