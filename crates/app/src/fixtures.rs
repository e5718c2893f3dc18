//! Walk fixtures
//!
//! YAML descriptions of a guide's tour and a tourist walking it, replayed by
//! [`crate::simulation`].

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid fixture")]
    Parse(#[from] serde_norway::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WalkFixture {
    pub guide: String,
    pub tourist: String,
    pub tour: TourFixture,
    pub start: PositionFixture,
    #[serde(default)]
    pub positions: Vec<PositionFixture>,
    #[serde(default)]
    pub finish: Finish,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TourFixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub price: f64,
    #[serde(default)]
    pub key_points: Vec<KeyPointFixture>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeyPointFixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub order: i32,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PositionFixture {
    pub latitude: f64,
    pub longitude: f64,
}

/// How the walk ends once every position has been reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finish {
    #[default]
    Complete,
    Abandon,
    /// Leave the execution active.
    None,
}

impl WalkFixture {
    /// Parse a fixture from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid walk fixture.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Read and parse a fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, FixtureError> {
        let yaml = fs::read_to_string(path).map_err(|source| FixtureError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml(&yaml)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn sample_fixture_parses() -> TestResult {
        let fixture = WalkFixture::from_yaml(include_str!("../fixtures/walks/petrovaradin.yaml"))?;

        assert_eq!(fixture.guide, "guide-ana");
        assert_eq!(fixture.tour.key_points.len(), 2);
        assert_eq!(fixture.positions.len(), 4);
        assert_eq!(fixture.finish, Finish::Complete);
        assert!(
            fixture
                .tour
                .key_points
                .iter()
                .any(|kp| kp.image.as_deref() == Some("upper-gate.jpg"))
        );

        Ok(())
    }

    #[test]
    fn finish_defaults_to_complete() -> TestResult {
        let fixture = WalkFixture::from_yaml(
            "guide: g\ntourist: t\ntour:\n  name: T\n  price: 1.0\nstart:\n  latitude: 0.0\n  longitude: 0.0\n",
        )?;

        assert_eq!(fixture.finish, Finish::Complete);
        assert!(fixture.positions.is_empty());

        Ok(())
    }

    #[test]
    fn unknown_finish_is_rejected() {
        let result = WalkFixture::from_yaml(
            "guide: g\ntourist: t\ntour:\n  name: T\n  price: 1.0\nstart:\n  latitude: 0.0\n  longitude: 0.0\nfinish: teleport\n",
        );

        assert!(
            matches!(result, Err(FixtureError::Parse(_))),
            "expected Parse error, got {result:?}"
        );
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = WalkFixture::from_path(Path::new("does/not/exist.yaml"));

        assert!(
            matches!(result, Err(FixtureError::Read { .. })),
            "expected Read error, got {result:?}"
        );
    }
}
