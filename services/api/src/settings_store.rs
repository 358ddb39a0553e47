use std::path::PathBuf;

use anyhow::{Context, Result};
use companion_core::StudentProfile;

/// JSON-file-backed store for the student profile. The viewer pushes the
/// profile once at startup; the feedback handler reads it back on every
/// turn, so the file is the single source of truth between requests.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the stored profile, or `None` if nothing has been saved yet.
    pub async fn load(&self) -> Result<Option<StudentProfile>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let profile = serde_json::from_slice(&bytes)
                    .context("settings file does not hold a valid student profile")?;
                Ok(Some(profile))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context("failed to read settings file"),
        }
    }

    /// Saves the profile, overwriting any previous one.
    pub async fn save(&self, profile: &StudentProfile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("failed to create settings directory")?;
        }
        let json = serde_json::to_vec_pretty(profile)?;
        tokio::fs::write(&self.path, json)
            .await
            .context("failed to write settings file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use companion_core::profile::{GradeLevel, StudentPersona};

    #[tokio::test]
    async fn load_returns_none_before_anything_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_round_trips_the_profile() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("data").join("settings.json"));

        let profile = StudentProfile {
            grade_level: GradeLevel::Middle,
            student_persona: StudentPersona::Skeptical,
            ..StudentProfile::default()
        };
        store.save(&profile).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(profile));
    }

    #[tokio::test]
    async fn saving_twice_overwrites_the_previous_profile() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));

        store.save(&StudentProfile::default()).await.unwrap();
        let updated = StudentProfile {
            student_persona: StudentPersona::Quiet,
            ..StudentProfile::default()
        };
        store.save(&updated).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn corrupt_settings_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        let store = SettingsStore::new(path);
        assert!(store.load().await.is_err());
    }
}
