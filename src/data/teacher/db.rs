use std::path::{Path, PathBuf};

use crate::error::{AuthError, CredentialStoreError};

use super::TeacherCredential;

/// The teachers credentials file. It is read again on every login so edits
/// apply without a restart.
#[derive(Debug, Clone)]
pub struct CredentialFile {
    path: PathBuf,
}

impl CredentialFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CredentialFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Vec<TeacherCredential>, CredentialStoreError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| CredentialStoreError::Io {
                path: self.path.clone(),
                source,
            })?;

        serde_json::from_slice(&bytes).map_err(|source| CredentialStoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// Finds the teacher with `username` whose hash matches `password`.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TeacherCredential, AuthError> {
        let teachers = self.load().await?;
        tracing::debug!(
            "checking login for '{}' against {} teacher(s)",
            username,
            teachers.len()
        );

        let username = username.to_string();
        let password = password.to_string();
        let found = tokio::task::spawn_blocking(move || {
            teachers
                .into_iter()
                .find(|teacher| teacher.matches(&username, &password))
        })
        .await
        .map_err(CredentialStoreError::from)?;

        found.ok_or(AuthError::InvalidCredentials)
    }
}
