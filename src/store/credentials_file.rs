use super::backend::ProfileStore;
use super::ini::{self, IniError};
use crate::types::{AppError, Profile, Profiles};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// AWS shared credentials file (`~/.aws/credentials`)
#[derive(Debug, Clone)]
pub struct CredentialsFile {
    path: PathBuf,
}

impl CredentialsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_error(&self, message: impl ToString) -> AppError {
        AppError::StoreRead {
            path: self.path.display().to_string(),
            message: message.to_string(),
        }
    }

    fn write_error(&self, source: std::io::Error) -> AppError {
        AppError::StoreWrite {
            path: self.path.display().to_string(),
            source,
        }
    }

    /// Sibling file the new contents are written to before the rename
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "credentials".into());
        name.push(".kubecreds-tmp");
        self.path.with_file_name(name)
    }
}

/// Parse credentials file content into profiles keyed by section name
pub fn parse_profiles(content: &str) -> Result<Profiles, IniError> {
    Ok(ini::parse(content)?
        .iter()
        .map(|section| (section.name.clone(), Profile::from_section(section)))
        .collect())
}

/// Render profiles as credentials file content, omitting empty attributes
pub fn render_profiles(profiles: &Profiles) -> String {
    ini::render(
        profiles
            .iter()
            .map(|(name, profile)| (name.as_str(), profile.entries())),
    )
}

#[async_trait::async_trait]
impl ProfileStore for CredentialsFile {
    async fn read(&self) -> Result<Profiles, AppError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Credentials file {} does not exist yet", self.path.display());
                return Ok(Profiles::new());
            }
            Err(e) => return Err(self.read_error(e)),
        };

        let profiles = parse_profiles(&content).map_err(|e| self.read_error(e))?;
        tracing::debug!(
            "Read {} profiles from {}",
            profiles.len(),
            self.path.display()
        );
        Ok(profiles)
    }

    async fn write(&self, profiles: &Profiles) -> Result<(), AppError> {
        let content = render_profiles(profiles);

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.write_error(e))?;
        }

        let staging = self.staging_path();
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options
            .open(&staging)
            .await
            .map_err(|e| self.write_error(e))?;
        file.write_all(content.as_bytes())
            .await
            .map_err(|e| self.write_error(e))?;
        file.sync_all().await.map_err(|e| self.write_error(e))?;
        drop(file);

        if let Err(e) = fs::rename(&staging, &self.path).await {
            let _ = fs::remove_file(&staging).await;
            return Err(self.write_error(e));
        }

        tracing::debug!(
            "Wrote {} profiles to {}",
            profiles.len(),
            self.path.display()
        );
        Ok(())
    }
}
