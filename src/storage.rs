use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

/// Environment variables checked for a token, in order.
pub const TOKEN_ENV_VARS: &[&str] = &["GH_TOKEN", "GITHUB_TOKEN"];

/// Abstract token persistence interface
pub trait TokenStorage {
    /// Return the stored token. If none is stored, returns Ok(None)
    fn load(&self) -> Result<Option<String>>;
    /// Persist the token
    fn save(&self, token: &str) -> Result<()>;
    /// Delete the token
    fn delete(&self) -> Result<()>;
}

/// File-based token persistence implementation
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Storage at `~/.weeklog/token`.
    pub fn new() -> Result<Self> {
        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .context("HOME environment variable not set")?;
        Ok(Self::with_path(home.join(".weeklog").join("token")))
    }

    pub fn with_path(path: PathBuf) -> Self {
        FileTokenStorage { path }
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).context("Failed to read token file")?;
        let token = content.trim();
        Ok((!token.is_empty()).then(|| token.to_string()))
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create storage directory")?;
        }
        let mut file = File::create(&self.path).context("Failed to open token file for writing")?;
        file.write_all(token.trim().as_bytes())
            .context("Failed to write token to file")?;
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).context("Failed to delete token file")?;
        }
        Ok(())
    }
}

/// First non-blank token in `TOKEN_ENV_VARS`, trimmed.
///
/// `env` looks a variable up by name, like `std::env::var`.
pub fn token_from_env<E>(env: E) -> Option<String>
where
    E: Fn(&str) -> Result<String, std::env::VarError>,
{
    TOKEN_ENV_VARS.iter().find_map(|key| {
        env(key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    })
}

/// Picks the token from the environment first, then from `storage`.
pub fn resolve_token<E>(env: E, storage: &dyn TokenStorage) -> Result<Option<String>>
where
    E: Fn(&str) -> Result<String, std::env::VarError>,
{
    match token_from_env(env) {
        Some(token) => Ok(Some(token)),
        None => storage.load(),
    }
}
