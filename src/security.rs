use std::fs;
use std::path::Path;

use crate::error::SecurityError;

const SESSION_KEY: &str = "session.key";
const SESSION_KEY_LEN: usize = 32;

/// Key material used to sign session cookies.
#[derive(Clone)]
pub struct Security {
    pub session_key: Vec<u8>,
}

impl std::fmt::Debug for Security {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Security {{ session_key: <{} bytes> }}", self.session_key.len())
    }
}

impl Security {
    pub fn load(dir: impl AsRef<Path>) -> Result<Security, SecurityError> {
        let dir = dir.as_ref();
        let key_path = dir.join(SESSION_KEY);

        tracing::info!("Loading session signing key...");
        let session_key = match fs::read(&key_path) {
            Ok(key) => {
                if key.len() < SESSION_KEY_LEN {
                    return Err(SecurityError::ShortKey {
                        path: key_path,
                        len: key.len(),
                        min: SESSION_KEY_LEN,
                    });
                }
                tracing::info!("Session key found and loaded.");
                key
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("Session key not found in '{}'.", key_path.display());
                Self::generate(dir)?
            }
            Err(err) => return Err(err.into()),
        };

        Ok(Security { session_key })
    }

    #[cfg(feature = "generate-security")]
    fn generate(dir: &Path) -> Result<Vec<u8>, SecurityError> {
        tracing::info!("Generating a new session key.");
        fs::create_dir_all(dir)?;

        let key: [u8; SESSION_KEY_LEN] = rand::random();
        fs::write(dir.join(SESSION_KEY), key)?;

        Ok(key.to_vec())
    }

    #[cfg(not(feature = "generate-security"))]
    fn generate(dir: &Path) -> Result<Vec<u8>, SecurityError> {
        Err(SecurityError::MissingKey(dir.join(SESSION_KEY)))
    }

    /// A key that only lives as long as the process.
    pub fn ephemeral() -> Security {
        let key: [u8; SESSION_KEY_LEN] = rand::random();
        Security {
            session_key: key.to_vec(),
        }
    }
}
