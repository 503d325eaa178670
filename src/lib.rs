#[macro_use]
extern crate rocket;
#[macro_use]
extern crate serde;

use rocket::{Build, Rocket};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::config::Config;
use crate::data::activity::{seed, Registry, Roster};
use crate::data::teacher::db::CredentialFile;
use crate::error::{BackendError, ConfigurationError};
use crate::resp::session::SessionStore;
use crate::route::mount_api;
use crate::security::Security;

pub mod config;
pub mod data;
pub mod error;
pub mod resp;
pub mod route;
pub mod security;
pub mod util;

pub async fn create(log_level: Option<Level>) -> Result<Rocket<Build>, BackendError> {
    if let Some(l) = log_level {
        let subscriber = FmtSubscriber::builder().with_max_level(l).finish();

        if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("Unable to set global logger: {}", err);
        };
        if let Err(err) = tracing_log::LogTracer::init() {
            eprintln!("Unable to forward log records: {}", err);
        }
    }

    tracing::info!("Reading .env file...");
    if dotenv::dotenv().is_err() {
        tracing::warn!("Unable to load .env file.");
    }

    tracing::info!("Loading configuration...");
    let c = match Config::load() {
        Ok(c) => {
            tracing::info!("Configuration loaded.");
            c
        }
        Err(ConfigurationError::NotFound(_)) => {
            let c = Config::default();
            if c.save().is_err() {
                tracing::warn!("Unable to save generated configuration.");
            }
            c
        }
        Err(other) => {
            tracing::error!("Configuration error: {}", other);
            return Err(other.into());
        }
    };

    let security = Security::load(&c.security_dir)?;

    let roster = match &c.activities_file {
        Some(path) => {
            tracing::info!("Loading activities from '{}'", path.display());
            Roster::load(path).map_err(|source| BackendError::Activities {
                path: path.clone(),
                source,
            })?
        }
        None => seed::mergington(),
    };
    tracing::info!("Serving {} activities.", roster.len());

    Ok(build(c, security, roster))
}

/// Assembles the server around already loaded state.
pub fn build(c: Config, security: Security, roster: Roster) -> Rocket<Build> {
    tracing::info!("Using teacher credentials from '{}'", c.teachers_file.display());
    let registry = Registry::new(roster, c.enforce_capacity);
    let teachers = CredentialFile::new(&c.teachers_file);
    let static_dir = c.static_dir.clone();

    if c.accept_unsigned_sessions {
        tracing::warn!("Unsigned session cookies are accepted as usernames.");
    }

    let r = rocket::build()
        .manage(registry)
        .manage(teachers)
        .manage(SessionStore::default())
        .manage(security)
        .manage(c);

    mount_api(r, static_dir)
}
