use std::fmt::{Display, Formatter};
use std::str::FromStr;

use base64::Engine;
use crypto::bcrypt::bcrypt;
use crypto::util::fixed_time_eq;
use serde::{Deserialize, Serialize};

use crate::error::PasswordHashError;
use crate::util::bcrypt_base64_engine;

pub mod db;

const SALT_LEN: usize = 16;
const DIGEST_LEN: usize = 23;
const MAX_KEY_LEN: usize = 72;
pub const DEFAULT_COST: u32 = 12;

/// A bcrypt hash in modular crypt format, e.g. `$2b$12$<salt><digest>`.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    version: String,
    cost: u32,
    salt: [u8; SALT_LEN],
    digest: [u8; DIGEST_LEN],
}

fn bcrypt_digest(cost: u32, salt: &[u8; SALT_LEN], password: &str) -> [u8; DIGEST_LEN] {
    // The key is the password plus its NUL terminator, cut at 72 bytes.
    let key: Vec<u8> = password
        .as_bytes()
        .iter()
        .copied()
        .chain(std::iter::once(0))
        .take(MAX_KEY_LEN)
        .collect();

    let mut output = [0u8; 24];
    bcrypt(cost, salt, &key, &mut output);

    let mut digest = [0u8; DIGEST_LEN];
    digest.copy_from_slice(&output[..DIGEST_LEN]);
    digest
}

impl PasswordHash {
    pub fn generate(password: &str, cost: u32) -> PasswordHash {
        let salt: [u8; SALT_LEN] = rand::random();
        PasswordHash {
            version: "2b".to_string(),
            cost,
            salt,
            digest: bcrypt_digest(cost, &salt, password),
        }
    }

    pub fn verify(&self, password: &str) -> bool {
        fixed_time_eq(&bcrypt_digest(self.cost, &self.salt, password), &self.digest)
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl FromStr for PasswordHash {
    type Err = PasswordHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('$').collect();
        let (version, cost, rest) = match parts.as_slice() {
            ["", version, cost, rest] => (*version, *cost, *rest),
            _ => return Err(PasswordHashError::Format),
        };

        if !matches!(version, "2a" | "2b" | "2y") {
            return Err(PasswordHashError::Version(version.to_string()));
        }

        let cost = match cost.parse::<u32>() {
            Ok(c) if cost.len() == 2 && (4..=31).contains(&c) => c,
            _ => return Err(PasswordHashError::Cost(cost.to_string())),
        };

        if rest.len() != 53 || !rest.is_ascii() {
            return Err(PasswordHashError::Format);
        }

        let engine = bcrypt_base64_engine();
        let salt = engine.decode(&rest[..22])?;
        let digest = engine.decode(&rest[22..])?;

        Ok(PasswordHash {
            version: version.to_string(),
            cost,
            salt: salt.try_into().map_err(|_| PasswordHashError::Format)?,
            digest: digest.try_into().map_err(|_| PasswordHashError::Format)?,
        })
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let engine = bcrypt_base64_engine();
        write!(
            f,
            "${}${:02}${}{}",
            self.version,
            self.cost,
            engine.encode(self.salt),
            engine.encode(self.digest)
        )
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "PasswordHash(${}${:02}$...)", self.version, self.cost)
    }
}

impl Serialize for PasswordHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PasswordHash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One entry of the teachers credentials file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherCredential {
    pub username: String,
    pub password_hash: PasswordHash,
}

impl TeacherCredential {
    pub fn new(username: impl ToString, password: &str, cost: u32) -> TeacherCredential {
        TeacherCredential {
            username: username.to_string(),
            password_hash: PasswordHash::generate(password, cost),
        }
    }

    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password_hash.verify(password)
    }
}
