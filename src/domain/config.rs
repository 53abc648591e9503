use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{Role, User};

/// Configuration for an issue tracker session.
///
/// The configuration only controls which users exist when a registry is
/// created; issues are never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Whether the built-in users (`DEV001`, `TEST001`, `PM001`,
    /// `ADMIN001`) are inserted at startup.
    pub seed_default_users: bool,

    /// Additional users inserted at startup, after the built-in ones.
    ///
    /// A user with the same identifier as a built-in user replaces it.
    users: Vec<UserSeed>,
}

/// A user declared in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSeed {
    /// The user's identifier.
    pub id: String,
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// The user's role.
    pub role: Role,
}

impl From<UserSeed> for User {
    fn from(seed: UserSeed) -> Self {
        Self::new(seed.id, seed.name, seed.email, seed.role)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_default_users: default_seed_default_users(),
            users: Vec::new(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the extra users declared in the configuration.
    #[must_use]
    pub fn users(&self) -> &[UserSeed] {
        &self.users
    }

    /// Declares an extra user.
    pub fn add_user(&mut self, user: UserSeed) {
        self.users.push(user);
    }

    /// Every user a new registry starts with, built-ins first.
    #[must_use]
    pub fn initial_users(&self) -> Vec<User> {
        let defaults = if self.seed_default_users {
            default_users()
        } else {
            Vec::new()
        };
        defaults
            .into_iter()
            .chain(self.users.iter().cloned().map(User::from))
            .collect()
    }
}

/// The users every tracker starts with unless disabled.
#[must_use]
pub fn default_users() -> Vec<User> {
    vec![
        User::new("DEV001", "Alice Johnson", "alice@company.com", Role::Developer),
        User::new("TEST001", "Bob Smith", "bob@company.com", Role::Tester),
        User::new(
            "PM001",
            "Carol Davis",
            "carol@company.com",
            Role::ProjectManager,
        ),
        User::new("ADMIN001", "David Wilson", "david@company.com", Role::Admin),
    ]
}

const fn default_seed_default_users() -> bool {
    true
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_seed_default_users")]
        seed_default_users: bool,

        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        users: Vec<UserSeed>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                seed_default_users,
                users,
            } => Self {
                seed_default_users,
                users,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            seed_default_users: config.seed_default_users,
            users: config.users,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nseed_default_users = false\n\n[[users]]\nid = \"QA007\"\nname = \
              \"Eve Adams\"\nemail = \"eve@company.com\"\nrole = \"tester\"\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert!(!config.seed_default_users);
        assert_eq!(config.users().len(), 1);
        assert_eq!(config.users()[0].role, Role::Tester);

        let users = config.initial_users();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name(), "Eve Adams");
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nseed_default_users = \"yes\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");

        let mut config = Config::default();
        config.add_user(UserSeed {
            id: "OPS001".to_string(),
            name: "Frank Moore".to_string(),
            email: "frank@company.com".to_string(),
            role: Role::Admin,
        });
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn default_config_seeds_four_users() {
        let users = Config::default().initial_users();
        let ids: Vec<&str> = users.iter().map(|u| u.id().as_str()).collect();
        assert_eq!(ids, vec!["DEV001", "TEST001", "PM001", "ADMIN001"]);
    }
}
