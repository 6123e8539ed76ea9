use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One repository's metadata, as fetched. Immutable for the rest of the run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub url: String,
    pub topics: Vec<String>,
    pub language: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub updated_at: String,
    pub archived: bool,
    pub is_fork: bool,
}

/// Raw repository item as returned by the GitHub REST API. Everything is
/// optional or defaulted so a partially filled item still deserializes;
/// required-field checks happen in the conversion to [`Repository`].
#[derive(Deserialize, Debug)]
pub struct ApiRepo {
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub html_url: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub fork: bool,
}

impl ApiRepo {
    /// Converts the wire item into a [`Repository`], or `None` when a
    /// required field (name, URL) is missing. Callers skip such items
    /// with a warning rather than failing the whole fetch.
    pub fn into_repository(self) -> Option<Repository> {
        let name = self.name?;
        let url = self.html_url?;
        let full_name = self.full_name.unwrap_or_else(|| name.clone());
        Some(Repository {
            name,
            full_name,
            description: self.description,
            url,
            topics: self.topics,
            language: self.language,
            stars: self.stargazers_count,
            forks: self.forks_count,
            updated_at: self.updated_at,
            archived: self.archived,
            is_fork: self.fork,
        })
    }
}

/// The persisted result of one fetch run (`repos.json`).
#[derive(Serialize, Deserialize, Debug)]
pub struct RepoSnapshot {
    pub repositories: Vec<Repository>,
    pub total_count: usize,
    pub fetched_at: DateTime<Utc>,
}

impl RepoSnapshot {
    pub fn new(repositories: Vec<Repository>) -> Self {
        let total_count = repositories.len();
        RepoSnapshot {
            repositories,
            total_count,
            fetched_at: Utc::now(),
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("can't read {}", path.display()))?;
        let snapshot = serde_json::from_str(&contents)
            .with_context(|| format!("can't parse {}", path.display()))?;
        Ok(snapshot)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("can't create {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)
            .with_context(|| format!("can't write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire_item(json: &str) -> ApiRepo {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn full_item_converts() {
        let api = wire_item(
            r#"{
                "name": "widget",
                "full_name": "acme/widget",
                "description": "makes widgets",
                "html_url": "https://github.com/acme/widget",
                "topics": ["tooling", "cli"],
                "language": "Rust",
                "stargazers_count": 42,
                "forks_count": 3,
                "updated_at": "2024-05-01T12:00:00Z",
                "archived": false,
                "fork": false
            }"#,
        );
        let repo = api.into_repository().unwrap();
        assert_eq!(repo.name, "widget");
        assert_eq!(repo.full_name, "acme/widget");
        assert_eq!(repo.topics, vec!["tooling", "cli"]);
        assert_eq!(repo.stars, 42);
        assert!(!repo.is_fork);
    }

    #[test]
    fn missing_name_is_rejected() {
        let api = wire_item(r#"{"html_url": "https://github.com/acme/x"}"#);
        assert!(api.into_repository().is_none());
    }

    #[test]
    fn missing_url_is_rejected() {
        let api = wire_item(r#"{"name": "x"}"#);
        assert!(api.into_repository().is_none());
    }

    #[test]
    fn absent_optionals_get_defaults() {
        let api = wire_item(r#"{"name": "x", "html_url": "https://github.com/acme/x"}"#);
        let repo = api.into_repository().unwrap();
        assert_eq!(repo.full_name, "x");
        assert!(repo.description.is_none());
        assert!(repo.language.is_none());
        assert!(repo.topics.is_empty());
        assert_eq!(repo.stars, 0);
        assert!(!repo.archived);
    }

    #[test]
    fn snapshot_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("repos.json");

        let repo = Repository {
            name: "widget".into(),
            full_name: "acme/widget".into(),
            description: None,
            url: "https://github.com/acme/widget".into(),
            topics: vec!["cli".into()],
            language: Some("Rust".into()),
            stars: 7,
            forks: 1,
            updated_at: "2024-05-01T12:00:00Z".into(),
            archived: false,
            is_fork: false,
        };
        let snapshot = RepoSnapshot::new(vec![repo.clone()]);
        snapshot.save(&path).unwrap();

        let loaded = RepoSnapshot::load(&path).unwrap();
        assert_eq!(loaded.total_count, 1);
        assert_eq!(loaded.repositories, vec![repo]);
    }
}
