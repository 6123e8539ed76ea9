use crate::types::Repository;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Bucket name used for repositories with no primary language.
pub const NO_LANGUAGE: &str = "none";

/// How many buckets make it into the `top_topics` / `top_languages` lists.
const TOP_N: usize = 10;

/// All repositories carrying one topic tag. Membership is not exclusive:
/// a repository with N tags sits in N buckets. `repositories` holds repo
/// names in first-seen order; full records live only in
/// [`Hierarchy::all_repositories`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TopicBucket {
    pub name: String,
    pub repositories: Vec<String>,
    pub count: usize,
}

/// All repositories whose primary language is `name`. Every repository is
/// in exactly one of these; [`NO_LANGUAGE`] collects the ones without a
/// language.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LanguageBucket {
    pub name: String,
    pub repositories: Vec<String>,
    pub count: usize,
}

/// A repository that bridges two or more topics.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TopicConnection {
    pub repository: String,
    pub topics: Vec<String>,
    pub url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BucketCount {
    pub name: String,
    pub count: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Stats {
    pub total_repositories: usize,
    pub total_topics: usize,
    pub total_languages: usize,
    pub total_stars: u64,
    pub total_forks: u64,
    pub top_topics: Vec<BucketCount>,
    pub top_languages: Vec<BucketCount>,
    pub repos_with_multiple_topics: usize,
    pub repos_without_topics: usize,
}

/// The complete derived grouping for one build run. Regenerated wholesale
/// each run; the buckets are a redundant index over `all_repositories`,
/// never a source of truth.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Hierarchy {
    pub topics: Vec<TopicBucket>,
    pub languages: Vec<LanguageBucket>,
    pub all_repositories: Vec<Repository>,
    pub topic_connections: Vec<TopicConnection>,
    pub stats: Stats,
}

impl Hierarchy {
    /// Builds the snapshot from an ordered sequence of records. Total over
    /// any well-formed input: an empty slice yields empty buckets and
    /// all-zero stats.
    ///
    /// Bucket lists are sorted by descending member count, ties broken by
    /// name ascending, so the serialized output is byte-identical across
    /// runs regardless of how the input happened to be ordered.
    pub fn build(repositories: &[Repository]) -> Self {
        let mut topic_order: Vec<String> = Vec::new();
        let mut topic_members: HashMap<String, Vec<String>> = HashMap::new();
        let mut language_order: Vec<String> = Vec::new();
        let mut language_members: HashMap<String, Vec<String>> = HashMap::new();
        let mut topic_connections = Vec::new();

        for repo in repositories {
            for topic in &repo.topics {
                let members = topic_members.entry(topic.clone()).or_insert_with(|| {
                    topic_order.push(topic.clone());
                    Vec::new()
                });
                members.push(repo.name.clone());
            }

            let language = repo.language.as_deref().unwrap_or(NO_LANGUAGE);
            let members = language_members
                .entry(language.to_string())
                .or_insert_with(|| {
                    language_order.push(language.to_string());
                    Vec::new()
                });
            members.push(repo.name.clone());

            if repo.topics.len() > 1 {
                topic_connections.push(TopicConnection {
                    repository: repo.name.clone(),
                    topics: repo.topics.clone(),
                    url: repo.url.clone(),
                });
            }
        }

        let mut topics: Vec<TopicBucket> = topic_order
            .into_iter()
            .map(|name| {
                let repositories = topic_members.remove(&name).unwrap_or_default();
                let count = repositories.len();
                TopicBucket {
                    name,
                    repositories,
                    count,
                }
            })
            .collect();
        sort_buckets(&mut topics, |b| (b.count, b.name.clone()));

        let mut languages: Vec<LanguageBucket> = language_order
            .into_iter()
            .map(|name| {
                let repositories = language_members.remove(&name).unwrap_or_default();
                let count = repositories.len();
                LanguageBucket {
                    name,
                    repositories,
                    count,
                }
            })
            .collect();
        sort_buckets(&mut languages, |b| (b.count, b.name.clone()));

        let stats = compute_stats(repositories, &topics, &languages);

        Hierarchy {
            topics,
            languages,
            all_repositories: repositories.to_vec(),
            topic_connections,
            stats,
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("can't read {}", path.display()))?;
        let hierarchy = serde_json::from_str(&contents)
            .with_context(|| format!("can't parse {}", path.display()))?;
        Ok(hierarchy)
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

/// Descending by count, then name ascending on code points.
fn sort_buckets<B>(buckets: &mut [B], key: impl Fn(&B) -> (usize, String)) {
    buckets.sort_by(|a, b| {
        let (ac, an) = key(a);
        let (bc, bn) = key(b);
        bc.cmp(&ac).then_with(|| an.cmp(&bn))
    });
}

fn compute_stats(
    repositories: &[Repository],
    topics: &[TopicBucket],
    languages: &[LanguageBucket],
) -> Stats {
    Stats {
        total_repositories: repositories.len(),
        total_topics: topics.len(),
        total_languages: languages.iter().filter(|l| l.name != NO_LANGUAGE).count(),
        total_stars: repositories.iter().map(|r| r.stars).sum(),
        total_forks: repositories.iter().map(|r| r.forks).sum(),
        top_topics: topics
            .iter()
            .take(TOP_N)
            .map(|b| BucketCount {
                name: b.name.clone(),
                count: b.count,
            })
            .collect(),
        top_languages: languages
            .iter()
            .take(TOP_N)
            .map(|b| BucketCount {
                name: b.name.clone(),
                count: b.count,
            })
            .collect(),
        repos_with_multiple_topics: repositories.iter().filter(|r| r.topics.len() > 1).count(),
        repos_without_topics: repositories.iter().filter(|r| r.topics.is_empty()).count(),
    }
}
