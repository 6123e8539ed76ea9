use crate::github::Fetcher;
use crate::types::RepoSnapshot;
use std::collections::BTreeSet;
use std::path::Path;

/// Fetch an organization's repositories and persist them as JSON.
pub fn fetch_repos(
    org: &str,
    output: &Path,
    include_forks: bool,
    include_archived: bool,
) -> anyhow::Result<RepoSnapshot> {
    let fetcher = Fetcher::new()?;
    let repos = fetcher.fetch_org_repos(org, include_forks, include_archived)?;
    let snapshot = RepoSnapshot::new(repos);
    snapshot.save(output)?;
    println!(
        "Saved {} repositories to {}",
        snapshot.total_count,
        output.display()
    );
    Ok(snapshot)
}

pub fn fetch_command(
    org: &str,
    output: &Path,
    include_forks: bool,
    include_archived: bool,
) -> anyhow::Result<()> {
    let snapshot = fetch_repos(org, output, include_forks, include_archived)?;

    let all_topics: BTreeSet<&str> = snapshot
        .repositories
        .iter()
        .flat_map(|r| r.topics.iter().map(String::as_str))
        .collect();

    println!("\nSummary:");
    println!("  Total repositories: {}", snapshot.total_count);
    println!("  Unique topics: {}", all_topics.len());
    if !all_topics.is_empty() {
        println!(
            "  Topics: {}",
            all_topics.into_iter().collect::<Vec<_>>().join(", ")
        );
    }
    Ok(())
}
