use crate::commands::{fetch, hierarchy, site};
use anyhow::bail;
use std::path::Path;

fn banner(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{}", title);
    println!("{}", "=".repeat(60));
}

/// The full pipeline: fetch, build hierarchy, generate site. Each step
/// completes fully before the next begins; a fetch failure aborts the run
/// before any hierarchy is built or persisted.
pub fn build_command(
    org: &str,
    output_dir: &Path,
    data_dir: &Path,
    include_forks: bool,
    include_archived: bool,
    skip_fetch: bool,
) -> anyhow::Result<()> {
    let repos_path = data_dir.join("repos.json");
    let hierarchy_path = data_dir.join("hierarchy.json");

    if skip_fetch {
        banner("Step 1: Skipping fetch (using existing data)");
        if !repos_path.exists() {
            bail!("{} not found, cannot skip fetch", repos_path.display());
        }
    } else {
        banner("Step 1: Fetching repositories from GitHub");
        fetch::fetch_repos(org, &repos_path, include_forks, include_archived)?;
    }

    banner("Step 2: Building hierarchy data");
    let built = hierarchy::build_hierarchy(&repos_path, &hierarchy_path)?;
    hierarchy::print_summary(&built);

    banner("Step 3: Generating static site");
    site::generate_site(&built, org, output_dir)?;

    banner("Build Complete!");
    println!("\nStatic site generated in: {}/", output_dir.display());
    println!(
        "Open {}/index.html in your browser to view.",
        output_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::Hierarchy;
    use crate::types::{RepoSnapshot, Repository};

    fn snapshot() -> RepoSnapshot {
        RepoSnapshot::new(vec![Repository {
            name: "widget".into(),
            full_name: "acme/widget".into(),
            description: None,
            url: "https://github.com/acme/widget".into(),
            topics: vec!["cli".into(), "tooling".into()],
            language: Some("Rust".into()),
            stars: 5,
            forks: 0,
            updated_at: "2024-05-01T12:00:00Z".into(),
            archived: false,
            is_fork: false,
        }])
    }

    #[test]
    fn skip_fetch_without_data_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = build_command(
            "acme",
            &dir.path().join("docs"),
            &dir.path().join("data"),
            false,
            false,
            true,
        );
        assert!(result.is_err());
    }

    #[test]
    fn skip_fetch_runs_pipeline_from_persisted_data() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let output_dir = dir.path().join("docs");

        snapshot().save(&data_dir.join("repos.json")).unwrap();
        build_command("acme", &output_dir, &data_dir, false, false, true).unwrap();

        assert!(data_dir.join("hierarchy.json").exists());
        assert!(output_dir.join("index.html").exists());
        assert!(output_dir.join("data.json").exists());

        let hierarchy = Hierarchy::load(&data_dir.join("hierarchy.json")).unwrap();
        assert_eq!(hierarchy.stats.total_repositories, 1);
        assert_eq!(hierarchy.stats.total_topics, 2);
    }
}
