use crate::hierarchy::Hierarchy;
use crate::types::RepoSnapshot;
use std::path::Path;

/// Build the hierarchy snapshot from a persisted fetch and save it.
pub fn build_hierarchy(input: &Path, output: &Path) -> anyhow::Result<Hierarchy> {
    let snapshot = RepoSnapshot::load(input)?;
    let hierarchy = Hierarchy::build(&snapshot.repositories);
    hierarchy.save(output)?;
    println!("Saved hierarchy data to {}", output.display());
    Ok(hierarchy)
}

pub fn hierarchy_command(input: &Path, output: &Path) -> anyhow::Result<()> {
    let hierarchy = build_hierarchy(input, output)?;
    print_summary(&hierarchy);

    println!("\nTop Topics:");
    for topic in hierarchy.stats.top_topics.iter().take(5) {
        println!("  {}: {} repos", topic.name, topic.count);
    }
    Ok(())
}

pub fn print_summary(hierarchy: &Hierarchy) {
    let stats = &hierarchy.stats;
    println!("\nHierarchy Summary:");
    println!("  Total repositories: {}", stats.total_repositories);
    println!("  Total topics: {}", stats.total_topics);
    println!("  Total languages: {}", stats.total_languages);
    println!(
        "  Repos with multiple topics: {}",
        stats.repos_with_multiple_topics
    );
    println!("  Repos without topics: {}", stats.repos_without_topics);
}
