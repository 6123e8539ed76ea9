use crate::hierarchy::Hierarchy;
use anyhow::Context;
use chrono::Utc;
use log::info;
use std::fs;
use std::path::Path;

const TEMPLATE: &str = include_str!("../templates/index.html");

/// Renders the hierarchy snapshot into a self-contained static page.
/// Pure string templating: the snapshot is read-only and the result needs
/// no server-side logic at view time.
pub struct SiteGenerator<'a> {
    hierarchy: &'a Hierarchy,
    org_name: &'a str,
}

impl<'a> SiteGenerator<'a> {
    pub fn new(hierarchy: &'a Hierarchy, org_name: &'a str) -> Self {
        SiteGenerator {
            hierarchy,
            org_name,
        }
    }

    /// The full `index.html` document with the hierarchy embedded as a
    /// compact JSON blob.
    pub fn render(&self) -> anyhow::Result<String> {
        let data_json = serde_json::to_string(self.hierarchy)?;
        let generated_at = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
        let stats = &self.hierarchy.stats;

        // The data blob goes in last so repository descriptions that happen
        // to contain a placeholder token are never substituted.
        let html = TEMPLATE
            .replace("{{org_name}}", self.org_name)
            .replace("{{generated_at}}", &generated_at)
            .replace("{{total_repositories}}", &stats.total_repositories.to_string())
            .replace("{{total_topics}}", &stats.total_topics.to_string())
            .replace("{{total_languages}}", &stats.total_languages.to_string())
            .replace("{{total_stars}}", &stats.total_stars.to_string())
            .replace("{{data_json}}", &data_json);
        Ok(html)
    }

    /// Writes `index.html` plus an adjacent `data.json` into `output_dir`,
    /// creating the directory if needed.
    pub fn generate(&self, output_dir: &Path) -> anyhow::Result<()> {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("can't create {}", output_dir.display()))?;

        let html = self.render()?;
        let index_path = output_dir.join("index.html");
        fs::write(&index_path, html)
            .with_context(|| format!("can't write {}", index_path.display()))?;

        let data_path = output_dir.join("data.json");
        let data = serde_json::to_string(self.hierarchy)?;
        fs::write(&data_path, data)
            .with_context(|| format!("can't write {}", data_path.display()))?;

        info!("generated site in {}", output_dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Repository;

    fn sample_hierarchy() -> Hierarchy {
        let repos = vec![Repository {
            name: "widget".into(),
            full_name: "acme/widget".into(),
            description: Some("makes widgets".into()),
            url: "https://github.com/acme/widget".into(),
            topics: vec!["tooling".into()],
            language: Some("Rust".into()),
            stars: 42,
            forks: 3,
            updated_at: "2024-05-01T12:00:00Z".into(),
            archived: false,
            is_fork: false,
        }];
        Hierarchy::build(&repos)
    }

    #[test]
    fn render_substitutes_every_placeholder() {
        let hierarchy = sample_hierarchy();
        let html = SiteGenerator::new(&hierarchy, "acme").render().unwrap();

        assert!(html.contains("<h1>acme</h1>"));
        assert!(html.contains("const hierarchyData = {"));
        assert!(html.contains("\"name\":\"widget\""));
        assert!(!html.contains("{{org_name}}"));
        assert!(!html.contains("{{data_json}}"));
        assert!(!html.contains("{{total_"));
    }

    #[test]
    fn render_embeds_headline_stats() {
        let hierarchy = sample_hierarchy();
        let html = SiteGenerator::new(&hierarchy, "acme").render().unwrap();

        assert!(html.contains(r#"<div class="stat-value">1</div>"#));
        assert!(html.contains(r#"<div class="stat-value">42</div>"#));
    }

    #[test]
    fn generate_writes_page_and_data_blob() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("docs");

        let hierarchy = sample_hierarchy();
        SiteGenerator::new(&hierarchy, "acme").generate(&out).unwrap();

        let html = std::fs::read_to_string(out.join("index.html")).unwrap();
        assert!(html.contains("acme"));

        let data = std::fs::read_to_string(out.join("data.json")).unwrap();
        let parsed: Hierarchy = serde_json::from_str(&data).unwrap();
        assert_eq!(parsed, hierarchy);
    }

    #[test]
    fn empty_hierarchy_still_renders() {
        let hierarchy = Hierarchy::build(&[]);
        let html = SiteGenerator::new(&hierarchy, "ghost-org").render().unwrap();
        assert!(html.contains("ghost-org"));
        assert!(html.contains(r#"<div class="stat-value">0</div>"#));
    }
}
