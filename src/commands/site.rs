use crate::hierarchy::Hierarchy;
use crate::site::SiteGenerator;
use std::path::Path;

/// Render the static site from a persisted hierarchy snapshot.
pub fn site_command(input: &Path, org: &str, output_dir: &Path) -> anyhow::Result<()> {
    let hierarchy = Hierarchy::load(input)?;
    generate_site(&hierarchy, org, output_dir)
}

pub fn generate_site(hierarchy: &Hierarchy, org: &str, output_dir: &Path) -> anyhow::Result<()> {
    SiteGenerator::new(hierarchy, org).generate(output_dir)?;
    println!("Generated site in {}/", output_dir.display());
    Ok(())
}
