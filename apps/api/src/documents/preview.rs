use crate::documents::models::PortfolioDocument;

/// Renders the portfolio as markdown for the preview pane.
/// Projects without a title are skipped; empty fields are left out.
pub fn render_portfolio_preview(portfolio: &PortfolioDocument) -> String {
    let mut md = String::from("# Portfolio\n\n");

    let titled: Vec<_> = portfolio
        .projects
        .iter()
        .filter(|p| !p.entry.title.trim().is_empty())
        .collect();

    if !titled.is_empty() {
        md.push_str("## Projects\n\n");
    }
    for stored in titled {
        let project = &stored.entry;
        md.push_str(&format!("### {}\n\n", project.title.trim()));
        if !project.description.trim().is_empty() {
            md.push_str(&format!("{}\n\n", project.description.trim()));
        }
        if !project.technologies.trim().is_empty() {
            md.push_str(&format!(
                "**Technologies:** {}\n\n",
                project.technologies.trim()
            ));
        }

        let links: Vec<String> = [
            ("GitHub", &project.github_url),
            ("Live Demo", &project.live_url),
        ]
        .into_iter()
        .filter(|(_, url)| !url.trim().is_empty())
        .map(|(label, url)| format!("[{label}]({})", url.trim()))
        .collect();
        if !links.is_empty() {
            md.push_str(&links.join(" | "));
            md.push_str("\n\n");
        }
        md.push_str("---\n\n");
    }

    let achievements: Vec<_> = portfolio
        .achievements
        .iter()
        .filter(|a| !a.entry.text.trim().is_empty())
        .collect();
    if !achievements.is_empty() {
        md.push_str("## Achievements\n\n");
        for stored in achievements {
            md.push_str(&format!("- {}\n", stored.entry.text.trim()));
        }
        md.push('\n');
    }

    md
}
