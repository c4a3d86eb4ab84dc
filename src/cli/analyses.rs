//! Analyses command - list registered analyses and their options

use crate::pipeline::Registry;
use anyhow::Result;
use console::style;

/// Render the registry listing
pub(crate) fn render(registry: &Registry) -> String {
    let mut out = String::new();
    for name in registry.names() {
        let Some(item) = registry.summon(name) else {
            continue;
        };
        out.push_str(&format!(
            "{} (--{})\n",
            style(item.name()).bold(),
            style(item.flag()).cyan()
        ));
        out.push_str(&format!("  requires: {}\n", item.requires().join(", ")));
        let features = item.features();
        if !features.is_empty() {
            out.push_str(&format!("  features: {}\n", features.join(", ")));
        }
        for option in item.configuration_options() {
            out.push_str(&format!(
                "  --{} <{}> [default: {}]\n      {} ({})\n",
                option.flag,
                option.option_type,
                option.default,
                option.description,
                style(option.name).dim()
            ));
        }
    }
    out
}

pub fn run() -> Result<()> {
    print!("{}", render(&Registry::builtin()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_names_options() {
        console::set_colors_enabled(false);
        let listing = render(&Registry::builtin());
        assert!(listing.starts_with("Sentiment (--sentiment)"));
        assert!(listing.contains("requires: uast_changes, day"));
        assert!(listing.contains("--min-comment-len <int> [default: 20]"));
        assert!(listing.contains("--sentiment-gap <float> [default: 0.5]"));
        assert!(listing.contains("CommentSentiment.Gap"));
    }
}
