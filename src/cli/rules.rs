//! Rules command - show the active taxonomy

use super::setup;
use super::SessionArgs;
use crate::scoring::Taxonomy;
use anyhow::Result;
use console::style;

/// Run the rules command
pub fn run(args: &SessionArgs, json: bool) -> Result<()> {
    let config = setup::load_config(args)?;
    let taxonomy = setup::load_session_taxonomy(args, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&taxonomy.to_config())?);
    } else {
        print!("{}", render(&taxonomy));
    }
    Ok(())
}

fn render(taxonomy: &Taxonomy) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\n{} ({} categories, {} patterns, total weight {:.2})\n",
        style("Compliance Taxonomy").bold(),
        taxonomy.categories().len(),
        taxonomy.pattern_count(),
        taxonomy.total_weight()
    ));

    for category in taxonomy.categories() {
        out.push_str(&format!(
            "\n{}  weight {:.2}  required {:.2}\n",
            style(&category.name).bold().cyan(),
            category.weight,
            category.required_score
        ));
        for pattern in &category.patterns {
            out.push_str(&format!(
                "  {:.2}  {:<28} {}\n",
                pattern.weight,
                pattern.description,
                style(pattern.source()).dim()
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::plain;

    #[test]
    fn test_render_lists_categories_in_order() {
        let out = plain(&render(&Taxonomy::standard()));
        let core = out.find("Core Principles").unwrap();
        let risk = out.find("Risk Management").unwrap();
        let fairness = out.find("Fairness & Privacy").unwrap();
        assert!(core < risk && risk < fairness);
        assert!(out.contains("3 categories"));
        assert!(out.contains("weight 0.40  required 0.60"));
    }
}
