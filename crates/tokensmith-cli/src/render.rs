//! Terminal rendering of reports and listings.

use console::{style, Style};
use tokensmith::{CollectionSummary, Report};

/// Renders a report with the summary line coloured by outcome.
pub fn report(report: &Report) -> String {
    let plain = report.to_string();
    let mut lines = plain.lines();
    let Some(headline) = lines.next() else {
        return plain;
    };

    let headline_style = if report.is_aborted() {
        Style::new().red().bold()
    } else if report.is_clean() {
        Style::new().green().bold()
    } else {
        Style::new().yellow().bold()
    };

    let mut out = headline_style.apply_to(headline).to_string();
    for line in lines {
        out.push('\n');
        if line.starts_with("  ") {
            out.push_str(&style(line).dim().to_string());
        } else {
            out.push_str(line);
        }
    }
    out
}

/// Renders the collection listing, one collection per block.
pub fn collections(summaries: &[CollectionSummary]) -> String {
    if summaries.is_empty() {
        return style("No collections in store").dim().to_string();
    }

    let mut out = String::new();
    for summary in summaries {
        out.push_str(&format!(
            "{} {} ({} variables)\n",
            style(&summary.name).cyan().bold(),
            style(&summary.id).dim(),
            summary.variable_count
        ));
        for mode in &summary.modes {
            out.push_str(&format!("  • {} {}\n", mode.name, style(&mode.id).dim()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokensmith::store::{CollectionId, Mode, ModeId};

    #[test]
    fn test_report_keeps_every_line() {
        console::set_colors_enabled(false);
        let report = Report {
            collections_created: 1,
            variables_created: 2,
            ..Report::default()
        };
        assert_eq!(super::report(&report), report.to_string().trim_end());
    }

    #[test]
    fn test_collections_listing() {
        console::set_colors_enabled(false);
        let summaries = vec![CollectionSummary {
            id: CollectionId::from("VariableCollectionId:1"),
            name: "Theme".into(),
            modes: vec![
                Mode {
                    id: ModeId::from("ModeId:2"),
                    name: "Light".into(),
                },
                Mode {
                    id: ModeId::from("ModeId:3"),
                    name: "Dark".into(),
                },
            ],
            variable_count: 4,
        }];

        let text = collections(&summaries);
        assert!(text.starts_with("Theme VariableCollectionId:1 (4 variables)"));
        assert!(text.contains("  • Dark ModeId:3"));
    }

    #[test]
    fn test_empty_listing() {
        console::set_colors_enabled(false);
        assert_eq!(collections(&[]), "No collections in store");
    }
}
