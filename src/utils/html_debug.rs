// src/utils/html_debug.rs
use std::fs;
use std::path::Path;

use crate::extractors::segment::{count_skipped, ClassifiedLine, LineMatch};
use crate::utils::error::StorageError;

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Builds an HTML page showing every input line highlighted by what it matched.
pub fn render_debug_html(lines: &[ClassifiedLine]) -> String {
    let mut debug_html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n");

    // CSS for highlight colors
    debug_html.push_str(".line { font-family: monospace; white-space: pre-wrap; }\n");
    debug_html.push_str(".line-title { background-color: #90EE90; font-weight: bold; }\n");
    debug_html.push_str(".line-pair { background-color: #ADD8E6; }\n");
    debug_html.push_str(".line-skipped { background-color: #FFC0CB; color: #666666; }\n");
    debug_html.push_str("</style>\n</head>\n<body>\n");

    let skipped = count_skipped(lines);
    debug_html.push_str(&format!(
        "<p class=\"summary\">{} lines, {} skipped</p>\n",
        lines.len(),
        skipped
    ));

    for line in lines {
        let (css_class, description) = match &line.matched {
            LineMatch::Title { label } => ("line-title", format!("Title: {}", label)),
            LineMatch::Pair { label, body } => (
                "line-pair",
                format!("Subtitle: {} / Content: {} chars", label, body.chars().count()),
            ),
            LineMatch::Skipped => ("line-skipped", "Skipped".to_string()),
        };

        debug_html.push_str(&format!(
            "<div class=\"line {}\" data-line=\"{}\" title=\"Line {}: {}\">{}</div>\n",
            css_class,
            line.number,
            line.number,
            escape_html(&description),
            escape_html(line.raw.trim_end_matches('\r')),
        ));
    }

    debug_html.push_str("</body>\n</html>\n");
    debug_html
}

/// Writes the annotated line view to `path`.
pub fn save_debug_html(lines: &[ClassifiedLine], path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_debug_html(lines))?;

    tracing::info!("Saved debug HTML to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::segment::scan_lines;
    use scraper::{Html, Selector};

    #[test]
    fn test_lines_tagged_by_match() {
        let html = render_debug_html(&scan_lines("((기본))\n<b>noise</b>\n(a) : {b}"));
        let doc = Html::parse_document(&html);

        let title = Selector::parse("div.line-title").unwrap();
        let pair = Selector::parse("div.line-pair").unwrap();
        let skipped = Selector::parse("div.line-skipped").unwrap();

        assert_eq!(doc.select(&title).count(), 1);
        assert_eq!(doc.select(&pair).count(), 1);

        let skipped_el = doc.select(&skipped).next().unwrap();
        assert_eq!(skipped_el.value().attr("data-line"), Some("2"));
        assert_eq!(skipped_el.text().collect::<String>(), "<b>noise</b>");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"'"), "a&lt;b&gt;&amp;&quot;&#39;");
    }

    #[test]
    fn test_summary_counts_skips() {
        let html = render_debug_html(&scan_lines("x\ny\n((t))"));
        assert!(html.contains("3 lines, 2 skipped"));
    }

    #[test]
    fn test_summary_leaves_out_blank_lines() {
        let lines = scan_lines("x\n\n((t))");
        let html = render_debug_html(&lines);
        assert!(html.contains("3 lines, 1 skipped"));
        assert_eq!(count_skipped(&lines), 1);
    }
}
