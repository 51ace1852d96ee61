// src/render/mod.rs
use clap::ValueEnum;

use crate::extractors::segment::{Segment, SegmentKind};
use crate::utils::error::RenderError;

/// Output formats for rendered segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Text,
    Json,
    /// The `((title))` / `(label) : {body}` report line format
    Lines,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Lines => "report",
        }
    }
}

/// A title with the label/body pairs that follow it, for display grouping only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: Option<String>,
    pub entries: Vec<(String, String)>,
}

pub fn render(segments: &[Segment], format: OutputFormat) -> Result<String, RenderError> {
    let out = match format {
        OutputFormat::Markdown => to_markdown(segments),
        OutputFormat::Text => to_text(segments),
        OutputFormat::Json => serde_json::to_string_pretty(segments)?,
        OutputFormat::Lines => format_lines(segments),
    };
    Ok(out)
}

/// Several parsed fields as one JSON object keyed by field name.
pub fn fields_to_json(parsed: &[(String, Vec<Segment>)]) -> Result<String, RenderError> {
    let mut by_field = serde_json::Map::new();
    for (field, segments) in parsed {
        by_field.insert(field.clone(), serde_json::to_value(segments)?);
    }
    Ok(serde_json::to_string_pretty(&by_field)?)
}

/// Escape characters that would otherwise turn report text into Markdown syntax.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for (i, c) in text.chars().enumerate() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            // Block markers only matter at the start of a line
            '#' | '>' | '-' | '+' if i == 0 => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

pub fn to_markdown(segments: &[Segment]) -> String {
    let blocks: Vec<String> = segments
        .iter()
        .map(|seg| match seg.kind {
            SegmentKind::Title => format!("## {}", escape_markdown(&seg.text)),
            SegmentKind::Subtitle => format!("### {}", escape_markdown(&seg.text)),
            SegmentKind::Content => escape_markdown(&seg.text),
        })
        .collect();

    if blocks.is_empty() {
        return String::new();
    }
    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

/// Plain text layout: `[title]`, then `- label` with the body indented below.
pub fn to_text(segments: &[Segment]) -> String {
    group_sections(segments)
        .iter()
        .map(|section| {
            let mut block = String::new();
            if let Some(title) = &section.title {
                block.push_str(&format!("[{}]\n", title));
            }
            for (label, body) in &section.entries {
                block.push_str(&format!("- {}\n    {}\n", label, body));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rebuilds report lines from segments. Parsing the result gives back the
/// same segments. A subtitle with no content gets an empty body; a content
/// segment without a subtitle is dropped.
pub fn format_lines(segments: &[Segment]) -> String {
    let mut lines = Vec::new();
    let mut iter = segments.iter().peekable();

    while let Some(seg) = iter.next() {
        match seg.kind {
            SegmentKind::Title => lines.push(format!("(({}))", seg.text)),
            SegmentKind::Subtitle => {
                let has_body = iter.peek().map_or(false, |next| next.kind == SegmentKind::Content);
                let body = if has_body {
                    iter.next().map(|c| c.text.as_str()).unwrap_or_default()
                } else {
                    ""
                };
                lines.push(format!("({}) : {{{}}}", seg.text, body));
            }
            SegmentKind::Content => {
                tracing::warn!("Dropping content segment without a preceding subtitle: '{}'", seg.text);
            }
        }
    }

    lines.join("\n")
}

/// Groups label/body pairs under the title before them. Pairs before the
/// first title land in a section with no title.
pub fn group_sections(segments: &[Segment]) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut pending_label: Option<&str> = None;

    for seg in segments {
        match seg.kind {
            SegmentKind::Title => sections.push(Section {
                title: Some(seg.text.clone()),
                entries: Vec::new(),
            }),
            SegmentKind::Subtitle => pending_label = Some(&seg.text),
            SegmentKind::Content => {
                let Some(label) = pending_label.take() else { continue };
                if sections.is_empty() {
                    sections.push(Section { title: None, entries: Vec::new() });
                }
                if let Some(current) = sections.last_mut() {
                    current.entries.push((label.to_string(), seg.text.clone()));
                }
            }
        }
    }

    sections
}
