// src/extractors/segment.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// --- Regex Patterns (Lazy Static) ---
// Whole trimmed line wrapped in double parentheses: ((LABEL))
static TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\(\((.*)\)\)$").expect("Failed to compile TITLE_RE")
});

// (LABEL) : {BODY} with exactly " : " between the groups; each group stops
// at its first closing delimiter
static PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(([^)]*)\) : \{([^}]*)\}").expect("Failed to compile PAIR_RE")
});

// --- Data Structures ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Title,
    Subtitle,
    Content,
}

/// One parsed unit of report text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    #[serde(rename = "content")]
    pub text: String,
}

impl Segment {
    pub fn title(text: impl Into<String>) -> Self {
        Self { kind: SegmentKind::Title, text: text.into() }
    }

    pub fn subtitle(text: impl Into<String>) -> Self {
        Self { kind: SegmentKind::Subtitle, text: text.into() }
    }

    pub fn content(text: impl Into<String>) -> Self {
        Self { kind: SegmentKind::Content, text: text.into() }
    }
}

/// What a single input line matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineMatch {
    Title { label: String },
    Pair { label: String, body: String },
    Skipped,
}

/// A line of the input together with its 1-based position and match result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub number: usize,
    pub raw: String,
    pub matched: LineMatch,
}

// --- Line Classification ---

/// Classifies one line. Title wins over the label/body pattern; a line that
/// matches neither is skipped.
pub fn classify_line(line: &str) -> LineMatch {
    let line = line.trim();

    if let Some(caps) = TITLE_RE.captures(line) {
        return LineMatch::Title { label: caps[1].to_string() };
    }

    if let Some(caps) = PAIR_RE.captures(line) {
        return LineMatch::Pair {
            label: caps[1].to_string(),
            body: caps[2].to_string(),
        };
    }

    LineMatch::Skipped
}

impl ClassifiedLine {
    /// Unmatched and not blank. Blank lines are layout, not lost content.
    pub fn is_dropped_content(&self) -> bool {
        self.matched == LineMatch::Skipped && !self.raw.trim().is_empty()
    }
}

/// Number of non-blank lines that matched neither pattern.
pub fn count_skipped(lines: &[ClassifiedLine]) -> usize {
    lines.iter().filter(|l| l.is_dropped_content()).count()
}

/// Classifies every line of the trimmed input, skipped lines included.
pub fn scan_lines(input: &str) -> Vec<ClassifiedLine> {
    input
        .trim()
        .split('\n')
        .enumerate()
        .map(|(idx, raw)| ClassifiedLine {
            number: idx + 1,
            raw: raw.to_string(),
            matched: classify_line(raw),
        })
        .collect()
}

/// Converts report text into segments in source order. Lines matching
/// neither pattern produce nothing; this never fails.
pub fn parse_report(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();

    for line in input.trim().split('\n') {
        match classify_line(line) {
            LineMatch::Title { label } => segments.push(Segment::title(label)),
            LineMatch::Pair { label, body } => {
                segments.push(Segment::subtitle(label));
                segments.push(Segment::content(body));
            }
            LineMatch::Skipped => {}
        }
    }

    segments
}

/// Absent input yields no segments.
pub fn parse_optional(input: Option<&str>) -> Vec<Segment> {
    input.map(parse_report).unwrap_or_default()
}

// --- Extractor ---
pub struct SegmentExtractor;

impl SegmentExtractor {
    pub fn new() -> Self { Self {} }

    /// Parses `input` and logs what was found. `source` only labels the log lines.
    pub fn extract(&self, source: &str, input: Option<&str>) -> Vec<Segment> {
        match input {
            None => tracing::debug!("No text for '{}', nothing to extract", source),
            Some(text) if tracing::enabled!(tracing::Level::TRACE) => {
                for line in scan_lines(text) {
                    if line.is_dropped_content() {
                        tracing::trace!("Skipping unmatched line {} in '{}': '{}'", line.number, source, line.raw.trim());
                    }
                }
            }
            Some(_) => {}
        }

        let segments = parse_optional(input);
        let titles = segments.iter().filter(|s| s.kind == SegmentKind::Title).count();
        let pairs = segments.iter().filter(|s| s.kind == SegmentKind::Subtitle).count();
        tracing::debug!("Extracted {} segments from '{}' ({} titles, {} label/body pairs)", segments.len(), source, titles, pairs);

        segments
    }
}

impl Default for SegmentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
((기본))
(사업 개요) : {현대오토에버는 IT서비스와 차량용 소프트웨어 사업을 영위함.}
(주요 제품/서비스) : {주요 사업은 ITO(IT시스템 운영·관리 등, 매출비중 약 44%), SI(약 34%)로 구분됨.}
((심화))
(원재료 및 설비) : {주요 원재료는 전산장비와 외주용역.}
"#;

    #[test]
    fn test_blank_and_unmatched_lines_yield_nothing() {
        assert!(parse_report("").is_empty());
        assert!(parse_report("   \n\n  \t\n").is_empty());
        assert!(parse_report("plain text\n(no separator) {body}\n((unclosed)\n- bullet").is_empty());
    }

    #[test]
    fn test_single_title() {
        assert_eq!(parse_report("((기본))"), vec![Segment::title("기본")]);
    }

    #[test]
    fn test_single_pair() {
        assert_eq!(
            parse_report("(사업 개요) : {간단한 설명}"),
            vec![Segment::subtitle("사업 개요"), Segment::content("간단한 설명")]
        );
    }

    #[test]
    fn test_title_then_pair_keeps_source_order() {
        let kinds: Vec<SegmentKind> = parse_report("((기본))\n(라벨) : {본문}")
            .into_iter()
            .map(|s| s.kind)
            .collect();
        assert_eq!(kinds, vec![SegmentKind::Title, SegmentKind::Subtitle, SegmentKind::Content]);
    }

    #[test]
    fn test_empty_body_is_valid_content() {
        assert_eq!(
            parse_report("(라벨) : {}"),
            vec![Segment::subtitle("라벨"), Segment::content("")]
        );
        assert_eq!(
            parse_report("() : {}"),
            vec![Segment::subtitle(""), Segment::content("")]
        );
        assert_eq!(parse_report("(())"), vec![Segment::title("")]);
    }

    #[test]
    fn test_multiple_titles_are_flat() {
        let segments = parse_report(SAMPLE);
        assert_eq!(segments.len(), 2 + 4 + 2);
        assert_eq!(segments[0], Segment::title("기본"));
        assert_eq!(segments[5], Segment::title("심화"));
        assert_eq!(segments[6], Segment::subtitle("원재료 및 설비"));
        assert_eq!(segments[7], Segment::content("주요 원재료는 전산장비와 외주용역."));
    }

    #[test]
    fn test_every_subtitle_followed_by_content() {
        let segments = parse_report(SAMPLE);
        for (i, seg) in segments.iter().enumerate() {
            if seg.kind == SegmentKind::Subtitle {
                assert_eq!(segments[i + 1].kind, SegmentKind::Content);
            }
        }
    }

    #[test]
    fn test_body_may_contain_parentheses() {
        let segments = parse_report(SAMPLE);
        assert_eq!(
            segments[4].text,
            "주요 사업은 ITO(IT시스템 운영·관리 등, 매출비중 약 44%), SI(약 34%)로 구분됨."
        );
    }

    #[test]
    fn test_first_closing_brace_wins() {
        assert_eq!(
            parse_report("(라벨) : {앞}뒤}"),
            vec![Segment::subtitle("라벨"), Segment::content("앞")]
        );
    }

    #[test]
    fn test_nested_label_parentheses_not_supported() {
        assert!(parse_report("(라벨 (보조)) : {본문}").is_empty());
    }

    #[test]
    fn test_title_line_never_tries_pair_pattern() {
        assert_eq!(
            classify_line("((제목 (a) : {b}))"),
            LineMatch::Title { label: "제목 (a) : {b}".to_string() }
        );
    }

    #[test]
    fn test_title_must_span_whole_line() {
        assert_eq!(classify_line("prefix ((기본))"), LineMatch::Skipped);
        assert_eq!(classify_line("  ((기본))  "), LineMatch::Title { label: "기본".to_string() });
    }

    #[test]
    fn test_windows_line_endings() {
        assert_eq!(
            parse_report("((기본))\r\n(a) : {b}\r\n"),
            vec![Segment::title("기본"), Segment::subtitle("a"), Segment::content("b")]
        );
    }

    #[test]
    fn test_separator_needs_single_spaces() {
        assert!(parse_report("(a):{b}").is_empty());
        assert!(parse_report("(a)\t\t:   {b}").is_empty());
        assert!(parse_report("(a)  :  {b}").is_empty());
        assert_eq!(
            parse_report("(a) : {b}"),
            vec![Segment::subtitle("a"), Segment::content("b")]
        );
    }

    #[test]
    fn test_pair_found_anywhere_in_line() {
        assert_eq!(
            parse_report("prefix (a) : {b}"),
            vec![Segment::subtitle("a"), Segment::content("b")]
        );
        assert_eq!(
            parse_report("(a) note (b) : {c}"),
            vec![Segment::subtitle("b"), Segment::content("c")]
        );
    }

    #[test]
    fn test_whitespace_line_between_pairs() {
        assert_eq!(
            parse_report("((기본))\n(a) : {b}\n   \t\n(c) : {d}"),
            vec![
                Segment::title("기본"),
                Segment::subtitle("a"),
                Segment::content("b"),
                Segment::subtitle("c"),
                Segment::content("d"),
            ]
        );
    }

    #[test]
    fn test_count_skipped_ignores_blank_lines() {
        let lines = scan_lines("((a))\n\n  \nnoise\n(b) : {c}");
        assert_eq!(lines.len(), 5);
        assert_eq!(count_skipped(&lines), 1);
        assert!(!lines[1].is_dropped_content());
        assert!(lines[3].is_dropped_content());
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(parse_report(SAMPLE), parse_report(SAMPLE));
    }

    #[test]
    fn test_parse_optional_absent() {
        assert!(parse_optional(None).is_empty());
        assert_eq!(parse_optional(Some("((a))")), vec![Segment::title("a")]);
    }

    #[test]
    fn test_scan_lines_reports_skips() {
        let lines = scan_lines("((a))\nnoise\n(b) : {c}");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].number, 2);
        assert_eq!(lines[1].matched, LineMatch::Skipped);
        assert_eq!(
            lines[2].matched,
            LineMatch::Pair { label: "b".to_string(), body: "c".to_string() }
        );
    }

    #[test]
    fn test_extractor_matches_parse_report() {
        let extractor = SegmentExtractor::new();
        assert_eq!(extractor.extract("sample", Some(SAMPLE)), parse_report(SAMPLE));
        assert!(extractor.extract("missing", None).is_empty());
    }

    #[test]
    fn test_segment_serializes_as_display_shape() {
        let json = serde_json::to_string(&Segment::subtitle("라벨")).unwrap();
        assert_eq!(json, r#"{"type":"subtitle","content":"라벨"}"#);
    }
}
