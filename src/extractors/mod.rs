// src/extractors/mod.rs
pub mod segment;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use segment::{
    classify_line,
    count_skipped,
    parse_optional,
    parse_report,
    scan_lines,
    ClassifiedLine,
    LineMatch,
    Segment,
    SegmentExtractor,
    SegmentKind,
};
