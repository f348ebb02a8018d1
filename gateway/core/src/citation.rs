//! Citation Records and the `context_used` Parser
//!
//! The retrieval backend bundles its supporting excerpts into a single
//! semi-structured text field (`context_used`). Each excerpt is one block:
//!
//! ```text
//! Source: Act: IPC, Section: 302
//! Content: Punishment for murder. ...
//! ```
//!
//! Blocks are separated by a blank line. This module turns that blob into
//! structured [`Citation`] records.
//!
//! # Design Philosophy
//!
//! Parsing is a pipeline of small pure stages: split on blank lines, drop
//! blocks that are empty after trimming, match each block against the
//! source/content pattern, trim the captured content. A block that does not
//! match the pattern is dropped silently; malformed excerpts must never fail
//! the surrounding request.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Sentinel the backend returns in `context_used` when retrieval found
/// nothing relevant to cite.
pub const NO_CONTEXT_SENTINEL: &str = "No relevant legal context found.";

// =============================================================================
// Citation Records
// =============================================================================

/// One excerpt of source material backing an assistant answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// The excerpt text, trimmed of leading/trailing whitespace.
    pub content: String,
    /// Provenance of the excerpt.
    pub metadata: CitationMetadata,
}

/// Provenance for a [`Citation`].
///
/// The backend supplies no pagination, so `page_label`, `total_pages` and
/// `page` are fixed placeholders kept for client compatibility.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationMetadata {
    /// Human-readable source label, `"Act: {act}, Section: {section}"`.
    pub source: String,
    /// Page label shown to users. Always `"N/A"`.
    pub page_label: String,
    /// Total pages in the source document. Always `1`.
    pub total_pages: u32,
    /// Page the excerpt came from. Always `1`.
    pub page: u32,
}

impl CitationMetadata {
    /// Build metadata for an act/section pair with placeholder pagination.
    #[must_use]
    pub fn for_act_section(act: &str, section: &str) -> Self {
        Self {
            source: format!("Act: {act}, Section: {section}"),
            page_label: "N/A".to_string(),
            total_pages: 1,
            page: 1,
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Outcome of parsing a `context_used` field.
///
/// Distinguishes "the backend said there is no context" from "the backend
/// sent context blocks" so callers can log or branch on the difference;
/// both collapse to an empty list via [`ParsedContext::into_citations`]
/// when no block survives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedContext {
    /// `context_used` was absent or carried the no-context sentinel.
    NoContext,
    /// `context_used` carried blocks; every well-formed block is here,
    /// in backend order. May be empty if no block matched.
    Citations(Vec<Citation>),
}

impl ParsedContext {
    /// Flatten into the citation list clients receive.
    #[must_use]
    pub fn into_citations(self) -> Vec<Citation> {
        match self {
            Self::NoContext => Vec::new(),
            Self::Citations(citations) => citations,
        }
    }
}

/// Block pattern: lazy act/section captures, then everything after
/// `Content: ` including newlines.
fn block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)Source: Act: (.*?), Section: (.*?)\nContent: (.*)")
            .expect("citation block pattern is valid")
    })
}

/// Parse a backend `context_used` field into structured citations.
///
/// Absent fields and the literal [`NO_CONTEXT_SENTINEL`] yield
/// [`ParsedContext::NoContext`]. Anything else is split on blank-line
/// boundaries and matched block by block; non-matching blocks are dropped
/// without error.
#[must_use]
pub fn parse_context_used(context_used: Option<&str>) -> ParsedContext {
    let Some(raw) = context_used else {
        return ParsedContext::NoContext;
    };
    if raw == NO_CONTEXT_SENTINEL {
        return ParsedContext::NoContext;
    }

    let citations = split_blocks(raw).filter_map(parse_block).collect();
    ParsedContext::Citations(citations)
}

/// Split the blob on blank lines, discarding blocks that are empty after
/// trimming.
fn split_blocks(raw: &str) -> impl Iterator<Item = &str> {
    raw.split("\n\n").filter(|block| !block.trim().is_empty())
}

/// Match one block against the source/content pattern.
///
/// Returns `None` for blocks that do not match; the caller drops them.
fn parse_block(block: &str) -> Option<Citation> {
    let captures = block_pattern().captures(block)?;
    let act = captures.get(1)?.as_str();
    let section = captures.get(2)?.as_str();
    let content = captures.get(3)?.as_str();

    Some(Citation {
        content: content.trim().to_string(),
        metadata: CitationMetadata::for_act_section(act, section),
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn absent_context_yields_no_context() {
        assert_eq!(parse_context_used(None), ParsedContext::NoContext);
    }

    #[test]
    fn sentinel_yields_no_context() {
        assert_eq!(
            parse_context_used(Some(NO_CONTEXT_SENTINEL)),
            ParsedContext::NoContext
        );
    }

    #[test]
    fn no_context_flattens_to_empty_list() {
        assert_eq!(parse_context_used(None).into_citations(), Vec::new());
    }

    #[test]
    fn single_block_round_trip() {
        let blob = "Source: Act: IPC, Section: 302\nContent: Punishment for murder.\n\n";

        let citations = parse_context_used(Some(blob)).into_citations();

        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].metadata.source, "Act: IPC, Section: 302");
        assert_eq!(citations[0].content, "Punishment for murder.");
        assert_eq!(citations[0].metadata.page_label, "N/A");
        assert_eq!(citations[0].metadata.total_pages, 1);
        assert_eq!(citations[0].metadata.page, 1);
    }

    #[test]
    fn emits_one_citation_per_well_formed_block() {
        let blob = "Source: Act: IPC, Section: 302\nContent: Punishment for murder.\n\n\
                    Source: Act: IPC, Section: 304B, Section note\nContent: Dowry death.\n\n\
                    Source: Act: CrPC, Section: 154\nContent: Information in cognizable cases.";

        let citations = parse_context_used(Some(blob)).into_citations();

        assert_eq!(citations.len(), 3);
        assert_eq!(citations[0].metadata.source, "Act: IPC, Section: 302");
        assert_eq!(
            citations[1].metadata.source,
            "Act: IPC, Section: 304B, Section note"
        );
        assert_eq!(citations[2].metadata.source, "Act: CrPC, Section: 154");
    }

    #[test]
    fn malformed_blocks_are_dropped_silently() {
        let blob = "Source: Act: IPC, Section: 302\nContent: Punishment for murder.\n\n\
                    this block has no recognizable structure\n\n\
                    Source: Act: CrPC, Section: 154\nContent: First information report.";

        let citations = parse_context_used(Some(blob)).into_citations();

        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].metadata.source, "Act: IPC, Section: 302");
        assert_eq!(citations[1].metadata.source, "Act: CrPC, Section: 154");
    }

    #[test]
    fn whitespace_only_blocks_are_filtered_before_matching() {
        let blob = "\n\n   \n\nSource: Act: IPC, Section: 499\nContent: Defamation.\n\n\t\n\n";

        let citations = parse_context_used(Some(blob)).into_citations();

        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].content, "Defamation.");
    }

    #[test]
    fn content_spans_single_newlines_and_is_trimmed() {
        let blob = "Source: Act: IPC, Section: 300\n\
                    Content:  Culpable homicide is murder if the act is done\n\
                    with the intention of causing death. \n";

        let citations = parse_context_used(Some(blob)).into_citations();

        assert_eq!(citations.len(), 1);
        assert_eq!(
            citations[0].content,
            "Culpable homicide is murder if the act is done\nwith the intention of causing death."
        );
    }

    #[test]
    fn empty_string_is_context_with_no_blocks() {
        // An empty blob is not the sentinel, so it goes through the block
        // pipeline and comes out as zero citations.
        assert_eq!(
            parse_context_used(Some("")),
            ParsedContext::Citations(Vec::new())
        );
    }

    #[test]
    fn block_without_content_line_does_not_match() {
        let blob = "Source: Act: IPC, Section: 302";

        assert_eq!(
            parse_context_used(Some(blob)),
            ParsedContext::Citations(Vec::new())
        );
    }

    #[test]
    fn citation_serializes_with_flat_metadata() {
        let citation = Citation {
            content: "Punishment for murder.".to_string(),
            metadata: CitationMetadata::for_act_section("IPC", "302"),
        };

        let json = serde_json::to_value(&citation).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "content": "Punishment for murder.",
                "metadata": {
                    "source": "Act: IPC, Section: 302",
                    "page_label": "N/A",
                    "total_pages": 1,
                    "page": 1,
                },
            })
        );
    }
}
