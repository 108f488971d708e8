//! Completion-text parser.
//!
//! Generated replies are asked to follow a fixed two-marker contract:
//!
//! ```text
//! NEXT_SITUATION_DESCRIPTION: <free text, may span lines>
//! JSON_MODIFICATIONS:
//! - <directive 1>
//! - <directive 2>
//! ```
//!
//! The model does not always comply, so nothing here can fail: a missing
//! marker yields an empty narrative or an empty directive list, never an
//! error. Markers are matched literally and case-sensitively.

const NARRATIVE_MARKER: &str = "NEXT_SITUATION_DESCRIPTION:";
const MODIFICATIONS_MARKER: &str = "JSON_MODIFICATIONS:";

/// Parsed form of one generated reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelReply {
    /// Free-text outcome description for the turn.
    pub narrative: String,
    /// Raw modification directives, in generation order, each non-empty.
    pub directives: Vec<String>,
}

impl ModelReply {
    /// A reply with a narrative and no directives.
    pub fn narrative(text: impl Into<String>) -> Self {
        Self {
            narrative: text.into(),
            directives: Vec::new(),
        }
    }

    /// A reply with both a narrative and directives.
    pub fn with_directives<I, S>(text: impl Into<String>, directives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            narrative: text.into(),
            directives: directives.into_iter().map(Into::into).collect(),
        }
    }
}

/// Split a raw completion into narrative and directives.
pub fn parse_reply(text: &str) -> ModelReply {
    let narrative_at = text.find(NARRATIVE_MARKER);
    let modifications_at = text.find(MODIFICATIONS_MARKER);

    let narrative = match narrative_at {
        Some(pos) => {
            let start = pos + NARRATIVE_MARKER.len();
            // A modifications marker sitting before the narrative marker
            // leaves nothing between them; degrade to empty rather than
            // capturing unrelated text.
            let end = match modifications_at {
                Some(m) if m >= start => m,
                Some(_) => start,
                None => text.len(),
            };
            text[start..end].trim().to_string()
        }
        None => String::new(),
    };

    let directives = match modifications_at {
        Some(pos) => extract_dash_items(&text[pos + MODIFICATIONS_MARKER.len()..]),
        None => Vec::new(),
    };

    ModelReply {
        narrative,
        directives,
    }
}

/// Pull out each `- ` item from the modifications block.
///
/// An item runs until the next dash-prefixed line, a blank-line gap, or the
/// end of the block, and may itself span lines. Whitespace-only items are
/// discarded.
fn extract_dash_items(block: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut rest = block;

    while let Some(start) = rest.find("- ") {
        let after = &rest[start + 2..];
        let end = ["\n- ", "\n\n"]
            .iter()
            .filter_map(|stop| after.find(*stop))
            .min()
            .unwrap_or(after.len());

        let item = after[..end].trim();
        if !item.is_empty() {
            items.push(item.to_string());
        }
        rest = &after[end..];
    }

    items
}
