//! # View Sync
//!
//! Maps the live document to its canonical JSON text and back.
//!
//! The document is the source of truth; the text is a derived view. Text
//! typed by the user only replaces the document once it parses *and* passes
//! the structural checks. Until then the draft and its error are kept
//! alongside, and the document stays as it was.

use serde_json::Value;

use crate::block::{ContentBlock, RawBlock};
use crate::document::{ContentDocument, LayoutSettings};
use crate::errors::ViewError;

/// Canonical text form: two-space indentation, declaration-order keys,
/// sorted keys inside free-form maps
pub fn to_text(document: &ContentDocument) -> String {
    // Documents hold only string-keyed maps, so encoding cannot fail
    serde_json::to_string_pretty(document).unwrap_or_default()
}

/// Parse and validate a text view
///
/// Positions are taken from array order; every other structural rule must
/// already hold.
pub fn from_text(text: &str) -> Result<ContentDocument, ViewError> {
    let value: Value = serde_json::from_str(text).map_err(|e| ViewError::Syntax {
        line: e.line(),
        column: e.column(),
        message: syntax_message(&e),
    })?;

    let Value::Object(mut root) = value else {
        return Err(ViewError::Structure(
            "top level must be an object".to_string(),
        ));
    };

    let raw_blocks: Vec<RawBlock> = match root.remove("blocks") {
        Some(blocks) => serde_json::from_value(blocks)
            .map_err(|e| ViewError::Structure(format!("blocks: {}", e)))?,
        None => Vec::new(),
    };

    let layout: LayoutSettings = match root.remove("layout") {
        Some(layout) => serde_json::from_value(layout)
            .map_err(|e| ViewError::Structure(format!("layout: {}", e)))?,
        None => LayoutSettings::default(),
    };

    let global = match root.remove("global") {
        Some(Value::Object(global)) => global,
        Some(_) => {
            return Err(ViewError::Structure(
                "global must be an object".to_string(),
            ))
        }
        None => serde_json::Map::new(),
    };

    if let Some(unknown) = root.keys().next() {
        return Err(ViewError::Structure(format!(
            "unknown top-level key: {}",
            unknown
        )));
    }

    let blocks = raw_blocks
        .into_iter()
        .map(ContentBlock::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ViewError::Structure(e.to_string()))?;

    let mut document = ContentDocument {
        blocks,
        layout,
        global,
    };
    document.renumber();
    document.check_invariants()?;

    Ok(document)
}

fn syntax_message(error: &serde_json::Error) -> String {
    // serde_json appends " at line X column Y"; the variant carries those
    let full = error.to_string();
    match full.rfind(" at line ") {
        Some(cut) => full[..cut].to_string(),
        None => full,
    }
}

/// Text-surface state: cached canonical text plus any unaccepted draft
#[derive(Debug, Default)]
pub struct TextView {
    /// Canonical text and the document version it was derived from
    cache: Option<(u64, String)>,

    /// Text the user typed that has not been accepted
    draft: Option<String>,

    error: Option<ViewError>,
}

impl TextView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text to show: the pending draft, else the canonical text
    pub fn text(&mut self, document: &ContentDocument, version: u64) -> &str {
        if self.draft.is_none() {
            return self.canonical(document, version);
        }
        self.draft.as_deref().unwrap_or_default()
    }

    /// Canonical text, re-derived only when `version` moved
    pub fn canonical(&mut self, document: &ContentDocument, version: u64) -> &str {
        let stale = !matches!(&self.cache, Some((cached, _)) if *cached == version);
        if stale {
            self.cache = Some((version, to_text(document)));
        }
        match &self.cache {
            Some((_, text)) => text,
            None => "",
        }
    }

    pub fn error(&self) -> Option<&ViewError> {
        self.error.as_ref()
    }

    pub fn has_draft(&self) -> bool {
        self.draft.is_some()
    }

    /// Try to accept `text`
    ///
    /// On failure the draft and error are kept and the error is returned.
    pub fn submit(&mut self, text: &str) -> Result<ContentDocument, ViewError> {
        match from_text(text) {
            Ok(document) => {
                self.draft = None;
                self.error = None;
                Ok(document)
            }
            Err(error) => {
                tracing::warn!(%error, "text view rejected");
                self.draft = Some(text.to_string());
                self.error = Some(error.clone());
                Err(error)
            }
        }
    }

    /// Drop the draft so the view re-derives from the accepted document
    pub fn discard_draft(&mut self) {
        self.draft = None;
        self.error = None;
    }

    /// Forget the cached canonical text
    pub fn invalidate(&mut self) {
        self.cache = None;
    }
}
