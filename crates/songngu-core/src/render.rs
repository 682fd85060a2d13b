//! Entry highlights and ordinal markers for both documents.
//!
//! Rendering a role first wipes every highlight and marker it owns and then draws
//! the full current set, so repeated renders with the same inputs leave the same state.

use songngu_types::{DocumentRole, StableKey, TextRange};

use crate::order::OrderIndex;
use crate::position::char_len;
use crate::store::EntryStore;

/// Smallest marker font, whatever the document font is
const MIN_MARKER_FONT: u16 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub key: StableKey,
    pub range: TextRange,
}

/// Ordinal badge drawn at the start of a highlight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub key: StableKey,
    pub offset: usize,
    pub ordinal: usize,
    pub font_size: u16,
}

/// Something that can display highlights for a document role
pub trait HighlightSurface {
    fn clear(&mut self, role: DocumentRole);
    fn add_highlight(&mut self, role: DocumentRole, highlight: Highlight);
    fn add_marker(&mut self, role: DocumentRole, marker: Marker);
    fn set_reading(&mut self, role: DocumentRole, range: Option<TextRange>);
}

/// In-memory overlay state of one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlay {
    pub highlights: Vec<Highlight>,
    pub markers: Vec<Marker>,
    pub reading: Option<TextRange>,
}

impl Overlay {
    pub fn highlighted_ranges(&self) -> Vec<TextRange> {
        self.highlights.iter().map(|h| h.range).collect()
    }

    pub fn marker_for(&self, key: &StableKey) -> Option<&Marker> {
        self.markers.iter().find(|m| &m.key == key)
    }
}

/// Overlays of both documents side by side
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlays {
    pub primary: Overlay,
    pub mirror: Overlay,
}

impl Overlays {
    pub fn get(&self, role: DocumentRole) -> &Overlay {
        match role {
            DocumentRole::Primary => &self.primary,
            DocumentRole::Mirror => &self.mirror,
        }
    }

    fn get_mut(&mut self, role: DocumentRole) -> &mut Overlay {
        match role {
            DocumentRole::Primary => &mut self.primary,
            DocumentRole::Mirror => &mut self.mirror,
        }
    }
}

impl HighlightSurface for Overlays {
    fn clear(&mut self, role: DocumentRole) {
        let overlay = self.get_mut(role);
        overlay.highlights.clear();
        overlay.markers.clear();
    }

    fn add_highlight(&mut self, role: DocumentRole, highlight: Highlight) {
        self.get_mut(role).highlights.push(highlight);
    }

    fn add_marker(&mut self, role: DocumentRole, marker: Marker) {
        self.get_mut(role).markers.push(marker);
    }

    fn set_reading(&mut self, role: DocumentRole, range: Option<TextRange>) {
        self.get_mut(role).reading = range;
    }
}

/// Inputs of one render pass
pub struct RenderInput<'a> {
    pub store: &'a EntryStore,
    pub order: &'a OrderIndex,
    /// Text of the document being rendered
    pub text: &'a str,
    pub font_size: u16,
}

pub fn marker_font_size(font_size: u16) -> u16 {
    (font_size / 3).max(MIN_MARKER_FONT)
}

/// Clear then redraw every entry overlay of `role`
pub fn render(surface: &mut dyn HighlightSurface, role: DocumentRole, input: &RenderInput<'_>) {
    surface.clear(role);

    let doc_len = char_len(input.text);
    let marker_font = marker_font_size(input.font_size);
    let mut drawn = 0;

    for (ordinal, key) in input.order.iter() {
        let Some(entry) = input.store.get(key) else {
            continue;
        };

        let range = match role {
            DocumentRole::Primary => entry.first_anchor().map(|anchor| {
                // Highlight the selected text, not whatever the anchor end drifted to
                let surface_len = char_len(&entry.surface_form);
                let end = if surface_len == 0 {
                    anchor.end
                } else {
                    anchor.start + surface_len
                };
                TextRange::new(anchor.start, end.min(doc_len))
            }),
            DocumentRole::Mirror => entry.mirror_span,
        };

        let Some(range) = range.filter(|r| r.is_valid_for(doc_len)) else {
            continue;
        };

        surface.add_highlight(
            role,
            Highlight {
                key: key.clone(),
                range,
            },
        );
        surface.add_marker(
            role,
            Marker {
                key: key.clone(),
                offset: range.start,
                ordinal,
                font_size: marker_font,
            },
        );
        drawn += 1;
    }

    tracing::debug!("Rendered {} highlights on {} document", drawn, role);
}
