//! The single owner of everything the main thread touches.
//!
//! Every mutation ends in [`Workspace::refresh`]: Order Index, then a fresh Span
//! Locator pass, then a clear-and-redraw of both documents.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use kanal::Sender;
use songngu_config::reader::clamp_font_size;
use songngu_types::entry::timestamp;
use songngu_types::{
    DocumentRole, Position, ReadingMode, StableKey, SummaryRow, TextRange, VocabularyEntry,
};

use crate::error::AnnotateError;
use crate::locator::locate;
use crate::lookup::{LookupCache, WordInfo};
use crate::order::OrderIndex;
use crate::position::{char_len, normalize_line_endings, position_to_offset, slice};
use crate::reading::{
    ReadingController, ReadingEvent, ReadingSegment, ReadingState, ReadingTimings,
    ReadingTransition, SpeechOutput,
};
use crate::render::{HighlightSurface, Overlay, Overlays, RenderInput, render};
use crate::segment::{SentenceTokenizer, Segments};
use crate::selection::{Selection, trim_selection};
use crate::session::{Session, write_export};
use crate::store::EntryStore;

pub struct Workspace {
    primary: String,
    primary_path: Option<PathBuf>,
    mirror: String,
    segments: Segments,
    store: EntryStore,
    order: OrderIndex,
    overlays: Overlays,
    font_size: u16,
    theme: String,
    cache: LookupCache,
    reading: ReadingController,
    tokenizer: Arc<dyn SentenceTokenizer>,
}

impl Workspace {
    pub fn new(tokenizer: Arc<dyn SentenceTokenizer>, font_size: u16, theme: &str) -> Self {
        Self {
            primary: String::new(),
            primary_path: None,
            mirror: String::new(),
            segments: Segments::default(),
            store: EntryStore::new(),
            order: OrderIndex::default(),
            overlays: Overlays::default(),
            font_size: clamp_font_size(font_size),
            theme: theme.to_string(),
            cache: LookupCache::new(),
            reading: ReadingController::new(),
            tokenizer,
        }
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn primary_path(&self) -> Option<&Path> {
        self.primary_path.as_deref()
    }

    pub fn mirror(&self) -> &str {
        &self.mirror
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn order(&self) -> &OrderIndex {
        &self.order
    }

    pub fn segments(&self) -> &Segments {
        &self.segments
    }

    pub fn overlay(&self, role: DocumentRole) -> &Overlay {
        self.overlays.get(role)
    }

    pub fn has_document(&self) -> bool {
        !self.primary.trim().is_empty()
    }

    /// Load a new primary document; entries, mirror and caches of the old one are dropped
    pub fn open_document(&mut self, text: String, path: Option<PathBuf>) {
        self.reset_for(text, path);
        self.store.clear();
        tracing::info!(
            "Opened document ({} chars, {} paragraphs)",
            char_len(&self.primary),
            self.segments.paragraphs().len()
        );
        self.refresh();
    }

    fn reset_for(&mut self, text: String, path: Option<PathBuf>) {
        let text = normalize_line_endings(text);
        self.stop_reading();
        self.segments = Segments::build(&text, self.tokenizer.as_ref());
        self.primary = text;
        self.primary_path = path;
        self.mirror.clear();
        self.cache.clear();
        self.overlays = Overlays::default();
    }

    /// Trim a user selection given as positions; nothing changes if it is empty
    pub fn prepare_mark(&self, start: Position, end: Position) -> Result<Selection, AnnotateError> {
        if !self.has_document() {
            return Err(AnnotateError::NoDocument);
        }
        let start = position_to_offset(&self.primary, start);
        let end = position_to_offset(&self.primary, end);
        Selection::resolve(&self.primary, start, end).ok_or(AnnotateError::EmptySelection)
    }

    pub fn cached_info(&self, selection: &Selection) -> Option<WordInfo> {
        self.cache.get(&selection.surface, &selection.paragraph).cloned()
    }

    pub fn cache_info(&mut self, selection: &Selection, info: WordInfo) {
        self.cache.insert(&selection.surface, &selection.paragraph, info);
    }

    /// Create (or replace) the entry for a resolved selection; returns its key and ordinal
    pub fn commit_mark(&mut self, selection: Selection, info: WordInfo) -> (StableKey, usize) {
        let display_form = if info.lemma.trim().is_empty() {
            selection.surface.to_lowercase()
        } else {
            info.lemma
        };

        let entry = VocabularyEntry {
            display_form,
            surface_form: selection.surface,
            part_of_speech: info.part_of_speech,
            phonetic: info.phonetic,
            target_meaning: info.meaning,
            source_gloss: info.gloss,
            context_paragraph: selection.paragraph,
            anchors: vec![selection.range],
            mirror_span: None,
            status: "new".to_string(),
            created_at: timestamp::now(),
        };

        let (key, previous) = self.store.insert(entry);
        if previous.is_some() {
            tracing::info!("Re-marked {}", key);
        }
        self.refresh();

        let ordinal = self.order.ordinal(&key).unwrap_or(self.order.len());
        (key, ordinal)
    }

    pub fn delete(&mut self, key: &StableKey) -> Option<VocabularyEntry> {
        let removed = self.store.remove(key)?;
        tracing::info!("Deleted {}", key);
        self.refresh();
        Some(removed)
    }

    /// Delete by the number shown on the marker
    pub fn delete_ordinal(&mut self, ordinal: usize) -> Result<VocabularyEntry, AnnotateError> {
        let key = self
            .order
            .key_at(ordinal)
            .cloned()
            .ok_or(AnnotateError::UnknownOrdinal(ordinal))?;
        self.delete(&key).ok_or(AnnotateError::UnknownOrdinal(ordinal))
    }

    /// Whether marking should trigger a full-document translation
    pub fn needs_mirror(&self) -> bool {
        self.has_document() && self.mirror.trim().is_empty()
    }

    pub fn set_mirror(&mut self, text: String) {
        self.mirror = normalize_line_endings(text);
        self.refresh();
    }

    pub fn clear_mirror(&mut self) {
        self.mirror.clear();
        self.store.clear_mirror_spans();
        self.refresh();
    }

    /// Clamp and apply a font size; markers are restyled by the re-render
    pub fn set_font_size(&mut self, font_size: u16) -> u16 {
        self.font_size = clamp_font_size(font_size);
        self.refresh();
        self.font_size
    }

    /// Rebuild ordinals, re-match the mirror from scratch and redraw both documents
    pub fn refresh(&mut self) {
        self.order = OrderIndex::build(&self.store);
        let matches = locate(&self.store, &self.order, &self.mirror);
        self.store.apply_matches(matches);

        for (role, text) in [
            (DocumentRole::Primary, self.primary.as_str()),
            (DocumentRole::Mirror, self.mirror.as_str()),
        ] {
            let input = RenderInput {
                store: &self.store,
                order: &self.order,
                text,
                font_size: self.font_size,
            };
            render(&mut self.overlays, role, &input);
        }
    }

    pub fn summary(&self) -> Vec<SummaryRow> {
        self.order
            .iter()
            .filter_map(|(ordinal, key)| {
                self.store.get(key).map(|entry| SummaryRow {
                    ordinal,
                    key: key.to_string(),
                    display_form: entry.display_form.clone(),
                    part_of_speech: entry.part_of_speech.clone(),
                    target_meaning: entry.target_meaning.clone(),
                })
            })
            .collect()
    }

    pub fn session(&self) -> Session {
        Session {
            text_path: self.primary_path.clone(),
            text_content: self.primary.clone(),
            created_at: timestamp::now(),
            entries: self.order.entries(&self.store).into_iter().cloned().collect(),
            theme: self.theme.clone(),
            font_size: self.font_size,
        }
    }

    /// Replace everything with a saved session; the mirror starts empty
    pub fn restore(&mut self, session: Session) {
        self.reset_for(session.text_content, session.text_path);
        self.theme = session.theme;
        self.font_size = clamp_font_size(session.font_size);
        let doc_len = char_len(&self.primary);
        self.store.restore(session.entries, doc_len);
        self.refresh();
    }

    pub fn export(&self, path: &Path) -> Result<usize, AnnotateError> {
        write_export(path, &self.order.entries(&self.store))
    }

    /// Snapshot of the text pieces a reading session in `mode` will speak
    pub fn reading_segments(&self, mode: &ReadingMode) -> Vec<ReadingSegment> {
        let doc = self.primary.as_str();
        let ranges: Vec<TextRange> = match mode {
            ReadingMode::Paragraph => self.segments.paragraphs().to_vec(),
            ReadingMode::Sentence { cursor } => {
                let offset = position_to_offset(doc, *cursor);
                self.segments.sentence_at(offset).into_iter().collect()
            }
            ReadingMode::Word { start, end } => {
                let (a, b) = (position_to_offset(doc, *start), position_to_offset(doc, *end));
                trim_selection(doc, a.min(b), a.max(b)).into_iter().collect()
            }
            ReadingMode::Entry { ordinal } => {
                return self.entry_segment(*ordinal).into_iter().collect();
            }
        };

        ranges
            .into_iter()
            .map(|range| ReadingSegment {
                range,
                text: slice(doc, range).trim().to_string(),
            })
            .filter(|segment| !segment.text.is_empty())
            .collect()
    }

    fn entry_segment(&self, ordinal: usize) -> Option<ReadingSegment> {
        let entry = self.store.get(self.order.key_at(ordinal)?)?;
        let text = if entry.surface_form.trim().is_empty() {
            entry.display_form.trim()
        } else {
            entry.surface_form.trim()
        };
        if text.is_empty() {
            return None;
        }

        let doc_len = char_len(&self.primary);
        let range = entry
            .first_anchor()
            .map(|anchor| {
                let surface_len = char_len(&entry.surface_form);
                let end = if surface_len == 0 {
                    anchor.end
                } else {
                    anchor.start + surface_len
                };
                TextRange::new(anchor.start, end.min(doc_len))
            })
            .unwrap_or(TextRange::new(0, 0));
        Some(ReadingSegment {
            range,
            text: text.to_string(),
        })
    }

    pub fn reading_state(&self) -> ReadingState {
        self.reading.state()
    }

    pub fn start_reading(
        &mut self,
        mode: &ReadingMode,
        speech: Arc<dyn SpeechOutput>,
        timings: ReadingTimings,
        events: Sender<ReadingEvent>,
    ) -> Result<u64, AnnotateError> {
        if self.reading.is_active() {
            return Err(crate::reading::ReadingError::AlreadyActive.into());
        }
        if let ReadingMode::Entry { ordinal } = mode {
            if self.order.key_at(*ordinal).is_none() {
                return Err(AnnotateError::UnknownOrdinal(*ordinal));
            }
        }
        let segments = self.reading_segments(mode);
        Ok(self.reading.start(segments, speech, timings, events)?)
    }

    pub fn toggle_pause(&mut self) -> ReadingState {
        self.reading.toggle_pause()
    }

    pub fn stop_reading(&mut self) {
        let transition = self.reading.stop();
        self.apply_reading(&transition);
    }

    /// Feed a worker event through the state machine and into the reading highlight
    pub fn on_reading_event(&mut self, event: ReadingEvent) -> ReadingTransition {
        let transition = self.reading.on_event(event);
        self.apply_reading(&transition);
        transition
    }

    fn apply_reading(&mut self, transition: &ReadingTransition) {
        match transition {
            ReadingTransition::Highlight(range) => {
                self.overlays.set_reading(DocumentRole::Primary, Some(*range));
            }
            ReadingTransition::Clear => {
                self.overlays.set_reading(DocumentRole::Primary, None);
            }
            ReadingTransition::Failed(_) | ReadingTransition::Ignored => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const LAKE: &str = "I have two houses near the lake.\n\nThe lake is calm.";
    const MIRROR: &str = "Tôi có hai nhà gần hồ.\n\nHồ rất yên.";

    struct PeriodSplitter;

    impl SentenceTokenizer for PeriodSplitter {
        fn sentences<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = String> + 'a> {
            Box::new(
                text.split_inclusive('.')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty()),
            )
        }
    }

    fn workspace() -> Workspace {
        let mut ws = Workspace::new(Arc::new(PeriodSplitter), 18, "light");
        ws.open_document(LAKE.to_string(), None);
        ws
    }

    fn info(lemma: &str, meaning: &str) -> WordInfo {
        WordInfo {
            lemma: lemma.to_string(),
            part_of_speech: "noun".to_string(),
            meaning: meaning.to_string(),
            ..Default::default()
        }
    }

    fn mark(ws: &mut Workspace, line: usize, from: usize, to: usize, meaning: &str) -> StableKey {
        let selection = ws
            .prepare_mark(Position::new(line, from), Position::new(line, to))
            .unwrap();
        let lemma = selection.surface.to_lowercase();
        ws.commit_mark(selection, info(&lemma, meaning)).0
    }

    fn ordinals(ws: &Workspace) -> Vec<(usize, String)> {
        ws.summary()
            .into_iter()
            .map(|row| (row.ordinal, row.display_form))
            .collect()
    }

    #[test]
    fn test_mark_then_mirror_highlights_both_sides() {
        let mut ws = workspace();
        let lake = mark(&mut ws, 0, 27, 32, "hồ");
        let house = mark(&mut ws, 0, 10, 17, "nhà");

        assert!(ws.needs_mirror());
        assert_eq!(ws.overlay(DocumentRole::Mirror).highlights.len(), 0);

        ws.set_mirror(MIRROR.to_string());
        let mirror = ws.overlay(DocumentRole::Mirror);
        assert_eq!(mirror.marker_for(&house).unwrap().ordinal, 1);
        assert_eq!(mirror.marker_for(&house).unwrap().offset, 11);
        assert_eq!(mirror.marker_for(&lake).unwrap().ordinal, 2);
        assert_eq!(mirror.marker_for(&lake).unwrap().offset, 19);

        let primary = ws.overlay(DocumentRole::Primary);
        assert_eq!(
            primary.highlighted_ranges(),
            vec![TextRange::new(11, 17), TextRange::new(27, 31)]
        );
    }

    #[test]
    fn test_empty_selection_changes_nothing() {
        let mut ws = workspace();
        mark(&mut ws, 0, 27, 31, "hồ");
        let before = ws.summary();

        let result = ws.prepare_mark(Position::new(0, 31), Position::new(2, 0));
        assert!(matches!(result, Err(AnnotateError::EmptySelection)));
        assert_eq!(ws.summary(), before);
    }

    #[test]
    fn test_crlf_paragraphs_keep_words_apart() {
        let mut ws = Workspace::new(Arc::new(PeriodSplitter), 18, "light");
        ws.open_document(LAKE.replace('\n', "\r\n"), None);
        assert_eq!(ws.primary(), LAKE);

        let first = mark(&mut ws, 0, 27, 31, "hồ");
        let second = mark(&mut ws, 2, 4, 8, "hồ");
        assert_ne!(first, second);
        assert_eq!(ws.store().len(), 2);

        ws.set_mirror(MIRROR.replace('\n', "\r\n"));
        assert_eq!(ws.mirror(), MIRROR);
        assert!(ws.overlay(DocumentRole::Mirror).marker_for(&second).is_some());
    }

    #[test]
    fn test_mark_without_document() {
        let ws = Workspace::new(Arc::new(PeriodSplitter), 18, "light");
        let result = ws.prepare_mark(Position::new(0, 0), Position::new(0, 3));
        assert!(matches!(result, Err(AnnotateError::NoDocument)));
    }

    #[test]
    fn test_same_word_same_paragraph_replaces() {
        let mut ws = workspace();
        let first = mark(&mut ws, 2, 4, 8, "hồ");
        let again = mark(&mut ws, 2, 4, 8, "cái hồ");
        let other = mark(&mut ws, 0, 27, 31, "hồ");

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(ws.store().len(), 2);
    }

    #[test]
    fn test_deleting_second_of_four_renumbers() {
        let mut ws = workspace();
        mark(&mut ws, 0, 0, 1, "tôi");
        mark(&mut ws, 0, 2, 6, "có");
        mark(&mut ws, 0, 11, 17, "nhà");
        mark(&mut ws, 2, 12, 16, "yên");

        let removed = ws.delete_ordinal(2).unwrap();
        assert_eq!(removed.display_form, "have");
        assert_eq!(
            ordinals(&ws),
            vec![
                (1, "i".to_string()),
                (2, "houses".to_string()),
                (3, "calm".to_string())
            ]
        );
        let markers: Vec<_> = ws
            .overlay(DocumentRole::Primary)
            .markers
            .iter()
            .map(|m| m.ordinal)
            .collect();
        assert_eq!(markers, vec![1, 2, 3]);
        assert!(matches!(
            ws.delete_ordinal(4),
            Err(AnnotateError::UnknownOrdinal(4))
        ));
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let mut ws = workspace();
        mark(&mut ws, 0, 11, 17, "nhà");
        mark(&mut ws, 0, 27, 31, "hồ");
        ws.set_mirror(MIRROR.to_string());

        let before = ws.overlays.clone();
        ws.refresh();
        ws.refresh();
        assert_eq!(ws.overlays, before);
    }

    #[test]
    fn test_font_size_is_clamped_and_restyles_markers() {
        let mut ws = workspace();
        mark(&mut ws, 0, 27, 31, "hồ");

        assert_eq!(ws.set_font_size(50), 36);
        assert_eq!(ws.overlay(DocumentRole::Primary).markers[0].font_size, 12);
        assert_eq!(ws.set_font_size(3), 12);
        assert_eq!(ws.overlay(DocumentRole::Primary).markers[0].font_size, 8);
    }

    #[test]
    fn test_session_restore_rebuilds_everything() {
        let mut ws = workspace();
        mark(&mut ws, 0, 11, 17, "nhà");
        mark(&mut ws, 2, 12, 16, "yên");
        ws.set_mirror(MIRROR.to_string());
        ws.set_font_size(24);
        let session = ws.session();

        let mut restored = Workspace::new(Arc::new(PeriodSplitter), 18, "light");
        restored.restore(session);

        assert_eq!(restored.primary(), LAKE);
        assert_eq!(restored.mirror(), "");
        assert_eq!(restored.font_size(), 24);
        assert_eq!(restored.summary(), ws.summary());
        assert!(restored.store().mirror_spans().is_empty());
        assert_eq!(restored.overlay(DocumentRole::Primary).highlights.len(), 2);
    }

    #[test]
    fn test_opening_a_document_clears_entries() {
        let mut ws = workspace();
        mark(&mut ws, 0, 27, 31, "hồ");
        ws.set_mirror(MIRROR.to_string());

        ws.open_document("Another text.".to_string(), Some(PathBuf::from("b.txt")));
        assert!(ws.store().is_empty());
        assert_eq!(ws.mirror(), "");
        assert!(ws.overlay(DocumentRole::Primary).highlights.is_empty());
        assert_eq!(ws.primary_path(), Some(Path::new("b.txt")));
    }

    #[test]
    fn test_reading_segments_per_mode() {
        let ws = workspace();

        let paragraphs = ws.reading_segments(&ReadingMode::Paragraph);
        let ranges: Vec<_> = paragraphs.iter().map(|s| s.range).collect();
        assert_eq!(ranges, vec![TextRange::new(0, 32), TextRange::new(34, 51)]);

        let sentence = ws.reading_segments(&ReadingMode::Sentence {
            cursor: Position::new(2, 5),
        });
        assert_eq!(sentence.len(), 1);
        assert_eq!(sentence[0].text, "The lake is calm.");

        let word = ws.reading_segments(&ReadingMode::Word {
            start: Position::new(0, 31),
            end: Position::new(0, 26),
        });
        assert_eq!(word[0].text, "lake");
        assert_eq!(word[0].range, TextRange::new(27, 31));
    }

    #[test]
    fn test_entry_reading_speaks_marked_text() {
        let mut ws = workspace();
        mark(&mut ws, 0, 27, 31, "hồ");
        mark(&mut ws, 0, 11, 17, "nhà");

        let spoken = ws.reading_segments(&ReadingMode::Entry { ordinal: 1 });
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].text, "houses");
        assert_eq!(spoken[0].range, TextRange::new(11, 17));
        assert!(ws.reading_segments(&ReadingMode::Entry { ordinal: 3 }).is_empty());

        let (tx, _rx) = kanal::unbounded();
        let timings = ReadingTimings {
            poll: Duration::from_millis(1),
            pause_poll: Duration::from_millis(1),
        };
        struct Mute;
        impl SpeechOutput for Mute {
            fn play(&self, _text: &str) -> Result<(), crate::reading::SpeechError> {
                Ok(())
            }
            fn is_busy(&self) -> bool {
                false
            }
            fn halt(&self) {}
        }
        let unknown =
            ws.start_reading(&ReadingMode::Entry { ordinal: 3 }, Arc::new(Mute), timings, tx);
        assert!(matches!(unknown, Err(AnnotateError::UnknownOrdinal(3))));
        assert_eq!(ws.reading_state(), ReadingState::Idle);
    }

    #[test]
    fn test_reading_events_drive_highlight() {
        struct Silent;
        impl SpeechOutput for Silent {
            fn play(&self, _text: &str) -> Result<(), crate::reading::SpeechError> {
                Ok(())
            }
            fn is_busy(&self) -> bool {
                false
            }
            fn halt(&self) {}
        }

        let mut ws = workspace();
        let (tx, rx) = kanal::unbounded();
        let timings = ReadingTimings {
            poll: Duration::from_millis(1),
            pause_poll: Duration::from_millis(1),
        };
        ws.start_reading(&ReadingMode::Paragraph, Arc::new(Silent), timings, tx)
            .unwrap();

        let first = rx.recv().unwrap();
        assert_eq!(
            ws.on_reading_event(first),
            ReadingTransition::Highlight(TextRange::new(0, 32))
        );
        assert_eq!(
            ws.overlay(DocumentRole::Primary).reading,
            Some(TextRange::new(0, 32))
        );

        loop {
            if ws.on_reading_event(rx.recv().unwrap()) == ReadingTransition::Clear {
                break;
            }
        }
        assert_eq!(ws.reading_state(), ReadingState::Idle);
        assert_eq!(ws.overlay(DocumentRole::Primary).reading, None);
    }
}
