use std::sync::{Arc, OnceLock};

use regex::Regex;

use lt_core::{Book, Hymn, ProjectionKind, ProjectionState};

use crate::projection::{NavigationHandler, NavigationHandlers, ProjectionStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceItem {
    pub content: String,
    pub reference: String,
    /// Chorus stanza, shown differently by the control surface.
    pub is_chorus: bool,
}

/// An ordered, traversable run of units: verses of a chapter, stanzas of a
/// hymn, or pasted slides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSequence {
    kind: ProjectionKind,
    items: Vec<SequenceItem>,
}

impl ContentSequence {
    /// Verses of `chapter` (1-based). `None` if the chapter does not exist.
    pub fn verses(book: &Book, chapter: usize) -> Option<Self> {
        let verses = book.chapters.get(chapter.checked_sub(1)?)?;
        let items = verses
            .iter()
            .enumerate()
            .map(|(i, verse)| SequenceItem {
                content: verse.clone(),
                reference: format!("{} {}:{}", book.name, chapter, i + 1),
                is_chorus: false,
            })
            .collect();
        Some(Self {
            kind: ProjectionKind::Text,
            items,
        })
    }

    /// Stanzas are separated by blank lines.
    pub fn stanzas(hymn: &Hymn) -> Self {
        let reference = format!("{}. {}", hymn.number, hymn.title);
        let items = hymn
            .lyrics
            .replace("\r\n", "\n")
            .split("\n\n")
            .filter(|stanza| !stanza.trim().is_empty())
            .map(|stanza| SequenceItem {
                content: stanza.to_string(),
                reference: reference.clone(),
                is_chorus: is_chorus(stanza),
            })
            .collect();
        Self {
            kind: ProjectionKind::Lyric,
            items,
        }
    }

    /// Free text split into slides on runs of blank lines.
    pub fn slides(title: &str, text: &str) -> Self {
        static BLANK_RUN: OnceLock<Regex> = OnceLock::new();
        let re = BLANK_RUN.get_or_init(|| Regex::new(r"\n\s*\n").expect("valid blank-line pattern"));

        let text = text.replace("\r\n", "\n");
        let items = re
            .split(&text)
            .filter(|slide| !slide.trim().is_empty())
            .map(|slide| SequenceItem {
                content: slide.to_string(),
                reference: title.to_string(),
                is_chorus: false,
            })
            .collect();
        Self {
            kind: ProjectionKind::Lyric,
            items,
        }
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    pub fn items(&self) -> &[SequenceItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Project item `index` and install handlers for its neighbours.
    ///
    /// `advance` exists iff a next item exists, `retreat` iff a previous one
    /// does. Each handler projects its neighbour the same way, so the pair is
    /// replaced on every step. Returns `false` for an out-of-range index.
    pub fn project_at(self: &Arc<Self>, store: &Arc<ProjectionStore>, index: usize) -> bool {
        let Some(item) = self.items.get(index) else {
            return false;
        };

        store.set_projection(ProjectionState::new(
            self.kind,
            item.content.clone(),
            item.reference.clone(),
        ));

        let next = index + 1;
        let handlers = NavigationHandlers {
            advance: (next < self.len()).then(|| self.step_to(store, next)),
            retreat: index.checked_sub(1).map(|prev| self.step_to(store, prev)),
        };
        store.set_navigation_handlers(handlers);
        true
    }

    // Weak: the store owns the handlers, which must not keep the store alive.
    fn step_to(self: &Arc<Self>, store: &Arc<ProjectionStore>, index: usize) -> NavigationHandler {
        let sequence = Arc::clone(self);
        let store = Arc::downgrade(store);
        Arc::new(move || {
            if let Some(store) = store.upgrade() {
                sequence.project_at(&store, index);
            }
        })
    }
}

fn is_chorus(stanza: &str) -> bool {
    let lower = stanza.to_lowercase();
    lower.contains("coro") || lower.contains("refrão")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lt_core::DisplaySettings;
    use lt_infra::InMemoryProjectionChannel;

    fn store() -> Arc<ProjectionStore> {
        let (store, _publisher) = ProjectionStore::new(
            Arc::new(InMemoryProjectionChannel::new()),
            DisplaySettings::default(),
            0,
        );
        store
    }

    fn three_slides() -> Arc<ContentSequence> {
        Arc::new(ContentSequence::slides("Avisos", "um\n\ndois\n \n\ntrês\n"))
    }

    #[test]
    fn three_items_exhaust_after_two_advances() {
        let store = store();
        let sequence = three_slides();
        assert_eq!(sequence.len(), 3);

        assert!(sequence.project_at(&store, 0));
        let handlers = store.navigation_handlers();
        assert!(handlers.can_advance());
        assert!(!handlers.can_retreat());

        assert!(store.advance());
        assert!(store.advance());

        let handlers = store.navigation_handlers();
        assert!(!handlers.can_advance());
        assert!(handlers.can_retreat());
        assert_eq!(store.projection().content(), "três\n");
        assert!(!store.advance());
    }

    #[test]
    fn retreat_walks_back() {
        let store = store();
        let sequence = three_slides();
        sequence.project_at(&store, 2);

        assert!(store.retreat());
        assert_eq!(store.projection().content(), "dois");
        assert_eq!(store.projection().reference(), "Avisos");
    }

    #[test]
    fn clear_projection_mid_sequence_drops_handlers() {
        let store = store();
        let sequence = three_slides();
        sequence.project_at(&store, 1);

        store.clear_projection();

        assert!(store.navigation_handlers().is_empty());
        assert!(!store.advance());
        assert!(!store.retreat());
    }

    #[test]
    fn verse_references_are_book_chapter_verse() {
        let book = Book {
            name: "João".into(),
            abbrev: Some("jo".into()),
            chapters: vec![
                vec!["No princípio era o Verbo".into()],
                vec!["E ao terceiro dia".into(), "E Jesus também foi convidado".into()],
            ],
        };

        let sequence = ContentSequence::verses(&book, 2).unwrap();
        assert_eq!(sequence.kind(), ProjectionKind::Text);
        assert_eq!(sequence.items()[1].reference, "João 2:2");
        assert!(ContentSequence::verses(&book, 0).is_none());
        assert!(ContentSequence::verses(&book, 3).is_none());
    }

    #[test]
    fn stanzas_flag_chorus_and_normalize_crlf() {
        let hymn = Hymn {
            number: 15,
            title: "Conversão".into(),
            lyrics: "Primeira\r\n\r\n[Coro]\nRefrão aqui\n\nSegunda".into(),
        };

        let sequence = ContentSequence::stanzas(&hymn);
        assert_eq!(sequence.len(), 3);
        assert_eq!(sequence.items()[0].reference, "15. Conversão");
        assert!(sequence.items()[1].is_chorus);
        assert!(!sequence.items()[2].is_chorus);
    }

    #[test]
    fn handlers_do_not_keep_the_store_alive() {
        let store = store();
        let weak = Arc::downgrade(&store);
        three_slides().project_at(&store, 0);

        drop(store);
        assert!(weak.upgrade().is_none());
    }
}
