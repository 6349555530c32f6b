//! Typeahead suggestions over medicine names, brands and generics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::Medicine;

/// Most suggestions returned for one query.
pub const MAX_SUGGESTIONS: usize = 8;

/// Most entries kept in the recent-search list.
pub const MAX_RECENT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SuggestionSource {
    Name,
    Brand,
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub label: String,
    pub source: SuggestionSource,
    pub id: i64,
}

/// Label split around the first case-insensitive occurrence of the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightedLabel {
    pub before: String,
    pub matched: String,
    pub after: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedSuggestion {
    #[serde(flatten)]
    pub suggestion: Suggestion,
    pub highlight: HighlightedLabel,
}

/// Label → suggestion map that remembers first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct AutocompleteIndex {
    entries: Vec<Suggestion>,
    positions: HashMap<String, usize>,
}

impl AutocompleteIndex {
    pub fn build(medicines: &[Medicine]) -> Self {
        let mut index = Self::default();
        for medicine in medicines {
            index.insert(&medicine.name, SuggestionSource::Name, medicine.id);
            index.insert(&medicine.brand, SuggestionSource::Brand, medicine.id);
            index.insert(&medicine.generic, SuggestionSource::Generic, medicine.id);
        }
        index
    }

    /// A repeated label replaces the stored entry but keeps its position.
    fn insert(&mut self, raw: &str, source: SuggestionSource, id: i64) {
        let label = raw.trim();
        if label.is_empty() {
            return;
        }
        let suggestion = Suggestion {
            label: label.to_string(),
            source,
            id,
        };
        match self.positions.get(label) {
            Some(&pos) => self.entries[pos] = suggestion,
            None => {
                self.positions.insert(label.to_string(), self.entries.len());
                self.entries.push(suggestion);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prefix matches first, then other substring matches, capped.
    pub fn suggest(&self, query: &str) -> Vec<Suggestion> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut prefix = Vec::new();
        let mut contains = Vec::new();
        for entry in &self.entries {
            let label = entry.label.to_lowercase();
            if label.starts_with(&needle) {
                prefix.push(entry.clone());
            } else if label.contains(&needle) {
                contains.push(entry.clone());
            }
        }

        prefix.extend(contains);
        prefix.truncate(MAX_SUGGESTIONS);
        prefix
    }

    /// Suggestions with highlight spans attached.
    pub fn suggest_ranked(&self, query: &str) -> Vec<RankedSuggestion> {
        self.suggest(query)
            .into_iter()
            .map(|suggestion| RankedSuggestion {
                highlight: highlight(&suggestion.label, query.trim()),
                suggestion,
            })
            .collect()
    }
}

/// Split `label` around the first case-insensitive match of `query`.
/// With no match everything lands in `before`.
pub fn highlight(label: &str, query: &str) -> HighlightedLabel {
    let no_match = || HighlightedLabel {
        before: label.to_string(),
        matched: String::new(),
        after: String::new(),
    };
    if query.is_empty() {
        return no_match();
    }

    let chars: Vec<char> = label.chars().collect();
    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
    let lowered: Vec<char> = chars
        .iter()
        .map(|c| c.to_lowercase().next().unwrap_or(*c))
        .collect();

    let Some(start) = lowered
        .windows(needle.len())
        .position(|window| window == needle.as_slice())
    else {
        return no_match();
    };
    let end = start + needle.len();

    HighlightedLabel {
        before: chars[..start].iter().collect(),
        matched: chars[start..end].iter().collect(),
        after: chars[end..].iter().collect(),
    }
}

/// Keys the suggestion list reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum NavigationKey {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

/// Result of feeding a key to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorAction {
    /// Active row changed (or stayed at an edge).
    Moved(Option<usize>),
    /// Enter on an active row.
    Selected(usize),
    /// List closed.
    Dismissed,
    /// Key had no effect.
    Ignored,
}

/// Keyboard cursor over a visible suggestion list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionCursor {
    len: usize,
    active: Option<usize>,
    open: bool,
}

impl SuggestionCursor {
    /// Cursor for a freshly rendered list; nothing active.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            active: None,
            open: len > 0,
        }
    }

    /// Cursor for an open list with `active` already highlighted.
    /// Out-of-range rows are treated as nothing active.
    pub fn resume(len: usize, active: Option<usize>) -> Self {
        let mut cursor = Self::new(len);
        cursor.active = active.filter(|i| *i < len);
        cursor
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn press(&mut self, key: NavigationKey) -> CursorAction {
        if !self.open {
            return CursorAction::Ignored;
        }
        match key {
            NavigationKey::ArrowDown => {
                self.active = match self.active {
                    None => Some(0),
                    Some(i) if i + 1 < self.len => Some(i + 1),
                    other => other,
                };
                CursorAction::Moved(self.active)
            }
            NavigationKey::ArrowUp => {
                if let Some(i) = self.active {
                    if i > 0 {
                        self.active = Some(i - 1);
                    }
                }
                CursorAction::Moved(self.active)
            }
            NavigationKey::Enter => match self.active {
                Some(i) => {
                    self.dismiss();
                    CursorAction::Selected(i)
                }
                None => CursorAction::Ignored,
            },
            NavigationKey::Escape => {
                self.dismiss();
                CursorAction::Dismissed
            }
        }
    }

    /// Close the list, e.g. on a click outside it.
    pub fn dismiss(&mut self) {
        self.open = false;
        self.active = None;
    }
}

/// Move `value` to the front of `recent`, dropping duplicates and overflow.
pub fn push_recent(recent: &mut Vec<String>, value: &str) {
    recent.retain(|r| r != value);
    recent.insert(0, value.to_string());
    recent.truncate(MAX_RECENT);
}
