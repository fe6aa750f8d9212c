//! Tag container model
//!
//! [`TagBuilder`] is the mutable accumulator that scanners write into through
//! the [`TagHandler`] interface. Once resolution is complete it is committed
//! into an immutable [`Tag`] which is then owned by a song.

use super::{SongTime, TagType};
use crate::traits::TagHandler;
use serde::Serialize;

/// A single tag item
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TagItem {
    /// Item type
    #[serde(rename = "type")]
    pub kind: TagType,

    /// Item value (never empty)
    pub value: String,
}

/// A key/value pair that has no [`TagType`], e.g. replay gain values
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TagPair {
    pub key: String,
    pub value: String,
}

/// Immutable tag snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tag {
    items: Vec<TagItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pairs: Vec<TagPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<SongTime>,
}

impl Tag {
    /// All items in insertion order
    pub fn items(&self) -> &[TagItem] {
        &self.items
    }

    /// Auxiliary key/value pairs
    pub fn pairs(&self) -> &[TagPair] {
        &self.pairs
    }

    pub fn duration(&self) -> Option<SongTime> {
        self.duration
    }

    /// True if the tag contains no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First value of the given type
    pub fn get(&self, kind: TagType) -> Option<&str> {
        self.get_all(kind).next()
    }

    /// All values of the given type, in insertion order
    pub fn get_all(&self, kind: TagType) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter(move |item| item.kind == kind)
            .map(|item| item.value.as_str())
    }

    /// Look up a pair value by key, ignoring ASCII case
    pub fn pair(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|p| p.key.eq_ignore_ascii_case(key))
            .map(|p| p.value.as_str())
    }
}

/// Mutable tag accumulator
///
/// Multiple values per type are kept in insertion order until a type is
/// explicitly cleared or replaced. Empty values are ignored and control
/// characters are replaced by spaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagBuilder {
    items: Vec<TagItem>,
    pairs: Vec<TagPair>,
    duration: Option<SongTime>,
}

impl TagBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no tag items have been added
    ///
    /// Pairs and duration do not count as items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of tag items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Append a value of the given type
    pub fn add_item(&mut self, kind: TagType, value: &str) {
        if value.is_empty() {
            return;
        }

        let value = if value.chars().any(char::is_control) {
            value
                .chars()
                .map(|c| if c.is_control() { ' ' } else { c })
                .collect()
        } else {
            value.to_string()
        };

        self.items.push(TagItem { kind, value });
    }

    /// Remove every value of the given type
    pub fn clear(&mut self, kind: TagType) {
        self.items.retain(|item| item.kind != kind);
    }

    /// Replace every value of the given type with a single new value
    ///
    /// An empty `value` leaves the type cleared.
    pub fn replace(&mut self, kind: TagType, value: &str) {
        self.clear(kind);
        self.add_item(kind, value);
    }

    /// First value of the given type
    pub fn get(&self, kind: TagType) -> Option<&str> {
        self.items
            .iter()
            .find(|item| item.kind == kind)
            .map(|item| item.value.as_str())
    }

    pub fn has(&self, kind: TagType) -> bool {
        self.get(kind).is_some()
    }

    pub fn add_pair(&mut self, key: &str, value: &str) {
        self.pairs.push(TagPair {
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    pub fn set_duration(&mut self, duration: SongTime) {
        self.duration = Some(duration);
    }

    pub fn duration(&self) -> Option<SongTime> {
        self.duration
    }

    /// Commit into an immutable tag, consuming the builder
    pub fn commit(self) -> Tag {
        Tag {
            items: self.items,
            pairs: self.pairs,
            duration: self.duration,
        }
    }
}

impl TagHandler for TagBuilder {
    fn on_tag(&mut self, kind: TagType, value: &str) {
        self.add_item(kind, value);
    }

    fn on_pair(&mut self, key: &str, value: &str) {
        self.add_pair(key, value);
    }

    fn on_duration(&mut self, duration: SongTime) {
        self.set_duration(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_builder_reports_empty() {
        let mut builder = TagBuilder::new();
        assert!(builder.is_empty());

        builder.add_pair("replaygain_track_gain", "-3.2 dB");
        builder.set_duration(SongTime::from_s(10));
        assert!(builder.is_empty());

        builder.add_item(TagType::Title, "x");
        assert!(!builder.is_empty());
    }

    #[test]
    fn multiple_values_keep_insertion_order() {
        let mut builder = TagBuilder::new();
        builder.add_item(TagType::Artist, "A");
        builder.add_item(TagType::Title, "T");
        builder.add_item(TagType::Artist, "B");

        let tag = builder.commit();
        assert_eq!(tag.get_all(TagType::Artist).collect::<Vec<_>>(), ["A", "B"]);
        assert_eq!(tag.get(TagType::Title), Some("T"));
        assert_eq!(tag.items().len(), 3);
    }

    #[test]
    fn replace_clears_previous_values() {
        let mut builder = TagBuilder::new();
        builder.add_item(TagType::Artist, "A");
        builder.add_item(TagType::Artist, "B");
        builder.replace(TagType::Artist, "C");
        assert_eq!(builder.get(TagType::Artist), Some("C"));
        assert_eq!(builder.len(), 1);

        builder.replace(TagType::Artist, "");
        assert!(!builder.has(TagType::Artist));
    }

    #[test]
    fn empty_values_are_ignored_and_control_chars_replaced() {
        let mut builder = TagBuilder::new();
        builder.add_item(TagType::Genre, "");
        assert!(builder.is_empty());

        builder.add_item(TagType::Comment, "line\nbreak");
        assert_eq!(builder.get(TagType::Comment), Some("line break"));
    }

    #[test]
    fn commit_preserves_pairs_and_duration() {
        let mut builder = TagBuilder::new();
        builder.on_tag(TagType::Album, "Record");
        builder.on_pair("REPLAYGAIN_TRACK_GAIN", "-1.0 dB");
        builder.on_duration(SongTime::from_ms(1500));

        let tag = builder.commit();
        assert_eq!(tag.pair("replaygain_track_gain"), Some("-1.0 dB"));
        assert_eq!(tag.duration(), Some(SongTime::from_ms(1500)));
        assert_eq!(tag.get(TagType::Album), Some("Record"));
    }

    #[test]
    fn serializes_items_pairs_and_duration() {
        let mut builder = TagBuilder::new();
        builder.add_item(TagType::AlbumArtist, "Various");
        builder.add_pair("replaygain_album_gain", "-4.5 dB");
        builder.set_duration(SongTime::from_ms(2500));

        let json = serde_json::to_value(builder.commit()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "items": [{ "type": "album_artist", "value": "Various" }],
                "pairs": [{ "key": "replaygain_album_gain", "value": "-4.5 dB" }],
                "duration": 2500,
            })
        );
    }

    #[test]
    fn empty_tag_serializes_without_pairs_or_duration() {
        let json = serde_json::to_value(Tag::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "items": [] }));
    }
}
