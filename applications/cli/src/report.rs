/// JSON rendering of resolved songs
use chrono::{DateTime, Utc};
use serde::Serialize;
use songtag_core::{DetachedSong, Tag};
use songtag_metadata::ResolvedTag;
use std::time::SystemTime;

/// One resolved song as printed by the CLI
#[derive(Debug, Clone, Serialize)]
pub struct SongReport<'a> {
    pub uri: &'a str,
    pub tag: &'a Tag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtime: Option<DateTime<Utc>>,
}

impl<'a> SongReport<'a> {
    pub fn new(uri: &'a str, tag: &'a Tag, mtime: Option<SystemTime>) -> Self {
        Self {
            uri,
            tag,
            mtime: mtime.map(DateTime::<Utc>::from),
        }
    }

    pub fn resolved(uri: &'a str, resolved: &'a ResolvedTag) -> Self {
        Self::new(uri, &resolved.tag, resolved.mtime)
    }

    pub fn song(song: &'a DetachedSong) -> Self {
        Self::new(&song.uri, &song.tag, song.mtime)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songtag_core::{TagBuilder, TagType};
    use std::time::Duration;

    #[test]
    fn test_report_renders_tag_and_mtime() {
        let mut builder = TagBuilder::new();
        builder.add_item(TagType::Artist, "Moondog");
        let tag = builder.commit();

        let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(86_400);
        let report = SongReport::new("a/b.mp3", &tag, Some(mtime));
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["uri"], "a/b.mp3");
        assert_eq!(json["mtime"], "1970-01-02T00:00:00Z");
        assert!(json["tag"].is_object());
    }

    #[test]
    fn test_report_omits_missing_mtime() {
        let song = DetachedSong::new("http://radio.example/live");
        let json = serde_json::to_value(SongReport::song(&song)).unwrap();

        assert_eq!(json["uri"], "http://radio.example/live");
        assert!(json.get("mtime").is_none());
    }
}
