//! Tag records backed by real audio files, via `lofty`.
//!
//! This is the on-disk implementation of the record contract: open reads
//! the file's primary tag (creating an empty one for untagged files),
//! setters stage changes on the in-memory tag, and commit writes the tag
//! back to the file.

use std::path::{Path, PathBuf};

use lofty::config::WriteOptions;
use lofty::prelude::*;
use lofty::tag::{ItemKey, ItemValue, Tag, TagItem};

use crate::record::{CommitError, OpenError, RecordProvider, TagField, TagRecord};

/// Opens audio files as tag records.
pub struct TagFileProvider;

impl RecordProvider for TagFileProvider {
    fn open(&self, path: &Path) -> Result<Box<dyn TagRecord>, OpenError> {
        let tagged = lofty::read_from_path(path).map_err(|e| OpenError {
            message: e.to_string(),
        })?;
        let tag = tagged
            .primary_tag()
            .cloned()
            .unwrap_or_else(|| Tag::new(tagged.primary_tag_type()));
        Ok(Box::new(TagFileRecord {
            tag,
            path: path.to_path_buf(),
        }))
    }
}

struct TagFileRecord {
    tag: Tag,
    path: PathBuf,
}

/// Item key for scalar text fields.
fn scalar_key(field: TagField) -> Option<ItemKey> {
    match field {
        TagField::Album => Some(ItemKey::AlbumTitle),
        TagField::AlbumSort => Some(ItemKey::AlbumTitleSortOrder),
        TagField::Comment => Some(ItemKey::Comment),
        TagField::Conductor => Some(ItemKey::Conductor),
        TagField::Copyright => Some(ItemKey::CopyrightMessage),
        TagField::Grouping => Some(ItemKey::ContentGroup),
        TagField::Lyrics => Some(ItemKey::Lyrics),
        TagField::Title => Some(ItemKey::TrackTitle),
        TagField::TitleSort => Some(ItemKey::TrackTitleSortOrder),
        _ => None,
    }
}

/// Item key for list-valued fields.
fn list_key(field: TagField) -> Option<ItemKey> {
    match field {
        TagField::AlbumArtists => Some(ItemKey::AlbumArtist),
        TagField::AlbumArtistsSort => Some(ItemKey::AlbumArtistSortOrder),
        TagField::Composers => Some(ItemKey::Composer),
        TagField::ComposersSort => Some(ItemKey::ComposerSortOrder),
        TagField::Genres => Some(ItemKey::Genre),
        TagField::Performers => Some(ItemKey::TrackArtist),
        TagField::PerformersSort => Some(ItemKey::TrackArtistSortOrder),
        _ => None,
    }
}

impl TagRecord for TagFileRecord {
    fn text(&self, field: TagField) -> Option<String> {
        let key = scalar_key(field)?;
        self.tag.get_string(&key).map(str::to_string)
    }

    fn text_list(&self, field: TagField) -> Vec<String> {
        match list_key(field) {
            Some(key) => self.tag.get_strings(&key).map(str::to_string).collect(),
            None => Vec::new(),
        }
    }

    fn number(&self, field: TagField) -> Option<u32> {
        match field {
            TagField::Track => self.tag.track(),
            TagField::TrackCount => self.tag.track_total(),
            TagField::Disc => self.tag.disk(),
            TagField::DiscCount => self.tag.disk_total(),
            TagField::Year => self.tag.year(),
            TagField::BeatsPerMinute => self
                .tag
                .get_string(&ItemKey::Bpm)
                .and_then(|s| s.parse().ok()),
            _ => None,
        }
    }

    fn set_text(&mut self, field: TagField, value: String) {
        if let Some(key) = scalar_key(field) {
            self.tag.insert_text(key, value);
        }
    }

    fn set_text_list(&mut self, field: TagField, values: Vec<String>) {
        if let Some(key) = list_key(field) {
            self.tag.remove_key(&key);
            for value in values {
                self.tag
                    .push(TagItem::new(key.clone(), ItemValue::Text(value)));
            }
        }
    }

    fn set_number(&mut self, field: TagField, value: u32) {
        match field {
            TagField::Track => self.tag.set_track(value),
            TagField::TrackCount => self.tag.set_track_total(value),
            TagField::Disc => self.tag.set_disk(value),
            TagField::DiscCount => self.tag.set_disk_total(value),
            TagField::Year => self.tag.set_year(value),
            TagField::BeatsPerMinute => {
                self.tag.insert_text(ItemKey::Bpm, value.to_string());
            }
            _ => {}
        }
    }

    fn commit(&mut self) -> Result<(), CommitError> {
        self.tag
            .save_to_path(&self.path, WriteOptions::default())
            .map_err(|e| CommitError {
                message: e.to_string(),
            })
    }
}
