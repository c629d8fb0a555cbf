//! The property catalog: the fixed table binding statement identifiers to
//! typed accessors over a tag record.
//!
//! The catalog is read-only data, built once per process and shared by
//! every compilation and run. Property names are case-sensitive and must
//! match exactly; lookup is O(1) by name. `SELECT *` projects properties
//! in the catalog's canonical order, which is the order of the table
//! below: `FilePath` first, then the tag fields alphabetically.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use rust_decimal::prelude::ToPrimitive;

use crate::options::ExecutionOptions;
use crate::record::{TagField, TagRecord};
use crate::value::Value;

/// Value shape of a catalog property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Scalar text; accepts only [`Value::Text`]
    Text,
    /// Ordered list of text; accepts a list of text, or text split on the
    /// configured list separator
    TextList,
    /// Unsigned integer; accepts an integral, in-range [`Value::Number`]
    Number,
    /// Synthetic read-only path of the file being processed
    FilePath,
}

/// Setter failure: the evaluated value does not fit the property's shape.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentError {
    /// Wrong value shape for the property
    TypeMismatch {
        property: String,
        expected: &'static str,
        found: &'static str,
    },
    /// Numeric property given a non-integral decimal
    NotIntegral { property: String, value: String },
    /// Numeric property given a value outside the unsigned 32-bit range
    OutOfRange { property: String, value: String },
    /// Property has no setter
    ReadOnly { property: String },
}

impl fmt::Display for AssignmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentError::TypeMismatch {
                property,
                expected,
                found,
            } => write!(
                f,
                "invalid assignment to {}: expected {}, got {}",
                property, expected, found
            ),
            AssignmentError::NotIntegral { property, value } => {
                write!(f, "invalid assignment to {}: {} is not an integer", property, value)
            }
            AssignmentError::OutOfRange { property, value } => {
                write!(f, "invalid assignment to {}: {} is out of range", property, value)
            }
            AssignmentError::ReadOnly { property } => {
                write!(f, "property {} is read-only", property)
            }
        }
    }
}

impl std::error::Error for AssignmentError {}

/// One catalog entry: a named, typed accessor pair over a tag record.
#[derive(Debug)]
pub struct PropertyDef {
    pub name: &'static str,
    pub kind: PropertyKind,
    field: Option<TagField>,
    writable: bool,
}

impl PropertyDef {
    const fn tag(name: &'static str, kind: PropertyKind, field: TagField) -> Self {
        PropertyDef {
            name,
            kind,
            field: Some(field),
            writable: true,
        }
    }

    pub fn writable(&self) -> bool {
        self.writable
    }

    /// Read this property from a record. Getters never mutate; absent
    /// fields read as [`Value::Null`] (lists read as an empty list).
    pub fn read(&self, record: &dyn TagRecord, path: &Path) -> Value {
        match (self.kind, self.field) {
            (PropertyKind::FilePath, _) => Value::Text(path.display().to_string()),
            (PropertyKind::Text, Some(field)) => match record.text(field) {
                Some(text) => Value::Text(text),
                None => Value::Null,
            },
            (PropertyKind::TextList, Some(field)) => {
                Value::list_of_text(record.text_list(field))
            }
            (PropertyKind::Number, Some(field)) => match record.number(field) {
                Some(n) => Value::Number(n.into()),
                None => Value::Null,
            },
            // the table below never pairs a tag kind with a missing field
            (_, None) => Value::Null,
        }
    }

    /// Validate `value` against this property's shape and stage it on the
    /// record. Writes reach disk only when the record commits.
    pub fn write(
        &self,
        record: &mut dyn TagRecord,
        value: Value,
        options: &ExecutionOptions,
    ) -> Result<(), AssignmentError> {
        let field = match (self.writable, self.field) {
            (true, Some(field)) => field,
            _ => {
                return Err(AssignmentError::ReadOnly {
                    property: self.name.to_string(),
                })
            }
        };

        match self.kind {
            PropertyKind::Text => match value {
                Value::Text(text) => {
                    record.set_text(field, text);
                    Ok(())
                }
                other => Err(self.mismatch("text", &other)),
            },
            PropertyKind::TextList => match value {
                Value::Text(text) => {
                    let items = text
                        .split(options.list_separator)
                        .map(str::to_string)
                        .collect();
                    record.set_text_list(field, items);
                    Ok(())
                }
                Value::List(items) => {
                    let mut texts = Vec::with_capacity(items.len());
                    for item in items {
                        match item {
                            Value::Text(text) => texts.push(text),
                            other => return Err(self.mismatch("a list of text", &other)),
                        }
                    }
                    record.set_text_list(field, texts);
                    Ok(())
                }
                other => Err(self.mismatch("text or a list of text", &other)),
            },
            PropertyKind::Number => match value {
                Value::Number(n) => {
                    if !n.is_integer() {
                        return Err(AssignmentError::NotIntegral {
                            property: self.name.to_string(),
                            value: n.to_string(),
                        });
                    }
                    match n.to_u32() {
                        Some(v) => {
                            record.set_number(field, v);
                            Ok(())
                        }
                        None => Err(AssignmentError::OutOfRange {
                            property: self.name.to_string(),
                            value: n.to_string(),
                        }),
                    }
                }
                other => Err(self.mismatch("a number", &other)),
            },
            PropertyKind::FilePath => Err(AssignmentError::ReadOnly {
                property: self.name.to_string(),
            }),
        }
    }

    fn mismatch(&self, expected: &'static str, found: &Value) -> AssignmentError {
        AssignmentError::TypeMismatch {
            property: self.name.to_string(),
            expected,
            found: found.type_name(),
        }
    }
}

/// The fixed table of supported properties, in canonical order.
static PROPERTIES: &[PropertyDef] = &[
    PropertyDef {
        name: "FilePath",
        kind: PropertyKind::FilePath,
        field: None,
        writable: false,
    },
    PropertyDef::tag("Album", PropertyKind::Text, TagField::Album),
    PropertyDef::tag("AlbumArtists", PropertyKind::TextList, TagField::AlbumArtists),
    PropertyDef::tag(
        "AlbumArtistsSort",
        PropertyKind::TextList,
        TagField::AlbumArtistsSort,
    ),
    PropertyDef::tag("AlbumSort", PropertyKind::Text, TagField::AlbumSort),
    PropertyDef::tag(
        "BeatsPerMinute",
        PropertyKind::Number,
        TagField::BeatsPerMinute,
    ),
    PropertyDef::tag("Comment", PropertyKind::Text, TagField::Comment),
    PropertyDef::tag("Composers", PropertyKind::TextList, TagField::Composers),
    PropertyDef::tag(
        "ComposersSort",
        PropertyKind::TextList,
        TagField::ComposersSort,
    ),
    PropertyDef::tag("Conductor", PropertyKind::Text, TagField::Conductor),
    PropertyDef::tag("Copyright", PropertyKind::Text, TagField::Copyright),
    PropertyDef::tag("Disc", PropertyKind::Number, TagField::Disc),
    PropertyDef::tag("DiscCount", PropertyKind::Number, TagField::DiscCount),
    PropertyDef::tag("Genres", PropertyKind::TextList, TagField::Genres),
    PropertyDef::tag("Grouping", PropertyKind::Text, TagField::Grouping),
    PropertyDef::tag("Lyrics", PropertyKind::Text, TagField::Lyrics),
    PropertyDef::tag("Performers", PropertyKind::TextList, TagField::Performers),
    PropertyDef::tag(
        "PerformersSort",
        PropertyKind::TextList,
        TagField::PerformersSort,
    ),
    PropertyDef::tag("Title", PropertyKind::Text, TagField::Title),
    PropertyDef::tag("TitleSort", PropertyKind::Text, TagField::TitleSort),
    PropertyDef::tag("Track", PropertyKind::Number, TagField::Track),
    PropertyDef::tag("TrackCount", PropertyKind::Number, TagField::TrackCount),
    PropertyDef::tag("Year", PropertyKind::Number, TagField::Year),
];

/// Name-indexed view over the property table.
pub struct PropertyCatalog {
    index: HashMap<&'static str, &'static PropertyDef>,
}

impl PropertyCatalog {
    /// The process-wide catalog, built on first use.
    pub fn global() -> &'static PropertyCatalog {
        static CATALOG: OnceLock<PropertyCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| PropertyCatalog {
            index: PROPERTIES.iter().map(|p| (p.name, p)).collect(),
        })
    }

    /// Case-sensitive lookup.
    pub fn get(&self, name: &str) -> Option<&'static PropertyDef> {
        self.index.get(name).copied()
    }

    /// Every property, in canonical order.
    pub fn properties(&self) -> impl Iterator<Item = &'static PropertyDef> {
        PROPERTIES.iter()
    }

    pub fn len(&self) -> usize {
        PROPERTIES.len()
    }

    pub fn is_empty(&self) -> bool {
        PROPERTIES.is_empty()
    }
}
