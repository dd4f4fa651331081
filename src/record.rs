//! Bibliographic record structures.
//!
//! This module provides the core record types:
//! - [`Record`] — One bibliographic entry with typed fields
//! - [`EntryType`] — The publication type written after `@`
//! - [`FieldName`] — The recognized field names, in output order
//!
//! # Examples
//!
//! Create a record with the builder API:
//!
//! ```
//! use bibtoc::{CatId, EntryType, FieldName, Record};
//!
//! let record = Record::builder(EntryType::Article, "knuth1984")
//!     .title("Literate Programming")
//!     .author("Donald E. Knuth")
//!     .field(FieldName::Journal, "The Computer Journal")
//!     .field(FieldName::Year, "1984")
//!     .category(CatId::new(0x1100_0000))
//!     .build();
//!
//! assert_eq!(record.title(), Some("Literate Programming"));
//! assert_eq!(record.get(FieldName::Year), Some("1984"));
//! ```

use crate::catid::CatId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Publication type of a record.
///
/// Unrecognized type tokens are kept in [`EntryType::Other`] so they can be written
/// back unchanged. Type tokens are case-insensitive: two entry types are equal when
/// their tokens match ignoring ASCII case, so `Other("Book")` equals `Book`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntryType {
    /// `@book`
    Book,
    /// `@article`
    Article,
    /// `@inproceedings`
    InProceedings,
    /// `@online`
    Online,
    /// Any other type token.
    Other(String),
}

impl EntryType {
    /// Select the type for a token after `@`. Matching ignores case.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        let token = token.trim().to_lowercase();
        match token.as_str() {
            "book" => EntryType::Book,
            "article" => EntryType::Article,
            "inproceedings" => EntryType::InProceedings,
            "online" => EntryType::Online,
            _ => EntryType::Other(token),
        }
    }

    /// The token written after `@`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            EntryType::Book => "book",
            EntryType::Article => "article",
            EntryType::InProceedings => "inproceedings",
            EntryType::Online => "online",
            EntryType::Other(token) => token,
        }
    }
}

impl PartialEq for EntryType {
    fn eq(&self, other: &Self) -> bool {
        self.as_str().eq_ignore_ascii_case(other.as_str())
    }
}

impl Eq for EntryType {}

impl Hash for EntryType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().to_ascii_lowercase().hash(state);
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognized record fields.
///
/// The declaration order is the order fields are written in, so iterating a
/// `BTreeMap<FieldName, _>` yields output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldName {
    /// `title`
    Title,
    /// `author`
    Author,
    /// `journal` (book, article)
    Journal,
    /// `volume` (book, article)
    Volume,
    /// `number` (book, article)
    Number,
    /// `pages` (book, article)
    Pages,
    /// `year` (book, article)
    Year,
    /// `publisher` (book, article)
    Publisher,
    /// `booktitle` (inproceedings)
    BookTitle,
    /// `organization` (inproceedings)
    Organization,
    /// `url` (online)
    Url,
    /// `urldate` (online)
    UrlDate,
}

impl FieldName {
    /// Every field, in output order.
    pub const ALL: [FieldName; 12] = [
        FieldName::Title,
        FieldName::Author,
        FieldName::Journal,
        FieldName::Volume,
        FieldName::Number,
        FieldName::Pages,
        FieldName::Year,
        FieldName::Publisher,
        FieldName::BookTitle,
        FieldName::Organization,
        FieldName::Url,
        FieldName::UrlDate,
    ];

    /// Name as written in record text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldName::Title => "title",
            FieldName::Author => "author",
            FieldName::Journal => "journal",
            FieldName::Volume => "volume",
            FieldName::Number => "number",
            FieldName::Pages => "pages",
            FieldName::Year => "year",
            FieldName::Publisher => "publisher",
            FieldName::BookTitle => "booktitle",
            FieldName::Organization => "organization",
            FieldName::Url => "url",
            FieldName::UrlDate => "urldate",
        }
    }

    /// Look up a field by its written name, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bibliographic record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Publication type
    pub entry_type: EntryType,
    /// Citation key, unique within a store
    pub id: String,
    /// Populated fields, kept in output order
    pub fields: BTreeMap<FieldName, String>,
    /// Outline section the record is filed under, if any
    pub category_key: Option<CatId>,
}

impl Record {
    /// Create a record with no fields and no category.
    pub fn new(entry_type: EntryType, id: impl Into<String>) -> Self {
        Record {
            entry_type,
            id: id.into(),
            fields: BTreeMap::new(),
            category_key: None,
        }
    }

    /// Create a builder for fluently constructing records.
    pub fn builder(entry_type: EntryType, id: impl Into<String>) -> RecordBuilder {
        RecordBuilder {
            record: Record::new(entry_type, id),
        }
    }

    /// Value of a field.
    #[must_use]
    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Set a field, returning the previous value.
    pub fn set(&mut self, field: FieldName, value: impl Into<String>) -> Option<String> {
        self.fields.insert(field, value.into())
    }

    /// Clear a field, returning the previous value.
    pub fn remove(&mut self, field: FieldName) -> Option<String> {
        self.fields.remove(&field)
    }

    /// Title of the record
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.get(FieldName::Title)
    }

    /// Author(s) of the record
    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.get(FieldName::Author)
    }

    /// Iterate over populated fields in output order.
    pub fn iter_fields(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.fields.iter().map(|(name, value)| (*name, value.as_str()))
    }
}

/// Builder for fluently constructing [`Record`]s.
#[derive(Debug)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    /// Set the title
    #[must_use]
    pub fn title(self, value: impl Into<String>) -> Self {
        self.field(FieldName::Title, value)
    }

    /// Set the author
    #[must_use]
    pub fn author(self, value: impl Into<String>) -> Self {
        self.field(FieldName::Author, value)
    }

    /// Set any field
    #[must_use]
    pub fn field(mut self, field: FieldName, value: impl Into<String>) -> Self {
        self.record.set(field, value);
        self
    }

    /// File the record under an outline key
    #[must_use]
    pub fn category(mut self, key: CatId) -> Self {
        self.record.category_key = Some(key);
        self
    }

    /// Build the record
    #[must_use]
    pub fn build(self) -> Record {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_from_token() {
        assert_eq!(EntryType::from_token("Book"), EntryType::Book);
        assert_eq!(EntryType::from_token("ARTICLE"), EntryType::Article);
        assert_eq!(EntryType::from_token("InProceedings"), EntryType::InProceedings);
        assert_eq!(EntryType::from_token("online"), EntryType::Online);
        assert_eq!(
            EntryType::from_token("PhdThesis"),
            EntryType::Other("phdthesis".to_string())
        );
        assert_eq!(EntryType::from_token("PhdThesis").as_str(), "phdthesis");
    }

    #[test]
    fn test_entry_type_equality_ignores_case() {
        use std::collections::HashSet;

        let mixed = EntryType::Other("PhdThesis".to_string());
        assert_eq!(mixed, EntryType::from_token("phdthesis"));
        assert_eq!(EntryType::Other("Book".to_string()), EntryType::Book);
        assert_ne!(mixed, EntryType::Other("mastersthesis".to_string()));

        let set: HashSet<EntryType> = [mixed, EntryType::from_token("PHDTHESIS")].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_field_name_lookup() {
        assert_eq!(FieldName::from_name("booktitle"), Some(FieldName::BookTitle));
        assert_eq!(FieldName::from_name("URLDATE"), Some(FieldName::UrlDate));
        assert_eq!(FieldName::from_name("doi"), None);
        for field in FieldName::ALL {
            assert_eq!(FieldName::from_name(field.as_str()), Some(field));
        }
    }

    #[test]
    fn test_fields_iterate_in_output_order() {
        let record = Record::builder(EntryType::Online, "web")
            .field(FieldName::UrlDate, "2024-01-01")
            .field(FieldName::Url, "https://example.org")
            .title("Example")
            .build();
        let names: Vec<_> = record.iter_fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec![FieldName::Title, FieldName::Url, FieldName::UrlDate]);
    }

    #[test]
    fn test_set_and_remove() {
        let mut record = Record::new(EntryType::Book, "b1");
        assert_eq!(record.set(FieldName::Year, "2001"), None);
        assert_eq!(record.set(FieldName::Year, "2002"), Some("2001".to_string()));
        assert_eq!(record.remove(FieldName::Year), Some("2002".to_string()));
        assert!(record.fields.is_empty());
        assert_eq!(record.category_key, None);
    }
}
