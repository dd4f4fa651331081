//! Line-oriented record text codec.
//!
//! Records are written as BibTeX-style blocks:
//!
//! ```text
//! @article{knuth1984,
//!   title = {Literate Programming},
//!   author = {Donald E. Knuth}
//! } % catid = 0x11000000
//! ```
//!
//! Decoding is tolerant: every trimmed line is classified by [`classify`] and lines
//! that are not part of a record are ignored. Values run from the first `{` to the
//! last `}` on their line, so braces nested inside a value are kept verbatim but a
//! value cannot span several lines.
//!
//! # Examples
//!
//! ```
//! use bibtoc::{codec, EntryType, Record};
//!
//! let record = Record::builder(EntryType::Book, "taocp")
//!     .title("The Art of Computer Programming")
//!     .build();
//!
//! let lines = codec::encode(&record).unwrap();
//! assert_eq!(lines, vec![
//!     "@book{taocp,",
//!     "  title = {The Art of Computer Programming}",
//!     "}",
//! ]);
//!
//! let store = codec::decode(&lines);
//! assert_eq!(store.get("taocp"), Some(&record));
//! ```

use crate::catid::CatId;
use crate::error::{BibError, Result};
use crate::record::{EntryType, FieldName, Record};
use crate::recovery::{RecoveryContext, RecoveryMode};
use crate::store::RecordStore;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

lazy_static! {
    static ref OPENING_MARKER: Regex =
        Regex::new(r"@([^\s{@]+)\s*\{([^,]*),").expect("opening marker pattern");
    static ref FIELD_LINE: Regex =
        Regex::new(r"^([A-Za-z]+)\s*=\s*\{(.*)\}").expect("field line pattern");
    static ref CATID_ANNOTATION: Regex =
        Regex::new(r"%\s*catid\s*=\s*(?:0x)?0x([0-9A-Fa-f]{8})(?:[^0-9A-Fa-f]|$)")
            .expect("catid pattern");
}

/// Classification of one trimmed line of record text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    /// `@<type>{<id>,` starts a record.
    Opening {
        /// Publication type selected by the token after `@`
        entry_type: EntryType,
        /// Text between `{` and `,`, as written
        id: &'a str,
    },
    /// `<field> = {<value>}` for a recognized field name.
    Field {
        /// The field
        name: FieldName,
        /// Text between the first `{` and the last `}`
        value: &'a str,
    },
    /// A line starting with `}` closes the current record.
    Closing {
        /// Key from a trailing `% catid = 0x........` annotation
        category_key: Option<CatId>,
    },
    /// Anything else.
    Ignored,
}

/// Classify a single line. The line should already be trimmed.
#[must_use]
pub fn classify(line: &str) -> Line<'_> {
    if let Some(caps) = OPENING_MARKER.captures(line) {
        if let (Some(token), Some(id)) = (caps.get(1), caps.get(2)) {
            return Line::Opening {
                entry_type: EntryType::from_token(token.as_str()),
                id: id.as_str(),
            };
        }
    }

    if let Some(caps) = FIELD_LINE.captures(line) {
        let name = caps.get(1).and_then(|m| FieldName::from_name(m.as_str()));
        if let (Some(name), Some(value)) = (name, caps.get(2)) {
            return Line::Field {
                name,
                value: value.as_str(),
            };
        }
        return Line::Ignored;
    }

    if line.starts_with('}') {
        let category_key = CATID_ANNOTATION
            .captures(line)
            .and_then(|caps| caps.get(1))
            .and_then(|hex| hex.as_str().parse().ok());
        return Line::Closing { category_key };
    }

    Line::Ignored
}

/// Decoder for record text with a configurable [`RecoveryMode`].
///
/// # Examples
///
/// ```
/// use bibtoc::{codec::RecordDecoder, RecoveryMode};
///
/// let lines = ["@book{a,", "title = {A}", "@book{b,", "title = {B}", "}"];
///
/// let store = RecordDecoder::new().decode(lines)?;
/// assert_eq!(store.len(), 1);
///
/// let store = RecordDecoder::new()
///     .with_recovery_mode(RecoveryMode::Permissive)
///     .decode(lines)?;
/// assert_eq!(store.len(), 2);
///
/// assert!(RecordDecoder::new()
///     .with_recovery_mode(RecoveryMode::Strict)
///     .decode(lines)
///     .is_err());
/// # Ok::<(), bibtoc::BibError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordDecoder {
    recovery_mode: RecoveryMode,
}

impl RecordDecoder {
    /// Create a decoder in the default (lenient) recovery mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the recovery mode for handling malformed blocks.
    #[must_use]
    pub fn with_recovery_mode(mut self, mode: RecoveryMode) -> Self {
        self.recovery_mode = mode;
        self
    }

    /// Decode lines into a new store.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`BibError::MalformedRecord`] for the first block that
    /// lacks an id or is never closed.
    pub fn decode<I, S>(&self, lines: I) -> Result<RecordStore>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = RecordStore::new();
        self.decode_into(lines, &mut store)?;
        Ok(store)
    }

    /// Decode lines into an existing store, overwriting records with the same id.
    ///
    /// Returns the recovery context describing every block that was skipped.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`BibError::MalformedRecord`] for the first block that
    /// lacks an id or is never closed. Records committed before the error stay in
    /// `store`.
    pub fn decode_into<I, S>(&self, lines: I, store: &mut RecordStore) -> Result<RecoveryContext>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ctx = RecoveryContext::new(self.recovery_mode);
        let mut current: Option<Record> = None;
        let mut line_no = 0;

        for line in lines {
            line_no += 1;
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            match classify(line) {
                Line::Opening { entry_type, id } => {
                    if let Some(unfinished) = current.take() {
                        finish_unterminated(unfinished, store, &mut ctx, line_no)?;
                    }
                    current = Some(Record::new(entry_type, id));
                },
                Line::Field { name, value } => {
                    if let Some(record) = current.as_mut() {
                        record.set(name, value);
                    } else {
                        debug!(line_no, field = %name, "field outside a record block");
                    }
                },
                Line::Closing { category_key } => match current.take() {
                    Some(mut record) if !record.id.is_empty() => {
                        record.category_key = category_key;
                        store.insert(record);
                    },
                    Some(_) => {
                        ctx.recover::<()>(
                            BibError::MalformedRecord("record block has no id".to_string()),
                            &format!("line {line_no}"),
                        )?;
                    },
                    None => {
                        ctx.recover::<()>(
                            BibError::MalformedRecord(
                                "closing brace without an opening marker".to_string(),
                            ),
                            &format!("line {line_no}"),
                        )?;
                    },
                },
                Line::Ignored => {},
            }
        }

        if let Some(unfinished) = current.take() {
            finish_unterminated(unfinished, store, &mut ctx, line_no)?;
        }

        debug!(
            records = store.len(),
            skipped = ctx.recovery_messages.len(),
            "decoded record text"
        );
        Ok(ctx)
    }
}

/// Handle a block that was still open when a new block or the end of input arrived.
fn finish_unterminated(
    record: Record,
    store: &mut RecordStore,
    ctx: &mut RecoveryContext,
    line_no: usize,
) -> Result<()> {
    if ctx.salvages_unterminated() && !record.id.is_empty() {
        debug!(id = %record.id, "keeping unterminated record block");
        store.insert(record);
        return Ok(());
    }
    ctx.recover::<()>(
        BibError::MalformedRecord(format!("record `{}` is not closed", record.id)),
        &format!("line {line_no}"),
    )?;
    Ok(())
}

/// Decode record text leniently: malformed blocks are skipped, never fatal.
///
/// A later block with the same id replaces an earlier one.
pub fn decode<I, S>(lines: I) -> RecordStore
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut store = RecordStore::new();
    if let Err(error) = RecordDecoder::new().decode_into(lines, &mut store) {
        warn!(%error, "record decode stopped early");
    }
    store
}

/// Encode a record as text lines.
///
/// Fields are written in [`FieldName`] order and the last field carries no trailing
/// comma. Returns `None` if the record cannot be read back: an empty id, an id holding
/// a comma or line break, or a type token that is empty or holds whitespace, `{` or `@`.
#[must_use]
pub fn encode(record: &Record) -> Option<Vec<String>> {
    let token = record.entry_type.as_str();
    if token.is_empty() || token.contains(|c: char| c.is_whitespace() || c == '{' || c == '@') {
        return None;
    }
    if record.id.is_empty() || record.id.contains([',', '\n', '\r']) {
        return None;
    }

    let mut lines = Vec::with_capacity(record.fields.len() + 2);
    lines.push(format!("@{}{{{},", record.entry_type, record.id));
    for (name, value) in record.iter_fields() {
        lines.push(format!("  {name} = {{{value}}},"));
    }
    if !record.fields.is_empty() {
        if let Some(last) = lines.last_mut() {
            last.pop();
        }
    }
    lines.push(match record.category_key {
        Some(key) => format!("}} % catid = 0x{key}"),
        None => "}".to_string(),
    });
    Some(lines)
}
