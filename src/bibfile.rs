//! Reading and writing whole bibliography files.
//!
//! A file holds, in order: optional metadata comments, an optional table of contents
//! block, and record blocks grouped under section comments.
//!
//! ```text
//! %% - File name: refs.bib
//! %% - Last update: 2026-10-18 09:30:00
//! %% - Author: A. Writer
//!
//! %% - Table of Contents
//! %% - Introduction
//! %% -     Methods
//! %% - End of Table of Contents
//!
//! %% - Methods
//! @article{knuth1984,
//!   title = {Literate Programming}
//! } % catid = 0x11000000
//!
//! %% - Uncategorized references
//! @book{taocp,
//!   title = {The Art of Computer Programming}
//! }
//! ```
//!
//! # Examples
//!
//! ```
//! use bibtoc::{BibConfig, BibDocument, BibReader, BibWriter, EntryType, OutlineItem, Record};
//!
//! let mut doc = BibDocument::default();
//! doc.tree.build_from_nested(&[OutlineItem::section("Introduction")])?;
//! doc.records.insert(Record::builder(EntryType::Book, "taocp").title("TAOCP").build());
//!
//! let mut buffer = Vec::new();
//! BibWriter::new(&mut buffer).write_document(&doc)?;
//!
//! let restored = BibReader::new(buffer.as_slice()).read_document()?;
//! assert_eq!(restored, doc);
//! # Ok::<(), bibtoc::BibError>(())
//! ```

use crate::categorize::{categorize, Bucket};
use crate::codec::{encode, RecordDecoder};
use crate::config::BibConfig;
use crate::error::{BibError, Result};
use crate::index_tree::IndexTree;
use crate::recovery::RecoveryContext;
use crate::store::RecordStore;
use chrono::NaiveDateTime;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Prefix of every comment line the file format defines.
pub const COMMENT_PREFIX: &str = "%% - ";
/// Line that opens the table of contents block.
pub const TOC_START: &str = "%% - Table of Contents";
/// Line that closes the table of contents block.
pub const TOC_END: &str = "%% - End of Table of Contents";

const FILE_NAME_LABEL: &str = "File name: ";
const LAST_UPDATE_LABEL: &str = "Last update: ";
const AUTHOR_LABEL: &str = "Author: ";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header comments of a bibliography file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMetadata {
    /// Name of the file, as recorded in the file itself
    pub file_name: Option<String>,
    /// When the file was last written
    pub last_update: Option<NaiveDateTime>,
    /// Who maintains the file
    pub author: Option<String>,
}

impl FileMetadata {
    /// Metadata with every line present.
    pub fn new(
        file_name: impl Into<String>,
        author: impl Into<String>,
        last_update: NaiveDateTime,
    ) -> Self {
        FileMetadata {
            file_name: Some(file_name.into()),
            last_update: Some(last_update),
            author: Some(author.into()),
        }
    }

    /// Whether no metadata line is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.file_name.is_none() && self.last_update.is_none() && self.author.is_none()
    }

    /// Parse one comment body (prefix already removed). Returns `false` if the body is
    /// not a metadata line.
    fn absorb(&mut self, body: &str) -> bool {
        if let Some(name) = body.strip_prefix(FILE_NAME_LABEL) {
            self.file_name = Some(name.trim().to_string());
        } else if let Some(author) = body.strip_prefix(AUTHOR_LABEL) {
            self.author = Some(author.trim().to_string());
        } else if let Some(stamp) = body.strip_prefix(LAST_UPDATE_LABEL) {
            match NaiveDateTime::parse_from_str(stamp.trim(), TIMESTAMP_FORMAT) {
                Ok(when) => self.last_update = Some(when),
                Err(error) => warn!(%error, stamp, "unreadable last-update timestamp"),
            }
        } else {
            return false;
        }
        true
    }

    fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(name) = &self.file_name {
            lines.push(format!("{COMMENT_PREFIX}{FILE_NAME_LABEL}{name}"));
        }
        if let Some(when) = &self.last_update {
            lines.push(format!(
                "{COMMENT_PREFIX}{LAST_UPDATE_LABEL}{}",
                when.format(TIMESTAMP_FORMAT)
            ));
        }
        if let Some(author) = &self.author {
            lines.push(format!("{COMMENT_PREFIX}{AUTHOR_LABEL}{author}"));
        }
        lines
    }
}

/// Everything a bibliography file holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BibDocument {
    /// Header comments
    pub metadata: FileMetadata,
    /// Table of contents
    pub tree: IndexTree,
    /// Records keyed by id
    pub records: RecordStore,
}

/// Reader for bibliography files.
#[derive(Debug)]
pub struct BibReader<R: Read> {
    reader: BufReader<R>,
    config: BibConfig,
    recovery: RecoveryContext,
}

impl<R: Read> BibReader<R> {
    /// Create a reader with the default configuration.
    pub fn new(reader: R) -> Self {
        BibReader {
            reader: BufReader::new(reader),
            config: BibConfig::default(),
            recovery: RecoveryContext::default(),
        }
    }

    /// Use `config` for indentation and recovery mode.
    #[must_use]
    pub fn with_config(mut self, config: BibConfig) -> Self {
        self.config = config;
        self
    }

    /// Blocks skipped while reading the last document.
    #[must_use]
    pub fn recovery(&self) -> &RecoveryContext {
        &self.recovery
    }

    /// Read the whole source as one document.
    ///
    /// Metadata is only recognized before the table of contents and the first
    /// record. An unterminated table of contents ends at the first line without the
    /// comment prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails, if the table of contents overflows the key
    /// space, or (in strict mode) if a record block is malformed.
    pub fn read_document(&mut self) -> Result<BibDocument> {
        let mut metadata = FileMetadata::default();
        let mut toc_lines = Vec::new();
        let mut record_lines = Vec::new();
        let mut in_toc = false;
        let mut in_preamble = true;

        for line in (&mut self.reader).lines() {
            let line = line?;
            let line = line.trim_end();

            if line == TOC_START {
                in_toc = true;
                in_preamble = false;
                continue;
            }
            if line == TOC_END {
                in_toc = false;
                continue;
            }
            if in_toc {
                if let Some(body) = line.strip_prefix(COMMENT_PREFIX) {
                    toc_lines.push(body.to_string());
                    continue;
                }
                debug!(line, "table of contents ended without end marker");
                in_toc = false;
            }
            if in_preamble {
                if let Some(body) = line.strip_prefix(COMMENT_PREFIX) {
                    if metadata.absorb(body) {
                        continue;
                    }
                } else if !line.is_empty() && !line.starts_with('%') {
                    in_preamble = false;
                }
            }
            record_lines.push(line.to_string());
        }

        let mut tree = IndexTree::new();
        tree.build_from_indented_text(&toc_lines, self.config.indent_unit)?;

        let mut records = RecordStore::new();
        self.recovery = RecordDecoder::new()
            .with_recovery_mode(self.config.recovery_mode)
            .decode_into(&record_lines, &mut records)?;

        info!(
            sections = tree.len(),
            records = records.len(),
            skipped = self.recovery.recovery_messages.len(),
            "read bibliography"
        );
        Ok(BibDocument {
            metadata,
            tree,
            records,
        })
    }
}

/// Writer for bibliography files.
#[derive(Debug)]
pub struct BibWriter<W: Write> {
    writer: W,
    config: BibConfig,
}

impl<W: Write> BibWriter<W> {
    /// Create a writer with the default configuration.
    pub fn new(writer: W) -> Self {
        BibWriter {
            writer,
            config: BibConfig::default(),
        }
    }

    /// Use `config` for indentation and group headers.
    #[must_use]
    pub fn with_config(mut self, config: BibConfig) -> Self {
        self.config = config;
        self
    }

    /// Write a document and flush.
    ///
    /// With an outline, records are grouped by the categorized view: each non-empty
    /// leaf under its section name, then the reserved groups. Without an outline,
    /// records are written in store order with no group headers.
    ///
    /// # Errors
    ///
    /// Returns [`BibError::ReservedSectionName`] before anything is written if a
    /// section is named like a table of contents marker, or an error if writing to
    /// the destination fails.
    pub fn write_document(&mut self, doc: &BibDocument) -> Result<()> {
        check_section_names(&doc.tree)?;
        let metadata = doc.metadata.lines();
        if !metadata.is_empty() {
            for line in &metadata {
                writeln!(self.writer, "{line}")?;
            }
            writeln!(self.writer)?;
        }

        if !doc.tree.is_empty() {
            writeln!(self.writer, "{TOC_START}")?;
            for line in doc.tree.printable(self.config.indent_unit) {
                writeln!(self.writer, "{COMMENT_PREFIX}{line}")?;
            }
            writeln!(self.writer, "{TOC_END}")?;
            writeln!(self.writer)?;
        }

        let mut written = 0;
        if doc.tree.is_empty() {
            for record in &doc.records {
                written += self.write_record_lines(encode(record))?;
            }
        } else {
            let view = categorize(&doc.records, &doc.tree)?;
            for (bucket, records) in view.iter() {
                if records.is_empty() {
                    continue;
                }
                if self.config.write_group_headers {
                    let header = match bucket {
                        Bucket::Leaf(key) => doc.tree.name(key).unwrap_or_default(),
                        reserved => reserved.reserved_header().unwrap_or_default(),
                    };
                    writeln!(self.writer, "{COMMENT_PREFIX}{header}")?;
                }
                for record in records.values() {
                    written += self.write_record_lines(encode(record))?;
                }
            }
        }

        self.writer.flush()?;
        info!(
            sections = doc.tree.len(),
            records = written,
            "wrote bibliography"
        );
        Ok(())
    }

    fn write_record_lines(&mut self, lines: Option<Vec<String>>) -> Result<usize> {
        let Some(lines) = lines else {
            return Ok(0);
        };
        for line in lines {
            writeln!(self.writer, "{line}")?;
        }
        writeln!(self.writer)?;
        Ok(1)
    }
}

/// Section names that would be written as a line equal to [`TOC_START`] or
/// [`TOC_END`], either in the outline block or as a group header.
fn check_section_names(tree: &IndexTree) -> Result<()> {
    for (_, name) in tree.iter() {
        let line = format!("{COMMENT_PREFIX}{}", name.trim());
        if line == TOC_START || line == TOC_END {
            return Err(BibError::ReservedSectionName(name.to_string()));
        }
    }
    Ok(())
}

/// Read a bibliography file. The file is closed before this returns.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read, or for any error of
/// [`BibReader::read_document`].
pub fn read_path(path: impl AsRef<Path>, config: &BibConfig) -> Result<BibDocument> {
    let file = File::open(path.as_ref())?;
    BibReader::new(file)
        .with_config(config.clone())
        .read_document()
}

/// Write a bibliography file, replacing any existing file. The file is closed before
/// this returns.
///
/// # Errors
///
/// Returns [`BibError::ReservedSectionName`] without touching the file if a section
/// is named like a table of contents marker, or an error if the file cannot be
/// created or written.
pub fn write_path(path: impl AsRef<Path>, doc: &BibDocument, config: &BibConfig) -> Result<()> {
    check_section_names(&doc.tree)?;
    let file = File::create(path.as_ref())?;
    BibWriter::new(BufWriter::new(file))
        .with_config(config.clone())
        .write_document(doc)
}
