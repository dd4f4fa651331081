#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # bibtoc: bibliography outlines for BibTeX-style files
//!
//! A library for filing bibliographic records under a hierarchical table of contents
//! and reading/writing them as plain-text record blocks.
//!
//! ## Quick Start
//!
//! ### Building an Outline
//!
//! ```
//! use bibtoc::{CatId, IndexTree, IndentUnit};
//!
//! let mut tree = IndexTree::new();
//! tree.build_from_indented_text(["Introduction", "\tMethods", "\tResults"], IndentUnit::Tab)?;
//!
//! assert_eq!(tree.leaf_keys(), vec![CatId::new(0x1100_0000), CatId::new(0x1200_0000)]);
//! # Ok::<(), bibtoc::BibError>(())
//! ```
//!
//! ### Decoding and Grouping Records
//!
//! ```
//! use bibtoc::{categorize, codec, Bucket, CatId, IndexTree, IndentUnit};
//!
//! # let mut tree = IndexTree::new();
//! # tree.build_from_indented_text(["Introduction", "\tMethods"], IndentUnit::Tab)?;
//! let store = codec::decode([
//!     "@article{knuth1984,",
//!     "  title = {Literate Programming}",
//!     "} % catid = 0x11000000",
//! ]);
//!
//! let view = categorize(&store, &tree)?;
//! let methods = view.bucket(Bucket::Leaf(CatId::new(0x1100_0000))).unwrap();
//! assert!(methods.contains_key("knuth1984"));
//! # Ok::<(), bibtoc::BibError>(())
//! ```
//!
//! ## Modules
//!
//! - [`catid`] — Outline keys and their hex encoding
//! - [`index_tree`] — The table of contents
//! - [`record`] — Record structures (`Record`, `EntryType`, `FieldName`)
//! - [`store`] — The id-keyed record store
//! - [`codec`] — Record text decoding and encoding
//! - [`categorize`] — Grouping records by outline leaf
//! - [`bibfile`] — Whole-file reading and writing
//! - [`json`] — JSON serialization/deserialization
//! - [`config`] — Read/write configuration
//! - [`recovery`] — Handling of malformed record blocks
//! - [`error`] — Error types and result type

pub mod bibfile;
pub mod catid;
pub mod categorize;
pub mod codec;
pub mod config;
pub mod error;
pub mod index_tree;
pub mod json;
pub mod record;
pub mod recovery;
pub mod store;

pub use bibfile::{read_path, write_path, BibDocument, BibReader, BibWriter, FileMetadata};
pub use catid::CatId;
pub use categorize::{categorize, set_category, Bucket, CategorizedView};
pub use codec::RecordDecoder;
pub use config::{BibConfig, IndentUnit};
pub use error::{BibError, Result};
pub use index_tree::{IndexTree, OutlineItem};
pub use record::{EntryType, FieldName, Record, RecordBuilder};
pub use recovery::{RecoveryContext, RecoveryMode};
pub use store::RecordStore;
