//! Hierarchical table of contents encoded as flat, sortable keys.
//!
//! An [`IndexTree`] maps [`CatId`] keys to section names. Sections are only ever added
//! through the two builders, which walk an outline in document order and hand out the
//! next sibling key at the current depth. A numeric sort of the keys therefore gives
//! back the original outline order.
//!
//! # Examples
//!
//! ```
//! use bibtoc::{IndexTree, IndentUnit, OutlineItem};
//!
//! let mut tree = IndexTree::new();
//! tree.build_from_nested(&[
//!     OutlineItem::section("Introduction"),
//!     OutlineItem::nested(vec![
//!         OutlineItem::section("Methods"),
//!         OutlineItem::section("Results"),
//!     ]),
//! ])?;
//!
//! assert_eq!(
//!     tree.printable(IndentUnit::Spaces(4)),
//!     vec!["Introduction", "    Methods", "    Results"]
//! );
//! # Ok::<(), bibtoc::BibError>(())
//! ```

use crate::catid::{CatId, MAX_DEPTH};
use crate::config::IndentUnit;
use crate::error::{BibError, Result};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// One element of a nested outline.
///
/// A [`OutlineItem::Nested`] list holds the subsections of the section that precedes
/// it in the enclosing list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineItem {
    /// A section name.
    Section(String),
    /// Subsections of the preceding section.
    Nested(Vec<OutlineItem>),
}

impl OutlineItem {
    /// Shorthand for [`OutlineItem::Section`].
    pub fn section(name: impl Into<String>) -> Self {
        OutlineItem::Section(name.into())
    }

    /// Shorthand for [`OutlineItem::Nested`].
    #[must_use]
    pub fn nested(items: Vec<OutlineItem>) -> Self {
        OutlineItem::Nested(items)
    }
}

/// A table of contents keyed by [`CatId`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexTree {
    sections: BTreeMap<CatId, String>,
}

/// Cursor state while an outline is being walked.
#[derive(Debug, Default)]
struct OutlineBuilder {
    sections: BTreeMap<CatId, String>,
    cursor: CatId,
    depth: usize,
}

impl OutlineBuilder {
    fn add_layer(&mut self, items: &[OutlineItem]) -> Result<()> {
        self.change_depth(1)?;
        for item in items {
            match item {
                OutlineItem::Section(name) => self.add(name)?,
                OutlineItem::Nested(children) => self.add_layer(children)?,
            }
        }
        self.depth -= 1;
        Ok(())
    }

    fn change_depth(&mut self, delta: usize) -> Result<()> {
        let depth = self.depth + delta;
        if depth > MAX_DEPTH {
            return Err(BibError::DepthOverflow { depth });
        }
        self.depth = depth;
        Ok(())
    }

    /// Add `name` as the next sibling at the current depth.
    fn add(&mut self, name: &str) -> Result<()> {
        let key = self.cursor.next_sibling(self.depth)?;
        self.cursor = key;
        self.sections.insert(key, name.to_string());
        Ok(())
    }

    fn finish(self) -> IndexTree {
        IndexTree {
            sections: self.sections,
        }
    }
}

impl IndexTree {
    /// Create an empty table of contents.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the table of contents with a nested outline.
    ///
    /// Each nested list goes one level deeper than its parent list. On error the
    /// current contents are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`BibError::DepthOverflow`] if the outline nests deeper than 8 levels and
    /// [`BibError::SiblingOverflow`] if a level holds more than 15 sections.
    pub fn build_from_nested(&mut self, outline: &[OutlineItem]) -> Result<()> {
        let mut builder = OutlineBuilder::default();
        builder.add_layer(outline)?;
        *self = builder.finish();
        debug!(sections = self.len(), "built outline from nested list");
        Ok(())
    }

    /// Replace the table of contents with an indentation-based outline.
    ///
    /// Every whole `unit` of leading indentation is one level, so an unindented line is
    /// at depth 1. Blank lines are skipped. On error the current contents are left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`BibError::DepthOverflow`] if a line is indented past depth 8 and
    /// [`BibError::SiblingOverflow`] if a level holds more than 15 sections.
    pub fn build_from_indented_text<I, S>(&mut self, lines: I, unit: IndentUnit) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = OutlineBuilder::default();
        for line in lines {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }
            let depth = unit.levels(line) + 1;
            if depth > MAX_DEPTH {
                return Err(BibError::DepthOverflow { depth });
            }
            builder.depth = depth;
            builder.add(line.trim())?;
        }
        *self = builder.finish();
        debug!(sections = self.len(), "built outline from indented text");
        Ok(())
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether no outline has been built (or the last one was empty).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Name of the section with the given key.
    #[must_use]
    pub fn name(&self, key: CatId) -> Option<&str> {
        self.sections.get(&key).map(String::as_str)
    }

    /// Whether `key` names a section in this outline.
    #[must_use]
    pub fn contains(&self, key: CatId) -> bool {
        self.sections.contains_key(&key)
    }

    /// Iterate over `(key, name)` pairs in outline order.
    pub fn iter(&self) -> impl Iterator<Item = (CatId, &str)> {
        self.sections.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// All keys in ascending order. Empty if no outline has been built.
    #[must_use]
    pub fn all_keys(&self) -> Vec<CatId> {
        self.sections.keys().copied().collect()
    }

    /// Keys of sections that have no subsection.
    ///
    /// A key counts as a leaf when its hex form has no more zero digits than the next
    /// key in order, or when it is the last key.
    #[must_use]
    pub fn leaf_keys(&self) -> Vec<CatId> {
        let keys = self.all_keys();
        keys.iter()
            .enumerate()
            .filter(|(i, key)| match keys.get(i + 1) {
                Some(next) => key.zero_digit_count() <= next.zero_digit_count(),
                None => true,
            })
            .map(|(_, key)| *key)
            .collect()
    }

    /// Section names in outline order, indented by `unit` once per level below the top.
    /// Empty if no outline has been built.
    #[must_use]
    pub fn printable(&self, unit: IndentUnit) -> Vec<String> {
        self.sections
            .iter()
            .map(|(key, name)| {
                format!("{}{name}", unit.render(key.depth().saturating_sub(1)))
            })
            .collect()
    }
}

impl fmt::Display for IndexTree {
    /// Index table: hex key, then the name indented by one tab per level.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "The table of contents is empty.");
        }
        write!(f, "Index No.\tSection Name")?;
        for (key, name) in self.iter() {
            write!(f, "\n{key}{}{name}", IndentUnit::Tab.render(key.depth()))?;
        }
        Ok(())
    }
}
