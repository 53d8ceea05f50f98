//! Relationship table of the main document part.
//!
//! This module provides the types decoded from `word/_rels/document.xml.rels`:
//! one [`Relationship`] per `<Relationship>` element, collected in source order
//! into [`Relationships`] with an id → position index for O(1) lookup.

use crate::error::Result;
use crate::opc::constants::{namespace, target_mode};
use crate::xml::{StartTag, XmlCursor, XmlDecode, XmlEvent};
use std::collections::HashMap;
use std::io::BufRead;

/// A single relationship from the document part to a target.
///
/// Identified by an rId (relationship ID). The target is either a part
/// reference relative to `word/` or, for external relationships, a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1", "rId2")
    pub id: String,

    /// Relationship type URI
    pub rel_type: String,

    /// Target reference - either a relative part reference or an external URL
    pub target: String,

    /// `TargetMode` attribute as written, if present
    pub target_mode: Option<String>,
}

impl Relationship {
    /// Check if this is an external relationship.
    #[inline]
    pub fn is_external(&self) -> bool {
        self.target_mode.as_deref() == Some(target_mode::EXTERNAL)
    }

    fn from_tag(tag: &StartTag) -> std::result::Result<Self, &'static str> {
        let id = tag.attribute("", "Id").ok_or("Relationship without Id")?;
        let rel_type = tag.attribute("", "Type").ok_or("Relationship without Type")?;
        let target = tag.attribute("", "Target").ok_or("Relationship without Target")?;

        Ok(Self {
            id: id.to_string(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            target_mode: tag.attribute("", "TargetMode").map(str::to_string),
        })
    }
}

/// Collection of relationships from the document part.
///
/// `xmlns` must hold the relationships namespace before decoding: the decoder
/// only accepts a `Relationships` root and `Relationship` children bound to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    /// Namespace of the `<Relationships>` root
    pub xmlns: String,

    /// Relationships in source order
    rels: Vec<Relationship>,

    /// Map of relationship ID to position in `rels`
    index: HashMap<String, usize>,
}

impl Relationships {
    /// Create an empty table seeded with the OPC relationships namespace.
    pub fn new() -> Self {
        let mut rels = Self::default();
        rels.seed_namespace();
        rels
    }

    /// Set `xmlns` to the canonical relationships namespace.
    #[inline]
    pub fn seed_namespace(&mut self) {
        self.xmlns = namespace::OPC_RELATIONSHIPS.to_string();
    }

    /// Append a relationship.
    ///
    /// Identifiers are not checked for uniqueness; a repeated id points the
    /// index at the newest entry.
    pub fn push(&mut self, rel: Relationship) {
        self.index.insert(rel.id.clone(), self.rels.len());
        self.rels.push(rel);
    }

    /// Get a relationship by its ID.
    #[inline]
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.index.get(r_id).map(|&pos| &self.rels[pos])
    }

    /// Get the target reference of a relationship by its ID.
    #[inline]
    pub fn target_of(&self, r_id: &str) -> Option<&str> {
        self.get(r_id).map(|rel| rel.target.as_str())
    }

    /// Find the ID of the first relationship pointing at `target`.
    pub fn id_for_target(&self, target: &str) -> Option<&str> {
        self.rels
            .iter()
            .find(|rel| rel.target == target)
            .map(|rel| rel.id.as_str())
    }

    /// Iterate over relationships of the given type, in source order.
    pub fn of_type<'a>(&'a self, rel_type: &'a str) -> impl Iterator<Item = &'a Relationship> {
        self.rels.iter().filter(move |rel| rel.rel_type == rel_type)
    }

    /// Highest numeric suffix among identifiers of the form `rIdN`.
    ///
    /// Only reports what the table holds; identifiers that do not follow the
    /// `rIdN` pattern are ignored.
    pub fn max_r_id(&self) -> Option<u32> {
        self.rels
            .iter()
            .filter_map(|rel| {
                let digits = rel.id.as_bytes().strip_prefix(b"rId")?;
                atoi_simd::parse::<u32, false, false>(digits).ok()
            })
            .max()
    }

    /// Get an iterator over all relationships in source order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    /// Get the number of relationships in the collection.
    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    /// Check if the collection is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }
}

impl XmlDecode for Relationships {
    fn decode<R: BufRead>(&mut self, cursor: &mut XmlCursor<R>) -> Result<()> {
        let root = cursor.read_root()?;
        if !root.is(&self.xmlns, "Relationships") {
            return Err(cursor.error(format!(
                "expected root {{{}}}Relationships, found {}",
                self.xmlns, root.name
            )));
        }
        if root.empty {
            return Ok(());
        }

        loop {
            match cursor.next_event()? {
                XmlEvent::Start(tag) => {
                    if tag.is(&self.xmlns, "Relationship") {
                        let rel = Relationship::from_tag(&tag).map_err(|msg| cursor.error(msg))?;
                        self.push(rel);
                    }
                    cursor.skip_element(&tag)?;
                },
                XmlEvent::Text(_) => {},
                XmlEvent::End => return Ok(()),
                XmlEvent::Eof => return Err(cursor.error("unclosed Relationships element")),
            }
        }
    }
}
