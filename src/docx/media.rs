//! Embedded media of a .docx container.
//!
//! Media live under `word/media/` and are referenced from the document body
//! indirectly: a drawing carries an `r:embed` relationship ID, and that
//! relationship's target (`media/image1.png`) names the media entry.

use crate::error::{DocxError, Result};
use crate::opc::constants::part;
use std::collections::HashMap;
use std::io::Read;

/// One embedded media file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    /// Member path with the `word/media/` prefix stripped, e.g. "image1.png"
    pub name: String,
    /// Raw bytes of the member
    pub data: Vec<u8>,
}

impl Media {
    /// Size of the media data in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// File extension of the media name, lowercased.
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.name.rsplit_once('.')?;
        Some(ext.to_ascii_lowercase())
    }
}

/// Ordered media entries plus a name → position index.
///
/// The index always points into `entries`; positions follow insertion order.
/// When a name is inserted twice the index moves to the newer entry and the
/// older entry stays in the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaStore {
    entries: Vec<Media>,
    index: HashMap<String, usize>,
    total_size: u64,
}

impl MediaStore {
    /// Create an empty store whose index has room for `capacity` names.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::with_capacity(capacity),
            total_size: 0,
        }
    }

    /// Append an entry and point the index at it.
    pub fn insert(&mut self, name: String, data: Vec<u8>) -> usize {
        let position = self.entries.len();
        if let Some(previous) = self.index.insert(name.clone(), position) {
            log::warn!(
                "Duplicate media name '{}': index moves from {} to {}",
                name,
                previous,
                position
            );
        }
        self.total_size += data.len() as u64;
        self.entries.push(Media { name, data });
        position
    }

    /// Look up an entry by name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Media> {
        self.index.get(name).map(|&pos| &self.entries[pos])
    }

    /// Position of `name` in [`entries`](Self::entries).
    #[inline]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// All entries in insertion order.
    #[inline]
    pub fn entries(&self) -> &[Media] {
        &self.entries
    }

    /// The name → position index.
    #[inline]
    pub fn index(&self) -> &HashMap<String, usize> {
        &self.index
    }

    /// Sum of the sizes of all entries, in bytes.
    #[inline]
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Media name for a member path, or `None` if the member is not media.
///
/// The test is an exact, case-sensitive prefix match on `word/media/` and
/// nothing else: the `word/media/` directory entry itself yields the empty
/// name.
#[inline]
pub fn media_name(member: &str) -> Option<&str> {
    member.strip_prefix(part::MEDIA_FOLDER)
}

/// Read a whole member, failing once more than `limit` bytes arrive.
///
/// At most `limit + 1` bytes are buffered.
pub(crate) fn read_limited<R: Read>(
    mut reader: R,
    member: &str,
    limit: Option<u64>,
) -> Result<Vec<u8>> {
    let read_error = |source| DocxError::Read {
        part: member.to_string(),
        source,
    };

    let mut data = Vec::new();
    match limit {
        Some(limit) => {
            reader
                .take(limit.saturating_add(1))
                .read_to_end(&mut data)
                .map_err(read_error)?;
            if data.len() as u64 > limit {
                return Err(DocxError::SizeLimitExceeded {
                    part: member.to_string(),
                    limit,
                });
            }
        },
        None => {
            reader.read_to_end(&mut data).map_err(read_error)?;
        },
    }
    Ok(data)
}
