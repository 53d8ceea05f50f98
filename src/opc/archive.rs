//! Physical access to the members of a .docx container.
//!
//! The unpacker only needs an ordered list of named members that can each be
//! opened as a byte stream. [`PartSource`] captures exactly that, and is
//! implemented for [`zip::ZipArchive`].

use crate::error::{DocxError, Result};
use std::io::{Read, Seek};
use zip::ZipArchive;

/// An ordered collection of named, independently readable members.
pub trait PartSource {
    /// Number of members, including directory entries.
    fn part_count(&self) -> usize;

    /// Full member path at `index`, in enumeration order.
    fn part_name(&self, index: usize) -> Option<&str>;

    /// Open the member at `index` as a stream.
    ///
    /// The returned reader borrows the source; dropping it releases the member.
    fn open_part(&mut self, index: usize) -> Result<Box<dyn Read + '_>>;
}

impl<R: Read + Seek> PartSource for ZipArchive<R> {
    #[inline]
    fn part_count(&self) -> usize {
        self.len()
    }

    #[inline]
    fn part_name(&self, index: usize) -> Option<&str> {
        self.name_for_index(index)
    }

    fn open_part(&mut self, index: usize) -> Result<Box<dyn Read + '_>> {
        let part = self.name_for_index(index).unwrap_or_default().to_string();
        let file = self
            .by_index(index)
            .map_err(|source| DocxError::Open { part, source })?;
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn archive(members: &[(&str, &[u8])]) -> ZipArchive<Cursor<Vec<u8>>> {
        let mut zip_data = Vec::new();
        {
            let mut writer = ZipWriter::new(Cursor::new(&mut zip_data));
            let options = SimpleFileOptions::default();
            for (name, data) in members {
                writer.start_file(*name, options).unwrap();
                writer.write_all(data).unwrap();
            }
            writer.finish().unwrap();
        }
        ZipArchive::new(Cursor::new(zip_data)).unwrap()
    }

    #[test]
    fn test_members_in_enumeration_order() {
        let source = archive(&[("b.xml", b"<b/>"), ("a.xml", b"<a/>"), ("word/media/x.png", b"x")]);

        assert_eq!(source.part_count(), 3);
        assert_eq!(source.part_name(0), Some("b.xml"));
        assert_eq!(source.part_name(1), Some("a.xml"));
        assert_eq!(source.part_name(2), Some("word/media/x.png"));
        assert_eq!(source.part_name(3), None);
    }

    #[test]
    fn test_open_part_reads_content() {
        let mut source = archive(&[("word/document.xml", b"<w:document/>")]);

        let mut content = String::new();
        source.open_part(0).unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "<w:document/>");
    }

    #[test]
    fn test_open_missing_index_fails() {
        let mut source = archive(&[("a.xml", b"<a/>")]);
        assert!(matches!(source.open_part(5), Err(DocxError::Open { .. })));
    }
}
