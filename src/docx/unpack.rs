//! Walk of a .docx container into a [`Docx`].
//!
//! Every member is classified independently against every rule: it may be the
//! relationship part, the document part, and/or a media file. Members are
//! handled strictly one at a time in archive order; the first failure aborts
//! the walk. Each member stream is dropped before the next step runs, on both
//! the success and the error path.

use crate::docx::document::Document;
use crate::docx::media::{MediaStore, media_name, read_limited};
use crate::docx::options::UnpackOptions;
use crate::docx::package::Docx;
use crate::error::Result;
use crate::opc::archive::PartSource;
use crate::opc::constants::part;
use crate::opc::rel::Relationships;
use crate::xml::decode_into;
use std::io::BufReader;

/// Roles a single archive member plays; not mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PartRoles<'a> {
    relationships: bool,
    document: bool,
    media: Option<&'a str>,
}

impl<'a> PartRoles<'a> {
    fn classify(member: &'a str) -> Self {
        Self {
            relationships: member == part::DOCUMENT_RELS,
            document: member == part::DOCUMENT,
            media: media_name(member),
        }
    }
}

impl Docx {
    /// Unpack every relevant member of `source` into a new document model.
    ///
    /// Missing parts are not an error: an archive without a document part
    /// yields an empty (zero-valued) [`Document`], and one without a
    /// relationship part an empty table.
    ///
    /// # Errors
    ///
    /// The first open, read, size or XML failure is returned as is; no model
    /// is produced in that case.
    pub fn unpack<S>(source: &mut S, options: &UnpackOptions) -> Result<Self>
    where
        S: PartSource + ?Sized,
    {
        let mut docx = Docx {
            media: MediaStore::with_capacity(options.media_capacity),
            ..Default::default()
        };

        for index in 0..source.part_count() {
            let Some(member) = source.part_name(index).map(str::to_string) else {
                log::warn!("Archive member {} has no name, skipping", index);
                continue;
            };
            let roles = PartRoles::classify(&member);

            if roles.relationships {
                docx.parse_relationships(source, index, &member)?;
            }
            if roles.document {
                docx.parse_document(source, index, &member)?;
            }
            if let Some(name) = roles.media {
                docx.extract_media(source, index, &member, name, options)?;
            }
        }

        docx.buffer = Vec::with_capacity(options.write_buffer_capacity);
        log::debug!(
            "Unpacked docx: {} relationships, {} media entries ({} bytes)",
            docx.relationships.len(),
            docx.media.len(),
            docx.media.total_size()
        );
        Ok(docx)
    }

    fn parse_relationships<S>(&mut self, source: &mut S, index: usize, member: &str) -> Result<()>
    where
        S: PartSource + ?Sized,
    {
        log::debug!("Parsing relationships from {}", member);
        let stream = source.open_part(index)?;

        let mut rels = Relationships::default();
        rels.seed_namespace();
        decode_into(&mut rels, member, BufReader::new(stream))?;
        self.relationships = rels;
        Ok(())
    }

    fn parse_document<S>(&mut self, source: &mut S, index: usize, member: &str) -> Result<()>
    where
        S: PartSource + ?Sized,
    {
        log::debug!("Parsing document from {}", member);
        let stream = source.open_part(index)?;

        let mut document = Document::default();
        document.seed_namespaces();
        decode_into(&mut document, member, BufReader::new(stream))?;
        self.document = document;
        Ok(())
    }

    fn extract_media<S>(
        &mut self,
        source: &mut S,
        index: usize,
        member: &str,
        name: &str,
        options: &UnpackOptions,
    ) -> Result<()>
    where
        S: PartSource + ?Sized,
    {
        let stream = source.open_part(index)?;
        let limit = options.media_limit(self.media.total_size());
        let data = read_limited(stream, member, limit)?;

        log::trace!("Extracted media {} ({} bytes)", name, data.len());
        self.media.insert(name.to_string(), data);
        Ok(())
    }
}
