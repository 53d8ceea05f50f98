use crate::docx::document::Document;
use crate::docx::media::{Media, MediaStore};
use crate::docx::options::UnpackOptions;
/// Package implementation for Word documents.
use crate::error::Result;
use crate::opc::constants::{part, relationship_type};
use crate::opc::rel::{Relationship, Relationships};
use std::collections::HashMap;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// An unpacked Word (.docx) document.
///
/// Owns the decoded main document, the document relationship table, the
/// embedded media with their name index, and a pre-sized write buffer for a
/// later serialization stage. Nothing in this crate writes to the buffer.
///
/// # Examples
///
/// ```rust,no_run
/// use docxpack::Docx;
///
/// let docx = Docx::open("document.docx")?;
/// println!("{} paragraphs", docx.document().paragraphs().count());
///
/// for media in docx.media_entries() {
///     println!("{}: {} bytes", media.name, media.len());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Docx {
    pub(crate) document: Document,
    pub(crate) relationships: Relationships,
    pub(crate) media: MediaStore,
    pub(crate) buffer: Vec<u8>,
}

impl Docx {
    /// Open and unpack a .docx file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a ZIP archive, or
    /// one of its parts fails to decode.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, &UnpackOptions::default())
    }

    /// Open and unpack a .docx file with explicit options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: &UnpackOptions) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader_with_options(BufReader::new(file), options)
    }

    /// Unpack a .docx from a reader.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use docxpack::Docx;
    /// use std::io::Cursor;
    ///
    /// let data = std::fs::read("document.docx")?;
    /// let docx = Docx::from_reader(Cursor::new(data))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, &UnpackOptions::default())
    }

    /// Unpack a .docx from a reader with explicit options.
    pub fn from_reader_with_options<R: Read + Seek>(
        reader: R,
        options: &UnpackOptions,
    ) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        Self::unpack(&mut archive, options)
    }

    /// Unpack a .docx held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(data))
    }

    /// Get the main document.
    #[inline]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Get the main document for modification.
    #[inline]
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Get the relationship table of the main document.
    #[inline]
    pub fn relationships(&self) -> &Relationships {
        &self.relationships
    }

    /// All media entries in archive order.
    #[inline]
    pub fn media_entries(&self) -> &[Media] {
        self.media.entries()
    }

    /// The media name → position index.
    #[inline]
    pub fn media_index(&self) -> &HashMap<String, usize> {
        self.media.index()
    }

    /// Look up a media entry by name (e.g. "image1.png").
    #[inline]
    pub fn media(&self, name: &str) -> Option<&Media> {
        self.media.get(name)
    }

    /// Resolve a relationship ID (such as a drawing's `r:embed`) to its media entry.
    ///
    /// The target is taken relative to `word/`, so `media/image1.png` names the
    /// entry "image1.png". External relationships never resolve.
    pub fn media_for_relationship(&self, r_id: &str) -> Option<&Media> {
        let rel = self.relationships.get(r_id)?;
        if rel.is_external() {
            return None;
        }
        let target = rel.target.trim_start_matches("./");
        let media_folder = part::MEDIA_FOLDER.trim_start_matches("word/");
        let name = target
            .strip_prefix(media_folder)
            .or_else(|| target.strip_prefix('/')?.strip_prefix(part::MEDIA_FOLDER))?;
        self.media.get(name)
    }

    /// Image relationships of the document, in table order.
    pub fn image_relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.of_type(relationship_type::IMAGE)
    }

    /// Buffer reserved for re-serialization.
    #[inline]
    pub fn write_buffer(&self) -> &Vec<u8> {
        &self.buffer
    }

    /// Mutable access to the buffer reserved for re-serialization.
    #[inline]
    pub fn write_buffer_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buffer
    }
}
