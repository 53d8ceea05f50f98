//! Word document (.docx) unpacking.
//!
//! A .docx is a ZIP container. Three kinds of member matter here:
//!
//! - `word/document.xml`, decoded into a [`Document`] tree
//! - `word/_rels/document.xml.rels`, decoded into a relationship table
//! - everything under `word/media/`, kept as raw bytes in a [`MediaStore`]
//!
//! All other members are ignored.
//!
//! # Example
//!
//! ```rust,no_run
//! use docxpack::Docx;
//!
//! let docx = Docx::open("report.docx")?;
//!
//! for drawing in docx.document().drawings() {
//!     let media = drawing.embed.as_deref().and_then(|id| docx.media_for_relationship(id));
//!     if let Some(media) = media {
//!         println!("{}: {} bytes", media.name, media.len());
//!     }
//! }
//! # Ok::<(), docxpack::DocxError>(())
//! ```

pub mod document;
pub mod media;
pub mod options;
pub mod package;
mod parse;
mod unpack;

pub use document::{
    Body, BodyItem, Break, DocProperties, Document, Drawing, Extent, Hyperlink, Paragraph,
    ParagraphChild, ParagraphProperties, Placement, Run, RunContent, RunProperties, Table,
    TableCell, TableRow, Text,
};
pub use media::{Media, MediaStore};
pub use options::UnpackOptions;
pub use package::Docx;
