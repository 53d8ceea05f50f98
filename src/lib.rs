//! Docxpack - unpacking of Word (.docx) containers into a document model
//!
//! A .docx file is a ZIP archive. This crate walks the archive once and
//! produces a [`Docx`] holding:
//!
//! - the main document (`word/document.xml`) as a namespace-aware tree
//! - the document relationship table (`word/_rels/document.xml.rels`)
//! - every embedded media file under `word/media/`, with a name index
//! - an empty write buffer (4 MiB by default) for a later serialization stage
//!
//! Elements the typed tree does not model are kept as raw elements, so no
//! markup is lost during decoding.
//!
//! # Example
//!
//! ```no_run
//! use docxpack::Docx;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let docx = Docx::open("document.docx")?;
//!
//! println!("Document text: {}", docx.document().text());
//! for rel in docx.relationships().iter() {
//!     println!("{} -> {}", rel.id, rel.target);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Size limits
//!
//! ```no_run
//! use docxpack::{Docx, UnpackOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = UnpackOptions::new().with_max_total_media_size(32 * 1024 * 1024);
//! let docx = Docx::open_with_options("untrusted.docx", &options)?;
//! println!("{} media files", docx.media_entries().len());
//! # Ok(())
//! # }
//! ```

pub mod docx;
pub mod error;
pub mod opc;
pub mod xml;

pub use docx::{Document, Docx, Media, UnpackOptions};
pub use error::{DocxError, Result};
pub use opc::{PartSource, Relationship, Relationships};
