//! Open Packaging Conventions plumbing for .docx containers.
//!
//! Covers the pieces the unpacker needs:
//!
//! - Well-known namespaces, part names and relationship types
//! - The relationship table of a part (`.rels`)
//! - Indexed access to the members of a ZIP container

pub mod archive;
pub mod constants;
pub mod rel;

// Re-export commonly used types
pub use archive::PartSource;
pub use rel::{Relationship, Relationships};
