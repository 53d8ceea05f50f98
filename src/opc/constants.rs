//! Constant values for WordprocessingML packages.
//!
//! This module contains the XML namespaces the decoder resolves names against,
//! the canonical part paths inside a .docx container, and the relationship
//! types and target modes used by the document relationship table.

/// XML namespace URIs
pub mod namespace {
    /// WordprocessingML main namespace (`w:`)
    pub const WML_MAIN: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

    /// Office relationships namespace (`r:`), used by `r:id` and `r:embed`
    pub const OFC_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

    /// DrawingML wordprocessing drawing namespace (`wp:`)
    pub const DML_WORDPROCESSING_DRAWING: &str =
        "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";

    /// Word 2010 wordprocessing drawing namespace (`wp14:`)
    pub const DML_WORDPROCESSING_DRAWING_2010: &str =
        "http://schemas.microsoft.com/office/word/2010/wordprocessingDrawing";

    /// DrawingML main namespace (`a:`), home of `a:blip`
    pub const DML_MAIN: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

    /// OPC relationships namespace, the default namespace of `.rels` parts
    pub const OPC_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships";
}

/// Canonical member paths inside a .docx container
pub mod part {
    /// Main document part
    pub const DOCUMENT: &str = "word/document.xml";

    /// Relationships of the main document part
    pub const DOCUMENT_RELS: &str = "word/_rels/document.xml.rels";

    /// Folder holding embedded media; matched as an exact, case-sensitive prefix
    pub const MEDIA_FOLDER: &str = "word/media/";
}

/// Open XML relationship target modes
pub mod target_mode {
    /// Internal relationship target mode (default)
    pub const INTERNAL: &str = "Internal";

    /// External relationship target mode (e.g., hyperlinks to external URLs)
    pub const EXTERNAL: &str = "External";
}

/// Relationship type URIs
pub mod relationship_type {
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const HYPERLINK: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
    pub const STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const NUMBERING: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
    pub const HEADER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
    pub const FOOTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
}
