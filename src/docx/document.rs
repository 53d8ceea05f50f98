//! Typed tree of the main document part (`word/document.xml`).
//!
//! The tree interprets the block and inline structure a consumer needs
//! (paragraphs, runs, text, drawings, tables). Everything else is kept as a
//! [`RawElement`], and property elements keep their full raw form next to the
//! extracted values, so the declarations and markup of the source survive for a
//! later writer.
//!
//! # Example
//!
//! ```rust,no_run
//! use docxpack::Docx;
//!
//! let docx = Docx::open("document.docx")?;
//! let doc = docx.document();
//!
//! println!("{}", doc.text());
//! for drawing in doc.drawings() {
//!     if let Some(r_id) = drawing.embed.as_deref() {
//!         println!("image {} -> {:?}", r_id, docx.relationships().target_of(r_id));
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::opc::constants::namespace;
use crate::xml::{Attribute, NamespaceDecl, QName, RawElement};

/// Local name of the document root element.
pub const DOCUMENT_ROOT: &str = "document";

/// The main document.
///
/// A freshly defaulted `Document` is zero-valued: no namespaces, empty root
/// name, empty body. Decoding first seeds the four namespace fields and the
/// root name with [`Document::seed_namespaces`], and the decoder resolves every
/// element against those fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// WordprocessingML namespace (`w:`)
    pub xmlns_w: String,
    /// Office relationships namespace (`r:`)
    pub xmlns_r: String,
    /// Wordprocessing drawing namespace (`wp:`)
    pub xmlns_wp: String,
    /// Word 2010 wordprocessing drawing namespace (`wp14:`)
    pub xmlns_wp14: String,
    /// Qualified name of the root element
    pub name: QName,
    /// Prefix used by the root element in the source
    pub prefix: Option<String>,
    /// Every namespace declaration on the root, in source order
    pub namespaces: Vec<NamespaceDecl>,
    /// Other root attributes (e.g. `mc:Ignorable`), in source order
    pub attributes: Vec<Attribute>,
    /// Root children other than the body (e.g. `w:background`)
    pub extra: Vec<RawElement>,
    pub body: Body,
}

impl Document {
    /// Set the namespace fields and root name to their canonical values.
    pub fn seed_namespaces(&mut self) {
        self.xmlns_w = namespace::WML_MAIN.to_string();
        self.xmlns_r = namespace::OFC_RELATIONSHIPS.to_string();
        self.xmlns_wp = namespace::DML_WORDPROCESSING_DRAWING.to_string();
        self.xmlns_wp14 = namespace::DML_WORDPROCESSING_DRAWING_2010.to_string();
        self.name = QName::new(namespace::WML_MAIN, DOCUMENT_ROOT);
    }

    /// Top-level paragraphs of the body.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.items.iter().filter_map(|item| match item {
            BodyItem::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Top-level tables of the body.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.items.iter().filter_map(|item| match item {
            BodyItem::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Plain text of the document, one line per paragraph (including paragraphs
    /// inside table cells).
    pub fn text(&self) -> String {
        let mut lines = Vec::new();
        collect_lines(&self.body.items, &mut lines);
        lines.join("\n")
    }

    /// Every drawing in the document, depth-first in document order.
    pub fn drawings(&self) -> Vec<&Drawing> {
        let mut out = Vec::new();
        collect_drawings(&self.body.items, &mut out);
        out
    }
}

/// The `w:body` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body {
    pub items: Vec<BodyItem>,
}

/// Block-level content of a body or table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyItem {
    Paragraph(Paragraph),
    Table(Table),
    SectionProperties(RawElement),
    Other(RawElement),
}

/// A `w:p` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub properties: Option<ParagraphProperties>,
    pub children: Vec<ParagraphChild>,
}

impl Paragraph {
    /// Text of all runs, including runs inside hyperlinks.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.push_text(&mut out);
        }
        out
    }

    /// Runs directly inside this paragraph.
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.children.iter().filter_map(|child| match child {
            ParagraphChild::Run(run) => Some(run),
            _ => None,
        })
    }

    /// Style ID from `w:pPr/w:pStyle`.
    pub fn style(&self) -> Option<&str> {
        self.properties.as_ref()?.style.as_deref()
    }
}

/// Extracted paragraph properties (`w:pPr`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParagraphProperties {
    pub style: Option<String>,
    pub justification: Option<String>,
    pub element: RawElement,
}

/// Inline content of a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParagraphChild {
    Run(Run),
    Hyperlink(Hyperlink),
    Other(RawElement),
}

impl ParagraphChild {
    fn push_text(&self, out: &mut String) {
        match self {
            ParagraphChild::Run(run) => run.push_text(out),
            ParagraphChild::Hyperlink(link) => {
                for child in &link.children {
                    child.push_text(out);
                }
            },
            ParagraphChild::Other(_) => {},
        }
    }
}

/// A `w:hyperlink` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hyperlink {
    /// `r:id` of an external hyperlink relationship
    pub r_id: Option<String>,
    /// `w:anchor` of an internal bookmark link
    pub anchor: Option<String>,
    pub children: Vec<ParagraphChild>,
}

/// A `w:r` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    pub properties: Option<RunProperties>,
    pub content: Vec<RunContent>,
}

impl Run {
    /// Text of this run; tabs become `\t`, breaks become `\n`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        for content in &self.content {
            match content {
                RunContent::Text(text) => out.push_str(&text.value),
                RunContent::Tab => out.push('\t'),
                RunContent::Break(_) => out.push('\n'),
                RunContent::Drawing(_) | RunContent::Other(_) => {},
            }
        }
    }
}

/// Extracted run properties (`w:rPr`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunProperties {
    pub bold: bool,
    pub italic: bool,
    /// `w:u/@w:val`, e.g. "single"
    pub underline: Option<String>,
    /// `w:color/@w:val`, hex RGB or "auto"
    pub color: Option<String>,
    /// `w:sz/@w:val`, in half-points
    pub size: Option<u32>,
    /// `w:rStyle/@w:val`
    pub style: Option<String>,
    pub element: RawElement,
}

/// Content of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunContent {
    Text(Text),
    Tab,
    Break(Break),
    Drawing(Drawing),
    Other(RawElement),
}

/// A `w:t` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    pub value: String,
    /// `xml:space="preserve"`
    pub preserve_space: bool,
}

/// A `w:br` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Break {
    /// `w:type`: "page", "column" or "textWrapping" (the default when absent)
    pub kind: Option<String>,
}

/// How a drawing is positioned relative to the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// `wp:inline`
    Inline,
    /// `wp:anchor`
    Anchor,
}

/// Size of a drawing in EMUs (English Metric Units, 1 inch = 914400 EMUs).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extent {
    pub cx: i64,
    pub cy: i64,
}

/// Non-visual properties of a drawing (`wp:docPr`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocProperties {
    pub id: Option<u32>,
    pub name: String,
    pub description: String,
}

/// A `w:drawing` element.
///
/// The summary fields are read from the subtree; `element` keeps the subtree
/// itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Drawing {
    pub placement: Option<Placement>,
    pub extent: Extent,
    pub doc_properties: DocProperties,
    /// `r:embed` of the first `a:blip`, i.e. the relationship ID of the image
    pub embed: Option<String>,
    /// `wp14:anchorId` of the inline/anchor element
    pub anchor_id: Option<String>,
    pub element: RawElement,
}

/// A `w:tbl` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub properties: Option<RawElement>,
    /// Column widths from `w:tblGrid/w:gridCol/@w:w`, in twentieths of a point
    pub grid: Vec<u32>,
    pub rows: Vec<TableRow>,
}

/// A `w:tr` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub properties: Option<RawElement>,
    pub cells: Vec<TableCell>,
}

/// A `w:tc` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCell {
    pub properties: Option<RawElement>,
    pub content: Vec<BodyItem>,
}

fn collect_lines(items: &[BodyItem], lines: &mut Vec<String>) {
    for item in items {
        match item {
            BodyItem::Paragraph(p) => lines.push(p.text()),
            BodyItem::Table(table) => {
                for cell in table.rows.iter().flat_map(|row| &row.cells) {
                    collect_lines(&cell.content, lines);
                }
            },
            BodyItem::SectionProperties(_) | BodyItem::Other(_) => {},
        }
    }
}

fn collect_drawings<'a>(items: &'a [BodyItem], out: &mut Vec<&'a Drawing>) {
    fn from_children<'a>(children: &'a [ParagraphChild], out: &mut Vec<&'a Drawing>) {
        for child in children {
            match child {
                ParagraphChild::Run(run) => {
                    out.extend(run.content.iter().filter_map(|c| match c {
                        RunContent::Drawing(d) => Some(d),
                        _ => None,
                    }));
                },
                ParagraphChild::Hyperlink(link) => from_children(&link.children, out),
                ParagraphChild::Other(_) => {},
            }
        }
    }

    for item in items {
        match item {
            BodyItem::Paragraph(p) => from_children(&p.children, out),
            BodyItem::Table(table) => {
                for cell in table.rows.iter().flat_map(|row| &row.cells) {
                    collect_drawings(&cell.content, out);
                }
            },
            BodyItem::SectionProperties(_) | BodyItem::Other(_) => {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> Run {
        Run {
            properties: None,
            content: vec![RunContent::Text(Text {
                value: text.to_string(),
                preserve_space: false,
            })],
        }
    }

    fn paragraph(children: Vec<ParagraphChild>) -> Paragraph {
        Paragraph {
            properties: None,
            children,
        }
    }

    #[test]
    fn test_seed_namespaces() {
        let mut doc = Document::default();
        assert!(doc.xmlns_w.is_empty());

        doc.seed_namespaces();
        assert_eq!(doc.xmlns_w, namespace::WML_MAIN);
        assert_eq!(doc.xmlns_r, namespace::OFC_RELATIONSHIPS);
        assert_eq!(doc.xmlns_wp, namespace::DML_WORDPROCESSING_DRAWING);
        assert_eq!(doc.xmlns_wp14, namespace::DML_WORDPROCESSING_DRAWING_2010);
        assert!(doc.name.is(namespace::WML_MAIN, "document"));
    }

    #[test]
    fn test_paragraph_text_includes_hyperlinks() {
        let mut tabbed = run("a");
        tabbed.content.push(RunContent::Tab);
        tabbed.content.push(RunContent::Break(Break::default()));

        let p = paragraph(vec![
            ParagraphChild::Run(tabbed),
            ParagraphChild::Hyperlink(Hyperlink {
                r_id: Some("rId4".into()),
                anchor: None,
                children: vec![ParagraphChild::Run(run("link"))],
            }),
        ]);
        assert_eq!(p.text(), "a\t\nlink");
        assert_eq!(p.runs().count(), 1);
    }

    #[test]
    fn test_document_text_and_drawings_walk_tables() {
        let mut with_image = run("pic");
        with_image.content.push(RunContent::Drawing(Drawing {
            embed: Some("rId9".into()),
            ..Default::default()
        }));

        let table = Table {
            properties: None,
            grid: vec![2000],
            rows: vec![TableRow {
                properties: None,
                cells: vec![TableCell {
                    properties: None,
                    content: vec![BodyItem::Paragraph(paragraph(vec![ParagraphChild::Run(
                        with_image,
                    )]))],
                }],
            }],
        };

        let doc = Document {
            body: Body {
                items: vec![
                    BodyItem::Paragraph(paragraph(vec![ParagraphChild::Run(run("first"))])),
                    BodyItem::Table(table),
                    BodyItem::SectionProperties(RawElement::default()),
                ],
            },
            ..Default::default()
        };

        assert_eq!(doc.text(), "first\npic");
        assert_eq!(doc.paragraphs().count(), 1);
        assert_eq!(doc.tables().count(), 1);

        let drawings = doc.drawings();
        assert_eq!(drawings.len(), 1);
        assert_eq!(drawings[0].embed.as_deref(), Some("rId9"));
    }
}
