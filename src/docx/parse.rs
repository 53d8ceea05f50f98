//! Decoding of `word/document.xml` into the typed [`Document`] tree.
//!
//! Every element is matched on its resolved `{namespace}local` name using the
//! namespace fields of the target document, so the prefixes chosen by the
//! producing application do not matter.

use crate::docx::document::{
    Body, BodyItem, Break, DocProperties, Document, Drawing, Extent, Hyperlink, Paragraph,
    ParagraphChild, ParagraphProperties, Placement, Run, RunContent, RunProperties, Table,
    TableCell, TableRow, Text,
};
use crate::error::Result;
use crate::opc::constants::namespace;
use crate::xml::{RawElement, StartTag, XML_NAMESPACE, XmlCursor, XmlDecode, XmlEvent};
use std::io::BufRead;

/// Namespaces copied out of the target document before the body is decoded.
struct Namespaces {
    w: String,
    r: String,
    wp: String,
    wp14: String,
}

impl XmlDecode for Document {
    fn decode<R: BufRead>(&mut self, cursor: &mut XmlCursor<R>) -> Result<()> {
        let root = cursor.read_root()?;
        if root.name != self.name {
            return Err(cursor.error(format!(
                "expected root element {}, found {}",
                self.name, root.name
            )));
        }

        self.prefix = root.prefix.clone();
        self.namespaces = root.namespaces.to_vec();
        self.attributes = root.attributes.to_vec();
        if root.empty {
            return Ok(());
        }

        let ns = Namespaces {
            w: self.xmlns_w.clone(),
            r: self.xmlns_r.clone(),
            wp: self.xmlns_wp.clone(),
            wp14: self.xmlns_wp14.clone(),
        };

        loop {
            match cursor.next_event()? {
                XmlEvent::Start(tag) if tag.is(&ns.w, "body") => {
                    self.body = Body {
                        items: parse_blocks(cursor, &ns, &tag)?,
                    };
                },
                XmlEvent::Start(tag) => self.extra.push(cursor.read_element(tag)?),
                XmlEvent::Text(_) => {},
                XmlEvent::End => return Ok(()),
                XmlEvent::Eof => return Err(cursor.error("unclosed document element")),
            }
        }
    }
}

/// Parse block-level children of `w:body` or `w:tc` until the parent closes.
fn parse_blocks<R: BufRead>(
    cursor: &mut XmlCursor<R>,
    ns: &Namespaces,
    parent: &StartTag,
) -> Result<Vec<BodyItem>> {
    let mut items = Vec::new();
    if parent.empty {
        return Ok(items);
    }

    loop {
        match cursor.next_event()? {
            XmlEvent::Start(tag) => {
                let item = if tag.is(&ns.w, "p") {
                    BodyItem::Paragraph(parse_paragraph(cursor, ns, &tag)?)
                } else if tag.is(&ns.w, "tbl") {
                    BodyItem::Table(parse_table(cursor, ns, &tag)?)
                } else if tag.is(&ns.w, "sectPr") {
                    BodyItem::SectionProperties(cursor.read_element(tag)?)
                } else {
                    BodyItem::Other(cursor.read_element(tag)?)
                };
                items.push(item);
            },
            XmlEvent::Text(_) => {},
            XmlEvent::End => return Ok(items),
            XmlEvent::Eof => return Err(cursor.error(format!("unclosed element {}", parent.name))),
        }
    }
}

fn parse_paragraph<R: BufRead>(
    cursor: &mut XmlCursor<R>,
    ns: &Namespaces,
    tag: &StartTag,
) -> Result<Paragraph> {
    let mut paragraph = Paragraph::default();
    if tag.empty {
        return Ok(paragraph);
    }

    loop {
        match cursor.next_event()? {
            XmlEvent::Start(child) if child.is(&ns.w, "pPr") => {
                let element = cursor.read_element(child)?;
                paragraph.properties = Some(paragraph_properties(element, ns));
            },
            XmlEvent::Start(child) => {
                paragraph.children.push(parse_inline(cursor, ns, child)?);
            },
            XmlEvent::Text(_) => {},
            XmlEvent::End => return Ok(paragraph),
            XmlEvent::Eof => return Err(cursor.error("unclosed paragraph")),
        }
    }
}

/// Parse one inline child of a paragraph or hyperlink.
fn parse_inline<R: BufRead>(
    cursor: &mut XmlCursor<R>,
    ns: &Namespaces,
    tag: StartTag,
) -> Result<ParagraphChild> {
    if tag.is(&ns.w, "r") {
        return Ok(ParagraphChild::Run(parse_run(cursor, ns, &tag)?));
    }
    if !tag.is(&ns.w, "hyperlink") {
        return Ok(ParagraphChild::Other(cursor.read_element(tag)?));
    }

    let mut link = Hyperlink {
        r_id: tag.attribute(&ns.r, "id").map(str::to_string),
        anchor: tag.attribute(&ns.w, "anchor").map(str::to_string),
        children: Vec::new(),
    };
    if tag.empty {
        return Ok(ParagraphChild::Hyperlink(link));
    }
    loop {
        match cursor.next_event()? {
            XmlEvent::Start(child) => link.children.push(parse_inline(cursor, ns, child)?),
            XmlEvent::Text(_) => {},
            XmlEvent::End => return Ok(ParagraphChild::Hyperlink(link)),
            XmlEvent::Eof => return Err(cursor.error("unclosed hyperlink")),
        }
    }
}

fn parse_run<R: BufRead>(
    cursor: &mut XmlCursor<R>,
    ns: &Namespaces,
    tag: &StartTag,
) -> Result<Run> {
    let mut run = Run::default();
    if tag.empty {
        return Ok(run);
    }

    loop {
        match cursor.next_event()? {
            XmlEvent::Start(child) => {
                if child.is(&ns.w, "rPr") {
                    let element = cursor.read_element(child)?;
                    run.properties = Some(run_properties(element, ns));
                } else if child.is(&ns.w, "t") {
                    let preserve_space =
                        child.attribute(XML_NAMESPACE, "space") == Some("preserve");
                    let value = cursor.read_text(&child)?;
                    run.content.push(RunContent::Text(Text {
                        value,
                        preserve_space,
                    }));
                } else if child.is(&ns.w, "tab") {
                    cursor.skip_element(&child)?;
                    run.content.push(RunContent::Tab);
                } else if child.is(&ns.w, "br") {
                    let kind = child.attribute(&ns.w, "type").map(str::to_string);
                    cursor.skip_element(&child)?;
                    run.content.push(RunContent::Break(Break { kind }));
                } else if child.is(&ns.w, "drawing") {
                    let element = cursor.read_element(child)?;
                    run.content.push(RunContent::Drawing(drawing(element, ns)));
                } else {
                    run.content.push(RunContent::Other(cursor.read_element(child)?));
                }
            },
            XmlEvent::Text(_) => {},
            XmlEvent::End => return Ok(run),
            XmlEvent::Eof => return Err(cursor.error("unclosed run")),
        }
    }
}

fn parse_table<R: BufRead>(
    cursor: &mut XmlCursor<R>,
    ns: &Namespaces,
    tag: &StartTag,
) -> Result<Table> {
    let mut table = Table::default();
    if tag.empty {
        return Ok(table);
    }

    loop {
        match cursor.next_event()? {
            XmlEvent::Start(child) => {
                if child.is(&ns.w, "tblPr") {
                    table.properties = Some(cursor.read_element(child)?);
                } else if child.is(&ns.w, "tblGrid") {
                    let grid = cursor.read_element(child)?;
                    table.grid = grid
                        .elements()
                        .filter(|col| col.is(&ns.w, "gridCol"))
                        .map(|col| {
                            col.attribute(&ns.w, "w")
                                .and_then(|w| w.parse().ok())
                                .unwrap_or(0)
                        })
                        .collect();
                } else if child.is(&ns.w, "tr") {
                    table.rows.push(parse_row(cursor, ns, &child)?);
                } else {
                    log::debug!("Skipping table child {}", child.name);
                    cursor.skip_element(&child)?;
                }
            },
            XmlEvent::Text(_) => {},
            XmlEvent::End => return Ok(table),
            XmlEvent::Eof => return Err(cursor.error("unclosed table")),
        }
    }
}

fn parse_row<R: BufRead>(
    cursor: &mut XmlCursor<R>,
    ns: &Namespaces,
    tag: &StartTag,
) -> Result<TableRow> {
    let mut row = TableRow::default();
    if tag.empty {
        return Ok(row);
    }

    loop {
        match cursor.next_event()? {
            XmlEvent::Start(child) => {
                if child.is(&ns.w, "trPr") {
                    row.properties = Some(cursor.read_element(child)?);
                } else if child.is(&ns.w, "tc") {
                    row.cells.push(parse_cell(cursor, ns, &child)?);
                } else {
                    log::debug!("Skipping table row child {}", child.name);
                    cursor.skip_element(&child)?;
                }
            },
            XmlEvent::Text(_) => {},
            XmlEvent::End => return Ok(row),
            XmlEvent::Eof => return Err(cursor.error("unclosed table row")),
        }
    }
}

/// A cell is a block container whose first child may be `w:tcPr`.
fn parse_cell<R: BufRead>(
    cursor: &mut XmlCursor<R>,
    ns: &Namespaces,
    tag: &StartTag,
) -> Result<TableCell> {
    let mut content = parse_blocks(cursor, ns, tag)?;
    let position = content
        .iter()
        .position(|item| matches!(item, BodyItem::Other(el) if el.is(&ns.w, "tcPr")));
    let properties = match position.map(|pos| content.remove(pos)) {
        Some(BodyItem::Other(element)) => Some(element),
        _ => None,
    };
    Ok(TableCell { properties, content })
}

fn paragraph_properties(element: RawElement, ns: &Namespaces) -> ParagraphProperties {
    ParagraphProperties {
        style: child_val(&element, ns, "pStyle"),
        justification: child_val(&element, ns, "jc"),
        element,
    }
}

fn run_properties(element: RawElement, ns: &Namespaces) -> RunProperties {
    RunProperties {
        bold: toggle(&element, ns, "b"),
        italic: toggle(&element, ns, "i"),
        underline: child_val(&element, ns, "u"),
        color: child_val(&element, ns, "color"),
        size: child_val(&element, ns, "sz").and_then(|sz| sz.parse().ok()),
        style: child_val(&element, ns, "rStyle"),
        element,
    }
}

/// Summarize a `w:drawing` subtree.
fn drawing(element: RawElement, ns: &Namespaces) -> Drawing {
    let frame = element
        .elements()
        .find(|el| el.is(&ns.wp, "inline") || el.is(&ns.wp, "anchor"));

    let mut drawing = Drawing::default();
    if let Some(frame) = frame {
        drawing.placement = Some(if frame.name.local == "inline" {
            Placement::Inline
        } else {
            Placement::Anchor
        });
        drawing.anchor_id = frame.attribute(&ns.wp14, "anchorId").map(str::to_string);

        if let Some(extent) = frame.child(&ns.wp, "extent") {
            drawing.extent = Extent {
                cx: emu(extent.attribute("", "cx")),
                cy: emu(extent.attribute("", "cy")),
            };
        }
        if let Some(doc_pr) = frame.child(&ns.wp, "docPr") {
            drawing.doc_properties = DocProperties {
                id: doc_pr.attribute("", "id").and_then(|id| id.parse().ok()),
                name: doc_pr.attribute("", "name").unwrap_or_default().to_string(),
                description: doc_pr.attribute("", "descr").unwrap_or_default().to_string(),
            };
        }
    }
    drawing.embed = element
        .descendant(namespace::DML_MAIN, "blip")
        .and_then(|blip| blip.attribute(&ns.r, "embed"))
        .map(str::to_string);
    drawing.element = element;
    drawing
}

/// `w:val` of the first child `w:{local}`.
fn child_val(element: &RawElement, ns: &Namespaces, local: &str) -> Option<String> {
    element
        .child(&ns.w, local)?
        .attribute(&ns.w, "val")
        .map(str::to_string)
}

/// On/off property: present and not explicitly switched off.
fn toggle(element: &RawElement, ns: &Namespaces, local: &str) -> bool {
    match element.child(&ns.w, local) {
        Some(prop) => !matches!(prop.attribute(&ns.w, "val"), Some("0" | "false" | "off")),
        None => false,
    }
}

#[inline]
fn emu(value: Option<&str>) -> i64 {
    value.and_then(|v| v.parse().ok()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocxError;
    use crate::xml::{Node, decode_into};

    const DOC_OPEN: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:wpc="http://schemas.microsoft.com/office/word/2010/wordprocessingCanvas"
    xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006"
    xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"
    xmlns:wp14="http://schemas.microsoft.com/office/word/2010/wordprocessingDrawing"
    xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing"
    xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
    xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
    mc:Ignorable="wp14">"#;

    fn decode(body: &str) -> Result<Document> {
        let xml = format!("{DOC_OPEN}<w:body>{body}</w:body></w:document>");
        let mut doc = Document::default();
        doc.seed_namespaces();
        decode_into(&mut doc, "word/document.xml", xml.as_bytes())?;
        Ok(doc)
    }

    #[test]
    fn test_root_declarations_are_kept() {
        let doc = decode("").unwrap();

        assert_eq!(doc.prefix.as_deref(), Some("w"));
        assert_eq!(doc.namespaces.len(), 7);
        assert_eq!(doc.namespaces[0].prefix.as_deref(), Some("wpc"));
        assert_eq!(doc.attributes.len(), 1);
        assert_eq!(doc.attributes[0].name.local, "Ignorable");
        assert_eq!(doc.attributes[0].value, "wp14");
        assert!(doc.body.items.is_empty());
    }

    #[test]
    fn test_paragraphs_and_runs() {
        let doc = decode(
            r#"<w:p>
                <w:pPr><w:pStyle w:val="Heading1"/><w:jc w:val="center"/></w:pPr>
                <w:r><w:rPr><w:b/><w:i w:val="0"/><w:u w:val="single"/><w:sz w:val="28"/></w:rPr>
                    <w:t xml:space="preserve">Hello </w:t></w:r>
                <w:r><w:t>World</w:t><w:tab/><w:t>!</w:t><w:br w:type="page"/></w:r>
            </w:p>"#,
        )
        .unwrap();

        let p = doc.paragraphs().next().unwrap();
        assert_eq!(p.style(), Some("Heading1"));
        assert_eq!(p.properties.as_ref().unwrap().justification.as_deref(), Some("center"));
        assert_eq!(p.text(), "Hello World\t!\n");

        let first = p.runs().next().unwrap();
        let props = first.properties.as_ref().unwrap();
        assert!(props.bold);
        assert!(!props.italic);
        assert_eq!(props.underline.as_deref(), Some("single"));
        assert_eq!(props.size, Some(28));
        assert!(matches!(&first.content[0], RunContent::Text(t) if t.preserve_space));

        let second = p.runs().nth(1).unwrap();
        assert!(matches!(
            &second.content[3],
            RunContent::Break(Break { kind: Some(kind) }) if kind == "page"
        ));
    }

    #[test]
    fn test_prefix_independent_matching() {
        let xml = r#"<doc:document xmlns:doc="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <doc:body><doc:p><doc:r><doc:t>x</doc:t></doc:r></doc:p></doc:body></doc:document>"#;
        let mut doc = Document::default();
        doc.seed_namespaces();
        decode_into(&mut doc, "word/document.xml", xml.as_bytes()).unwrap();
        assert_eq!(doc.text(), "x");
    }

    #[test]
    fn test_hyperlink() {
        let doc = decode(
            r#"<w:p><w:hyperlink r:id="rId8" w:history="1"><w:r><w:t>site</w:t></w:r></w:hyperlink></w:p>"#,
        )
        .unwrap();

        let p = doc.paragraphs().next().unwrap();
        let ParagraphChild::Hyperlink(link) = &p.children[0] else {
            panic!("expected hyperlink");
        };
        assert_eq!(link.r_id.as_deref(), Some("rId8"));
        assert_eq!(p.text(), "site");
    }

    #[test]
    fn test_inline_drawing() {
        let doc = decode(
            r#"<w:p><w:r><w:drawing>
                <wp:inline distT="0" distB="0" wp14:anchorId="1A2B3C4D">
                    <wp:extent cx="914400" cy="457200"/>
                    <wp:docPr id="1" name="Picture 1" descr="A logo"/>
                    <a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">
                        <pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">
                            <pic:blipFill><a:blip r:embed="rId5"/></pic:blipFill>
                        </pic:pic>
                    </a:graphicData></a:graphic>
                </wp:inline>
            </w:drawing></w:r></w:p>"#,
        )
        .unwrap();

        let drawings = doc.drawings();
        assert_eq!(drawings.len(), 1);
        let d = drawings[0];
        assert_eq!(d.placement, Some(Placement::Inline));
        assert_eq!(d.extent, Extent { cx: 914400, cy: 457200 });
        assert_eq!(d.doc_properties.id, Some(1));
        assert_eq!(d.doc_properties.name, "Picture 1");
        assert_eq!(d.doc_properties.description, "A logo");
        assert_eq!(d.embed.as_deref(), Some("rId5"));
        assert_eq!(d.anchor_id.as_deref(), Some("1A2B3C4D"));
        assert_eq!(d.element.name.local, "drawing");
    }

    #[test]
    fn test_table() {
        let doc = decode(
            r#"<w:tbl>
                <w:tblPr><w:tblW w:w="0" w:type="auto"/></w:tblPr>
                <w:tblGrid><w:gridCol w:w="4675"/><w:gridCol w:w="4675"/></w:tblGrid>
                <w:tr>
                    <w:tc><w:tcPr><w:tcW w:w="4675" w:type="dxa"/></w:tcPr><w:p><w:r><w:t>A1</w:t></w:r></w:p></w:tc>
                    <w:tc><w:p><w:r><w:t>B1</w:t></w:r></w:p></w:tc>
                </w:tr>
            </w:tbl>
            <w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr>"#,
        )
        .unwrap();

        let table = doc.tables().next().unwrap();
        assert!(table.properties.is_some());
        assert_eq!(table.grid, vec![4675, 4675]);
        assert_eq!(table.rows.len(), 1);

        let cells = &table.rows[0].cells;
        assert_eq!(cells.len(), 2);
        assert!(cells[0].properties.is_some());
        assert_eq!(cells[0].content.len(), 1);
        assert!(cells[1].properties.is_none());
        assert_eq!(doc.text(), "A1\nB1");
        assert!(matches!(doc.body.items.last(), Some(BodyItem::SectionProperties(_))));
    }

    #[test]
    fn test_tracked_insertion_keeps_whitespace_text() {
        let doc = decode(
            r#"<w:p><w:ins w:id="1"><w:r><w:t xml:space="preserve"> </w:t></w:r></w:ins></w:p>"#,
        )
        .unwrap();

        let p = doc.paragraphs().next().unwrap();
        let ParagraphChild::Other(ins) = &p.children[0] else {
            panic!("expected raw w:ins");
        };
        assert!(ins.is(namespace::WML_MAIN, "ins"));
        let t = ins.descendant(namespace::WML_MAIN, "t").unwrap();
        assert_eq!(t.children, vec![Node::Text(" ".into())]);
        assert_eq!(ins.text(), " ");
    }

    #[test]
    fn test_unknown_content_is_preserved() {
        let doc = decode(
            r#"<w:bookmarkStart w:id="0" w:name="_GoBack"/><w:p><w:proofErr w:type="spellStart"/></w:p>"#,
        )
        .unwrap();

        let BodyItem::Other(bookmark) = &doc.body.items[0] else {
            panic!("expected raw element");
        };
        assert_eq!(bookmark.name.local, "bookmarkStart");
        assert_eq!(bookmark.prefix.as_deref(), Some("w"));

        let p = doc.paragraphs().next().unwrap();
        assert!(matches!(&p.children[0], ParagraphChild::Other(el) if el.name.local == "proofErr"));
    }

    #[test]
    fn test_wrong_root_is_rejected() {
        let mut doc = Document::default();
        doc.seed_namespaces();
        let err = decode_into(
            &mut doc,
            "word/document.xml",
            r#"<document xmlns="urn:not-wordml"><body/></document>"#.as_bytes(),
        )
        .unwrap_err();
        assert!(matches!(err, DocxError::Parse { .. }), "{err:?}");
    }

    #[test]
    fn test_unseeded_document_rejects_real_root() {
        // Without seeding, the expected root name is empty and nothing matches.
        let mut doc = Document::default();
        let xml = format!("{DOC_OPEN}</w:document>");
        assert!(decode_into(&mut doc, "word/document.xml", xml.as_bytes()).is_err());
    }

    #[test]
    fn test_malformed_body() {
        let err = decode("<w:p><w:r></w:p>").unwrap_err();
        assert!(matches!(err, DocxError::Parse { .. }), "{err:?}");
    }
}
