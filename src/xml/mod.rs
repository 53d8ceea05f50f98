//! Namespace-aware XML decoding on top of quick-xml's `NsReader`.
//!
//! [`XmlCursor`] turns the borrowed, prefix-based event stream of quick-xml into
//! owned events whose element and attribute names are already resolved to
//! namespace URIs. Typed structures implement [`XmlDecode`] and pull events from
//! the cursor; anything they do not interpret can be captured as a
//! [`RawElement`] with [`XmlCursor::read_element`].

pub mod element;

pub use element::{Attribute, NamespaceDecl, Node, QName, RawElement};

use crate::error::{DocxError, Result};
use element::find_attribute;
use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use smallvec::SmallVec;
use std::io::BufRead;

/// Namespace bound to the reserved `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A decoded start (or empty) tag.
#[derive(Debug, Clone)]
pub struct StartTag {
    pub name: QName,
    pub prefix: Option<String>,
    pub namespaces: SmallVec<[NamespaceDecl; 4]>,
    pub attributes: SmallVec<[Attribute; 4]>,
    /// `true` for `<tag/>`: no children and no matching end event follow
    pub empty: bool,
}

impl StartTag {
    #[inline]
    pub fn is(&self, space: &str, local: &str) -> bool {
        self.name.is(space, local)
    }

    /// Get the value of the attribute `{space}local`.
    pub fn attribute(&self, space: &str, local: &str) -> Option<&str> {
        find_attribute(&self.attributes, space, local)
    }
}

/// Owned XML event with resolved names.
#[derive(Debug, Clone)]
pub enum XmlEvent {
    Start(StartTag),
    End,
    Text(String),
    Eof,
}

/// Streaming cursor over one XML part.
pub struct XmlCursor<R> {
    reader: NsReader<R>,
    buf: Vec<u8>,
    part: String,
}

impl<R: BufRead> XmlCursor<R> {
    /// Create a cursor over `reader`; `part` names the source in errors.
    pub fn new(part: &str, reader: R) -> Self {
        Self {
            reader: NsReader::from_reader(reader),
            buf: Vec::with_capacity(1024),
            part: part.to_string(),
        }
    }

    /// Name of the part being decoded.
    #[inline]
    pub fn part(&self) -> &str {
        &self.part
    }

    /// Build a parse error for the current part.
    pub fn error(&self, message: impl std::fmt::Display) -> DocxError {
        DocxError::parse(&self.part, message)
    }

    /// Read the next significant event.
    ///
    /// Declarations, comments, processing instructions and doctypes are skipped.
    /// Character and entity references are returned already unescaped.
    pub fn next_event(&mut self) -> Result<XmlEvent> {
        loop {
            self.buf.clear();
            let part = &self.part;
            let event = self
                .reader
                .read_event_into(&mut self.buf)
                .map_err(|e| DocxError::from_xml(part, e))?;

            match event {
                Event::Start(e) => {
                    return Ok(XmlEvent::Start(resolve_start(&self.reader, part, &e, false)?));
                },
                Event::Empty(e) => {
                    return Ok(XmlEvent::Start(resolve_start(&self.reader, part, &e, true)?));
                },
                Event::End(_) => return Ok(XmlEvent::End),
                Event::Text(e) => {
                    let raw = utf8(&e, part)?;
                    let text = quick_xml::escape::unescape(raw)
                        .map_err(|err| DocxError::parse(part, err))?;
                    return Ok(XmlEvent::Text(text.into_owned()));
                },
                Event::CData(e) => {
                    return Ok(XmlEvent::Text(utf8(&e, part)?.to_string()));
                },
                Event::GeneralRef(e) => {
                    let entity = format!("&{};", utf8(&e, part)?);
                    let text = quick_xml::escape::unescape(&entity)
                        .map_err(|err| DocxError::parse(part, err))?;
                    return Ok(XmlEvent::Text(text.into_owned()));
                },
                Event::Eof => return Ok(XmlEvent::Eof),
                _ => {},
            }
        }
    }

    /// Advance to the document element and return its start tag.
    pub fn read_root(&mut self) -> Result<StartTag> {
        loop {
            match self.next_event()? {
                XmlEvent::Start(tag) => return Ok(tag),
                XmlEvent::Text(text) if text.trim().is_empty() => {},
                XmlEvent::Text(_) => return Err(self.error("text content before root element")),
                XmlEvent::End => return Err(self.error("unexpected end tag before root element")),
                XmlEvent::Eof => return Err(self.error("no root element")),
            }
        }
    }

    /// Consume the content and end tag of an element whose start tag was just read.
    pub fn skip_element(&mut self, tag: &StartTag) -> Result<()> {
        if tag.empty {
            return Ok(());
        }
        let mut depth = 1usize;
        while depth > 0 {
            match self.next_event()? {
                XmlEvent::Start(child) if !child.empty => depth += 1,
                XmlEvent::End => depth -= 1,
                XmlEvent::Eof => return Err(self.unclosed(tag)),
                _ => {},
            }
        }
        Ok(())
    }

    /// Capture the element whose start tag was just read as a [`RawElement`].
    pub fn read_element(&mut self, tag: StartTag) -> Result<RawElement> {
        let empty = tag.empty;
        let mut element = RawElement {
            name: tag.name,
            prefix: tag.prefix,
            namespaces: tag.namespaces.into_vec(),
            attributes: tag.attributes.into_vec(),
            children: Vec::new(),
        };
        if empty {
            return Ok(element);
        }

        loop {
            match self.next_event()? {
                XmlEvent::Start(child) => {
                    let child = self.read_element(child)?;
                    element.children.push(Node::Element(child));
                },
                XmlEvent::Text(text) => element.push_text(text),
                XmlEvent::End => return Ok(element),
                XmlEvent::Eof => {
                    return Err(self.error(format!("unclosed element {}", element.name)));
                },
            }
        }
    }

    /// Read the character content of a text-only element, such as `<w:t>`.
    ///
    /// Nested elements are skipped; whitespace is preserved exactly.
    pub fn read_text(&mut self, tag: &StartTag) -> Result<String> {
        let mut text = String::new();
        if tag.empty {
            return Ok(text);
        }
        loop {
            match self.next_event()? {
                XmlEvent::Text(chunk) => text.push_str(&chunk),
                XmlEvent::Start(child) => self.skip_element(&child)?,
                XmlEvent::End => return Ok(text),
                XmlEvent::Eof => return Err(self.unclosed(tag)),
            }
        }
    }

    fn unclosed(&self, tag: &StartTag) -> DocxError {
        self.error(format!("unclosed element {}", tag.name))
    }
}

/// A structure that can populate itself from an XML part.
///
/// Implementors may rely on fields set before decoding (for example namespace
/// URIs) to decide which resolved names they accept.
pub trait XmlDecode {
    fn decode<R: BufRead>(&mut self, cursor: &mut XmlCursor<R>) -> Result<()>;
}

/// Decode the XML in `reader` into `target`.
pub fn decode_into<T, R>(target: &mut T, part: &str, reader: R) -> Result<()>
where
    T: XmlDecode + ?Sized,
    R: BufRead,
{
    let mut cursor = XmlCursor::new(part, reader);
    target.decode(&mut cursor)
}

fn resolve_start<R>(
    reader: &NsReader<R>,
    part: &str,
    start: &BytesStart<'_>,
    empty: bool,
) -> Result<StartTag> {
    let qname = start.name();
    let (ns, local) = reader.resolver().resolve_element(qname);
    let name = QName::new(namespace_uri(ns, part)?, utf8(local.as_ref(), part)?);
    let prefix = match qname.prefix() {
        Some(prefix) => Some(utf8(prefix.as_ref(), part)?.to_string()),
        None => None,
    };

    let mut namespaces = SmallVec::new();
    let mut attributes = SmallVec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| DocxError::parse(part, e))?;
        let value = attr
            .decode_and_unescape_value(reader.decoder())
            .map_err(|e| DocxError::parse(part, e))?
            .into_owned();

        let key = attr.key.as_ref();
        if key == b"xmlns" {
            namespaces.push(NamespaceDecl { prefix: None, uri: value });
            continue;
        }
        if let Some(declared) = key.strip_prefix(b"xmlns:") {
            namespaces.push(NamespaceDecl {
                prefix: Some(utf8(declared, part)?.to_string()),
                uri: value,
            });
            continue;
        }

        let attr_prefix = match attr.key.prefix() {
            Some(prefix) => Some(utf8(prefix.as_ref(), part)?.to_string()),
            None => None,
        };
        let (ns, local) = reader.resolver().resolve_attribute(attr.key);
        let space = if attr_prefix.as_deref() == Some("xml") {
            XML_NAMESPACE.to_string()
        } else {
            namespace_uri(ns, part)?
        };
        attributes.push(Attribute {
            name: QName::new(space, utf8(local.as_ref(), part)?),
            prefix: attr_prefix,
            value,
        });
    }

    Ok(StartTag {
        name,
        prefix,
        namespaces,
        attributes,
        empty,
    })
}

/// Resolved namespace URI, or an empty string when unbound.
///
/// An undeclared prefix is tolerated and treated as "no namespace"; callers that
/// require a namespace reject the element by comparing resolved names.
fn namespace_uri(ns: ResolveResult<'_>, part: &str) -> Result<String> {
    match ns {
        ResolveResult::Bound(ns) => Ok(utf8(ns.as_ref(), part)?.to_string()),
        ResolveResult::Unbound | ResolveResult::Unknown(_) => Ok(String::new()),
    }
}

#[inline]
fn utf8<'a>(bytes: &'a [u8], part: &str) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|e| DocxError::parse(part, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

    fn cursor(xml: &str) -> XmlCursor<&[u8]> {
        XmlCursor::new("test.xml", xml.as_bytes())
    }

    #[test]
    fn test_root_names_are_resolved() {
        let xml = format!(
            r#"<?xml version="1.0"?><w:document xmlns:w="{W}" xmlns:mc="urn:mc" mc:Ignorable="w14"/>"#
        );
        let mut c = cursor(&xml);
        let root = c.read_root().unwrap();

        assert!(root.is(W, "document"));
        assert_eq!(root.prefix.as_deref(), Some("w"));
        assert!(root.empty);
        assert_eq!(root.namespaces.len(), 2);
        assert_eq!(root.namespaces[0].prefix.as_deref(), Some("w"));
        assert_eq!(root.attribute("urn:mc", "Ignorable"), Some("w14"));
    }

    #[test]
    fn test_default_namespace_applies_to_elements_only() {
        let mut c =
            cursor(r#"<Relationships xmlns="urn:rels"><Relationship Id="rId1"/></Relationships>"#);
        let root = c.read_root().unwrap();
        assert!(root.is("urn:rels", "Relationships"));

        let XmlEvent::Start(child) = c.next_event().unwrap() else {
            panic!("expected child start");
        };
        assert!(child.is("urn:rels", "Relationship"));
        assert_eq!(child.attribute("", "Id"), Some("rId1"));
    }

    #[test]
    fn test_read_text_unescapes_entities() {
        let xml =
            format!(r#"<w:t xmlns:w="{W}" xml:space="preserve"> Tom &amp; Jerry &#x41; </w:t>"#);
        let mut c = cursor(&xml);
        let root = c.read_root().unwrap();
        assert_eq!(root.attribute(XML_NAMESPACE, "space"), Some("preserve"));
        assert_eq!(c.read_text(&root).unwrap(), " Tom & Jerry A ");
    }

    #[test]
    fn test_read_element_keeps_structure() {
        let xml = format!(
            r#"<w:sectPr xmlns:w="{W}"><w:pgSz w:w="12240" w:h="15840"/><w:cols w:space="720"/></w:sectPr>"#
        );
        let mut c = cursor(&xml);
        let root = c.read_root().unwrap();
        let element = c.read_element(root).unwrap();

        assert_eq!(element.elements().count(), 2);
        assert_eq!(element.child(W, "pgSz").unwrap().attribute(W, "w"), Some("12240"));
        assert!(element.children.iter().all(|n| matches!(n, Node::Element(_))));
    }

    #[test]
    fn test_read_element_keeps_whitespace_text() {
        let xml = format!(
            "<w:ins xmlns:w=\"{W}\">\n  <w:r><w:t xml:space=\"preserve\"> </w:t></w:r>\n</w:ins>"
        );
        let mut c = cursor(&xml);
        let root = c.read_root().unwrap();
        let element = c.read_element(root).unwrap();

        assert_eq!(element.children.len(), 3);
        assert_eq!(element.children[0], Node::Text("\n  ".into()));
        assert_eq!(element.children[2], Node::Text("\n".into()));
        let t = element.descendant(W, "t").unwrap();
        assert_eq!(t.children, vec![Node::Text(" ".into())]);
    }

    #[test]
    fn test_skip_element_handles_nesting() {
        let mut c = cursor("<a><b><b/><c>text</c></b><d/></a>");
        let _root = c.read_root().unwrap();
        let XmlEvent::Start(b) = c.next_event().unwrap() else {
            panic!("expected <b>");
        };
        c.skip_element(&b).unwrap();
        let XmlEvent::Start(d) = c.next_event().unwrap() else {
            panic!("expected <d>");
        };
        assert_eq!(d.name.local, "d");
    }

    #[test]
    fn test_malformed_xml_is_parse_error() {
        let mut c = cursor("<a><b></a>");
        let root = c.read_root().unwrap();
        let err = c.read_element(root).unwrap_err();
        assert!(matches!(err, DocxError::Parse { .. }), "{err:?}");
    }

    #[test]
    fn test_empty_input_has_no_root() {
        let err = cursor("  ").read_root().unwrap_err();
        assert!(matches!(err, DocxError::Parse { .. }));
    }
}
