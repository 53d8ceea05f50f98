//! Generic, namespace-resolved XML element tree.
//!
//! Elements that the typed document model does not interpret are kept as
//! [`RawElement`] so that prefixes, namespace declarations and attribute order
//! survive for a later writer.

/// A namespace-qualified name. An empty `space` means "no namespace".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QName {
    pub space: String,
    pub local: String,
}

impl QName {
    pub fn new(space: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            space: space.into(),
            local: local.into(),
        }
    }

    /// Check whether this name is `{space}local`.
    #[inline]
    pub fn is(&self, space: &str, local: &str) -> bool {
        self.local == local && self.space == space
    }
}

impl std::fmt::Display for QName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.space.is_empty() {
            f.write_str(&self.local)
        } else {
            write!(f, "{{{}}}{}", self.space, self.local)
        }
    }
}

/// A namespace declaration (`xmlns` or `xmlns:prefix`) as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    /// `None` for the default namespace declaration
    pub prefix: Option<String>,
    pub uri: String,
}

/// A regular (non-declaration) attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QName,
    /// Prefix as written in the source, e.g. `r` for `r:embed`
    pub prefix: Option<String>,
    /// Unescaped value
    pub value: String,
}

/// Child node of a [`RawElement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(RawElement),
    Text(String),
}

/// An element kept verbatim: name, prefix, declarations, attributes and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawElement {
    pub name: QName,
    pub prefix: Option<String>,
    pub namespaces: Vec<NamespaceDecl>,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl RawElement {
    /// Check whether this element is `{space}local`.
    #[inline]
    pub fn is(&self, space: &str, local: &str) -> bool {
        self.name.is(space, local)
    }

    /// Get the value of the attribute `{space}local`.
    pub fn attribute(&self, space: &str, local: &str) -> Option<&str> {
        find_attribute(&self.attributes, space, local)
    }

    /// Iterate over direct child elements.
    pub fn elements(&self) -> impl Iterator<Item = &RawElement> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// First direct child element named `{space}local`.
    pub fn child(&self, space: &str, local: &str) -> Option<&RawElement> {
        self.elements().find(|element| element.is(space, local))
    }

    /// First descendant (depth-first, pre-order) named `{space}local`.
    pub fn descendant(&self, space: &str, local: &str) -> Option<&RawElement> {
        for element in self.elements() {
            if element.is(space, local) {
                return Some(element);
            }
            if let Some(found) = element.descendant(space, local) {
                return Some(found);
            }
        }
        None
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }

    /// Append text, merging with a trailing text node.
    ///
    /// Entity references arrive from the reader as separate events, so a single
    /// run of character data may be delivered in several pieces.
    pub(crate) fn push_text(&mut self, text: String) {
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(&text);
        } else {
            self.children.push(Node::Text(text));
        }
    }
}

pub(crate) fn find_attribute<'a>(
    attributes: &'a [Attribute],
    space: &str,
    local: &str,
) -> Option<&'a str> {
    attributes
        .iter()
        .find(|attr| attr.name.is(space, local))
        .map(|attr| attr.value.as_str())
}
