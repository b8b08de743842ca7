//! Mutable element tree for flat-attribute profile documents.
//!
//! Profiles are small, so the whole document is read into an [`XmlElement`]
//! tree, edited in place, and written back in full. Unknown elements and
//! attributes survive the round trip; comments and processing instructions
//! do not.

use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// One element with its attributes, text, and child elements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    /// Element name
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Trimmed text content, if any
    pub text: Option<String>,
    /// Child elements in document order
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Creates an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates an element holding only text.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Parses a document and returns its root element.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not well-formed or has no root element.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;
        let mut buf = Vec::new();

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .with_context(|| format!("Malformed XML at byte {}", reader.buffer_position()))?;

            match event {
                Event::Start(e) => stack.push(Self::from_start(&e)?),
                Event::Empty(e) => {
                    let element = Self::from_start(&e)?;
                    Self::attach(&mut stack, &mut root, element)?;
                }
                Event::Text(e) => {
                    let text = e.unescape().context("Invalid text content")?;
                    if let Some(current) = stack.last_mut() {
                        current.push_text(&text);
                    }
                }
                Event::CData(e) => {
                    let bytes = e.into_inner();
                    if let Some(current) = stack.last_mut() {
                        current.push_text(&String::from_utf8_lossy(&bytes));
                    }
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .context("Closing tag without matching opening tag")?;
                    Self::attach(&mut stack, &mut root, element)?;
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            anyhow::bail!("Unclosed element <{}>", open.name);
        }
        root.context("Document has no root element")
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let mut element = Self::new(String::from_utf8_lossy(start.name().as_ref()));
        for attr in start.attributes() {
            let attr = attr.context("Malformed attribute")?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .context("Invalid attribute value")?
                .into_owned();
            element.attributes.push((key, value));
        }
        Ok(element)
    }

    fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: Self) -> Result<()> {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(element);
        } else if root.is_none() {
            *root = Some(element);
        } else {
            anyhow::bail!("Document has more than one root element");
        }
        Ok(())
    }

    fn push_text(&mut self, text: &str) {
        match &mut self.text {
            Some(existing) => existing.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }

    /// Serializes the tree as a document with a UTF-8 declaration and
    /// two-space indentation.
    ///
    /// The output is deterministic: the same tree always produces the same bytes.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        self.write_into(&mut writer)?;
        let bytes = writer.into_inner();
        String::from_utf8(bytes).context("Serialized XML is not valid UTF-8")
    }

    fn write_into(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        let text = self.text.as_deref().filter(|t| !t.is_empty());
        if self.children.is_empty() && text.is_none() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        if let Some(text) = text {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        for child in &self.children {
            child.write_into(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }

    /// True when the element has no child elements.
    pub fn is_scalar(&self) -> bool {
        self.children.is_empty()
    }

    /// Text of this element, empty when absent.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// First child named `name`.
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.name == name)
    }

    /// First child named `name`, mutably.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Self> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    /// All children named `name`.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text of the first child named `name`.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(|c| c.text.as_deref())
    }

    /// Follows a path of child names from this element.
    pub fn descend(&self, path: &[&str]) -> Option<&Self> {
        path.iter().try_fold(self, |node, name| node.child(name))
    }

    /// Value of the attribute `key`.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets or adds the attribute `key`.
    pub fn set_attribute(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    /// Returns the first child named `name`, appending an empty one if missing.
    pub fn ensure_child(&mut self, name: &str) -> &mut Self {
        let index = match self.children.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                self.children.push(Self::new(name));
                self.children.len() - 1
            }
        };
        &mut self.children[index]
    }

    /// Sets the text of the first child named `name`, appending it if missing.
    ///
    /// Existing children of the updated node are left alone.
    pub fn set_or_create(&mut self, name: &str, value: impl Into<String>) {
        self.ensure_child(name).text = Some(value.into());
    }

    /// Replaces the first child with the same name as `element`, keeping its
    /// position, and drops any later duplicates. Appends when no such child
    /// exists.
    pub fn replace_child(&mut self, element: Self) {
        match self.children.iter().position(|c| c.name == element.name) {
            Some(index) => {
                let name = element.name.clone();
                self.children[index] = element;
                let mut seen = 0usize;
                self.children.retain(|c| {
                    if c.name != name {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.children.push(element),
        }
    }

    /// Removes every child named `name`, returning how many were removed.
    pub fn remove_children(&mut self, name: &str) -> usize {
        let before = self.children.len();
        self.children.retain(|c| c.name != name);
        before - self.children.len()
    }

    /// Concatenated text of this element and all descendants, depth-first.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            if let Some(text) = &node.text {
                out.push_str(text);
            }
            pending.extend(node.children.iter().rev());
        }
        out
    }
}
