//! Minimal XML tree for mapping documents.
//!
//! Holds elements, attributes, text and comments in document order, which is
//! everything a mapping document carries. Doctype and processing
//! instructions are dropped on parse; serialization always emits a fresh
//! declaration and pretty-prints with a two-space indent, so a flushed
//! document comes out uniformly formatted no matter how it was indented on
//! disk.

use quick_xml::escape::unescape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// One node in a mapping document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    Comment(String),
}

/// An element with its attributes and children, in document order. Text is
/// stored unescaped; escaping happens at serialization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

/// A parsed document: the root element plus any comments that sit outside
/// it, kept so license banners survive a rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    pub preamble: Vec<XmlNode>,
    pub root: XmlElement,
    pub trailing: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn push_element(&mut self, element: XmlElement) {
        self.children.push(XmlNode::Element(element));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(XmlNode::Text(text.into()));
    }

    /// Child elements in order, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// First child element with the given name.
    pub fn find_child(&self, name: &str) -> Option<&XmlElement> {
        self.child_elements().find(|element| element.name == name)
    }

    /// Concatenated text of the direct text children.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            if let XmlNode::Text(text) = node {
                out.push_str(text);
            }
        }
        out
    }

    /// The n-th descendant element with the given name, counting occurrences
    /// in document (pre-order) order from zero. The element itself is not a
    /// candidate.
    pub fn nth_descendant(&self, name: &str, n: usize) -> Option<&XmlElement> {
        let mut remaining = n;
        self.find_nth(name, &mut remaining)
    }

    /// Mutable variant of [`XmlElement::nth_descendant`].
    pub fn nth_descendant_mut(&mut self, name: &str, n: usize) -> Option<&mut XmlElement> {
        let mut remaining = n;
        self.find_nth_mut(name, &mut remaining)
    }

    fn find_nth(&self, name: &str, remaining: &mut usize) -> Option<&XmlElement> {
        for child in self.child_elements() {
            if child.name == name {
                if *remaining == 0 {
                    return Some(child);
                }
                *remaining -= 1;
            }
            if let Some(found) = child.find_nth(name, remaining) {
                return Some(found);
            }
        }
        None
    }

    fn find_nth_mut(&mut self, name: &str, remaining: &mut usize) -> Option<&mut XmlElement> {
        for node in &mut self.children {
            let XmlNode::Element(child) = node else {
                continue;
            };
            if child.name == name {
                if *remaining == 0 {
                    return Some(child);
                }
                *remaining -= 1;
            }
            if let Some(found) = child.find_nth_mut(name, remaining) {
                return Some(found);
            }
        }
        None
    }
}

impl XmlDocument {
    /// Serializes the document with an XML declaration, two-space indent and
    /// a trailing newline. Element text stays inline; childless elements
    /// self-close.
    pub fn to_xml_string(&self) -> Result<String, String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(|e| e.to_string())?;
        for node in &self.preamble {
            write_node(&mut writer, node)?;
        }
        write_element(&mut writer, &self.root)?;
        for node in &self.trailing {
            write_node(&mut writer, node)?;
        }
        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes).map_err(|e| e.to_string())
    }
}

/// Parses a whole document. Whitespace-only text is dropped and CDATA folds
/// into plain text.
pub fn parse_document(xml: &str) -> Result<XmlDocument, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    let mut preamble: Vec<XmlNode> = Vec::new();
    let mut trailing: Vec<XmlNode> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                stack.push(element_from_start(&start)?);
            }
            Ok(Event::Empty(start)) => {
                let element = element_from_start(&start)?;
                close_element(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let Some(element) = stack.pop() else {
                    return Err("closing tag without an open element".to_string());
                };
                close_element(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(text)) => {
                let value = text.decode().map_err(|e| e.to_string())?;
                let value = unescape(&value).map_err(|e| e.to_string())?;
                if let Some(parent) = stack.last_mut() {
                    parent.push_text(value.into_owned());
                }
            }
            Ok(Event::CData(data)) => {
                let value = String::from_utf8_lossy(data.as_ref()).into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.push_text(value);
                }
            }
            Ok(Event::Comment(comment)) => {
                let value = String::from_utf8_lossy(comment.as_ref()).into_owned();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::Comment(value)),
                    None if root.is_none() => preamble.push(XmlNode::Comment(value)),
                    None => trailing.push(XmlNode::Comment(value)),
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(e.to_string()),
        }
    }

    if !stack.is_empty() {
        return Err("document ends inside an open element".to_string());
    }
    let root = root.ok_or_else(|| "document has no root element".to_string())?;
    Ok(XmlDocument {
        preamble,
        root,
        trailing,
    })
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement, String> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| e.to_string())?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn close_element(
    stack: &mut Vec<XmlElement>,
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), String> {
    match stack.last_mut() {
        Some(parent) => parent.push_element(element),
        None => {
            if root.is_some() {
                return Err("document has more than one root element".to_string());
            }
            *root = Some(element);
        }
    }
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<(), String> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| e.to_string());
    }
    writer
        .write_event(Event::Start(start))
        .map_err(|e| e.to_string())?;
    for node in &element.children {
        write_node(writer, node)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| e.to_string())
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &XmlNode) -> Result<(), String> {
    match node {
        XmlNode::Element(element) => write_element(writer, element),
        XmlNode::Text(text) => writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(|e| e.to_string()),
        // Comments are stored raw; escaping would corrupt them.
        XmlNode::Comment(comment) => writer
            .write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))
            .map_err(|e| e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> XmlDocument {
        parse_document(xml).expect("well-formed test document")
    }

    #[test]
    fn nth_descendant_counts_in_document_order() {
        let doc = parse(
            "<map><source><rules id=\"a\"/></source><dest><rules id=\"b\"/></dest></map>",
        );
        let first = doc.root.nth_descendant("rules", 0).expect("first rules");
        let second = doc.root.nth_descendant("rules", 1).expect("second rules");
        assert_eq!(first.attributes[0].1, "a");
        assert_eq!(second.attributes[0].1, "b");
        assert!(doc.root.nth_descendant("rules", 2).is_none());
    }

    #[test]
    fn text_concatenates_direct_text_children_only() {
        let doc = parse("<field>catalog.<b>x</b>sku</field>");
        assert_eq!(doc.root.text(), "catalog.sku");
    }

    #[test]
    fn entity_references_in_text_decode_and_re_escape() {
        let doc = parse("<field>a &amp; b &lt; c</field>");
        assert_eq!(doc.root.text(), "a & b < c");
        let xml = doc.to_xml_string().expect("serialize");
        assert!(xml.contains("<field>a &amp; b &lt; c</field>"));
    }

    #[test]
    fn serialization_pretty_prints_and_inlines_text() {
        let doc = parse("<map><rules><ignore><document>a</document></ignore></rules></map>");
        let xml = doc.to_xml_string().expect("serialize");
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<map>"));
        assert!(xml.contains("    <ignore>\n      <document>a</document>\n    </ignore>"));
        assert!(xml.ends_with("</map>\n"));
    }

    #[test]
    fn childless_elements_self_close() {
        let doc = parse("<map><rules></rules></map>");
        let xml = doc.to_xml_string().expect("serialize");
        assert!(xml.contains("<rules/>"));
    }

    #[test]
    fn comments_and_attributes_round_trip() {
        let doc = parse(
            "<?xml version=\"1.0\"?><!-- banner --><map key=\"v\"><!-- inner --><a/></map>",
        );
        assert_eq!(doc.preamble.len(), 1);
        let xml = doc.to_xml_string().expect("serialize");
        assert!(xml.contains("<!-- banner -->"));
        assert!(xml.contains("<!-- inner -->"));
        assert!(xml.contains("<map key=\"v\">"));
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert!(parse_document("<map><unclosed>").is_err());
        assert!(parse_document("").is_err());
    }
}
