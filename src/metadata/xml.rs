//! Owned XML element tree with resolved namespaces.
//!
//! EDMX documents are small and digestion needs random access (associations
//! are referenced by name from navigation properties, function imports point
//! at functions declared elsewhere), so the document is read once into an
//! owned tree. Every element and attribute carries the namespace URI its
//! prefix resolved to at that point in the document.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::trace;

use super::error::DigestionError;
use crate::base::constants::XML_NS;

/// An attribute with its resolved namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    /// Namespace URI, `None` for unprefixed attributes.
    pub namespace: Option<String>,
    pub name: String,
    pub value: String,
}

/// An element with its resolved namespace, attributes and child elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub namespace: Option<String>,
    /// Local name (prefix removed).
    pub name: String,
    pub attributes: Vec<XmlAttribute>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Value of an unqualified attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.is_none() && a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Value of an attribute in a specific namespace.
    pub fn attr_ns(&self, namespace: &str, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.as_deref() == Some(namespace) && a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Value of a required unqualified attribute.
    pub fn required_attr(&self, name: &str) -> Result<&str, DigestionError> {
        self.attr(name)
            .ok_or_else(|| DigestionError::missing_attribute(&self.name, name))
    }

    /// Child elements with the given local name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First child element with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Recursively remove elements and attributes bound to any of the
    /// given namespace URIs.
    pub fn strip_namespaces(&mut self, namespaces: &[String]) {
        if namespaces.is_empty() {
            return;
        }
        let denied = |ns: &Option<String>| {
            ns.as_deref()
                .is_some_and(|ns| namespaces.iter().any(|d| d == ns))
        };
        self.attributes.retain(|a| !denied(&a.namespace));
        self.children.retain(|c| !denied(&c.namespace));
        for child in &mut self.children {
            child.strip_namespaces(namespaces);
        }
    }
}

/// Prefix bindings declared on one element; `None` is the default namespace.
type Scope = Vec<(Option<String>, String)>;

/// Read a whole document into its root element.
pub fn parse_document(input: &str) -> Result<XmlElement, DigestionError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut scopes: Vec<Scope> = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let (element, scope) = open_element(e, &scopes)?;
                scopes.push(scope);
                stack.push(element);
            }
            Ok(Event::Empty(ref e)) => {
                // Self-closing element - handle as start + end
                let (element, scope) = open_element(e, &scopes)?;
                scopes.push(scope);
                close_element(element, &mut stack, &mut root)?;
                scopes.pop();
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| DigestionError::xml("unexpected closing tag"))?;
                close_element(element, &mut stack, &mut root)?;
                scopes.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DigestionError::xml(format!(
                    "XML parse error at position {}: {e}",
                    reader.error_position()
                )));
            }
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(DigestionError::xml("unexpected end of document"));
    }
    root.ok_or_else(|| DigestionError::missing_element("document root"))
}

fn close_element(
    element: XmlElement,
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
) -> Result<(), DigestionError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(DigestionError::xml("multiple root elements")),
    }
    Ok(())
}

fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    }
}

fn resolve_prefix(
    prefix: Option<&str>,
    own: &Scope,
    scopes: &[Scope],
) -> Result<Option<String>, DigestionError> {
    if prefix == Some("xml") {
        return Ok(Some(XML_NS.to_string()));
    }
    let found = std::iter::once(own)
        .chain(scopes.iter().rev())
        .flat_map(|scope| scope.iter())
        .find(|(p, _)| p.as_deref() == prefix)
        .map(|(_, uri)| uri.clone());
    match (found, prefix) {
        (Some(uri), _) if uri.is_empty() => Ok(None),
        (Some(uri), _) => Ok(Some(uri)),
        (None, None) => Ok(None),
        (None, Some(prefix)) => Err(DigestionError::xml(format!(
            "unbound namespace prefix '{prefix}'"
        ))),
    }
}

fn open_element(e: &BytesStart<'_>, scopes: &[Scope]) -> Result<(XmlElement, Scope), DigestionError> {
    let qname = std::str::from_utf8(e.name().as_ref())
        .map_err(|e| DigestionError::xml(format!("Invalid tag name: {e}")))?
        .to_string();

    let mut scope = Scope::new();
    let mut raw_attributes = Vec::new();
    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| DigestionError::xml(format!("Attribute error: {e}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| DigestionError::xml(format!("Attribute key error: {e}")))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| DigestionError::xml(format!("Attribute value error: {e}")))?
            .to_string();

        // Capture xmlns namespace declarations
        if key == "xmlns" {
            scope.push((None, value));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            scope.push((Some(prefix.to_string()), value));
        } else {
            raw_attributes.push((key, value));
        }
    }

    let (prefix, local) = split_qname(&qname);
    let namespace = resolve_prefix(prefix, &scope, scopes)?;

    let mut attributes = Vec::with_capacity(raw_attributes.len());
    for (key, value) in raw_attributes {
        let (prefix, local) = split_qname(&key);
        // Unprefixed attributes are in no namespace.
        let namespace = match prefix {
            Some(_) => resolve_prefix(prefix, &scope, scopes)?,
            None => None,
        };
        attributes.push(XmlAttribute {
            namespace,
            name: local.to_string(),
            value,
        });
    }

    trace!(element = %qname, "read element");
    Ok((
        XmlElement {
            namespace,
            name: local.to_string(),
            attributes,
            children: Vec::new(),
        },
        scope,
    ))
}
