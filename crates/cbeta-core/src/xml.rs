//! Owned element tree for P5 documents.
//!
//! Names are kept in Clark notation (`{uri}local`) so that namespace
//! stripping can be done as a plain rewrite of the tree afterwards.
//! Names in no namespace are stored bare.

use std::path::Path;

use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{QName, ResolveResult};

use crate::error::XmlError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    /// Attribute names in document order. Namespace declarations are not
    /// included.
    pub attributes: Vec<(String, String)>,
    /// Character data directly inside this element
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Insert or replace an attribute
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// First direct child with this tag
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Direct children with this tag, in document order
    pub fn children_named<'a>(&'a self, tag: &str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Pre-order walk over this element and everything below it
    pub fn iter(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Visit this element and every descendant mutably, parents first
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        for child in &mut self.children {
            child.walk_mut(f);
        }
    }

    fn push_text(&mut self, text: &str) {
        match &mut self.text {
            Some(existing) => existing.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
    /// Default namespace declared on the root element, if any
    pub default_namespace: Option<String>,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            root,
            default_namespace: None,
        }
    }

    pub fn parse_file(path: &Path) -> Result<Self, ParseFileError> {
        let source = std::fs::read_to_string(path).map_err(ParseFileError::Io)?;
        Self::parse_str(&source).map_err(ParseFileError::Xml)
    }

    pub fn parse_str(source: &str) -> Result<Self, XmlError> {
        let mut reader = NsReader::from_str(source);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut default_namespace = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let element = open_element(&reader, &e)?;
                    if stack.is_empty() {
                        check_single_root(&root, &element)?;
                        default_namespace = declared_default_namespace(&e)?;
                    }
                    stack.push(element);
                }
                Event::Empty(e) => {
                    let element = open_element(&reader, &e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => {
                            check_single_root(&root, &element)?;
                            default_namespace = declared_default_namespace(&e)?;
                            root = Some(element);
                        }
                    }
                }
                Event::End(_) => {
                    // quick-xml already rejects mismatched end tags
                    if let Some(element) = stack.pop() {
                        match stack.last_mut() {
                            Some(parent) => parent.children.push(element),
                            None => root = Some(element),
                        }
                    }
                }
                Event::Text(e) => {
                    if let Some(current) = stack.last_mut() {
                        current.push_text(&e.unescape()?);
                    }
                }
                Event::CData(e) => {
                    if let Some(current) = stack.last_mut() {
                        current.push_text(&String::from_utf8_lossy(&e));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(XmlError::UnexpectedEof(open.tag.clone()));
        }

        let root = root.ok_or(XmlError::NoRoot)?;
        Ok(Self {
            root,
            default_namespace,
        })
    }

    pub fn iter(&self) -> Descendants<'_> {
        self.root.iter()
    }

    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        self.root.walk_mut(f);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseFileError {
    #[error(transparent)]
    Io(std::io::Error),
    #[error(transparent)]
    Xml(XmlError),
}

fn check_single_root(root: &Option<Element>, next: &Element) -> Result<(), XmlError> {
    match root {
        Some(_) => Err(XmlError::MultipleRoots(next.tag.clone())),
        None => Ok(()),
    }
}

fn open_element(reader: &NsReader<&[u8]>, start: &BytesStart) -> Result<Element, XmlError> {
    let (resolved, local) = reader.resolve_element(start.name());
    let tag = clark_name(resolved, local.as_ref(), start.name())?;

    let mut element = Element::new(tag);
    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let (resolved, local) = reader.resolve_attribute(attr.key);
        let name = clark_name(resolved, local.as_ref(), attr.key)?;
        let value = attr.unescape_value()?;
        element.attributes.push((name, value.into_owned()));
    }

    Ok(element)
}

fn declared_default_namespace(start: &BytesStart) -> Result<Option<String>, XmlError> {
    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"xmlns" {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn clark_name(resolved: ResolveResult, local: &[u8], qname: QName) -> Result<String, XmlError> {
    let local = std::str::from_utf8(local)?;
    match resolved {
        ResolveResult::Bound(ns) => {
            let ns = std::str::from_utf8(ns.as_ref())?;
            Ok(format!("{{{ns}}}{local}"))
        }
        ResolveResult::Unbound => Ok(local.to_string()),
        ResolveResult::Unknown(_) => Err(XmlError::UnboundPrefix(
            String::from_utf8_lossy(qname.as_ref()).into_owned(),
        )),
    }
}
