//! Thin helpers over `xml-rs` shared by the manifest parser, the baseline
//! store and the XML/HTML reporters.

use crate::errors::{ParseCause, PermCheckError, Result};
use std::io::Read;
use std::path::Path;
use xml::attribute::OwnedAttribute;
use xml::common::XmlVersion;
use xml::name::OwnedName;
use xml::reader::{EventReader, ParserConfig, XmlEvent as ReadEvent};
use xml::writer::{EmitterConfig, EventWriter, XmlEvent as WriteEvent};

/// Fail fast unless `path` carries the extension `ext` (case-insensitive)
///
/// Checked at construction time of baseline stores and reporters, before any I/O.
pub fn ensure_extension(path: &Path, ext: &str, what: &str) -> Result<()> {
    let matches = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false);
    if matches {
        Ok(())
    } else {
        Err(PermCheckError::Configuration {
            reason: format!(
                "The {} has to be a .{} file, got {}",
                what,
                ext,
                path.display()
            ),
        })
    }
}

/// Minimal element tree; text, comments and processing instructions are dropped
#[derive(Debug, Clone)]
pub struct XmlElement {
    pub name: OwnedName,
    pub attributes: Vec<OwnedAttribute>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn local_name(&self) -> &str {
        &self.name.local_name
    }

    /// True for an un-prefixed element called `local`
    pub fn is(&self, local: &str) -> bool {
        self.name.prefix.is_none() && self.name.local_name == local
    }

    /// Un-namespaced attribute value
    pub fn attribute(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.namespace.is_none() && a.name.local_name == local)
            .map(|a| a.value.as_str())
    }

    /// Attribute value in namespace `ns`
    pub fn attribute_ns(&self, ns: &str, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.namespace.as_deref() == Some(ns) && a.name.local_name == local)
            .map(|a| a.value.as_str())
    }

    /// All descendants in document order (excluding `self`)
    pub fn descendants(&self) -> Vec<&XmlElement> {
        let mut out = Vec::new();
        for child in &self.children {
            child.collect_into(&mut out);
        }
        out
    }

    fn collect_into<'a>(&'a self, out: &mut Vec<&'a XmlElement>) {
        out.push(self);
        for child in &self.children {
            child.collect_into(out);
        }
    }
}

/// Parse a whole document into its root element
pub fn read_document<R: Read>(source: R) -> std::result::Result<XmlElement, ParseCause> {
    let config = ParserConfig::new()
        .trim_whitespace(true)
        .ignore_comments(true);
    let reader = EventReader::new_with_config(source, config);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root = None;
    for event in reader {
        match event? {
            ReadEvent::StartElement {
                name, attributes, ..
            } => stack.push(XmlElement {
                name,
                attributes,
                children: Vec::new(),
            }),
            ReadEvent::EndElement { .. } => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ParseCause::Structure("unbalanced end element".to_string()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            _ => {}
        }
    }

    root.ok_or_else(|| ParseCause::Structure("document has no root element".to_string()))
}

/// Indented document writer
///
/// Four-space indentation, one element per line, trailing newline. Output is a
/// pure function of the write calls, which keeps reports and baselines
/// byte-for-byte reproducible.
pub struct XmlDocumentWriter {
    writer: EventWriter<Vec<u8>>,
    target: String,
}

impl XmlDocumentWriter {
    /// `target` names the document in serialization errors
    pub fn new(target: impl Into<String>, with_declaration: bool) -> Result<Self> {
        let writer = EmitterConfig::new()
            .perform_indent(true)
            .indent_string("    ")
            .write_document_declaration(with_declaration)
            .create_writer(Vec::new());
        let mut doc = Self {
            writer,
            target: target.into(),
        };
        if with_declaration {
            doc.write(WriteEvent::StartDocument {
                version: XmlVersion::Version10,
                encoding: Some("UTF-8"),
                standalone: None,
            })?;
        }
        Ok(doc)
    }

    fn write<'a, E: Into<WriteEvent<'a>>>(&mut self, event: E) -> Result<()> {
        self.writer
            .write(event)
            .map_err(|source| PermCheckError::Serialization {
                target: self.target.clone(),
                source,
            })
    }

    /// Open an element with attributes in the given order
    pub fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let mut builder = WriteEvent::start_element(name);
        for (key, value) in attributes {
            builder = builder.attr(*key, value);
        }
        self.write(builder)
    }

    pub fn end(&mut self) -> Result<()> {
        self.write(WriteEvent::end_element())
    }

    /// Element with attributes and no content
    pub fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        self.start(name, attributes)?;
        self.end()
    }

    /// Element whose only content is escaped text
    pub fn text_element(&mut self, name: &str, attributes: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attributes)?;
        self.write(WriteEvent::characters(text))?;
        self.end()
    }

    /// Finish the document and return its bytes
    pub fn finish(self) -> Vec<u8> {
        let mut bytes = self.writer.into_inner();
        bytes.push(b'\n');
        bytes
    }
}
