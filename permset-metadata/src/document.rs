//! # Metadata Documents
//!
//! A shallow reading of a metadata XML file. Children of the root element
//! become named sections: a child with sub-elements is a record of
//! field/value pairs, a text-only child is a scalar. Anything nested deeper
//! than a record's fields is skipped.
//!
//! ```text
//! <PermissionSet>                      root
//!     <label>Sales</label>             scalar "label"
//!     <objectPermissions>              record "objectPermissions"
//!         <allowRead>true</allowRead>      field
//!         <object>Account</object>         field
//!     </objectPermissions>
//! </PermissionSet>
//! ```

use indexmap::IndexMap;
use permset_core::{AttributeValue, RawEntry, RawSource};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{MetadataError, MetadataResult};

/// Depth of the root element.
const ROOT_DEPTH: usize = 1;
/// Depth of a section element.
const SECTION_DEPTH: usize = 2;
/// Depth of a record field.
const FIELD_DEPTH: usize = 3;

/// One child of the root element.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Text-only element.
    Scalar(String),
    /// Element with field children.
    Record(RawEntry),
}

/// Parsed metadata file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataDocument {
    root: String,
    sections: IndexMap<String, Vec<Node>>,
}

impl MetadataDocument {
    /// Parse a metadata XML document.
    ///
    /// # Example
    ///
    /// ```
    /// use permset_metadata::MetadataDocument;
    ///
    /// let doc = MetadataDocument::parse(
    ///     "<PermissionSetGroup><permissionSets>Sales</permissionSets>\
    ///      <permissionSets>Service</permissionSets></PermissionSetGroup>",
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(doc.root(), "PermissionSetGroup");
    /// assert_eq!(doc.scalars("permissionSets"), vec!["Sales", "Service"]);
    /// ```
    pub fn parse(xml: &str) -> MetadataResult<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut doc = MetadataDocument::default();
        let mut depth = 0usize;
        let mut section = String::new();
        let mut field = String::new();
        let mut fields = RawEntry::new();
        let mut text = String::new();

        loop {
            let event = reader.read_event().map_err(|e| MetadataError::Xml {
                position: reader.buffer_position() as u64,
                message: e.to_string(),
            })?;

            match event {
                Event::Start(e) => {
                    depth += 1;
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    match depth {
                        ROOT_DEPTH => doc.root = name,
                        SECTION_DEPTH => {
                            section = name;
                            fields = RawEntry::new();
                            text.clear();
                        }
                        FIELD_DEPTH => {
                            field = name;
                            text.clear();
                        }
                        _ => {}
                    }
                }
                Event::Empty(e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    match depth + 1 {
                        ROOT_DEPTH => doc.root = name,
                        SECTION_DEPTH => doc.push(name, Node::Scalar(String::new())),
                        FIELD_DEPTH => {
                            fields.insert(name, AttributeValue::Text(String::new()));
                        }
                        _ => {}
                    }
                }
                Event::Text(t) => {
                    if depth == SECTION_DEPTH || depth == FIELD_DEPTH {
                        let unescaped = t.unescape().map_err(|e| MetadataError::Xml {
                            position: reader.buffer_position() as u64,
                            message: e.to_string(),
                        })?;
                        text.push_str(&unescaped);
                    }
                }
                Event::CData(c) => {
                    if depth == SECTION_DEPTH || depth == FIELD_DEPTH {
                        text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Event::End(_) => {
                    match depth {
                        SECTION_DEPTH => {
                            let node = if fields.is_empty() {
                                Node::Scalar(std::mem::take(&mut text))
                            } else {
                                Node::Record(std::mem::take(&mut fields))
                            };
                            doc.push(std::mem::take(&mut section), node);
                        }
                        FIELD_DEPTH => {
                            fields.insert(
                                std::mem::take(&mut field),
                                AttributeValue::Text(std::mem::take(&mut text)),
                            );
                        }
                        _ => {}
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(doc)
    }

    fn push(&mut self, section: String, node: Node) {
        self.sections.entry(section).or_default().push(node);
    }

    /// Name of the root element.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Check the root element.
    ///
    /// # Errors
    ///
    /// [`MetadataError::UnexpectedRoot`] when the root is not `expected`.
    pub fn expect_root(&self, expected: &'static str) -> MetadataResult<()> {
        if self.root == expected {
            Ok(())
        } else {
            Err(MetadataError::UnexpectedRoot {
                expected,
                found: self.root.clone(),
            })
        }
    }

    /// Nodes of one section, in document order.
    pub fn section(&self, name: &str) -> &[Node] {
        self.sections.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Text values of a section, skipping record nodes.
    pub fn scalars(&self, name: &str) -> Vec<&str> {
        self.section(name)
            .iter()
            .filter_map(|node| match node {
                Node::Scalar(s) => Some(s.as_str()),
                Node::Record(_) => None,
            })
            .collect()
    }

    /// Convert record sections into a [`RawSource`]; scalars are dropped.
    pub fn into_raw_source(self) -> RawSource {
        let mut source = RawSource::new();
        for (name, nodes) in self.sections {
            for node in nodes {
                if let Node::Record(entry) = node {
                    source.push(name.clone(), entry);
                }
            }
        }
        source
    }
}
