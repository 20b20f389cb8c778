//! # XML Document Access
//!
//! A thin typed layer over an `xot` tree shared by the manifest and the
//! read-only input documents (`packages.config`, project files).
//!
//! Element names are qualified with the default namespace of the root
//! element once, when the document is loaded, so callers only ever deal in
//! local names. Attributes are looked up without a namespace, which is how
//! NuGet and MSBuild documents declare them.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use xot::{NameId, NamespaceId, Node, Xot};

use crate::error::{Error, Result};

/// A parsed XML document together with its source path.
pub struct XmlDocument {
    xot: Xot,
    document: Node,
    root: Node,
    namespace: NamespaceId,
    declaration: Option<String>,
    path: PathBuf,
}

impl std::fmt::Debug for XmlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlDocument")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl XmlDocument {
    /// Read and parse the document at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text, path)
    }

    /// Parse `text`, recording `path` for error messages and saving.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let text = text.trim_start_matches('\u{feff}');
        let declaration = xml_declaration(text);

        let mut xot = Xot::new();
        let document = xot.parse(text).map_err(|e| Error::XmlParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let root = xot.document_element(document)?;
        let root_name = xot
            .element(root)
            .map(|element| element.name())
            .ok_or_else(|| Error::XmlParse {
                path: path.to_path_buf(),
                message: "document has no root element".to_string(),
            })?;
        let namespace = xot.namespace_for_name(root_name);

        Ok(Self {
            xot,
            document,
            root,
            namespace,
            declaration,
            path: path.to_path_buf(),
        })
    }

    /// The path this document was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The document (root) element.
    pub fn root(&self) -> Node {
        self.root
    }

    /// Whether `node` is an element with the given local name in the
    /// document's default namespace.
    pub fn is_named(&self, node: Node, local: &str) -> bool {
        match (self.xot.element(node), self.xot.name_ns(local, self.namespace)) {
            (Some(element), Some(name)) => element.name() == name,
            _ => false,
        }
    }

    /// Child elements of `parent` with the given local name, in document order.
    pub fn child_elements(&self, parent: Node, local: &str) -> Vec<Node> {
        self.xot
            .children(parent)
            .filter(|&child| self.is_named(child, local))
            .collect()
    }

    /// The first child element of `parent` with the given local name.
    pub fn child_element(&self, parent: Node, local: &str) -> Option<Node> {
        self.xot
            .children(parent)
            .find(|&child| self.is_named(child, local))
    }

    /// All elements below the root (including it) with the given local name.
    pub fn descendant_elements(&self, local: &str) -> Vec<Node> {
        self.xot
            .descendants(self.root)
            .filter(|&node| self.is_named(node, local))
            .collect()
    }

    /// Data of every processing instruction with the given target, in
    /// document order. Instructions inside comments are not instructions.
    pub fn processing_instructions(&self, target: &str) -> Vec<&str> {
        self.xot
            .descendants(self.document)
            .filter_map(|node| self.xot.processing_instruction(node))
            .filter(|pi| self.xot.local_name_str(pi.target()) == target)
            .map(|pi| pi.data().unwrap_or_default())
            .collect()
    }

    /// Value of the un-namespaced attribute `name` on `node`.
    pub fn attribute(&self, node: Node, name: &str) -> Option<&str> {
        let name = self.xot.name(name)?;
        self.xot.attributes(node).get(name).map(String::as_str)
    }

    /// Concatenated text of the direct text children of `node`.
    pub fn text(&self, node: Node) -> String {
        self.xot
            .children(node)
            .filter_map(|child| self.xot.text_str(child))
            .collect()
    }

    fn qualified_name(&mut self, local: &str) -> NameId {
        self.xot.add_name_ns(local, self.namespace)
    }

    /// Append a new, empty element named `local` as the last child of `parent`.
    pub fn append_element(&mut self, parent: Node, local: &str) -> Result<Node> {
        let name = self.qualified_name(local);
        let element = self.xot.new_element(name);
        self.xot.append(parent, element)?;
        Ok(element)
    }

    /// Return the child element named `local`, creating it when absent.
    pub fn get_or_create_child(&mut self, parent: Node, local: &str) -> Result<Node> {
        match self.child_element(parent, local) {
            Some(node) => Ok(node),
            None => self.append_element(parent, local),
        }
    }

    /// Set the un-namespaced attribute `name` on `node`.
    pub fn set_attribute(&mut self, node: Node, name: &str, value: &str) {
        let name = self.xot.add_name(name);
        self.xot.attributes_mut(node).insert(name, value.to_string());
    }

    /// Replace all children of `node` with a single text node.
    pub fn set_text(&mut self, node: Node, value: &str) -> Result<()> {
        let children: Vec<Node> = self.xot.children(node).collect();
        for child in children {
            self.xot.remove(child)?;
        }
        if !value.is_empty() {
            let text = self.xot.new_text(value);
            self.xot.append(node, text)?;
        }
        Ok(())
    }

    /// Serialize the whole document, keeping the source XML declaration.
    pub fn to_xml(&self) -> Result<String> {
        let body = self.xot.to_string(self.document)?;
        match &self.declaration {
            Some(declaration) if !body.trim_start().starts_with("<?xml") => {
                Ok(format!("{}\n{}", declaration, body.trim_start()))
            }
            _ => Ok(body),
        }
    }

    /// Write the document back to the path it was loaded from.
    pub fn save(&self) -> Result<()> {
        let xml = self.to_xml()?;
        fs::write(&self.path, xml)?;
        Ok(())
    }
}

fn xml_declaration(text: &str) -> Option<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"^\s*(<\?xml\s[^?]*\?>)").unwrap_or_else(|e| panic!("invalid pattern: {e}"))
        })
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}
