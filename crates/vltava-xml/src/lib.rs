#![forbid(unsafe_code)]

//! XML helpers for the Vltava client: parsing options, namespaced element
//! lookup, ID-attribute maps, and byte-offset utilities for editing
//! serialized envelopes in place.

pub mod splice;
pub mod writer;

pub use writer::XmlWriter;

use std::collections::HashMap;
use vltava_core::Error;

/// Return roxmltree parsing options for broker traffic.
///
/// DTDs are rejected: every document this client parses comes off the wire
/// or out of a signing pipeline, and none of the broker schemas use them.
pub fn parsing_options() -> roxmltree::ParsingOptions {
    roxmltree::ParsingOptions::default()
}

/// Parse an XML string, mapping the error into the workspace taxonomy.
pub fn parse(text: &str) -> Result<roxmltree::Document<'_>, Error> {
    roxmltree::Document::parse_with_options(text, parsing_options())
        .map_err(|e| Error::XmlParse(e.to_string()))
}

/// Find the first element in document order with the given namespace and
/// local name.
pub fn find_element<'a>(
    doc: &'a roxmltree::Document<'a>,
    ns_uri: &str,
    local_name: &str,
) -> Option<roxmltree::Node<'a, 'a>> {
    doc.descendants().find(|n| is_element(*n, ns_uri, local_name))
}

/// Find the first descendant of `node` with the given namespace and local name.
pub fn find_descendant<'a>(
    node: roxmltree::Node<'a, 'a>,
    ns_uri: &str,
    local_name: &str,
) -> Option<roxmltree::Node<'a, 'a>> {
    node.descendants()
        .filter(|n| n.id() != node.id())
        .find(|n| is_element(*n, ns_uri, local_name))
}

/// Find the first direct child of `parent` with the given namespace and
/// local name.
pub fn find_child<'a>(
    parent: roxmltree::Node<'a, 'a>,
    ns_uri: &str,
    local_name: &str,
) -> Option<roxmltree::Node<'a, 'a>> {
    parent.children().find(|n| is_element(*n, ns_uri, local_name))
}

/// Collect all direct children of `parent` with the given namespace and
/// local name.
pub fn find_children<'a>(
    parent: roxmltree::Node<'a, 'a>,
    ns_uri: &str,
    local_name: &str,
) -> Vec<roxmltree::Node<'a, 'a>> {
    parent
        .children()
        .filter(|n| is_element(*n, ns_uri, local_name))
        .collect()
}

/// The trimmed text content of an element, if any.
pub fn element_text<'a>(node: roxmltree::Node<'a, 'a>) -> Option<&'a str> {
    node.text().map(str::trim).filter(|t| !t.is_empty())
}

fn is_element(n: roxmltree::Node<'_, '_>, ns_uri: &str, local_name: &str) -> bool {
    n.is_element()
        && n.tag_name().name() == local_name
        && n.tag_name().namespace().unwrap_or("") == ns_uri
}

/// Build an ID-value → node map over a parsed document.
///
/// The default `Id`/`ID`/`id` names are always registered; callers add
/// profile-specific names such as `wsu:Id` via `extra_attrs`.
pub fn build_id_map<'a>(
    doc: &'a roxmltree::Document<'a>,
    extra_attrs: &[(&str, &str)],
) -> HashMap<String, roxmltree::NodeId> {
    let default_attrs = ["Id", "ID", "id"];
    let mut map = HashMap::new();
    for node in doc.descendants() {
        if !node.is_element() {
            continue;
        }
        for attr_name in &default_attrs {
            if let Some(val) = node.attribute(*attr_name) {
                map.insert(val.to_owned(), node.id());
            }
        }
        for (ns_uri, attr_name) in extra_attrs {
            if let Some(val) = node.attribute((*ns_uri, *attr_name)) {
                map.insert(val.to_owned(), node.id());
            }
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<a xmlns="urn:x" xmlns:w="urn:w"><b w:Id="one"><c>text</c></b><b Id="two"/></a>"#;

    #[test]
    fn test_find_child() {
        let doc = parse(DOC).unwrap();
        let root = doc.root_element();
        assert!(find_child(root, "urn:x", "b").is_some());
        assert!(find_child(root, "urn:x", "c").is_none());
        assert!(find_descendant(root, "urn:x", "c").is_some());
    }

    #[test]
    fn test_id_map() {
        let doc = parse(DOC).unwrap();
        let map = build_id_map(&doc, &[("urn:w", "Id")]);
        assert!(map.contains_key("one"));
        assert!(map.contains_key("two"));
    }

    #[test]
    fn test_dtd_rejected() {
        let with_dtd = "<!DOCTYPE a [<!ENTITY e \"x\">]><a>&e;</a>";
        assert!(parse(with_dtd).is_err());
    }
}
