#![forbid(unsafe_code)]

//! Exclusive Canonical XML 1.0, without comments, over element subtrees.
//!
//! The key difference from inclusive C14N: only "visibly utilized"
//! namespace declarations are output. A namespace is visibly utilized if:
//! 1. Its prefix is used by the element's tag name, OR
//! 2. Its prefix is used by one of the element's attributes.
//!
//! The subtree form covers every use in the WS-Security profile: signed
//! references resolve to whole elements, and `SignedInfo` is digested as a
//! subtree of the envelope, with ancestor-declared namespaces re-rendered
//! on the subtree root where utilized.

use crate::escape;
use crate::render::{Attr, NsDecl};
use std::collections::{BTreeMap, HashSet};
use vltava_core::{ns, Error};

/// Canonicalize the subtree rooted at `node` using exc-C14N without comments.
pub fn canonicalize_subtree(node: roxmltree::Node<'_, '_>) -> Result<Vec<u8>, Error> {
    if !node.is_element() {
        return Err(Error::Canonicalization(
            "subtree root is not an element".into(),
        ));
    }
    let mut output = Vec::new();
    process_element(node, &mut output, &BTreeMap::new())?;
    Ok(output)
}

fn process_element(
    node: roxmltree::Node<'_, '_>,
    output: &mut Vec<u8>,
    rendered_ns: &BTreeMap<String, String>,
) -> Result<(), Error> {
    let inscope = inscope_namespaces(node);
    let elem_prefix = element_prefix(node, &inscope)?;

    // Determine which namespace prefixes are visibly utilized.
    let mut utilized: HashSet<String> = HashSet::new();
    utilized.insert(elem_prefix.clone());

    // Collect attributes, resolving their prefixes.
    let mut attrs: Vec<Attr> = Vec::new();
    for attr in node.attributes() {
        let (qualified_name, ns_uri) = match attr.namespace() {
            None => (attr.name().to_owned(), String::new()),
            Some(uri) if uri == ns::XML => {
                (format!("xml:{}", attr.name()), uri.to_owned())
            }
            Some(uri) => {
                let prefix = attr_prefix(uri, &inscope)?;
                utilized.insert(prefix.clone());
                (format!("{}:{}", prefix, attr.name()), uri.to_owned())
            }
        };
        attrs.push(Attr {
            ns_uri,
            local_name: attr.name().to_owned(),
            qualified_name,
            value: attr.value().to_owned(),
        });
    }
    attrs.sort();

    // Namespace declarations: only utilized prefixes whose binding has not
    // already been rendered by an output ancestor.
    let mut ns_decls: Vec<NsDecl> = Vec::new();
    for prefix in &utilized {
        if prefix == "xml" {
            continue;
        }
        match inscope.get(prefix) {
            Some(uri) => {
                if rendered_ns.get(prefix) != Some(uri) {
                    ns_decls.push(NsDecl {
                        prefix: prefix.clone(),
                        uri: uri.clone(),
                    });
                }
            }
            None => {
                // Element in no namespace under a rendered non-empty
                // default namespace needs an xmlns="" reset.
                if prefix.is_empty()
                    && rendered_ns.get("").is_some_and(|u| !u.is_empty())
                {
                    ns_decls.push(NsDecl {
                        prefix: String::new(),
                        uri: String::new(),
                    });
                }
            }
        }
    }
    ns_decls.sort();

    let elem_name = if elem_prefix.is_empty() {
        node.tag_name().name().to_owned()
    } else {
        format!("{}:{}", elem_prefix, node.tag_name().name())
    };

    // Start tag
    output.push(b'<');
    output.extend_from_slice(elem_name.as_bytes());
    for ns_decl in &ns_decls {
        output.extend_from_slice(ns_decl.render().as_bytes());
    }
    for attr in &attrs {
        output.extend_from_slice(attr.render().as_bytes());
    }
    output.push(b'>');

    let mut child_rendered_ns = rendered_ns.clone();
    for ns_decl in &ns_decls {
        child_rendered_ns.insert(ns_decl.prefix.clone(), ns_decl.uri.clone());
    }

    for child in node.children() {
        if child.is_element() {
            process_element(child, output, &child_rendered_ns)?;
        } else if child.is_text() {
            let text = child.text().unwrap_or("");
            output.extend_from_slice(escape::escape_text(text).as_bytes());
        } else if child.is_pi() {
            if let Some(pi) = child.pi() {
                output.extend_from_slice(b"<?");
                output.extend_from_slice(pi.target.as_bytes());
                if let Some(value) = pi.value {
                    if !value.is_empty() {
                        output.push(b' ');
                        output.extend_from_slice(value.as_bytes());
                    }
                }
                output.extend_from_slice(b"?>");
            }
        }
        // Comments are dropped (without-comments variant).
    }

    // End tag
    output.extend_from_slice(b"</");
    output.extend_from_slice(elem_name.as_bytes());
    output.push(b'>');
    Ok(())
}

/// All in-scope namespace bindings for an element, prefix → URI.
fn inscope_namespaces(node: roxmltree::Node<'_, '_>) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for decl in node.namespaces() {
        let prefix = decl.name().unwrap_or("").to_owned();
        map.entry(prefix).or_insert_with(|| decl.uri().to_owned());
    }
    map
}

/// The prefix to render for the element's tag name.
fn element_prefix(
    node: roxmltree::Node<'_, '_>,
    inscope: &BTreeMap<String, String>,
) -> Result<String, Error> {
    match node.tag_name().namespace() {
        None => Ok(String::new()),
        Some(uri) => {
            if inscope.get("").map(String::as_str) == Some(uri) {
                return Ok(String::new());
            }
            inscope
                .iter()
                .find(|(p, u)| !p.is_empty() && u.as_str() == uri)
                .map(|(p, _)| p.clone())
                .ok_or_else(|| {
                    Error::Canonicalization(format!("no prefix in scope for namespace {uri}"))
                })
        }
    }
}

/// The (non-empty) prefix to render for an attribute in `uri`.
fn attr_prefix(uri: &str, inscope: &BTreeMap<String, String>) -> Result<String, Error> {
    inscope
        .iter()
        .find(|(p, u)| !p.is_empty() && u.as_str() == uri)
        .map(|(p, _)| p.clone())
        .ok_or_else(|| {
            Error::Canonicalization(format!("no prefix in scope for attribute namespace {uri}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c14n(xml: &str) -> String {
        let doc = vltava_xml::parse(xml).unwrap();
        let out = canonicalize_subtree(doc.root_element()).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn c14n_of(xml: &str, ns_uri: &str, local: &str) -> String {
        let doc = vltava_xml::parse(xml).unwrap();
        let node = vltava_xml::find_element(&doc, ns_uri, local).unwrap();
        let out = canonicalize_subtree(node).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_attribute_sorting() {
        let xml = r#"<e xmlns:x="urn:u" b="2" a="1" x:z="3"></e>"#;
        assert_eq!(c14n(xml), r#"<e xmlns:x="urn:u" a="1" b="2" x:z="3"></e>"#);
    }

    #[test]
    fn test_self_closing_expanded() {
        assert_eq!(c14n("<a/>"), "<a></a>");
    }

    #[test]
    fn test_unused_namespace_dropped() {
        let xml = r#"<a xmlns:unused="urn:nope"><b>t</b></a>"#;
        assert_eq!(c14n(xml), "<a><b>t</b></a>");
    }

    #[test]
    fn test_inherited_prefix_redeclared_on_subtree_root() {
        let xml = r#"<p:root xmlns:p="urn:p"><p:child a="1">x</p:child></p:root>"#;
        assert_eq!(
            c14n_of(xml, "urn:p", "child"),
            r#"<p:child xmlns:p="urn:p" a="1">x</p:child>"#
        );
    }

    #[test]
    fn test_prefix_rendered_once() {
        let xml = r#"<p:root xmlns:p="urn:p"><p:child/></p:root>"#;
        assert_eq!(
            c14n(xml),
            r#"<p:root xmlns:p="urn:p"><p:child></p:child></p:root>"#
        );
    }

    #[test]
    fn test_comments_dropped() {
        let xml = "<a><!-- note --><b>t</b></a>";
        assert_eq!(c14n(xml), "<a><b>t</b></a>");
    }

    #[test]
    fn test_text_escaping() {
        let xml = "<a>x &amp; y</a>";
        assert_eq!(c14n(xml), "<a>x &amp; y</a>");
    }

    #[test]
    fn test_default_namespace() {
        let xml = r#"<a xmlns="urn:d"><b/></a>"#;
        assert_eq!(c14n(xml), r#"<a xmlns="urn:d"><b></b></a>"#);
    }
}
