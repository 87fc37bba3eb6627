//! Thin helpers over the `rcdom` tree.
//!
//! `markup5ever_rcdom` exposes the raw tree (Rc nodes, RefCell children and
//! attributes) and nothing else; every call site here would otherwise repeat
//! the same borrow-and-scan boilerplate. Attribute names are matched in the
//! empty namespace, element names in the HTML namespace.

pub mod walk;

use std::io;
use std::rc::Rc;

use html5ever::serialize::{serialize, SerializeOpts};
use html5ever::tendril::TendrilSink;
use html5ever::{
    namespace_url, ns, parse_document, parse_fragment, Attribute, LocalName, ParseOpts, QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};

/// Parse a complete HTML document.
pub fn parse_html_document(html: &str) -> io::Result<RcDom> {
    parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
}

/// Parse an HTML fragment and return its top-level nodes.
///
/// The fragment is parsed in a `div` context; html5ever parents the result
/// under a synthetic `html` element, whose children are what we want.
pub fn parse_fragment_nodes(html: &str) -> io::Result<Vec<Handle>> {
    let dom = parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        QualName::new(None, ns!(html), LocalName::from("div")),
        vec![],
    )
    .from_utf8()
    .read_from(&mut html.as_bytes())?;

    let root = dom
        .document
        .children
        .borrow()
        .iter()
        .find(|child| matches!(child.data, NodeData::Element { .. }))
        .cloned();

    Ok(match root {
        Some(root) => {
            let nodes = root.children.borrow().clone();
            for node in &nodes {
                node.parent.take();
            }
            root.children.borrow_mut().clear();
            nodes
        }
        None => Vec::new(),
    })
}

/// Serialize the whole document back to an HTML string.
pub fn serialize_document(dom: &RcDom) -> io::Result<String> {
    let mut bytes = Vec::new();
    let document: SerializableHandle = dom.document.clone().into();
    serialize(&mut bytes, &document, SerializeOpts::default())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Serialize one node (its children) to an HTML string.
pub fn serialize_node(node: &Handle) -> io::Result<String> {
    let mut bytes = Vec::new();
    let handle: SerializableHandle = node.clone().into();
    serialize(&mut bytes, &handle, SerializeOpts::default())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Create a detached element in the HTML namespace.
pub fn create_element(tag: &str, attrs: &[(&str, &str)]) -> Handle {
    let attrs = attrs
        .iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(*name)),
            value: (*value).into(),
        })
        .collect();
    Node::new(NodeData::Element {
        name: QualName::new(None, ns!(html), LocalName::from(tag)),
        attrs: std::cell::RefCell::new(attrs),
        template_contents: std::cell::RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    })
}

/// Create a detached text node.
pub fn create_text(text: &str) -> Handle {
    Node::new(NodeData::Text {
        contents: std::cell::RefCell::new(text.into()),
    })
}

/// The element's lowercase local name, or `None` for non-elements.
pub fn element_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

pub fn is_element_named(node: &Handle, tag: &str) -> bool {
    element_name(node).is_some_and(|name| name == tag)
}

/// Attribute value by (namespace-less) name.
pub fn get_attr(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Set (or replace) an attribute.
pub fn set_attr(node: &Handle, name: &str, value: &str) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let mut attrs = attrs.borrow_mut();
        if let Some(attr) = attrs.iter_mut().find(|attr| &*attr.name.local == name) {
            attr.value = value.into();
            return;
        }
        attrs.push(Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.into(),
        });
    }
}

/// Remove an attribute, returning its former value.
pub fn remove_attr(node: &Handle, name: &str) -> Option<String> {
    if let NodeData::Element { attrs, .. } = &node.data {
        let mut attrs = attrs.borrow_mut();
        if let Some(index) = attrs.iter().position(|attr| &*attr.name.local == name) {
            return Some(attrs.remove(index).value.to_string());
        }
    }
    None
}

/// Whitespace-separated class tokens.
pub fn classes(node: &Handle) -> Vec<String> {
    get_attr(node, "class")
        .map(|value| value.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn has_class(node: &Handle, token: &str) -> bool {
    classes(node).iter().any(|class| class == token)
}

/// Append a class token if not already present.
pub fn add_class(node: &Handle, token: &str) {
    match get_attr(node, "class") {
        Some(existing) => {
            if !existing.split_whitespace().any(|class| class == token) {
                set_attr(node, "class", &format!("{existing} {token}"));
            }
        }
        None => set_attr(node, "class", token),
    }
}

/// Detach a node from its parent, if it has one.
pub fn detach(node: &Handle) {
    if let Some(parent) = node.parent.take() {
        if let Some(parent) = parent.upgrade() {
            parent
                .children
                .borrow_mut()
                .retain(|child| !Rc::ptr_eq(child, node));
        }
    }
}

/// Append `child` as the last child of `parent`, detaching it first.
pub fn append_child(parent: &Handle, child: &Handle) {
    detach(child);
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child.clone());
}

/// Insert `node` immediately before `reference` under the same parent.
/// No-op when `reference` is detached.
pub fn insert_before(reference: &Handle, node: &Handle) {
    let Some(parent) = parent_of(reference) else {
        return;
    };
    detach(node);
    node.parent.set(Some(Rc::downgrade(&parent)));
    let mut children = parent.children.borrow_mut();
    match children.iter().position(|child| Rc::ptr_eq(child, reference)) {
        Some(index) => children.insert(index, node.clone()),
        None => children.push(node.clone()),
    }
}

/// Insert `node` as the first child of `parent`.
pub fn prepend_child(parent: &Handle, node: &Handle) {
    detach(node);
    node.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().insert(0, node.clone());
}

/// Replace `old` with `new` at the same tree position.
pub fn replace_with(old: &Handle, new: &Handle) {
    insert_before(old, new);
    detach(old);
}

/// The node's parent, if still attached.
pub fn parent_of(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take()?;
    let parent = weak.upgrade();
    node.parent.set(Some(weak));
    parent
}

/// Concatenated text of the node and its descendants.
pub fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

fn collect_text(node: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &node.data {
        out.push_str(&contents.borrow());
    }
    for child in node.children.borrow().iter() {
        collect_text(child, out);
    }
}

/// Direct element children only.
pub fn child_elements(node: &Handle) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|child| matches!(child.data, NodeData::Element { .. }))
        .cloned()
        .collect()
}

/// First element in the subtree (pre-order) with the given tag name.
pub fn find_first(node: &Handle, tag: &str) -> Option<Handle> {
    if is_element_named(node, tag) {
        return Some(node.clone());
    }
    let children = node.children.borrow().clone();
    children.iter().find_map(|child| find_first(child, tag))
}

/// The document's `<body>` element.
pub fn find_body(document: &Handle) -> Option<Handle> {
    find_first(document, "body")
}

/// The document's `<head>` element.
pub fn find_head(document: &Handle) -> Option<Handle> {
    find_first(document, "head")
}
