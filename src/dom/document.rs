//! Mutable HTML document model.
//!
//! Pages are parsed with `scraper` (html5ever) and copied into an owned
//! `ego_tree::Tree` that can be edited in place and serialized back to HTML.

use ego_tree::{NodeId, NodeRef, Tree};
use scraper::{Html, Node};

/// Elements that never have children or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text children are serialized without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "noscript", "plaintext",
];

/// One node of a [`PageDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomNode {
    /// Tree root.
    Document,
    /// `<!DOCTYPE name>`.
    Doctype(String),
    /// An element with its attributes.
    Element(ElementData),
    /// Character data.
    Text(String),
    /// `<!-- ... -->`.
    Comment(String),
}

/// Tag name and attributes of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Lowercase local name.
    name: String,
    /// Attributes in parser order (sorted by name), then any added later.
    attrs: Vec<(String, String)>,
}

impl ElementData {
    /// Element `name` without attributes.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
        }
    }

    /// Tag name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value, if present.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, keeping its position when it already exists.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(slot) = self.attrs.iter_mut().find(|(k, _)| k == name) {
            value.clone_into(&mut slot.1);
        } else {
            self.attrs.push((name.to_string(), value.to_string()));
        }
    }

    /// Attributes in parser order: names sorted for parsed elements,
    /// attributes set afterwards appended at the end.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether the `class` attribute lists `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }

    /// Add `class` unless already present.
    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let joined = match self.attr("class").map(str::trim) {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attr("class", &joined);
    }

    /// Remove every occurrence of `class`; other classes keep their order.
    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let kept = self
            .attr("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr("class", &kept);
    }
}

/// What: An HTML page held as an editable tree.
///
/// Details:
/// - Node ids stay valid across edits; replaced children are detached, not reused
/// - Detached nodes stay in the underlying arena until the document is
///   dropped, so the tree only grows with each switch
/// - Queries return ids in document order
#[derive(Debug, Clone)]
pub struct PageDocument {
    /// Owned node tree rooted at [`DomNode::Document`].
    tree: Tree<DomNode>,
}

impl PageDocument {
    /// What: Parse a full HTML document.
    ///
    /// Inputs:
    /// - `html`: Page source
    ///
    /// Output:
    /// - Parsed document; html5ever repairs malformed markup instead of failing
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let mut tree = Tree::new(DomNode::Document);
        let root = tree.root().id();
        graft(&mut tree, root, parsed.tree.root());
        Self { tree }
    }

    /// What: Serialize the whole document.
    ///
    /// Details:
    /// - Attribute order is normalized: parsed attributes come out sorted by name
    /// - `<noscript>` content is written back verbatim, as parsed with scripting on
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in self.tree.root().children() {
            serialize_node(&mut out, child);
        }
        out
    }

    /// Element data for `id`, if it is an element.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.tree.get(id)?.value() {
            DomNode::Element(el) => Some(el),
            _ => None,
        }
    }

    /// What: Edit the element at `id` in place.
    ///
    /// Output:
    /// - `Some` with the closure's result, `None` when `id` is not an element
    pub fn update_element<R>(
        &mut self,
        id: NodeId,
        edit: impl FnOnce(&mut ElementData) -> R,
    ) -> Option<R> {
        let mut node = self.tree.get_mut(id)?;
        match node.value() {
            DomNode::Element(el) => Some(edit(el)),
            _ => None,
        }
    }

    /// Ids of all attached elements, in document order.
    fn element_ids(&self) -> impl Iterator<Item = (NodeId, &ElementData)> {
        self.tree.root().descendants().filter_map(|node| match node.value() {
            DomNode::Element(el) => Some((node.id(), el)),
            _ => None,
        })
    }

    /// Elements carrying attribute `attr` (any value).
    #[must_use]
    pub fn elements_with_attr(&self, attr: &str) -> Vec<NodeId> {
        self.element_ids()
            .filter(|(_, el)| el.attr(attr).is_some())
            .map(|(id, _)| id)
            .collect()
    }

    /// First element carrying attribute `attr`.
    #[must_use]
    pub fn first_element_with_attr(&self, attr: &str) -> Option<NodeId> {
        self.element_ids()
            .find(|(_, el)| el.attr(attr).is_some())
            .map(|(id, _)| id)
    }

    /// Elements with tag `name`.
    #[must_use]
    pub fn elements_named(&self, name: &str) -> Vec<NodeId> {
        self.element_ids()
            .filter(|(_, el)| el.name() == name)
            .map(|(id, _)| id)
            .collect()
    }

    /// First `<meta name="...">` with the given name.
    #[must_use]
    pub fn meta_named(&self, meta_name: &str) -> Option<NodeId> {
        self.element_ids()
            .find(|(_, el)| el.name() == "meta" && el.attr("name") == Some(meta_name))
            .map(|(id, _)| id)
    }

    /// `src` values of every `<script src>` in document order.
    #[must_use]
    pub fn script_sources(&self) -> Vec<String> {
        self.element_ids()
            .filter(|(_, el)| el.name() == "script")
            .filter_map(|(_, el)| el.attr("src").map(ToString::to_string))
            .collect()
    }

    /// What: Find the nearest element, starting at `id` itself, carrying `attr`.
    ///
    /// Output:
    /// - `None` when neither `id` nor any ancestor has the attribute
    #[must_use]
    pub fn closest_with_attr(&self, id: NodeId, attr: &str) -> Option<NodeId> {
        let start = self.tree.get(id)?;
        std::iter::once(start)
            .chain(start.ancestors())
            .find(|node| matches!(node.value(), DomNode::Element(el) if el.attr(attr).is_some()))
            .map(|node| node.id())
    }

    /// The `<html>` element.
    #[must_use]
    pub fn root_element(&self) -> Option<NodeId> {
        self.tree
            .root()
            .children()
            .find(|node| matches!(node.value(), DomNode::Element(el) if el.name() == "html"))
            .map(|node| node.id())
    }

    /// `lang` attribute of the `<html>` element.
    #[must_use]
    pub fn document_language(&self) -> Option<&str> {
        self.element(self.root_element()?)?.attr("lang")
    }

    /// Set the `lang` attribute of the `<html>` element.
    pub fn set_document_language(&mut self, code: &str) {
        if let Some(root) = self.root_element() {
            self.update_element(root, |el| el.set_attr("lang", code));
        }
    }

    /// What: Replace the children of `id` with a parsed HTML fragment.
    ///
    /// Inputs:
    /// - `id`: Target element
    /// - `html`: Markup, parsed as body content (not escaped)
    ///
    /// Details:
    /// - Equivalent to assigning `innerHTML`
    pub fn set_inner_html(&mut self, id: NodeId, html: &str) {
        if self.element(id).is_none() {
            return;
        }
        self.clear_children(id);
        let fragment = Html::parse_fragment(html);
        graft(&mut self.tree, id, *fragment.root_element());
    }

    /// Replace the children of `id` with a single text node.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if self.element(id).is_none() {
            return;
        }
        self.clear_children(id);
        if let Some(mut node) = self.tree.get_mut(id) {
            node.append(DomNode::Text(text.to_string()));
        }
    }

    /// Serialized children of `id`.
    #[must_use]
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(node) = self.tree.get(id) {
            for child in node.children() {
                serialize_node(&mut out, child);
            }
        }
        out
    }

    /// Concatenated text of `id` and its descendants.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        self.tree
            .get(id)
            .map(|node| {
                node.descendants()
                    .filter_map(|n| match n.value() {
                        DomNode::Text(t) => Some(t.as_str()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Text of the first `<title>`, empty when there is none.
    #[must_use]
    pub fn title(&self) -> String {
        self.elements_named("title")
            .first()
            .map(|id| self.text_content(*id))
            .unwrap_or_default()
    }

    /// What: Set the document title.
    ///
    /// Details:
    /// - Rewrites the first `<title>`; creates one at the end of `<head>` when
    ///   the page has none
    pub fn set_title(&mut self, title: &str) {
        let existing = self.elements_named("title").first().copied();
        let target = existing.or_else(|| {
            let head = self.elements_named("head").first().copied()?;
            let mut head = self.tree.get_mut(head)?;
            Some(head.append(DomNode::Element(ElementData::new("title"))).id())
        });
        if let Some(id) = target {
            self.set_text(id, title);
        }
    }

    /// Detach every child of `id`.
    fn clear_children(&mut self, id: NodeId) {
        if let Some(mut node) = self.tree.get_mut(id) {
            while let Some(mut child) = node.first_child() {
                child.detach();
            }
        }
    }
}

/// Copy the children of `src` (a scraper node) under `parent`.
fn graft(tree: &mut Tree<DomNode>, parent: NodeId, src: NodeRef<'_, Node>) {
    for child in src.children() {
        let Some(value) = convert(child.value()) else {
            continue;
        };
        let Some(mut parent_node) = tree.get_mut(parent) else {
            return;
        };
        let id = parent_node.append(value).id();
        graft(tree, id, child);
    }
}

/// Map a scraper node to our node type; processing instructions are dropped.
fn convert(node: &Node) -> Option<DomNode> {
    match node {
        Node::Doctype(doctype) => Some(DomNode::Doctype(doctype.name().to_string())),
        Node::Comment(comment) => Some(DomNode::Comment(comment.to_string())),
        Node::Text(text) => Some(DomNode::Text(text.to_string())),
        Node::Element(el) => Some(DomNode::Element(ElementData {
            name: el.name().to_string(),
            attrs: el
                .attrs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        })),
        _ => None,
    }
}

/// Append the HTML serialization of `node` to `out`.
fn serialize_node(out: &mut String, node: NodeRef<'_, DomNode>) {
    match node.value() {
        DomNode::Document => {
            for child in node.children() {
                serialize_node(out, child);
            }
        }
        DomNode::Doctype(name) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        DomNode::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        DomNode::Text(text) => {
            let raw = node.parent().is_some_and(|p| {
                matches!(p.value(), DomNode::Element(el) if RAW_TEXT_ELEMENTS.contains(&el.name()))
            });
            if raw {
                out.push_str(text);
            } else {
                escape_into(out, text, false);
            }
        }
        DomNode::Element(el) => {
            out.push('<');
            out.push_str(el.name());
            for (k, v) in el.attrs() {
                out.push(' ');
                out.push_str(k);
                out.push_str("=\"");
                escape_into(out, v, true);
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&el.name()) {
                return;
            }
            for child in node.children() {
                serialize_node(out, child);
            }
            out.push_str("</");
            out.push_str(el.name());
            out.push('>');
        }
    }
}

/// Escape text or attribute content.
fn escape_into(out: &mut String, text: &str, attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<!DOCTYPE html><html lang=\"es\"><head><title>Inicio</title>\
        <meta content=\"Estudio\" name=\"description\"></head>\
        <body><nav><a class=\"btn\" data-lang=\"en\" href=\"#\"><span>EN</span></a></nav>\
        <p data-i18n=\"hero.title\">Hola <b>mundo</b></p>\
        <input data-i18n-placeholder=\"form.name\" placeholder=\"Nombre\"></body></html>";

    #[test]
    fn parse_and_serialize_round_trip() {
        let doc = PageDocument::parse(PAGE);
        assert_eq!(doc.to_html(), PAGE);
    }

    #[test]
    fn queries_by_attribute_and_name() {
        let doc = PageDocument::parse(PAGE);
        assert_eq!(doc.elements_with_attr("data-i18n").len(), 1);
        assert!(doc.first_element_with_attr("data-i18n-title").is_none());
        assert_eq!(doc.elements_named("meta").len(), 1);
        assert!(doc.meta_named("description").is_some());
        assert!(doc.meta_named("keywords").is_none());
        assert_eq!(doc.document_language(), Some("es"));
        assert_eq!(doc.title(), "Inicio");
    }

    #[test]
    fn inner_html_and_text_content() {
        let doc = PageDocument::parse(PAGE);
        let p = doc.elements_with_attr("data-i18n")[0];
        assert_eq!(doc.inner_html(p), "Hola <b>mundo</b>");
        assert_eq!(doc.text_content(p), "Hola mundo");
    }

    #[test]
    fn set_inner_html_renders_markup() {
        let mut doc = PageDocument::parse(PAGE);
        let p = doc.elements_with_attr("data-i18n")[0];
        doc.set_inner_html(p, "Hello <em>world</em> &amp; more");
        assert_eq!(doc.inner_html(p), "Hello <em>world</em> &amp; more");
        assert_eq!(doc.text_content(p), "Hello world & more");
    }

    #[test]
    fn closest_walks_up_from_inner_node() {
        let doc = PageDocument::parse(PAGE);
        let span = doc.elements_named("span")[0];
        let link = doc.closest_with_attr(span, "data-lang").expect("switch link");
        assert_eq!(doc.element(link).and_then(|el| el.attr("data-lang")), Some("en"));
        assert!(doc.closest_with_attr(span, "data-missing").is_none());
    }

    #[test]
    fn class_helpers_keep_other_classes() {
        let mut el = ElementData::new("a");
        el.add_class("btn");
        el.add_class("lang-active");
        el.add_class("lang-active");
        assert_eq!(el.attr("class"), Some("btn lang-active"));
        el.remove_class("lang-active");
        assert_eq!(el.attr("class"), Some("btn"));
        assert!(!el.has_class("lang-active"));
    }

    #[test]
    fn set_title_creates_missing_title() {
        let mut doc = PageDocument::parse("<html><head></head><body></body></html>");
        doc.set_title("Studio <1>");
        assert_eq!(doc.title(), "Studio <1>");
        assert_eq!(
            doc.to_html(),
            "<html><head><title>Studio &lt;1&gt;</title></head><body></body></html>"
        );
    }

    #[test]
    fn set_document_language_updates_root() {
        let mut doc = PageDocument::parse(PAGE);
        doc.set_document_language("de");
        assert_eq!(doc.document_language(), Some("de"));
    }

    #[test]
    fn script_text_is_not_escaped() {
        let src = "<html><head><script>if (a < b && c) {}</script></head><body></body></html>";
        let doc = PageDocument::parse(src);
        assert_eq!(doc.to_html(), src);
    }

    #[test]
    fn noscript_content_is_not_escaped() {
        let src = "<html><head></head><body><noscript><img src=\"pixel.gif\"></noscript></body></html>";
        let doc = PageDocument::parse(src);
        assert_eq!(doc.to_html(), src);
    }

    #[test]
    fn parsed_attributes_come_out_sorted() {
        let doc = PageDocument::parse(
            "<html><head><meta name=\"description\" content=\"x\"></head><body></body></html>",
        );
        assert_eq!(
            doc.to_html(),
            "<html><head><meta content=\"x\" name=\"description\"></head><body></body></html>"
        );
        let meta = doc.meta_named("description").expect("meta");
        let names: Vec<&str> = doc
            .element(meta)
            .expect("element")
            .attrs()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(names, ["content", "name"]);
    }

    #[test]
    fn replaced_children_are_detached_not_freed() {
        let mut doc = PageDocument::parse(PAGE);
        let p = doc.elements_with_attr("data-i18n")[0];
        let old_bold = doc.elements_named("b")[0];
        doc.set_inner_html(p, "Hello");
        assert!(doc.elements_named("b").is_empty());
        assert_eq!(doc.element(old_bold).map(ElementData::name), Some("b"));
        assert!(!doc.to_html().contains("<b>"));
    }

    #[test]
    fn attribute_quotes_are_escaped() {
        let mut doc = PageDocument::parse(PAGE);
        let input = doc.elements_named("input")[0];
        doc.update_element(input, |el| el.set_attr("placeholder", "Your \"name\""));
        assert!(doc.to_html().contains("placeholder=\"Your &quot;name&quot;\""));
    }
}
