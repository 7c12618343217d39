mod dom;
pub mod html;

pub use dom::{Document, Node, NodeId, Tag};

pub const META_REGION: &str = "form-meta";
pub const FORM_REGION: &str = "form-body";
pub const OUTPUT_REGION: &str = "output";
pub const OUTPUT_CONTENT: &str = "output-content";

/// The host page with its four mount points. The core only populates these;
/// it never creates top-level containers of its own.
#[derive(Debug, Clone)]
pub struct Page {
    pub doc: Document,
    pub root: NodeId,
    pub meta: NodeId,
    pub form: NodeId,
    pub output: NodeId,
    pub output_content: NodeId,
}

impl Page {
    pub fn scaffold() -> Self {
        let mut doc = Document::new();
        let root = doc.insert(Node::new(Tag::Main));
        let meta = doc.insert(Node::new(Tag::Div).with_id(META_REGION));
        let form = doc.insert(Node::new(Tag::Form).with_id(FORM_REGION));
        let output = doc.insert(Node::new(Tag::Div).with_id(OUTPUT_REGION).hidden(true));
        let output_content = doc.insert(Node::new(Tag::Pre).with_id(OUTPUT_CONTENT));
        doc.append(root, meta);
        doc.append(root, form);
        doc.append(root, output);
        doc.append(output, output_content);
        Self {
            doc,
            root,
            meta,
            form,
            output,
            output_content,
        }
    }

    pub fn output_revealed(&self) -> bool {
        !self.doc.node(self.output).hidden
    }

    pub fn output_text(&self) -> &str {
        &self.doc.node(self.output_content).text
    }

    pub fn to_html(&self) -> String {
        html::render(&self.doc, self.root)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::scaffold()
    }
}
