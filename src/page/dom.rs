use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Main,
    Div,
    Form,
    H1,
    H2,
    P,
    Label,
    Span,
    Small,
    Input,
    Textarea,
    Select,
    OptionItem,
    Button,
    Pre,
}

impl Tag {
    pub fn name(&self) -> &'static str {
        match self {
            Tag::Main => "main",
            Tag::Div => "div",
            Tag::Form => "form",
            Tag::H1 => "h1",
            Tag::H2 => "h2",
            Tag::P => "p",
            Tag::Label => "label",
            Tag::Span => "span",
            Tag::Small => "small",
            Tag::Input => "input",
            Tag::Textarea => "textarea",
            Tag::Select => "select",
            Tag::OptionItem => "option",
            Tag::Button => "button",
            Tag::Pre => "pre",
        }
    }

    /// Tags that take part in form collection and validity checks.
    pub fn is_control(&self) -> bool {
        matches!(self, Tag::Input | Tag::Textarea | Tag::Select)
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub tag: Tag,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: IndexMap<String, String>,
    pub text: String,
    pub value: String,
    pub hidden: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            id: None,
            classes: Vec::new(),
            attrs: IndexMap::new(),
            text: String::new(),
            value: String::new(),
            hidden: false,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|item| item == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.attr("name")
    }

    pub fn is_required(&self) -> bool {
        self.attrs.contains_key("required")
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Arena-backed element tree. Nodes are never freed; detaching is not needed
/// because rendered fields stay in the tree for the lifetime of a session.
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn append_new(&mut self, parent: NodeId, node: Node) -> NodeId {
        let child = self.insert(node);
        self.append(parent, child);
        child
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn find_by_id(&self, dom_id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.id.as_deref() == Some(dom_id))
            .map(NodeId)
    }

    /// `root` and everything below it, in document order.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.nodes[current.0].children.iter().rev().copied());
        }
        out
    }

    pub fn find_descendant(&self, root: NodeId, predicate: impl Fn(&Node) -> bool) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|id| predicate(self.node(*id)))
    }

    pub fn text_content(&self, root: NodeId) -> String {
        self.descendants(root)
            .into_iter()
            .map(|id| self.nodes[id.0].text.as_str())
            .collect()
    }

    /// A node is displayed only if neither it nor any ancestor is hidden.
    pub fn is_displayed(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id.0];
            if node.hidden {
                return false;
            }
            current = node.parent;
        }
        true
    }

    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) {
        self.nodes[id.0].hidden = hidden;
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.nodes[id.0].text = text.into();
    }

    /// Option values of a `select`, in document order.
    pub fn option_values(&self, select: NodeId) -> Vec<&str> {
        self.nodes[select.0]
            .children
            .iter()
            .map(|child| &self.nodes[child.0])
            .filter(|node| node.tag == Tag::OptionItem)
            .map(|node| node.value.as_str())
            .collect()
    }

    /// Set a control's value. A select only accepts one of its option values
    /// and keeps its current selection otherwise. Returns whether the value changed.
    pub fn set_value(&mut self, id: NodeId, value: &str) -> bool {
        let node = &self.nodes[id.0];
        if node.tag == Tag::Select && !self.option_values(id).contains(&value) {
            return false;
        }
        let node = &mut self.nodes[id.0];
        if node.value == value {
            return false;
        }
        node.value = value.to_string();
        true
    }
}
