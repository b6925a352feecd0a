use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{Document, NodeRef};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for NodeRef<'_> {
    fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = self.children().map(|c| c.to_tree_string()).collect();
        Tree::new(self.to_string()).with_leaves(leaves)
    }
}

impl TreeNodeConvert for Document {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        self.root().to_tree_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse;

    #[test]
    fn given_document_when_rendering_then_nested_lines_with_data() {
        let doc = parse("game\n  name: Example\n  note\n    :a\n    :b").unwrap();
        let rendered = doc.to_tree_string().to_string();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "root");
        assert!(lines[1].ends_with("game"));
        assert!(lines[2].ends_with("name: Example"));
        assert!(lines[3].ends_with("note: a\\nb"));
    }
}
