use indextree::NodeId;

/// A block that is still open, with the registry index of the syntax that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OpenBlock {
    pub(crate) node: NodeId,
    pub(crate) syntax: usize,
}

/// Open blocks from the document (bottom) to the tip (top).
pub(crate) struct ContainerStack {
    stack: Vec<OpenBlock>,
}

impl ContainerStack {
    pub(crate) fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub(crate) fn last(&self) -> Option<&OpenBlock> {
        self.stack.last()
    }

    pub(crate) fn get(&self, idx: usize) -> Option<&OpenBlock> {
        self.stack.get(idx)
    }

    pub(crate) fn push(&mut self, open: OpenBlock) {
        self.stack.push(open);
    }

    pub(crate) fn pop(&mut self) -> Option<OpenBlock> {
        self.stack.pop()
    }
}
