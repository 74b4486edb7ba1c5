//! Per-block parser state, keyed by the state's type and the block's node.
//!
//! Recognizers keep what they need between lines (fence lengths, table
//! columns, buffered content) here instead of on the node itself. The table
//! lives as long as one block pass.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use indextree::NodeId;

#[derive(Default)]
pub struct SideTable {
    entries: HashMap<(TypeId, NodeId), Box<dyn Any>>,
}

impl SideTable {
    pub fn insert<T: Any>(&mut self, node: NodeId, value: T) {
        self.entries
            .insert((TypeId::of::<T>(), node), Box::new(value));
    }

    pub fn get<T: Any>(&self, node: NodeId) -> Option<&T> {
        self.entries
            .get(&(TypeId::of::<T>(), node))
            .and_then(|value| value.downcast_ref())
    }

    pub fn get_mut<T: Any>(&mut self, node: NodeId) -> Option<&mut T> {
        self.entries
            .get_mut(&(TypeId::of::<T>(), node))
            .and_then(|value| value.downcast_mut())
    }

    pub fn get_or_default<T: Any + Default>(&mut self, node: NodeId) -> &mut T {
        let entry = self
            .entries
            .entry((TypeId::of::<T>(), node))
            .or_insert_with(|| Box::new(T::default()));
        match entry.downcast_mut() {
            Some(value) => value,
            None => unreachable!("side table entry stored under the wrong type"),
        }
    }

    pub fn remove<T: Any>(&mut self, node: NodeId) -> Option<T> {
        self.entries
            .remove(&(TypeId::of::<T>(), node))
            .and_then(|value| value.downcast().ok())
            .map(|value| *value)
    }
}
