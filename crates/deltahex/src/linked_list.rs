//! Arena-backed doubly linked list.
//!
//! Nodes live in a slot arena and are addressed by [`NodeId`] handles carrying
//! a generation counter. Splicing before/after a known handle and removing it
//! are O(1); positional access walks from the head. Removing a node vacates its
//! slot and bumps the generation, so a handle to a removed node is rejected
//! with [`DeltaError::DetachedNode`] instead of silently re-entering the chain.

use crate::error::{DeltaError, Result};

/// Stable handle to a node of a [`LinkedSequence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    node: Option<Node<T>>,
}

/// Ordered doubly linked sequence with O(1) splice at a known node.
#[derive(Debug)]
pub struct LinkedSequence<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> Default for LinkedSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LinkedSequence<T> {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Number of linked nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no node is linked.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Handle of the first node.
    pub fn first(&self) -> Option<NodeId> {
        self.head.map(|index| self.id_of(index))
    }

    /// Handle of the last node.
    pub fn last(&self) -> Option<NodeId> {
        self.tail.map(|index| self.id_of(index))
    }

    /// Handle of the node following `id`.
    pub fn next(&self, id: NodeId) -> Result<Option<NodeId>> {
        let next = self.node(id)?.next;
        Ok(next.map(|index| self.id_of(index)))
    }

    /// Handle of the node preceding `id`.
    pub fn prev(&self, id: NodeId) -> Result<Option<NodeId>> {
        let prev = self.node(id)?.prev;
        Ok(prev.map(|index| self.id_of(index)))
    }

    /// Handle of the node at `index`, walking from the head.
    pub fn get(&self, index: usize) -> Result<NodeId> {
        if index >= self.len {
            return Err(DeltaError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }

        let mut current = self.head;
        for _ in 0..index {
            current = current.and_then(|i| self.linked(i).next);
        }
        current
            .map(|i| self.id_of(i))
            .ok_or(DeltaError::InvalidState("sequence links are inconsistent"))
    }

    /// Value stored in node `id`.
    pub fn value(&self, id: NodeId) -> Result<&T> {
        Ok(&self.node(id)?.value)
    }

    /// Mutable value stored in node `id`.
    pub fn value_mut(&mut self, id: NodeId) -> Result<&mut T> {
        Ok(&mut self.node_mut(id)?.value)
    }

    /// Links `value` at the end of the sequence.
    pub fn append(&mut self, value: T) -> NodeId {
        let index = self.allocate(value, self.tail, None);
        match self.tail {
            Some(tail) => self.linked_mut(tail).next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.len += 1;
        self.id_of(index)
    }

    /// Links `value` directly before node `id`.
    pub fn insert_before(&mut self, id: NodeId, value: T) -> Result<NodeId> {
        let prev = self.node(id)?.prev;
        let index = self.allocate(value, prev, Some(id.index));
        self.linked_mut(id.index).prev = Some(index);
        match prev {
            Some(prev) => self.linked_mut(prev).next = Some(index),
            None => self.head = Some(index),
        }
        self.len += 1;
        Ok(self.id_of(index))
    }

    /// Links `value` directly after node `id`.
    pub fn insert_after(&mut self, id: NodeId, value: T) -> Result<NodeId> {
        let next = self.node(id)?.next;
        let index = self.allocate(value, Some(id.index), next);
        self.linked_mut(id.index).next = Some(index);
        match next {
            Some(next) => self.linked_mut(next).prev = Some(index),
            None => self.tail = Some(index),
        }
        self.len += 1;
        Ok(self.id_of(index))
    }

    /// Unlinks node `id` and returns its value.
    pub fn remove(&mut self, id: NodeId) -> Result<T> {
        self.node(id)?;
        let slot = &mut self.slots[id.index];
        let node = slot
            .node
            .take()
            .ok_or(DeltaError::DetachedNode)?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);

        match node.prev {
            Some(prev) => self.linked_mut(prev).next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.linked_mut(next).prev = node.prev,
            None => self.tail = node.prev,
        }
        self.len -= 1;
        Ok(node.value)
    }

    /// Unlinks every node.
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index);
            }
        }
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Forward iterator over `(handle, value)` pairs.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.head,
            forward: true,
        }
    }

    /// Backward iterator over `(handle, value)` pairs.
    pub fn iter_rev(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.tail,
            forward: false,
        }
    }

    fn id_of(&self, index: usize) -> NodeId {
        NodeId {
            index,
            generation: self.slots[index].generation,
        }
    }

    fn node(&self, id: NodeId) -> Result<&Node<T>> {
        match self.slots.get(id.index) {
            Some(slot) if slot.generation == id.generation => {
                slot.node.as_ref().ok_or(DeltaError::DetachedNode)
            }
            _ => Err(DeltaError::DetachedNode),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node<T>> {
        match self.slots.get_mut(id.index) {
            Some(slot) if slot.generation == id.generation => {
                slot.node.as_mut().ok_or(DeltaError::DetachedNode)
            }
            _ => Err(DeltaError::DetachedNode),
        }
    }

    // Internal links always point at occupied slots.
    fn linked(&self, index: usize) -> &Node<T> {
        match &self.slots[index].node {
            Some(node) => node,
            None => unreachable!("link to vacant slot {index}"),
        }
    }

    fn linked_mut(&mut self, index: usize) -> &mut Node<T> {
        match &mut self.slots[index].node {
            Some(node) => node,
            None => unreachable!("link to vacant slot {index}"),
        }
    }

    fn allocate(&mut self, value: T, prev: Option<usize>, next: Option<usize>) -> usize {
        let node = Node { value, prev, next };
        match self.free.pop() {
            Some(index) => {
                self.slots[index].node = Some(node);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                self.slots.len() - 1
            }
        }
    }
}

/// Iterator over a [`LinkedSequence`] in either direction.
#[derive(Debug)]
pub struct Iter<'a, T> {
    list: &'a LinkedSequence<T>,
    current: Option<usize>,
    forward: bool,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.current?;
        let node = self.list.linked(index);
        self.current = if self.forward { node.next } else { node.prev };
        Some((self.list.id_of(index), &node.value))
    }
}
