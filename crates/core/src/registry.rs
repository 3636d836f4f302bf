//! Keyed, insertion-ordered entity collection.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};

/// Collection of entities with unique ids, iterated in insertion order.
///
/// Backs both the product catalog and the customer registry.
#[derive(Debug, Clone)]
pub struct Registry<E: Entity> {
    items: Vec<E>,
    index: HashMap<E::Id, usize>,
}

impl<E: Entity> Default for Registry<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<E: Entity> Registry<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from loaded records, rejecting duplicate ids.
    pub fn from_vec(items: Vec<E>) -> DomainResult<Self> {
        let mut registry = Self::new();
        for item in items {
            registry.insert(item)?;
        }
        Ok(registry)
    }

    pub fn get<Q>(&self, id: &Q) -> Option<&E>
    where
        E::Id: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(id).map(|&i| &self.items[i])
    }

    pub fn get_mut<Q>(&mut self, id: &Q) -> Option<&mut E>
    where
        E::Id: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.index.get(id) {
            Some(&i) => Some(&mut self.items[i]),
            None => None,
        }
    }

    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        E::Id: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(id)
    }

    /// Append a new entity. Fails with `Conflict` if the id is taken.
    pub fn insert(&mut self, item: E) -> DomainResult<()> {
        let id = item.id().clone();
        if self.index.contains_key(&id) {
            return Err(DomainError::conflict(format!("code already exists: {id:?}")));
        }
        self.index.insert(id, self.items.len());
        self.items.push(item);
        Ok(())
    }

    /// Remove and return an entity, preserving the order of the rest.
    pub fn remove<Q>(&mut self, id: &Q) -> Option<E>
    where
        E::Id: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let pos = self.index.remove(id)?;
        let removed = self.items.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, E> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[E] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a, E: Entity> IntoIterator for &'a Registry<E> {
    type Item = &'a E;
    type IntoIter = core::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
