//! Ordered, id-unique list of server records, newest first.
//!
//! A full fetch replaces the list; realtime pushes are prepended. A pushed
//! record whose id is already present is dropped: the fetched copy wins.

use std::sync::{Arc, Mutex, MutexGuard};

use greenworld_shared::{Identified, Notification};

#[derive(Debug, Clone, PartialEq)]
pub struct Feed<T> {
    items: Vec<T>,
}

impl<T> Default for Feed<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Identified> Feed<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the full list (from a REST fetch). Later duplicates of an id are
    /// dropped.
    pub fn replace(&mut self, items: Vec<T>) {
        let mut unique: Vec<T> = Vec::with_capacity(items.len());
        for item in items {
            if !unique.iter().any(|existing| existing.id() == item.id()) {
                unique.push(item);
            }
        }
        self.items = unique;
    }

    /// Put a pushed record in front.
    /// Returns false if a record with the same id already exists.
    pub fn prepend(&mut self, item: T) -> bool {
        if self.contains(item.id()) {
            return false;
        }
        self.items.insert(0, item);
        true
    }

    pub fn contains(&self, id: u64) -> bool {
        self.items.iter().any(|item| item.id() == id)
    }

    pub fn get(&self, id: u64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Feed<Notification> {
    /// Flag one notification as read. Returns false if the id is unknown.
    pub fn mark_read(&mut self, id: u64) -> bool {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }
}

/// A feed shared between a screen and its subscription handler.
#[derive(Debug)]
pub struct SharedFeed<T>(Arc<Mutex<Feed<T>>>);

impl<T> Clone for SharedFeed<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Default for SharedFeed<T> {
    fn default() -> Self {
        Self(Arc::new(Mutex::new(Feed::default())))
    }
}

impl<T> SharedFeed<T> {
    /// Lock the feed. A panic in another holder does not invalidate the list,
    /// so poisoning is ignored.
    pub fn lock(&self) -> MutexGuard<'_, Feed<T>> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: Identified + Clone> SharedFeed<T> {
    pub fn snapshot(&self) -> Vec<T> {
        self.lock().items().to_vec()
    }
}

pub fn shared_feed<T>() -> SharedFeed<T> {
    SharedFeed::default()
}
