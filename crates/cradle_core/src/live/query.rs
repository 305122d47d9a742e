//! Snapshot-holding live queries and the filter combinator.
//!
//! # Responsibility
//! - Keep the latest full result set of a query current across changes.
//! - Combine a base result set with a screen-held filter term.
//!
//! # Invariants
//! - Refresh re-runs the whole query; there is no incremental diffing.
//! - A blank filter term means pass-through, never "match nothing".

use crate::live::{ChangeBus, ChangeListener, Topic};
use crate::repo::RepoResult;
use std::time::Duration;

/// A query whose full result set is re-fetched whenever one of its topics
/// changes.
///
/// The fetch closure runs once at construction, then again on every
/// observed change. Dropping the query unsubscribes it.
pub struct LiveQuery<'c, T> {
    listener: ChangeListener,
    fetch: Box<dyn FnMut() -> RepoResult<T> + 'c>,
    current: T,
}

impl<'c, T> LiveQuery<'c, T> {
    /// Subscribes to `topics` and runs the initial fetch.
    pub fn new(
        bus: &ChangeBus,
        topics: &[Topic],
        mut fetch: impl FnMut() -> RepoResult<T> + 'c,
    ) -> RepoResult<Self> {
        let listener = bus.subscribe(topics);
        let current = fetch()?;
        Ok(Self {
            listener,
            fetch: Box::new(fetch),
            current,
        })
    }

    /// Latest observed result set.
    pub fn snapshot(&self) -> &T {
        &self.current
    }

    /// Re-fetches if any subscribed topic changed since the last call.
    ///
    /// Returns whether a refresh happened. Consecutive publishes conflate
    /// into one refresh.
    pub fn poll(&mut self) -> RepoResult<bool> {
        if !self.listener.poll() {
            return Ok(false);
        }
        self.current = (self.fetch)()?;
        Ok(true)
    }

    /// Blocks up to `timeout` for a change, then refreshes.
    pub fn wait(&mut self, timeout: Duration) -> RepoResult<bool> {
        if !self.listener.wait(timeout) {
            return Ok(false);
        }
        self.current = (self.fetch)()?;
        Ok(true)
    }
}

/// Combines a base live query with a locally-held filter term.
///
/// The filtered result is recomputed by a pure predicate over the latest
/// base snapshot on every base emission or filter change. Filter state is
/// private to the holder and never persisted.
pub struct FilteredLive<'c, T: Clone> {
    base: LiveQuery<'c, Vec<T>>,
    matches: Box<dyn Fn(&T, &str) -> bool + 'c>,
    filter: String,
    current: Vec<T>,
}

impl<'c, T: Clone> FilteredLive<'c, T> {
    /// Wraps a base query with an item predicate. Starts unfiltered.
    pub fn new(base: LiveQuery<'c, Vec<T>>, matches: impl Fn(&T, &str) -> bool + 'c) -> Self {
        let current = base.snapshot().clone();
        Self {
            base,
            matches: Box::new(matches),
            filter: String::new(),
            current,
        }
    }

    /// Replaces the filter term and recomputes from the latest base snapshot.
    pub fn set_filter(&mut self, term: impl Into<String>) {
        self.filter = term.into();
        self.recompute();
    }

    /// Re-fetches the base when changed, then recomputes the filtered view.
    pub fn poll(&mut self) -> RepoResult<bool> {
        let refreshed = self.base.poll()?;
        if refreshed {
            self.recompute();
        }
        Ok(refreshed)
    }

    /// Latest filtered result set.
    pub fn snapshot(&self) -> &[T] {
        &self.current
    }

    fn recompute(&mut self) {
        let term = self.filter.trim();
        if term.is_empty() {
            self.current = self.base.snapshot().clone();
            return;
        }
        self.current = self
            .base
            .snapshot()
            .iter()
            .filter(|item| (self.matches)(item, term))
            .cloned()
            .collect();
    }
}
