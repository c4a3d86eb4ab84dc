//! Name → factory registry of leaf analyses

use super::LeafPipelineItem;
use crate::sentiment::CommentSentimentAnalysis;
use std::collections::BTreeMap;
use tracing::debug;

type Factory = fn() -> Box<dyn LeafPipelineItem>;

fn comment_sentiment() -> Box<dyn LeafPipelineItem> {
    Box::new(CommentSentimentAnalysis::new())
}

/// Registered analyses, populated once at startup
pub struct Registry {
    factories: BTreeMap<&'static str, Factory>,
    flags: BTreeMap<&'static str, &'static str>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
            flags: BTreeMap::new(),
        }
    }

    /// Registry with every analysis shipped in this crate
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(comment_sentiment);
        registry
    }

    /// Register a factory under the name and flag of the item it builds
    pub fn register(&mut self, factory: Factory) {
        let sample = factory();
        let name = sample.name();
        let flag = sample.flag();
        debug!("Registered analysis {} (--{})", name, flag);
        self.factories.insert(name, factory);
        self.flags.insert(flag, name);
    }

    /// Build a fresh item by name
    pub fn summon(&self, name: &str) -> Option<Box<dyn LeafPipelineItem>> {
        self.factories.get(name).map(|f| f())
    }

    /// Build a fresh item by its activation flag
    pub fn summon_by_flag(&self, flag: &str) -> Option<Box<dyn LeafPipelineItem>> {
        self.flags.get(flag).and_then(|name| self.summon(name))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }

    /// Registered activation flags, sorted
    pub fn flags(&self) -> Vec<&'static str> {
        self.flags.keys().copied().collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
