//! Named grammar fragments.
//!
//! A [`Fragment`] is an externally defined grammar construct: the scanner recognizes a
//! name in the input, looks the fragment up through the tree builder, and hands control
//! to the fragment's parse handle. The builder only stores and looks fragments up, it
//! never interprets them, so new syntactic forms can be registered without touching
//! the core.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::diagnostics::ParseError;
use crate::parser::TreeBuilder;
use crate::scanner::Scanner;

/// A named grammar construct with an opaque parse handle.
pub struct Fragment {
    name: String,
    handler: Box<dyn Fn(&mut Scanner<'_>, &mut TreeBuilder) -> Result<(), ParseError> + Send + Sync>,
}

impl Fragment {
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Scanner<'_>, &mut TreeBuilder) -> Result<(), ParseError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            handler: Box::new(handler),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the fragment's parse handle. Called by the scanner once it has
    /// recognized this fragment's name in the input.
    pub fn parse(&self, scanner: &mut Scanner<'_>, builder: &mut TreeBuilder) -> Result<(), ParseError> {
        (self.handler)(scanner, builder)
    }
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fragment").field("name", &self.name).finish()
    }
}

/// Name-keyed table of fragments. Registering a name twice replaces the earlier entry.
#[derive(Debug, Default)]
pub struct FragmentTable {
    by_name: HashMap<String, Arc<Fragment>>,
}

impl FragmentTable {
    pub fn new(fragments: Vec<Fragment>) -> Self {
        let mut table = Self::default();
        for fragment in fragments {
            table.add(fragment);
        }
        table
    }

    pub fn add(&mut self, fragment: Fragment) {
        tracing::trace!(name = fragment.name(), "registering fragment");
        self.by_name.insert(fragment.name.clone(), Arc::new(fragment));
    }

    pub fn get(&self, name: &str) -> Option<Arc<Fragment>> {
        self.by_name.get(name).cloned()
    }
}
