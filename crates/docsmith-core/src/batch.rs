//! Parallel fan-out of parse and resolve calls
//!
//! Parsing and resolution are pure functions of their inputs and the shared,
//! read-only registry, so a whole generation run can be spread across a
//! rayon pool. Results keep the order of the inputs.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use thiserror::Error;

use crate::config::BatchConfig;
use crate::reference::{ReferenceDescriptor, ReferenceResolver, SeeTag};
use crate::types::{ParseError, TypeNode, TypeParser};

/// Errors that can occur when setting up a batch runner.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] ThreadPoolBuildError),
}

/// A see tag together with the path of the entity that owns it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSite {
    /// The tag to resolve
    pub tag: SeeTag,
    /// Qualified path of the owning class, module, constant or method
    pub parent: String,
}

impl TagSite {
    /// Pair a tag with its owner
    pub fn new(tag: SeeTag, parent: impl Into<String>) -> Self {
        Self {
            tag,
            parent: parent.into(),
        }
    }
}

/// Runs batches of independent calls on a worker pool
pub struct BatchRunner {
    /// Dedicated pool; `None` uses rayon's global pool
    pool: Option<ThreadPool>,
}

impl BatchRunner {
    /// Create a runner from the `[batch]` configuration
    pub fn new(config: &BatchConfig) -> Result<Self, BatchError> {
        let pool = match config.threads {
            Some(threads) => Some(ThreadPoolBuilder::new().num_threads(threads).build()?),
            None => None,
        };
        Ok(Self { pool })
    }

    fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    /// Resolve every tag site
    pub fn resolve_all(
        &self,
        resolver: &ReferenceResolver<'_>,
        sites: &[TagSite],
    ) -> Vec<ReferenceDescriptor> {
        tracing::debug!(tags = sites.len(), "resolving see tags");
        self.install(|| {
            sites
                .par_iter()
                .map(|site| resolver.resolve(&site.tag, &site.parent))
                .collect()
        })
    }

    /// Parse every type list; each input succeeds or fails on its own
    pub fn parse_all(
        &self,
        parser: &TypeParser<'_>,
        inputs: &[&str],
    ) -> Vec<Result<Vec<TypeNode>, ParseError>> {
        tracing::debug!(inputs = inputs.len(), "parsing type lists");
        self.install(|| inputs.par_iter().map(|input| parser.parse(input)).collect())
    }
}
