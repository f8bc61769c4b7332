//! Fail-closed aggregation of independent validity checks.
//!
//! A [`PredicateAggregator`] holds any number of checks over one subject
//! type. Synchronous checks return a plain `bool`; asynchronous checks return
//! a future of `anyhow::Result<bool>`. [`PredicateAggregator::is_valid`] runs
//! every check concurrently and answers with the logical AND. An async check
//! that errors counts as `false`, so an unevaluable check never grants
//! validity and `is_valid` itself cannot fail.

use std::future::Future;

use futures::future::{self, BoxFuture, FutureExt};
use tracing::warn;

type SyncCheck<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
type AsyncCheck<T> = Box<dyn Fn(T) -> BoxFuture<'static, anyhow::Result<bool>> + Send + Sync>;

enum Predicate<T> {
    Sync(SyncCheck<T>),
    Async(AsyncCheck<T>),
}

pub struct PredicateAggregator<T> {
    predicates: Vec<Predicate<T>>,
}

impl<T> PredicateAggregator<T>
where
    T: Clone + Send + 'static,
{
    pub fn new() -> Self {
        PredicateAggregator {
            predicates: Vec::new(),
        }
    }

    /// Add a synchronous check.
    pub fn with_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.predicates.push(Predicate::Sync(Box::new(check)));
        self
    }

    /// Add an asynchronous check. It receives its own copy of the subject.
    pub fn with_async_check<F, Fut>(mut self, check: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<bool>> + Send + 'static,
    {
        self.predicates
            .push(Predicate::Async(Box::new(move |subject| check(subject).boxed())));
        self
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// `true` iff every check passes. An empty aggregator accepts everything.
    pub async fn is_valid(&self, subject: &T) -> bool {
        let checks = self.predicates.iter().map(|predicate| match predicate {
            Predicate::Sync(check) => future::ready(check(subject)).boxed(),
            Predicate::Async(check) => check(subject.clone())
                .map(|outcome| {
                    outcome.unwrap_or_else(|e| {
                        warn!(error = %e, "validity check failed to evaluate; treating as invalid");
                        false
                    })
                })
                .boxed(),
        });

        future::join_all(checks).await.into_iter().all(|passed| passed)
    }
}

impl<T> Default for PredicateAggregator<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
