//! Filtering of notification bodies for event-stream subscriptions.

use crate::filter::SubtreeFilter;
use netconf_datatree::DataNode;
use std::sync::Arc;
use tracing::trace;

/// Decides whether a notification body is delivered to a subscriber.
pub trait EventStreamFilter: Send + Sync {
    fn test(&self, body: &DataNode) -> bool;
}

impl<F> EventStreamFilter for F
where
    F: Fn(&DataNode) -> bool + Send + Sync,
{
    fn test(&self, body: &DataNode) -> bool {
        self(body)
    }
}

/// Event-stream filter backed by a subtree filter.
///
/// The filter is shared, so one parsed filter can serve many subscriptions.
#[derive(Clone, Debug)]
pub struct SubtreeEventStreamFilter {
    filter: Arc<SubtreeFilter>,
}

impl SubtreeEventStreamFilter {
    pub fn new(filter: impl Into<Arc<SubtreeFilter>>) -> Self {
        Self { filter: filter.into() }
    }

    pub fn subtree_filter(&self) -> &SubtreeFilter {
        &self.filter
    }

    /// The pruned notification body, or `None` when it does not match.
    pub fn filter(&self, body: &DataNode) -> Option<DataNode> {
        let result = self.filter.matcher(body).result();
        trace!(notification = %body.name(), delivered = result.is_some(), "filtered notification");
        result
    }
}

impl EventStreamFilter for SubtreeEventStreamFilter {
    fn test(&self, body: &DataNode) -> bool {
        self.filter.matcher(body).matches()
    }
}
