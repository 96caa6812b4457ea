use super::ViewState;

/// Case-insensitive substring match. `query_lower` must already be lowercase.
fn matches(name: &str, query_lower: &str) -> bool {
    name.to_lowercase().contains(query_lower)
}

impl ViewState {
    /// Derive a filtered view holding only entries whose name contains
    /// `query`, in their original order.
    ///
    /// The result is rebuilt from scratch: cursor, scroll and highlight
    /// always start at the top. An empty query keeps every entry.
    pub fn filtered(&self, query: &str) -> ViewState {
        let query_lower = query.to_lowercase();
        let entries: Vec<_> = self
            .entries
            .iter()
            .filter(|e| matches(&e.name, &query_lower))
            .cloned()
            .collect();

        tracing::debug!(
            query,
            matched = entries.len(),
            total = self.entries.len(),
            "filter applied"
        );

        ViewState {
            path: self.path.clone(),
            entries,
            cursor: 0,
            scroll_offset: 0,
            highlight_row: 0,
            viewport: self.viewport,
            order: self.order,
        }
    }
}
