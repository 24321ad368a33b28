use crate::error::ApiError;

/// Ticket for one in-flight request. Only the latest ticket may resolve.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

/// `{data, error, is_loading}` for one query, with supersession: when the
/// arguments change a new request starts and answers to older ones are
/// dropped on arrival.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
    data: Option<T>,
    error: Option<ApiError>,
    is_loading: bool,
    generation: u64,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: false,
            generation: 0,
        }
    }
}

impl<T> QueryState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Starts a request. The previous data stays visible until it resolves.
    pub fn begin(&mut self) -> RequestId {
        self.generation += 1;
        self.is_loading = true;
        self.error = None;
        RequestId(self.generation)
    }

    pub fn is_current(&self, id: RequestId) -> bool {
        id.0 == self.generation
    }

    /// Applies an answer. Returns `false` and changes nothing when `id` has
    /// been superseded. `Ok(None)` clears the data ("no data").
    pub fn resolve(&mut self, id: RequestId, result: Result<Option<T>, ApiError>) -> bool {
        if !self.is_current(id) {
            tracing::debug!(stale = id.0, current = self.generation, "dropping superseded response");
            return false;
        }
        self.is_loading = false;
        match result {
            Ok(data) => {
                self.data = data;
                self.error = None;
            }
            Err(err) => {
                tracing::warn!(%err, "query failed");
                self.data = None;
                self.error = Some(err);
            }
        }
        true
    }

    /// Forgets everything and invalidates outstanding requests.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.data = None;
        self.error = None;
        self.is_loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::QueryState;
    use crate::error::ApiError;

    #[test]
    fn newer_request_wins_regardless_of_arrival_order() {
        let mut state: QueryState<u32> = QueryState::new();
        let first = state.begin();
        let second = state.begin();
        assert!(state.is_loading());

        assert!(state.resolve(second, Ok(Some(2))));
        assert!(!state.resolve(first, Ok(Some(1))));
        assert_eq!(state.data(), Some(&2));
        assert!(!state.is_loading());
    }

    #[test]
    fn errors_and_no_data() {
        let mut state: QueryState<u32> = QueryState::new();
        let id = state.begin();
        state.resolve(id, Err(ApiError::Transport("refused".to_owned())));
        assert!(state.error().is_some());
        assert_eq!(state.data(), None);

        let id = state.begin();
        assert!(state.error().is_none());
        state.resolve(id, Ok(None));
        assert_eq!(state.data(), None);
        assert!(!state.is_loading());
    }

    #[test]
    fn reset_invalidates_in_flight() {
        let mut state: QueryState<u32> = QueryState::new();
        let id = state.begin();
        state.reset();
        assert!(!state.resolve(id, Ok(Some(9))));
        assert_eq!(state.data(), None);
    }
}
