/// Load state for a page's list or detail data.
///
/// One enum instead of separate `loading` / `error` / `items` signals, so a
/// page is never both loading and failed.
///
/// # Examples
///
/// ```ignore
/// let mut state = use_signal(|| DataState::<Page<Client>>::Pending);
///
/// state.set(DataState::Loading);
/// match clients::list(&api, &query).await {
///     Ok(page) => state.set(DataState::Loaded(page)),
///     Err(e) => state.set(DataState::Error(e.to_string())),
/// }
/// ```

#[derive(Debug, Clone, PartialEq)]
pub enum DataState<T> {
    /// Nothing requested yet
    Pending,

    Loading,

    Loaded(T),

    /// Failed with a message ready for display
    Error(String),
}

/// What a list section should render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListView {
    Loading,
    Failed,
    /// Nothing registered at all
    Empty,
    /// Filters or search matched nothing
    NoResults,
    Rows,
}

impl<T> DataState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, DataState::Loading | DataState::Pending)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            DataState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DataState::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn map<U, F>(self, f: F) -> DataState<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            DataState::Pending => DataState::Pending,
            DataState::Loading => DataState::Loading,
            DataState::Loaded(data) => DataState::Loaded(f(data)),
            DataState::Error(msg) => DataState::Error(msg),
        }
    }

    /// Pick the list section to render given the loaded item count and
    /// whether a search or filter is active
    pub fn list_view(&self, len: impl Fn(&T) -> usize, filtered: bool) -> ListView {
        match self {
            DataState::Pending | DataState::Loading => ListView::Loading,
            DataState::Error(_) => ListView::Failed,
            DataState::Loaded(data) if len(data) > 0 => ListView::Rows,
            DataState::Loaded(_) if filtered => ListView::NoResults,
            DataState::Loaded(_) => ListView::Empty,
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for DataState<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => DataState::Loaded(data),
            Err(e) => DataState::Error(e.to_string()),
        }
    }
}

impl<T> Default for DataState<T> {
    fn default() -> Self {
        DataState::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_view_states() {
        let len = |v: &Vec<u32>| v.len();
        assert_eq!(DataState::<Vec<u32>>::Loading.list_view(len, false), ListView::Loading);
        assert_eq!(DataState::<Vec<u32>>::Pending.list_view(len, true), ListView::Loading);
        assert_eq!(
            DataState::<Vec<u32>>::Error("x".into()).list_view(len, false),
            ListView::Failed
        );
        assert_eq!(DataState::Loaded(vec![1]).list_view(len, true), ListView::Rows);
        assert_eq!(DataState::Loaded(Vec::<u32>::new()).list_view(len, true), ListView::NoResults);
        assert_eq!(DataState::Loaded(Vec::<u32>::new()).list_view(len, false), ListView::Empty);
    }

    #[test]
    fn test_from_result_and_map() {
        let ok: DataState<u32> = Ok::<u32, String>(2).into();
        assert_eq!(ok.clone().map(|v| v * 2).data(), Some(&4));
        let err: DataState<u32> = Err::<u32, String>("falhou".to_string()).into();
        assert_eq!(err.error(), Some("falhou"));
        assert!(!err.is_loading());
    }
}
