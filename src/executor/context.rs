use crate::store::DocumentStore;

/// Which public call an intent is being executed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMode {
    Run,
    Get,
    All,
}

impl CallMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Get => "get",
            Self::All => "all",
        }
    }
}

pub struct ExecutionContext<'a> {
    pub store: &'a dyn DocumentStore,
    pub mode: CallMode,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(store: &'a dyn DocumentStore, mode: CallMode) -> Self {
        Self { store, mode }
    }
}
