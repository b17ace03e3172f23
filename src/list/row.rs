/// Identifies one optimistic write while it is in flight.
pub type OpId = u64;

/// Whether a row reflects the backend yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Confirmed,
    /// Applied locally, waiting for the backend to answer the given operation.
    Pending(OpId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row<R> {
    pub record: R,
    pub sync: SyncState,
}

impl<R> Row<R> {
    pub fn confirmed(record: R) -> Self {
        Row {
            record,
            sync: SyncState::Confirmed,
        }
    }

    pub fn pending(record: R, op: OpId) -> Self {
        Row {
            record,
            sync: SyncState::Pending(op),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.sync, SyncState::Pending(_))
    }

    pub(crate) fn is_owned_by(&self, op: OpId) -> bool {
        self.sync == SyncState::Pending(op)
    }
}
