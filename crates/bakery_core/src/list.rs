//! Per-screen list loading state machine.
//!
//! A [`ListController`] owns the snapshot of one list screen. Every fetch is
//! tagged with a [`FetchTicket`]; results whose ticket is not the one the
//! controller is waiting for are dropped, which is how results for an
//! unmounted screen or a superseded fetch become no-ops.

use bakery_logging::bakery_debug;

/// Identifies one mounted screen instance. Closing a scope cancels its calls.
pub type ScopeId = u64;

/// Scope of app-level calls (login, mutations). Never cancelled.
pub const ROOT_SCOPE: ScopeId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    pub scope: ScopeId,
    pub seq: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListPhase<R> {
    Idle,
    Loading,
    Loaded(Vec<R>),
    Failed(String),
}

impl<R> Default for ListPhase<R> {
    fn default() -> Self {
        ListPhase::Idle
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent<R> {
    /// The screen became active under a fresh scope.
    Mount(ScopeId),
    /// Explicit or mutation-triggered refresh.
    Refresh,
    Fetched {
        ticket: FetchTicket,
        result: Result<Vec<R>, String>,
    },
    Unmount,
}

/// What the caller has to do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    Fetch(FetchTicket),
    /// A snapshot landed; rows may now be enriched under this ticket.
    Loaded(FetchTicket),
    Failed(String),
    CloseScope(ScopeId),
}

/// Secondary per-row value fetched after the snapshot lands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Enrichment<T> {
    #[default]
    Pending,
    Ready(T),
    Unavailable,
}

impl<T: Clone> Enrichment<T> {
    pub fn value_or(&self, fallback: T) -> T {
        match self {
            Enrichment::Ready(value) => value.clone(),
            Enrichment::Pending | Enrichment::Unavailable => fallback,
        }
    }
}

pub trait ListRow {
    type Key: Copy + PartialEq;

    fn key(&self) -> Self::Key;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListController<R> {
    scope: Option<ScopeId>,
    seq: u64,
    phase: ListPhase<R>,
}

impl<R> Default for ListController<R> {
    fn default() -> Self {
        Self {
            scope: None,
            seq: 0,
            phase: ListPhase::Idle,
        }
    }
}

impl<R> ListController<R> {
    pub fn phase(&self) -> &ListPhase<R> {
        &self.phase
    }

    pub fn scope(&self) -> Option<ScopeId> {
        self.scope
    }

    pub fn is_mounted(&self) -> bool {
        self.scope.is_some()
    }

    pub fn rows(&self) -> &[R] {
        match &self.phase {
            ListPhase::Loaded(rows) => rows,
            _ => &[],
        }
    }

    fn current_ticket(&self) -> Option<FetchTicket> {
        self.scope.map(|scope| FetchTicket {
            scope,
            seq: self.seq,
        })
    }

    fn begin_fetch(&mut self, scope: ScopeId) -> ListAction {
        self.seq += 1;
        self.phase = ListPhase::Loading;
        ListAction::Fetch(FetchTicket {
            scope,
            seq: self.seq,
        })
    }

    /// The single transition function of the list state machine.
    pub fn transition(&mut self, event: ListEvent<R>) -> Option<ListAction> {
        match event {
            ListEvent::Mount(scope) => {
                self.scope = Some(scope);
                Some(self.begin_fetch(scope))
            }
            ListEvent::Refresh => {
                let scope = self.scope?;
                if matches!(self.phase, ListPhase::Loading) {
                    bakery_debug!("Refresh ignored: scope {} already loading", scope);
                    return None;
                }
                Some(self.begin_fetch(scope))
            }
            ListEvent::Fetched { ticket, result } => {
                if self.current_ticket() != Some(ticket)
                    || !matches!(self.phase, ListPhase::Loading)
                {
                    bakery_debug!(
                        "Dropping stale list result scope={} seq={}",
                        ticket.scope,
                        ticket.seq
                    );
                    return None;
                }
                match result {
                    Ok(rows) => {
                        self.phase = ListPhase::Loaded(rows);
                        Some(ListAction::Loaded(ticket))
                    }
                    Err(message) => {
                        self.phase = ListPhase::Failed(message.clone());
                        Some(ListAction::Failed(message))
                    }
                }
            }
            ListEvent::Unmount => {
                let scope = self.scope.take()?;
                self.phase = ListPhase::Idle;
                Some(ListAction::CloseScope(scope))
            }
        }
    }
}

impl<R: ListRow> ListController<R> {
    /// Applies `apply` to the row with `key`, if `ticket` still names the
    /// snapshot on screen. Returns whether a row was touched.
    pub fn update_row(
        &mut self,
        ticket: FetchTicket,
        key: R::Key,
        apply: impl FnOnce(&mut R),
    ) -> bool {
        if self.current_ticket() != Some(ticket) {
            return false;
        }
        match &mut self.phase {
            ListPhase::Loaded(rows) => match rows.iter_mut().find(|row| row.key() == key) {
                Some(row) => {
                    apply(row);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    pub fn find(&self, key: R::Key) -> Option<&R> {
        self.rows().iter().find(|row| row.key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Row(u32, Enrichment<u8>);

    impl ListRow for Row {
        type Key = u32;

        fn key(&self) -> u32 {
            self.0
        }
    }

    fn ticket(scope: ScopeId, seq: u64) -> FetchTicket {
        FetchTicket { scope, seq }
    }

    #[test]
    fn idle_loading_loaded() {
        let mut list = ListController::<Row>::default();
        assert_eq!(list.phase(), &ListPhase::Idle);
        assert_eq!(list.transition(ListEvent::Refresh), None);

        assert_eq!(
            list.transition(ListEvent::Mount(3)),
            Some(ListAction::Fetch(ticket(3, 1)))
        );
        assert_eq!(list.phase(), &ListPhase::Loading);

        let rows = vec![Row(1, Enrichment::Pending), Row(2, Enrichment::Pending)];
        assert_eq!(
            list.transition(ListEvent::Fetched {
                ticket: ticket(3, 1),
                result: Ok(rows.clone()),
            }),
            Some(ListAction::Loaded(ticket(3, 1)))
        );
        assert_eq!(list.rows(), rows.as_slice());
    }

    #[test]
    fn failure_discards_previous_snapshot() {
        let mut list = ListController::default();
        list.transition(ListEvent::Mount(1));
        list.transition(ListEvent::Fetched {
            ticket: ticket(1, 1),
            result: Ok(vec![Row(1, Enrichment::Pending)]),
        });
        assert_eq!(
            list.transition(ListEvent::Refresh),
            Some(ListAction::Fetch(ticket(1, 2)))
        );
        assert_eq!(
            list.transition(ListEvent::Fetched {
                ticket: ticket(1, 2),
                result: Err("down".to_string()),
            }),
            Some(ListAction::Failed("down".to_string()))
        );
        assert!(list.rows().is_empty());

        // Failed -> Loading again on refresh.
        assert_eq!(
            list.transition(ListEvent::Refresh),
            Some(ListAction::Fetch(ticket(1, 3)))
        );
    }

    #[test]
    fn unmount_closes_scope_and_drops_late_results() {
        let mut list = ListController::<Row>::default();
        list.transition(ListEvent::Mount(4));
        assert_eq!(
            list.transition(ListEvent::Unmount),
            Some(ListAction::CloseScope(4))
        );
        assert_eq!(
            list.transition(ListEvent::Fetched {
                ticket: ticket(4, 1),
                result: Ok(vec![Row(1, Enrichment::Pending)]),
            }),
            None
        );
        assert_eq!(list.phase(), &ListPhase::Idle);
        assert_eq!(list.transition(ListEvent::Unmount), None);
    }

    #[test]
    fn update_row_respects_ticket() {
        let mut list = ListController::default();
        list.transition(ListEvent::Mount(1));
        list.transition(ListEvent::Fetched {
            ticket: ticket(1, 1),
            result: Ok(vec![Row(7, Enrichment::Pending)]),
        });

        assert!(!list.update_row(ticket(1, 0), 7, |row| row.1 = Enrichment::Ready(1)));
        assert!(!list.update_row(ticket(1, 1), 8, |row| row.1 = Enrichment::Ready(1)));
        assert!(list.update_row(ticket(1, 1), 7, |row| row.1 = Enrichment::Ready(2)));
        assert_eq!(list.find(7).map(|row| row.1.value_or(0)), Some(2));
    }
}
