//! Single-overlay modal state machine.
//!
//! At most one modal is open. Remote data for a modal is applied only when
//! it answers the latest load ticket, so a slow detail response for one row
//! can never fill the dialog opened for another.

/// Delay between a successful mutation and the dialog closing, so the toast
/// is visible first.
pub const SUCCESS_CLOSE_DELAY_MS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    View,
    Edit,
    Create,
    Confirm,
    Assign,
    ChangePassword,
    EnterResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    CloseButton,
    Backdrop,
    Escape,
    MutationSucceeded,
}

/// Identifies one remote load. Only the newest ticket may resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct OpenModal<P> {
    pub kind: ModalKind,
    /// Id of the record the modal acts on, if any.
    pub target: Option<String>,
    /// `None` while the remote payload is loading.
    pub payload: Option<P>,
    pub ticket: LoadTicket,
}

impl<P> OpenModal<P> {
    pub fn is_loading(&self) -> bool {
        self.payload.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModalController<P> {
    open: Option<OpenModal<P>>,
    last_ticket: u64,
}

impl<P> Default for ModalController<P> {
    fn default() -> Self {
        Self {
            open: None,
            last_ticket: 0,
        }
    }
}

impl<P> ModalController<P> {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_ticket(&mut self) -> LoadTicket {
        self.last_ticket += 1;
        LoadTicket(self.last_ticket)
    }

    /// Open a modal whose payload is fetched remotely. Any open modal is
    /// closed first. Pass the returned ticket to [`Self::resolve`].
    pub fn open(&mut self, kind: ModalKind, target: Option<String>) -> LoadTicket {
        if let Some(previous) = &self.open {
            tracing::debug!(from = ?previous.kind, to = ?kind, "replacing open modal");
        }
        let ticket = self.next_ticket();
        self.open = Some(OpenModal {
            kind,
            target,
            payload: None,
            ticket,
        });
        ticket
    }

    /// Open a modal whose payload is already at hand.
    pub fn open_with(&mut self, kind: ModalKind, target: Option<String>, payload: P) -> LoadTicket {
        let ticket = self.open(kind, target);
        self.resolve(ticket, payload);
        ticket
    }

    /// Apply a loaded payload. Ignored (returns `false`) when the modal was
    /// closed or replaced since the load started.
    pub fn resolve(&mut self, ticket: LoadTicket, payload: P) -> bool {
        match &mut self.open {
            Some(open) if open.ticket == ticket => {
                open.payload = Some(payload);
                true
            },
            _ => {
                tracing::debug!(?ticket, "dropping stale modal payload");
                false
            },
        }
    }

    /// Close when `ticket` is still the open modal. Used when a load for the
    /// modal failed.
    pub fn abandon(&mut self, ticket: LoadTicket) -> bool {
        if self.is_current(ticket) {
            self.open = None;
            return true;
        }
        false
    }

    /// Returns whether a modal was open.
    pub fn close(&mut self, reason: CloseReason) -> bool {
        match self.open.take() {
            Some(open) => {
                tracing::debug!(kind = ?open.kind, ?reason, "modal closed");
                true
            },
            None => false,
        }
    }

    /// Keyboard handler: only Escape closes.
    pub fn handle_key(&mut self, key: &str) -> bool {
        key == "Escape" && self.close(CloseReason::Escape)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.open
            .as_ref()
            .is_some_and(|open| open.ticket == ticket)
    }

    pub fn current(&self) -> Option<&OpenModal<P>> {
        self.open.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut OpenModal<P>> {
        self.open.as_mut()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// The page body must not scroll while any modal is open.
    pub fn body_scroll_locked(&self) -> bool {
        self.is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_detail_never_fills_the_newer_target() {
        let mut modal = ModalController::<&str>::new();
        let ticket_a = modal.open(ModalKind::Edit, Some("a".into()));
        let ticket_b = modal.open(ModalKind::Edit, Some("b".into()));

        assert!(modal.resolve(ticket_b, "detail of b"));
        assert!(!modal.resolve(ticket_a, "detail of a"));

        let open = modal.current().expect("edit modal open");
        assert_eq!(open.target.as_deref(), Some("b"));
        assert_eq!(open.payload, Some("detail of b"));
    }

    #[test]
    fn late_detail_after_close_is_dropped() {
        let mut modal = ModalController::<u32>::new();
        let ticket = modal.open(ModalKind::View, Some("1".into()));
        modal.close(CloseReason::CloseButton);
        assert!(!modal.resolve(ticket, 1));
        assert!(!modal.is_open());
    }

    #[test]
    fn every_close_path_unlocks_body_scroll() {
        for reason in [
            CloseReason::CloseButton,
            CloseReason::Backdrop,
            CloseReason::Escape,
            CloseReason::MutationSucceeded,
        ] {
            let mut modal = ModalController::<()>::new();
            modal.open_with(ModalKind::Confirm, None, ());
            assert!(modal.body_scroll_locked());
            assert!(modal.close(reason));
            assert!(!modal.body_scroll_locked(), "{reason:?}");
        }
    }

    #[test]
    fn only_escape_key_closes() {
        let mut modal = ModalController::<()>::new();
        modal.open_with(ModalKind::Create, None, ());
        assert!(!modal.handle_key("Enter"));
        assert!(modal.is_open());
        assert!(modal.handle_key("Escape"));
        assert!(!modal.is_open());
    }

    #[test]
    fn opening_a_second_modal_replaces_the_first() {
        let mut modal = ModalController::<()>::new();
        let first = modal.open_with(ModalKind::View, Some("1".into()), ());
        modal.open(ModalKind::Confirm, Some("2".into()));
        assert!(!modal.is_current(first));
        assert_eq!(modal.current().map(|open| open.kind), Some(ModalKind::Confirm));
        assert!(!modal.abandon(first));
    }
}
