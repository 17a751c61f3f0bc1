//! Reducer for the login/signup form.
//!
//! `FormState` is plain data. Every change goes through [`FormState::apply`] (or
//! the consuming [`update`]) so the same sequence of events always produces the
//! same state, with or without a renderer attached.

use super::types::{
    FieldKey, FormFields, FormMode, RequestId, RequestStatus, ResultMessage,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormState {
    pub mode: FormMode,
    pub fields: FormFields,
    pub status: RequestStatus,
    pub message: ResultMessage,
    in_flight: Option<RequestId>,
    last_request: RequestId,
}

/// Everything that can change the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    FieldChanged { key: FieldKey, value: String },
    /// Explicit tab selection; clears the banner but keeps field values.
    ModeSelected(FormMode),
    /// A submit passed local checks and a request is about to be sent.
    SubmitStarted,
    /// A submit failed local checks; nothing is sent.
    SubmitRejected(String),
    Completed {
        request: RequestId,
        message: ResultMessage,
    },
    /// Deferred switch after a successful registration; the banner stays.
    GracePeriodElapsed(FormMode),
}

impl FormState {
    #[must_use]
    pub fn new(mode: FormMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// The submission currently awaiting a response, if any.
    #[must_use]
    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight
    }

    /// Applies one event in place. Returns `false` when the event was ignored
    /// and nothing changed.
    pub fn apply(&mut self, event: Event) -> bool {
        match event {
            Event::FieldChanged { key, value } => {
                if self.fields.get(key) == value {
                    return false;
                }
                self.fields.set(key, value);
                true
            }
            Event::ModeSelected(mode) => {
                let changed = self.mode != mode || !self.message.is_none();
                self.mode = mode;
                self.message = ResultMessage::none();
                changed
            }
            Event::SubmitStarted => {
                if self.is_pending() {
                    return false;
                }
                let request = self.last_request.next();
                self.last_request = request;
                self.in_flight = Some(request);
                self.status = RequestStatus::Pending;
                self.message = ResultMessage::none();
                true
            }
            Event::SubmitRejected(text) => {
                if self.is_pending() {
                    return false;
                }
                self.status = RequestStatus::Idle;
                self.message = ResultMessage::error(text);
                true
            }
            Event::Completed { request, message } => {
                if self.in_flight != Some(request) {
                    return false;
                }
                self.in_flight = None;
                self.status = RequestStatus::Idle;
                self.message = message;
                true
            }
            Event::GracePeriodElapsed(mode) => {
                if self.mode == mode {
                    return false;
                }
                self.mode = mode;
                true
            }
        }
    }
}

/// Consuming form of [`FormState::apply`].
#[must_use]
pub fn update(mut state: FormState, event: Event) -> FormState {
    state.apply(event);
    state
}
