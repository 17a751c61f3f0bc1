//! Single source of truth for one login/signup form.
//!
//! The controller publishes every state change on a `watch` channel; renderers
//! subscribe and redraw from the latest snapshot. Submissions are guarded so at
//! most one request is in flight, whatever the renderer does with its submit
//! button.

use super::{
    state::{Event, FormState},
    types::{FieldKey, FormMode, RequestId},
    view::FormView,
};
use crate::{
    auth::{
        client::IdentityService,
        dispatcher::{validate_signup, AuthDispatcher, Effect},
        navigation::Navigator,
    },
    schedule::ScheduledTask,
};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::sync::watch;
use tracing::{debug, info};

/// Grace period between a successful signup and the switch to the login form.
pub const MODE_SWITCH_DELAY: Duration = Duration::from_millis(2000);

/// The submit intent forwarded by the renderer. The controller prevents the
/// default (native) submission before doing anything else.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    #[must_use]
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

pub struct FormController<S> {
    state: Arc<watch::Sender<FormState>>,
    dispatcher: AuthDispatcher<S>,
    navigator: Arc<dyn Navigator>,
    mode_switch: Mutex<Option<ScheduledTask>>,
    mode_switch_delay: Duration,
}

impl<S: IdentityService> FormController<S> {
    pub fn new(
        initial_mode: FormMode,
        dispatcher: AuthDispatcher<S>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (state, _) = watch::channel(FormState::new(initial_mode));
        Self {
            state: Arc::new(state),
            dispatcher,
            navigator,
            mode_switch: Mutex::new(None),
            mode_switch_delay: MODE_SWITCH_DELAY,
        }
    }

    #[must_use]
    pub fn with_mode_switch_delay(mut self, delay: Duration) -> Self {
        self.mode_switch_delay = delay;
        self
    }

    /// Receives a notification for every change; the renderer redraws from it.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> FormState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn view(&self) -> FormView {
        FormView::from_state(&self.state.borrow())
    }

    pub fn set_field(&self, key: FieldKey, value: impl Into<String>) {
        self.apply(Event::FieldChanged {
            key,
            value: value.into(),
        });
    }

    pub fn set_mode(&self, mode: FormMode) {
        self.apply(Event::ModeSelected(mode));
    }

    /// Submits whichever form is active.
    pub async fn submit(&self, event: &mut SubmitEvent) {
        let mode = self.state.borrow().mode;
        match mode {
            FormMode::Login => self.submit_login(event).await,
            FormMode::Signup => self.submit_signup(event).await,
        }
    }

    pub async fn submit_login(&self, event: &mut SubmitEvent) {
        event.prevent_default();

        let Some(request) = self.begin() else {
            debug!("login submit ignored while a request is pending");
            return;
        };

        let fields = self.state.borrow().fields.clone();
        let resolution = self.dispatcher.login(&fields).await;

        self.apply(Event::Completed {
            request,
            message: resolution.message,
        });
        self.follow(resolution.effect);
    }

    pub async fn submit_signup(&self, event: &mut SubmitEvent) {
        event.prevent_default();

        let fields = {
            let state = self.state.borrow();
            if state.is_pending() {
                debug!("signup submit ignored while a request is pending");
                return;
            }
            state.fields.clone()
        };

        if let Err(text) = validate_signup(&fields) {
            self.apply(Event::SubmitRejected(text.to_string()));
            return;
        }

        let Some(request) = self.begin() else {
            debug!("signup submit ignored while a request is pending");
            return;
        };

        let resolution = self.dispatcher.signup(&fields).await;

        self.apply(Event::Completed {
            request,
            message: resolution.message,
        });
        self.follow(resolution.effect);
    }

    /// Drops a scheduled mode switch that has not fired yet.
    pub fn cancel_mode_switch(&self) {
        if let Ok(mut slot) = self.mode_switch.lock() {
            if let Some(task) = slot.take() {
                task.cancel();
            }
        }
    }

    /// Tears the form down; a pending mode switch never fires afterwards.
    pub fn dispose(self) {
        self.cancel_mode_switch();
    }

    /// Moves the form to Pending and returns the new request id, or `None` if a
    /// request is already in flight. Check and transition happen under one lock.
    fn begin(&self) -> Option<RequestId> {
        let mut request = None;
        self.state.send_if_modified(|state| {
            let started = state.apply(Event::SubmitStarted);
            if started {
                request = state.in_flight();
            }
            started
        });
        request
    }

    fn apply(&self, event: Event) {
        self.state.send_if_modified(|state| state.apply(event));
    }

    fn follow(&self, effect: Option<Effect>) {
        match effect {
            Some(Effect::Navigate(path)) => {
                info!(path = %path, "authenticated");
                self.navigator.go_to(&path);
            }
            Some(Effect::SwitchMode(mode)) => self.schedule_mode_switch(mode),
            None => {}
        }
    }

    fn schedule_mode_switch(&self, mode: FormMode) {
        let state = Arc::clone(&self.state);
        let task = ScheduledTask::after(self.mode_switch_delay, move || {
            state.send_if_modified(|state| state.apply(Event::GracePeriodElapsed(mode)));
        });

        if let Ok(mut slot) = self.mode_switch.lock() {
            // replacing the handle cancels the previous switch
            *slot = Some(task);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::{
            dispatcher::{LOGIN_FAILED, PASSWORDS_DO_NOT_MATCH, SIGNUP_SUCCEEDED},
            navigation::RecordingNavigator,
            session::{MemorySessionStore, SessionStore},
            types::{LoginRequest, RegisterRequest, TokenResponse},
        },
        error::AuthError,
        form::{MessageKind, RequestStatus, ResultMessage},
    };
    use async_trait::async_trait;
    use secrecy::{ExposeSecret, SecretString};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Answers every call with the same canned result and counts calls.
    struct StubService {
        reply: Result<String, AuthError>,
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl StubService {
        fn new(reply: Result<&str, AuthError>) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.map(ToString::to_string),
                calls: AtomicUsize::new(0),
                gate: None,
            })
        }

        fn gated(reply: Result<&str, AuthError>, gate: Arc<Notify>) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.map(ToString::to_string),
                calls: AtomicUsize::new(0),
                gate: Some(gate),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        async fn answer(&self) -> Result<TokenResponse, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.reply.clone().map(|token| TokenResponse {
                token: SecretString::from(token),
            })
        }
    }

    #[async_trait]
    impl IdentityService for StubService {
        async fn login(&self, _: &LoginRequest) -> Result<TokenResponse, AuthError> {
            self.answer().await
        }

        async fn register(&self, _: &RegisterRequest) -> Result<TokenResponse, AuthError> {
            self.answer().await
        }
    }

    struct Harness {
        controller: FormController<Arc<StubService>>,
        service: Arc<StubService>,
        store: Arc<MemorySessionStore>,
        navigator: Arc<RecordingNavigator>,
    }

    impl Harness {
        fn stored(&self) -> Option<String> {
            self.store
                .get()
                .ok()
                .flatten()
                .map(|t| t.expose_secret().to_string())
        }
    }

    fn harness(mode: FormMode, service: Arc<StubService>) -> Harness {
        let store = Arc::new(MemorySessionStore::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let dispatcher = AuthDispatcher::new(service.clone(), store.clone());
        let controller = FormController::new(mode, dispatcher, navigator.clone());
        Harness {
            controller,
            service,
            store,
            navigator,
        }
    }

    fn fill_signup(controller: &FormController<Arc<StubService>>, confirm: &str) {
        controller.set_field(FieldKey::Username, "John Doe");
        controller.set_field(FieldKey::Email, "m@example.com");
        controller.set_field(FieldKey::Password, "a");
        controller.set_field(FieldKey::ConfirmPassword, confirm);
    }

    #[tokio::test]
    async fn set_field_notifies_subscribers() {
        let h = harness(FormMode::Login, StubService::new(Ok("T")));
        let mut rx = h.controller.subscribe();

        h.controller.set_field(FieldKey::Email, "m@example.com");
        assert!(rx.has_changed().unwrap_or(false));
        assert_eq!(rx.borrow_and_update().fields.email, "m@example.com");
    }

    #[tokio::test]
    async fn submit_prevents_default() {
        let h = harness(FormMode::Login, StubService::new(Ok("T")));
        let mut event = SubmitEvent::new();
        h.controller.submit(&mut event).await;
        assert!(event.is_default_prevented());
    }

    #[tokio::test]
    async fn login_success_stores_token_and_navigates() {
        let h = harness(FormMode::Login, StubService::new(Ok("T1")));
        h.controller.set_field(FieldKey::Email, "m@example.com");
        h.controller.set_field(FieldKey::Password, "pw");

        h.controller.submit_login(&mut SubmitEvent::new()).await;

        let state = h.controller.snapshot();
        assert_eq!(state.status, RequestStatus::Idle);
        assert!(state.message.is_none());
        assert_eq!(h.stored(), Some("T1".to_string()));
        assert_eq!(h.navigator.visited(), vec!["/profile"]);
    }

    #[tokio::test]
    async fn login_network_failure_shows_generic_error() {
        let gate = Arc::new(Notify::new());
        let service = StubService::gated(Err(AuthError::Network("down".to_string())), gate.clone());
        let h = harness(FormMode::Login, service);
        let mut rx = h.controller.subscribe();

        let submit = async {
            h.controller.submit_login(&mut SubmitEvent::new()).await;
        };
        let observe = async {
            let pending = rx
                .wait_for(FormState::is_pending)
                .await
                .map(|state| state.status)
                .ok();
            gate.notify_one();
            pending
        };
        let ((), pending) = tokio::join!(submit, observe);

        assert_eq!(pending, Some(RequestStatus::Pending));
        let state = h.controller.snapshot();
        assert_eq!(state.status, RequestStatus::Idle);
        assert_eq!(state.message, ResultMessage::error(LOGIN_FAILED));
        assert!(h.navigator.visited().is_empty());
        assert_eq!(h.stored(), None);
    }

    #[tokio::test]
    async fn second_submit_while_pending_is_noop() {
        let gate = Arc::new(Notify::new());
        let service = StubService::gated(Ok("T1"), gate.clone());
        let h = harness(FormMode::Login, service);
        let mut rx = h.controller.subscribe();

        let first = async {
            h.controller.submit_login(&mut SubmitEvent::new()).await;
        };
        let second = async {
            let _ = rx.wait_for(FormState::is_pending).await;
            h.controller.submit_login(&mut SubmitEvent::new()).await;
            h.controller.submit_signup(&mut SubmitEvent::new()).await;
            gate.notify_one();
        };
        tokio::join!(first, second);

        assert_eq!(h.service.calls(), 1);
        assert_eq!(h.navigator.visited().len(), 1);
        assert_eq!(h.controller.snapshot().status, RequestStatus::Idle);
    }

    #[tokio::test]
    async fn signup_mismatch_never_calls_service() {
        let h = harness(FormMode::Signup, StubService::new(Ok("T")));
        fill_signup(&h.controller, "b");
        let mut rx = h.controller.subscribe();
        rx.borrow_and_update();

        h.controller.submit_signup(&mut SubmitEvent::new()).await;

        assert_eq!(h.service.calls(), 0);
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.status, RequestStatus::Idle);
        assert_eq!(state.message, ResultMessage::error(PASSWORDS_DO_NOT_MATCH));
        assert_eq!(h.stored(), None);
    }

    #[tokio::test]
    async fn signup_service_error_leaves_store_untouched() {
        let service = StubService::new(Err(AuthError::Service {
            status: 409,
            message: Some("Email taken".to_string()),
        }));
        let h = harness(FormMode::Signup, service);
        fill_signup(&h.controller, "a");

        h.controller.submit_signup(&mut SubmitEvent::new()).await;

        let state = h.controller.snapshot();
        assert_eq!(state.status, RequestStatus::Idle);
        assert_eq!(state.message, ResultMessage::error("Email taken"));
        assert_eq!(h.stored(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn signup_success_switches_to_login_once() {
        let h = harness(FormMode::Signup, StubService::new(Ok("T2")));
        fill_signup(&h.controller, "a");

        h.controller.submit_signup(&mut SubmitEvent::new()).await;

        let state = h.controller.snapshot();
        assert_eq!(state.message, ResultMessage::success(SIGNUP_SUCCEEDED));
        assert_eq!(state.mode, FormMode::Signup);
        assert_eq!(h.stored(), Some("T2".to_string()));
        assert!(h.navigator.visited().is_empty());

        tokio::time::sleep(MODE_SWITCH_DELAY - Duration::from_millis(1)).await;
        assert_eq!(h.controller.snapshot().mode, FormMode::Signup);

        tokio::time::sleep(Duration::from_millis(10)).await;
        let state = h.controller.snapshot();
        assert_eq!(state.mode, FormMode::Login);
        assert_eq!(state.message.kind, MessageKind::Success);

        // no second transition
        h.controller.set_mode(FormMode::Signup);
        tokio::time::sleep(MODE_SWITCH_DELAY * 3).await;
        assert_eq!(h.controller.snapshot().mode, FormMode::Signup);
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_before_switch_cancels_it() {
        let h = harness(FormMode::Signup, StubService::new(Ok("T2")));
        fill_signup(&h.controller, "a");
        let rx = h.controller.subscribe();

        h.controller.submit_signup(&mut SubmitEvent::new()).await;
        h.controller.dispose();

        tokio::time::sleep(MODE_SWITCH_DELAY * 2).await;
        assert_eq!(rx.borrow().mode, FormMode::Signup);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_before_switch_cancels_it() {
        let h = harness(FormMode::Signup, StubService::new(Ok("T2")));
        fill_signup(&h.controller, "a");
        let rx = h.controller.subscribe();

        h.controller.submit_signup(&mut SubmitEvent::new()).await;
        drop(h);

        tokio::time::sleep(MODE_SWITCH_DELAY * 2).await;
        assert_eq!(rx.borrow().mode, FormMode::Signup);
    }

    #[tokio::test]
    async fn set_mode_twice_equals_once() {
        let h = harness(FormMode::Signup, StubService::new(Ok("T")));
        fill_signup(&h.controller, "b");
        h.controller.submit_signup(&mut SubmitEvent::new()).await;

        h.controller.set_mode(FormMode::Login);
        let once = h.controller.snapshot();
        h.controller.set_mode(FormMode::Login);
        let twice = h.controller.snapshot();

        assert_eq!(once, twice);
        assert_eq!(twice.mode, FormMode::Login);
        assert!(twice.message.is_none());
        assert_eq!(twice.fields.confirm_password, "b");
    }

    #[tokio::test]
    async fn view_tracks_state() {
        let h = harness(FormMode::Login, StubService::new(Ok("T")));
        assert_eq!(h.controller.view().submit_label, "Login");

        h.controller.set_mode(FormMode::Signup);
        assert_eq!(h.controller.view().submit_label, "Create Account");
    }
}
