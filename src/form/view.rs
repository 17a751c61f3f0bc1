//! Render-ready projection of [`FormState`]. Renderers read this instead of
//! re-deriving captions and visibility from the raw state.

use super::{
    state::FormState,
    types::{FieldKey, FormMode, MessageKind, ResultMessage},
};

const LOGIN_FIELDS: &[FieldKey] = &[FieldKey::Email, FieldKey::Password];
const SIGNUP_FIELDS: &[FieldKey] = &[
    FieldKey::Username,
    FieldKey::Email,
    FieldKey::Password,
    FieldKey::ConfirmPassword,
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormView {
    pub mode: FormMode,
    pub fields: &'static [FieldKey],
    pub submit_label: &'static str,
    pub submit_enabled: bool,
    pub banner: Option<ResultMessage>,
}

impl FormView {
    #[must_use]
    pub fn from_state(state: &FormState) -> Self {
        let pending = state.is_pending();
        let banner = (state.message.kind != MessageKind::None).then(|| state.message.clone());

        Self {
            mode: state.mode,
            fields: visible_fields(state.mode),
            submit_label: submit_label(state.mode, pending),
            submit_enabled: !pending,
            banner,
        }
    }
}

#[must_use]
pub const fn visible_fields(mode: FormMode) -> &'static [FieldKey] {
    match mode {
        FormMode::Login => LOGIN_FIELDS,
        FormMode::Signup => SIGNUP_FIELDS,
    }
}

#[must_use]
pub const fn field_label(key: FieldKey) -> &'static str {
    match key {
        FieldKey::Username => "Full Name",
        FieldKey::Email => "Email",
        FieldKey::Password => "Password",
        FieldKey::ConfirmPassword => "Confirm Password",
    }
}

#[must_use]
pub const fn submit_label(mode: FormMode, pending: bool) -> &'static str {
    match (mode, pending) {
        (FormMode::Login, false) => "Login",
        (FormMode::Login, true) => "Logging in...",
        (FormMode::Signup, false) => "Create Account",
        (FormMode::Signup, true) => "Signing up...",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::state::Event;

    #[test]
    fn login_view_shows_email_and_password() {
        let view = FormView::from_state(&FormState::new(FormMode::Login));
        assert_eq!(view.fields, &[FieldKey::Email, FieldKey::Password]);
        assert_eq!(view.submit_label, "Login");
        assert!(view.submit_enabled);
        assert_eq!(view.banner, None);
    }

    #[test]
    fn pending_signup_view_disables_submit() {
        let mut state = FormState::new(FormMode::Signup);
        state.apply(Event::SubmitStarted);

        let view = FormView::from_state(&state);
        assert_eq!(view.fields.len(), 4);
        assert_eq!(view.submit_label, "Signing up...");
        assert!(!view.submit_enabled);
    }

    #[test]
    fn banner_follows_message() {
        let mut state = FormState::new(FormMode::Signup);
        state.apply(Event::SubmitRejected("Passwords do not match".to_string()));

        let view = FormView::from_state(&state);
        assert_eq!(
            view.banner,
            Some(ResultMessage::error("Passwords do not match"))
        );
    }

    #[test]
    fn labels() {
        assert_eq!(field_label(FieldKey::Username), "Full Name");
        assert_eq!(field_label(FieldKey::ConfirmPassword), "Confirm Password");
        assert_eq!(submit_label(FormMode::Login, true), "Logging in...");
    }
}
