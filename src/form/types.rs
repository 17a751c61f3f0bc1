use std::fmt;
use url::{form_urlencoded, Url};

/// Which form is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FormMode {
    #[default]
    Login,
    Signup,
}

impl FormMode {
    /// Picks the initial mode from a query string; only `signup=true` selects signup.
    ///
    /// A leading `?` is accepted. When the key repeats, the first occurrence wins.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let signup = form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "signup")
            .is_some_and(|(_, value)| value == "true");

        if signup {
            Self::Signup
        } else {
            Self::Login
        }
    }

    /// Picks the initial mode from the query of a full location.
    #[must_use]
    pub fn from_location(location: &Url) -> Self {
        location.query().map_or(Self::Login, Self::from_query)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
        }
    }
}

impl fmt::Display for FormMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four recognised input ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Username,
    Email,
    Password,
    ConfirmPassword,
}

impl FieldKey {
    pub const ALL: [Self; 4] = [
        Self::Username,
        Self::Email,
        Self::Password,
        Self::ConfirmPassword,
    ];

    /// Maps an input id as the renderer names it.
    #[must_use]
    pub fn parse(id: &str) -> Option<Self> {
        match id {
            "username" => Some(Self::Username),
            "email" => Some(Self::Email),
            "password" => Some(Self::Password),
            "confirmPassword" => Some(Self::ConfirmPassword),
            _ => None,
        }
    }

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
        }
    }

    /// Whether the input should be masked when rendered.
    #[must_use]
    pub const fn is_secret(self) -> bool {
        matches!(self, Self::Password | Self::ConfirmPassword)
    }
}

/// Raw field values. All four are always present, whichever form is active.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl FormFields {
    #[must_use]
    pub fn get(&self, key: FieldKey) -> &str {
        match key {
            FieldKey::Username => &self.username,
            FieldKey::Email => &self.email,
            FieldKey::Password => &self.password,
            FieldKey::ConfirmPassword => &self.confirm_password,
        }
    }

    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) {
        let slot = match key {
            FieldKey::Username => &mut self.username,
            FieldKey::Email => &mut self.email,
            FieldKey::Password => &mut self.password,
            FieldKey::ConfirmPassword => &mut self.confirm_password,
        };
        *slot = value.into();
    }

    #[must_use]
    pub fn passwords_match(&self) -> bool {
        self.password == self.confirm_password
    }
}

impl fmt::Debug for FormFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormFields")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"***")
            .field("confirm_password", &"***")
            .finish()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequestStatus {
    #[default]
    Idle,
    Pending,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MessageKind {
    #[default]
    None,
    Success,
    Error,
}

/// Banner text shown above the form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl ResultMessage {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        self.kind == MessageKind::None
    }
}

/// Identifies one submission so late completions can be recognised.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

impl RequestId {
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}
