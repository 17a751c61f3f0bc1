//! Login/signup form state: the data model, the reducer that updates it, a
//! render-ready view of it, and the controller that ties submissions to the
//! identity service.

pub mod controller;
pub mod state;
pub mod types;
pub mod view;

pub use controller::{FormController, SubmitEvent, MODE_SWITCH_DELAY};
pub use state::{update, Event, FormState};
pub use types::{FieldKey, FormFields, FormMode, MessageKind, RequestId, RequestStatus, ResultMessage};
pub use view::FormView;
