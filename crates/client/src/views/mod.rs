//! Per-screen state and actions. Rendering lives elsewhere; each view holds
//! the form fields, processing flag, errors and lists that its screen shows.

mod form;
mod home;
mod identify;
mod login;
mod notifications;
mod profile;
mod register;
mod waste_history;

pub use form::FormState;
pub use home::{HomeView, MenuBadge};
pub use identify::{IdentifyView, PERMISSION_REQUIRED};
pub use login::{LoginView, NETWORK_ERROR, SIGN_IN_FAILED};
pub use notifications::NotificationsView;
pub use profile::ProfileView;
pub use register::{RegisterView, UNEXPECTED_ERROR};
pub use waste_history::WasteHistoryView;
