// Headless view-state for the dashboard client.
//
// Models the browser-side state with real invariants (session storage,
// section switching, debounced filtering, the detail modal, idempotent
// row rendering) without any DOM dependency. Markup and styling live
// with the static frontend, outside this crate.

mod session;
mod view;

pub use session::{MemoryStore, Session, SessionContext, SessionStore};
pub use view::{DashboardView, Row, Section, SubmitGuard};
