pub mod debounce;
pub mod sequence;
pub mod session;
pub mod view;

pub use debounce::Debouncer;
pub use sequence::{RequestSequence, Ticket};
pub use session::{DisplayOutcome, SearchSession, SessionPhase, SessionSettings};
pub use view::{SearchView, SnapshotView, ViewSnapshot};
