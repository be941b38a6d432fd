//! Marker state core
//!
//! Everything that has invariants lives here: the host-shaped records, the
//! editable draft and its transform, the reconciler that mirrors host
//! pushes, the table projection, the debounced search box, the clipboard
//! and the active draft. None of it does I/O, and none of it can fail:
//! the worst a malformed host push can do is leave fields empty.
//!
//! ```text
//! host events ──▶ reconciler ──▶ BlipCollection ──▶ view::derive ──▶ rows
//!                                     │
//!                         open / new  ▼
//!                  ActiveDraft ◀── to_draft        ClipboardRelay
//!                      │                               (beside the draft)
//!                      └──▶ to_submission ──▶ createBlip
//! ```

pub mod clipboard;
pub mod draft;
pub mod model;
pub mod reconciler;
pub mod search;
pub mod store;
pub mod view;

pub use clipboard::ClipboardRelay;
pub use draft::{
    to_draft, to_submission, to_submission_with, DraftRecord, FlagPolicy, GroupEntry,
    SubmissionPayload,
};
pub use model::{FlagField, GroupAccess, MarkerFlags, MarkerRecord};
pub use reconciler::{BlipCollection, BlipUpdate, ReconcileOutcome};
pub use search::SearchDebouncer;
pub use store::{ActiveDraft, DraftEdit};
pub use view::{derive, BlipView, SortColumn, SortDirection, SortState, ViewQuery, PAGE_SIZE};
