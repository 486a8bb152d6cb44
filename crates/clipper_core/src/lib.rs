//! Clipper core: pure state machine and view-model helpers.
mod console;
mod effect;
mod format;
mod forms;
mod job;
mod msg;
mod picker;
mod state;
mod update;
mod view_model;

pub use console::{split_timestamps, ConsoleSegment, ConsoleState, LogTone, CONSOLE_PLACEHOLDER};
pub use effect::Effect;
pub use format::{format_size, icon_for, progress_percent, FileIcon};
pub use forms::{AnalysisMethod, FormId, FormState, Forms, FullAutoParams};
pub use job::{JobOutcome, JobPhase, JobStatus, JobTracker, JobUpdate, DEFAULT_TOTAL_STEPS};
pub use msg::{ActionReply, Chapter, Msg};
pub use picker::{DirectoryListing, FileEntry, FilePicker, ListingState, PickTarget};
pub use state::AppState;
pub use update::update;
pub use view_model::{
    AppViewModel, ConsoleView, FilePanelBody, FilePanelView, FileRowView, FormView,
    JobProgressView, RowAction,
};
