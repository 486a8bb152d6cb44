use crate::{DirectoryListing, FormId, JobUpdate, PickTarget};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub title: String,
    pub start: String,
    pub end: String,
    pub reason: String,
}

/// Decoded response envelope of a synchronous action.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionReply {
    pub success: bool,
    pub output: Option<String>,
    /// Present only on auto-map responses.
    pub chapters: Option<Vec<Chapter>>,
    /// Pretty-printed response body, shown when there is no `output`.
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User switched the visible panel.
    TabSelected(FormId),
    /// User edited a form field.
    FieldChanged {
        form: FormId,
        field: String,
        value: String,
    },
    /// User pressed a form's submit button.
    FormSubmitted(FormId),
    /// A synchronous action finished; `Err` carries a transport failure.
    ActionCompleted {
        form: FormId,
        result: Result<ActionReply, String>,
    },
    /// Backend accepted the full-auto submission.
    JobAccepted { job_id: String },
    /// Backend answered the submission with `success: false`.
    JobRejected { output: Option<String> },
    /// The submission request itself failed.
    JobSubmitFailed { error: String },
    /// A status poll returned a report.
    JobStatusReceived(JobUpdate),
    /// User asked to stop tracking the job.
    CancelJobClicked,
    /// The poller stopped because of a cancellation.
    JobCancelled,
    /// User opened the remote file picker for a form field.
    FilePickerOpened(PickTarget),
    /// User clicked a directory or the parent entry.
    NavigateRequested { path: String },
    ListingLoaded {
        seq: u64,
        listing: DirectoryListing,
    },
    ListingFailed { seq: u64, error: String },
    /// User clicked a file in the picker.
    FileSelected { filename: String },
    FilePickerClosed,
    /// User clicked a `[HH:MM:SS]` timestamp in the console.
    TimestampClicked(String),
    OpenFolderClicked,
    ClearConsole,
}
