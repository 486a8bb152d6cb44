use crate::{ConsoleSegment, FileIcon, FormId, JobPhase, LogTone};

/// Everything a front-end needs to draw the client. Strings are raw; escaping
/// is the renderer's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub active_tab: FormId,
    pub console: ConsoleView,
    /// `None` until the first full-auto submission.
    pub job: Option<JobProgressView>,
    pub forms: Vec<FormView>,
    /// `None` while the picker panel is closed.
    pub picker: Option<FilePanelView>,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn form(&self, form: FormId) -> Option<&FormView> {
        self.forms.iter().find(|view| view.form == form)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleView {
    pub text: String,
    pub tone: LogTone,
    pub segments: Vec<ConsoleSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobProgressView {
    pub phase: JobPhase,
    pub step: u32,
    pub total_steps: u32,
    pub percent: u8,
    /// e.g. `Step 2/5`
    pub step_label: String,
    /// e.g. `40%`
    pub percent_label: String,
    pub message: String,
    pub tone: LogTone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub form: FormId,
    /// The submit control is disabled while busy.
    pub busy: bool,
    pub fields: Vec<(String, String)>,
}

impl FormView {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePanelView {
    pub target_form: FormId,
    pub target_field: String,
    pub body: FilePanelBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilePanelBody {
    Loading { path: String },
    Error { message: String },
    /// Rows in display order: the parent entry (if any) then the server's order.
    Listing {
        current_path: String,
        rows: Vec<FileRowView>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRowView {
    pub name: String,
    pub path: String,
    pub icon: FileIcon,
    /// Only files carry a size.
    pub size_label: Option<String>,
    pub action: RowAction,
    pub matches_filter: bool,
}

/// What clicking a row does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    Navigate(String),
    Select(String),
}
