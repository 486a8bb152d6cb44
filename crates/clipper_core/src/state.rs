use crate::console::{split_timestamps, ConsoleState, LogTone};
use crate::format::{format_size, icon_for, FileIcon};
use crate::job::{JobOutcome, JobPhase, JobTracker};
use crate::picker::{FilePicker, ListingState};
use crate::view_model::{
    AppViewModel, ConsoleView, FilePanelBody, FilePanelView, FileRowView, FormView,
    JobProgressView, RowAction,
};
use crate::{FormId, Forms};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    active_tab: FormId,
    console: ConsoleState,
    forms: Forms,
    job: JobTracker,
    picker: FilePicker,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_tab(&self) -> FormId {
        self.active_tab
    }

    pub fn console(&self) -> &ConsoleState {
        &self.console
    }

    pub fn forms(&self) -> &Forms {
        &self.forms
    }

    pub fn job(&self) -> &JobTracker {
        &self.job
    }

    pub fn picker(&self) -> &FilePicker {
        &self.picker
    }

    /// Returns whether anything visible changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            active_tab: self.active_tab,
            console: ConsoleView {
                text: self.console.text().to_string(),
                tone: self.console.tone(),
                segments: split_timestamps(self.console.text()),
            },
            job: self.job_view(),
            forms: self
                .forms
                .iter()
                .map(|(form, state)| FormView {
                    form,
                    busy: state.is_busy(),
                    fields: state
                        .fields()
                        .iter()
                        .map(|(name, value)| (name.clone(), value.clone()))
                        .collect(),
                })
                .collect(),
            picker: self.picker_view(),
            dirty: self.dirty,
        }
    }

    fn job_view(&self) -> Option<JobProgressView> {
        if !self.job.is_visible() {
            return None;
        }
        let tone = match self.job.phase() {
            JobPhase::Finished(JobOutcome::Done) => LogTone::Success,
            JobPhase::Finished(JobOutcome::Failed) => LogTone::Error,
            _ => LogTone::Info,
        };
        Some(JobProgressView {
            phase: self.job.phase().clone(),
            step: self.job.step(),
            total_steps: self.job.total_steps(),
            percent: self.job.percent(),
            step_label: format!("Step {}/{}", self.job.step(), self.job.total_steps()),
            percent_label: format!("{}%", self.job.percent()),
            message: self.job.message().to_string(),
            tone,
        })
    }

    fn picker_view(&self) -> Option<FilePanelView> {
        let target = self.picker.target()?;
        let body = match self.picker.listing() {
            ListingState::Empty => FilePanelBody::Loading {
                path: String::new(),
            },
            ListingState::Loading { path } => FilePanelBody::Loading { path: path.clone() },
            ListingState::Failed { message } => FilePanelBody::Error {
                message: message.clone(),
            },
            ListingState::Loaded(listing) => {
                let mut rows = Vec::with_capacity(listing.entries.len() + 1);
                if let Some(parent) = &listing.parent_path {
                    rows.push(FileRowView {
                        name: "..".to_string(),
                        path: parent.clone(),
                        icon: FileIcon::Back,
                        size_label: None,
                        action: RowAction::Navigate(parent.clone()),
                        matches_filter: true,
                    });
                }
                rows.extend(listing.entries.iter().map(|entry| FileRowView {
                    name: entry.name.clone(),
                    path: entry.path.clone(),
                    icon: icon_for(entry.is_dir, &entry.ext),
                    size_label: (!entry.is_dir).then(|| format_size(entry.size)),
                    action: if entry.is_dir {
                        RowAction::Navigate(entry.path.clone())
                    } else {
                        RowAction::Select(entry.name.clone())
                    },
                    matches_filter: entry.is_dir || target.accepts(entry),
                }));
                FilePanelBody::Listing {
                    current_path: listing.current_path.clone(),
                    rows,
                }
            }
        };
        Some(FilePanelView {
            target_form: target.form,
            target_field: target.field.clone(),
            body,
        })
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_active_tab(&mut self, tab: FormId) {
        self.active_tab = tab;
    }

    pub(crate) fn console_mut(&mut self) -> &mut ConsoleState {
        &mut self.console
    }

    pub(crate) fn forms_mut(&mut self) -> &mut Forms {
        &mut self.forms
    }

    pub(crate) fn job_mut(&mut self) -> &mut JobTracker {
        &mut self.job
    }

    pub(crate) fn picker_mut(&mut self) -> &mut FilePicker {
        &mut self.picker
    }

    pub(crate) fn log(&mut self, text: impl Into<String>, tone: LogTone) {
        self.console.log(text, tone);
        self.dirty = true;
    }
}
