use crate::format::progress_percent;

pub const DEFAULT_TOTAL_STEPS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Running,
    Done,
    Error,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }
}

/// One status report for the tracked job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobUpdate {
    pub job_id: String,
    pub status: JobStatus,
    pub step: u32,
    pub total_steps: u32,
    pub message: String,
    pub output: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Done,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JobPhase {
    #[default]
    Idle,
    Submitting,
    Polling {
        job_id: String,
    },
    Cancelling {
        job_id: Option<String>,
    },
    Finished(JobOutcome),
}

impl JobPhase {
    /// A job is active from submission until a terminal report or cancellation.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            JobPhase::Submitting | JobPhase::Polling { .. } | JobPhase::Cancelling { .. }
        )
    }

    pub fn job_id(&self) -> Option<&str> {
        match self {
            JobPhase::Polling { job_id } => Some(job_id),
            JobPhase::Cancelling { job_id } => job_id.as_deref(),
            _ => None,
        }
    }
}

/// Progress panel state for the full-auto job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobTracker {
    phase: JobPhase,
    visible: bool,
    step: u32,
    total_steps: u32,
    message: String,
}

impl Default for JobTracker {
    fn default() -> Self {
        Self {
            phase: JobPhase::Idle,
            visible: false,
            step: 0,
            total_steps: DEFAULT_TOTAL_STEPS,
            message: String::new(),
        }
    }
}

impl JobTracker {
    pub fn phase(&self) -> &JobPhase {
        &self.phase
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    pub fn percent(&self) -> u8 {
        progress_percent(self.step, self.total_steps)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn begin_submission(&mut self) {
        *self = Self {
            phase: JobPhase::Submitting,
            visible: true,
            message: "Starting...".to_string(),
            ..Self::default()
        };
    }

    pub(crate) fn accept(&mut self, job_id: String) {
        if matches!(self.phase, JobPhase::Submitting) {
            self.phase = JobPhase::Polling { job_id };
        } else if matches!(self.phase, JobPhase::Cancelling { job_id: None }) {
            // Cancel raced the submission; remember the id for the log.
            self.phase = JobPhase::Cancelling {
                job_id: Some(job_id),
            };
        }
    }

    /// Applies a status report. Returns false when no job with this id is
    /// being polled. While a cancel is pending only terminal reports apply,
    /// since the server may finish the job before the cancel lands.
    pub(crate) fn apply(&mut self, update: &JobUpdate) -> bool {
        if self.phase.job_id() != Some(update.job_id.as_str()) {
            return false;
        }
        let accepts = match self.phase {
            JobPhase::Polling { .. } => true,
            JobPhase::Cancelling { .. } => update.status.is_terminal(),
            _ => false,
        };
        if !accepts {
            return false;
        }
        self.total_steps = update.total_steps;
        self.step = update.step;
        self.message = update.message.clone();
        match update.status {
            JobStatus::Running => {}
            JobStatus::Done => {
                // Terminal success always displays the full bar.
                if self.total_steps == 0 {
                    self.total_steps = DEFAULT_TOTAL_STEPS;
                }
                self.step = self.total_steps;
                self.message = "Done!".to_string();
                self.phase = JobPhase::Finished(JobOutcome::Done);
            }
            JobStatus::Error => {
                self.message = "Failed!".to_string();
                self.phase = JobPhase::Finished(JobOutcome::Failed);
            }
        }
        true
    }

    pub(crate) fn fail_submission(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.phase = JobPhase::Finished(JobOutcome::Failed);
    }

    pub(crate) fn request_cancel(&mut self) -> bool {
        let job_id = match &self.phase {
            JobPhase::Submitting => None,
            JobPhase::Polling { job_id } => Some(job_id.clone()),
            _ => return false,
        };
        self.phase = JobPhase::Cancelling { job_id };
        self.message = "Cancelling...".to_string();
        true
    }

    pub(crate) fn mark_cancelled(&mut self) -> bool {
        if !self.phase.is_active() {
            return false;
        }
        self.phase = JobPhase::Finished(JobOutcome::Cancelled);
        self.message = "Cancelled".to_string();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{JobOutcome, JobPhase, JobStatus, JobTracker, JobUpdate};

    fn report(job_id: &str, status: JobStatus, step: u32, total: u32) -> JobUpdate {
        JobUpdate {
            job_id: job_id.to_string(),
            status,
            step,
            total_steps: total,
            message: "working".to_string(),
            output: None,
        }
    }

    #[test]
    fn done_forces_full_progress() {
        let mut tracker = JobTracker::default();
        tracker.begin_submission();
        tracker.accept("abc".to_string());
        assert!(tracker.apply(&report("abc", JobStatus::Done, 3, 5)));
        assert_eq!(tracker.step(), 5);
        assert_eq!(tracker.percent(), 100);
        assert_eq!(tracker.phase(), &JobPhase::Finished(JobOutcome::Done));
    }

    #[test]
    fn done_with_zero_total_uses_default_total() {
        let mut tracker = JobTracker::default();
        tracker.begin_submission();
        tracker.accept("abc".to_string());
        tracker.apply(&report("abc", JobStatus::Done, 0, 0));
        assert_eq!((tracker.step(), tracker.total_steps()), (5, 5));
        assert_eq!(tracker.percent(), 100);
    }

    #[test]
    fn reports_for_other_jobs_are_ignored() {
        let mut tracker = JobTracker::default();
        tracker.begin_submission();
        tracker.accept("abc".to_string());
        assert!(!tracker.apply(&report("zzz", JobStatus::Running, 4, 5)));
        assert_eq!(tracker.step(), 0);
    }

    #[test]
    fn terminal_report_settles_a_pending_cancel() {
        let mut tracker = JobTracker::default();
        tracker.begin_submission();
        tracker.accept("abc".to_string());
        assert!(tracker.request_cancel());

        assert!(!tracker.apply(&report("abc", JobStatus::Running, 4, 5)));
        assert!(tracker.apply(&report("abc", JobStatus::Error, 4, 5)));
        assert_eq!(tracker.phase(), &JobPhase::Finished(JobOutcome::Failed));
        assert!(!tracker.mark_cancelled());
    }

    #[test]
    fn cancel_during_submission_keeps_late_job_id() {
        let mut tracker = JobTracker::default();
        tracker.begin_submission();
        assert!(tracker.request_cancel());
        tracker.accept("late".to_string());
        assert_eq!(tracker.phase().job_id(), Some("late"));
        assert!(tracker.mark_cancelled());
        assert!(!tracker.phase().is_active());
    }
}
