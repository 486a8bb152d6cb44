use crate::job::JobStatus;
use crate::{
    ActionReply, AppState, Effect, FormId, FullAutoParams, JobUpdate, LogTone, Msg,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::TabSelected(tab) => {
            if state.active_tab() != tab {
                state.set_active_tab(tab);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::FieldChanged { form, field, value } => {
            state.forms_mut().get_mut(form).set_field(field, value);
            state.mark_dirty();
            Vec::new()
        }
        Msg::FormSubmitted(FormId::FullAuto) => submit_full_auto(&mut state),
        Msg::FormSubmitted(form) => {
            if state.forms().get(form).is_busy() {
                return (state, Vec::new());
            }
            state.forms_mut().get_mut(form).set_busy(true);
            state.log("Processing...", LogTone::Info);
            vec![Effect::CallAction {
                form,
                endpoint: form.endpoint(),
                payload: state.forms().get(form).fields().clone(),
            }]
        }
        Msg::ActionCompleted { form, result } => {
            state.forms_mut().get_mut(form).set_busy(false);
            match result {
                Ok(reply) => {
                    let tone = if reply.success {
                        LogTone::Success
                    } else {
                        LogTone::Error
                    };
                    state.log(action_console_text(form, reply), tone);
                }
                Err(error) => state.log(format!("Error: {error}"), LogTone::Error),
            }
            Vec::new()
        }
        Msg::JobAccepted { job_id } => {
            if state.job().phase().is_active() {
                state.log(format!("Job started: {job_id}"), LogTone::Info);
                state.job_mut().accept(job_id);
            }
            Vec::new()
        }
        Msg::JobRejected { output } => {
            if state.job().phase().is_active() {
                state.job_mut().fail_submission("Failed to start job!");
                finish_full_auto(&mut state);
                let text = output
                    .filter(|text| !text.is_empty())
                    .unwrap_or_else(|| "Failed to start job".to_string());
                state.log(text, LogTone::Error);
            }
            Vec::new()
        }
        Msg::JobSubmitFailed { error } => {
            if state.job().phase().is_active() {
                state.job_mut().fail_submission("Error!");
                finish_full_auto(&mut state);
                state.log(format!("Error: {error}"), LogTone::Error);
            }
            Vec::new()
        }
        Msg::JobStatusReceived(report) => {
            apply_job_report(&mut state, report);
            Vec::new()
        }
        Msg::CancelJobClicked => {
            if state.job_mut().request_cancel() {
                state.log("Cancelling job...", LogTone::Info);
                vec![Effect::CancelJob]
            } else {
                Vec::new()
            }
        }
        Msg::JobCancelled => {
            if state.job_mut().mark_cancelled() {
                finish_full_auto(&mut state);
                state.log("Job cancelled.", LogTone::Error);
            }
            Vec::new()
        }
        Msg::FilePickerOpened(target) => {
            let seq = state.picker_mut().open(target);
            state.mark_dirty();
            vec![Effect::ListDirectory {
                seq,
                path: String::new(),
            }]
        }
        Msg::NavigateRequested { path } => {
            if !state.picker().is_open() {
                return (state, Vec::new());
            }
            let seq = state.picker_mut().begin_navigation(&path);
            state.mark_dirty();
            vec![Effect::ListDirectory { seq, path }]
        }
        Msg::ListingLoaded { seq, listing } => {
            if state.picker_mut().apply_listing(seq, listing) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ListingFailed { seq, error } => {
            if state.picker_mut().apply_failure(seq, error) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::FileSelected { filename } => {
            if let Some(target) = state.picker_mut().take_for_selection() {
                state
                    .forms_mut()
                    .get_mut(target.form)
                    .set_field(target.field, filename);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::FilePickerClosed => {
            if state.picker().is_open() {
                state.mark_dirty();
            }
            state.picker_mut().close();
            Vec::new()
        }
        Msg::TimestampClicked(time) => {
            fill_clip_times(&mut state, time);
            Vec::new()
        }
        Msg::OpenFolderClicked => vec![Effect::OpenFolder {
            path: String::new(),
        }],
        Msg::ClearConsole => {
            state.console_mut().clear();
            state.mark_dirty();
            Vec::new()
        }
    };

    (state, effects)
}

fn submit_full_auto(state: &mut AppState) -> Vec<Effect> {
    if state.job().phase().is_active() {
        let running = state
            .job()
            .phase()
            .job_id()
            .map(|id| format!(" ({id})"))
            .unwrap_or_default();
        state.log(
            format!("A job is already running{running}; wait for it to finish or cancel it."),
            LogTone::Error,
        );
        return Vec::new();
    }

    let params = FullAutoParams::from_form(state.forms().get(FormId::FullAuto));
    state.job_mut().begin_submission();
    state.forms_mut().get_mut(FormId::FullAuto).set_busy(true);
    state.log("Starting full automation pipeline...", LogTone::Info);
    vec![Effect::SubmitFullAuto(params)]
}

fn finish_full_auto(state: &mut AppState) {
    state.forms_mut().get_mut(FormId::FullAuto).set_busy(false);
    state.mark_dirty();
}

fn apply_job_report(state: &mut AppState, report: JobUpdate) {
    if !state.job_mut().apply(&report) {
        return;
    }
    state.mark_dirty();
    match report.status {
        JobStatus::Running => {
            if let Some(output) = report.output.filter(|text| !text.is_empty()) {
                state.log(output, LogTone::Info);
            }
        }
        JobStatus::Done => {
            finish_full_auto(state);
            state.log("Automation complete!", LogTone::Success);
        }
        JobStatus::Error => {
            finish_full_auto(state);
            let text = report
                .output
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| "Job failed".to_string());
            state.log(text, LogTone::Error);
        }
    }
}

fn action_console_text(form: FormId, reply: ActionReply) -> String {
    if form == FormId::AutoClip && reply.success {
        if let Some(chapters) = &reply.chapters {
            let mut out = String::from("Chapters created:\n\n");
            for (index, chapter) in chapters.iter().enumerate() {
                out.push_str(&format!("{}. {}\n", index + 1, chapter.title));
                out.push_str(&format!(
                    "   Start: {} | End: {}\n",
                    chapter.start, chapter.end
                ));
                out.push_str(&format!("   Reason: {}\n\n", chapter.reason));
            }
            out.push_str("Use the times above in the Clip tab.");
            return out;
        }
    }
    match reply.output {
        Some(output) if !output.is_empty() => output,
        _ => reply.raw,
    }
}

/// An empty start, or a filled start/end pair, starts a new range.
fn fill_clip_times(state: &mut AppState, time: String) {
    state.set_active_tab(FormId::Clip);
    let clip = state.forms_mut().get_mut(FormId::Clip);
    let start_empty = clip.field("start").is_empty();
    let end_filled = !clip.field("end").is_empty();
    if start_empty || end_filled {
        clip.set_field("start", time);
        clip.set_field("end", "");
    } else {
        clip.set_field("end", time);
    }
    state.mark_dirty();
}
