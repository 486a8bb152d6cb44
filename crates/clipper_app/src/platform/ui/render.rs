use clipper_core::{
    AppViewModel, ConsoleView, FileIcon, FilePanelBody, FilePanelView, JobPhase, JobProgressView,
    LogTone,
};

const BAR_WIDTH: usize = 20;

/// Turns view models into terminal text, printing each section only when it
/// changed since the previous frame.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    last_console: Option<String>,
    last_job: Option<String>,
    last_picker: Option<String>,
}

impl TerminalRenderer {
    pub fn render(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut blocks = Vec::new();
        let console = render_console(&view.console);
        push_if_changed(&mut self.last_console, Some(console), &mut blocks);
        let job = view.job.as_ref().map(render_job);
        push_if_changed(&mut self.last_job, job, &mut blocks);
        let picker = view.picker.as_ref().map(render_picker);
        push_if_changed(&mut self.last_picker, picker, &mut blocks);
        blocks
    }
}

fn push_if_changed(last: &mut Option<String>, next: Option<String>, out: &mut Vec<String>) {
    if *last == next {
        return;
    }
    if let Some(text) = &next {
        out.push(text.clone());
    }
    *last = next;
}

pub fn render_console(console: &ConsoleView) -> String {
    let marker = match console.tone {
        LogTone::Info => "",
        LogTone::Success => "[ok] ",
        LogTone::Error => "[error] ",
    };
    format!("{marker}{}", console.text)
}

/// e.g. `[########............] Step 2/5 40% Downloading...`
pub fn render_job(job: &JobProgressView) -> String {
    let filled = BAR_WIDTH * usize::from(job.percent) / 100;
    let mut line = format!(
        "[{}{}] {} {}",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        job.step_label,
        job.percent_label
    );
    if !job.message.is_empty() {
        line.push(' ');
        line.push_str(&job.message);
    }
    if let JobPhase::Polling { job_id } = &job.phase {
        line.push_str(&format!(" (job {job_id})"));
    }
    line
}

pub fn render_picker(panel: &FilePanelView) -> String {
    let mut out = format!(
        "Select a file for {}.{}\n",
        panel.target_form.key(),
        panel.target_field
    );
    match &panel.body {
        FilePanelBody::Loading { path } if path.is_empty() => out.push_str("  Loading..."),
        FilePanelBody::Loading { path } => out.push_str(&format!("  Loading {path}...")),
        FilePanelBody::Error { message } => out.push_str(&format!("  Error: {message}")),
        FilePanelBody::Listing { current_path, rows } => {
            out.push_str(&format!("  {current_path}\n"));
            if rows.is_empty() {
                out.push_str("  Empty folder\n");
            }
            for (index, row) in rows.iter().enumerate() {
                let emphasis = if row.matches_filter { ' ' } else { '-' };
                out.push_str(&format!(
                    "{emphasis}{:>3}. {} {}",
                    index + 1,
                    icon_glyph(row.icon),
                    row.name
                ));
                if let Some(size) = &row.size_label {
                    out.push_str(&format!("  ({size})"));
                }
                out.push('\n');
            }
            out.push_str("  Enter a number, '..' for the parent folder or 'q' to close.");
        }
    }
    out
}

fn icon_glyph(icon: FileIcon) -> &'static str {
    match icon {
        FileIcon::Back => "<-",
        FileIcon::Folder => "[d]",
        FileIcon::Video => "[v]",
        FileIcon::Subtitle => "[s]",
        FileIcon::File => "[f]",
    }
}
