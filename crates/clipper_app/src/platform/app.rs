use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;

use anyhow::{bail, Context};
use clipper_core::{
    update, AppState, FileIcon, FilePanelBody, FilePanelView, FormId, JobOutcome, JobPhase,
    LogTone, Msg, PickTarget, RowAction,
};
use engine_logging::{engine_info, engine_warn};

use super::config::load_config;
use super::effects::{EffectRunner, Inbound};
use super::ui::{html, render::TerminalRenderer};
use crate::{ActionArgs, BrowseArgs, Cli, Command, FullAutoArgs};

const EXIT_INTERRUPTED: u8 = 130;

pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let (mut config, config_error) = load_config(&cli.config);
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(interval) = cli.poll_interval_ms {
        config.poll_interval_ms = interval;
    }
    engine_logging::initialize(
        config.log_destination,
        engine_logging::parse_level(&config.log_level),
        &config.log_file,
    );
    if let Some(err) = config_error {
        engine_warn!("{}; using defaults", err);
    }

    let plan = plan(cli.command)?;
    let (tx, rx) = mpsc::channel();
    let runner =
        EffectRunner::new(config.engine_config(), tx.clone()).context("failed to start engine")?;
    runner.watch_interrupt();
    engine_info!("clipper started against {}", config.base_url);

    Session::new(runner, plan.mode).run(plan.setup, plan.pick, tx, rx)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    FullAuto,
    Action { form: FormId, stage: ActionStage },
    Browse {
        form: FormId,
        field: String,
        html: Option<PathBuf>,
    },
    OpenFolder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActionStage {
    Picking,
    Submitted,
}

#[derive(Debug)]
struct Plan {
    mode: Mode,
    setup: Vec<Msg>,
    pick: Option<PickTarget>,
}

fn plan(command: Command) -> anyhow::Result<Plan> {
    match command {
        Command::FullAuto(args) => Ok(full_auto_plan(args)),
        Command::Action(args) => action_plan(args),
        Command::Browse(args) => browse_plan(args),
        Command::OpenFolder => Ok(Plan {
            mode: Mode::OpenFolder,
            setup: vec![Msg::OpenFolderClicked],
            pick: None,
        }),
    }
}

fn full_auto_plan(args: FullAutoArgs) -> Plan {
    let fields = [
        ("url", args.url),
        ("api_key", args.api_key),
        ("model", args.model),
        ("watermark", args.watermark),
        ("burn_subtitle", args.burn_subtitle.to_string()),
        ("analysis_method", args.analysis_method),
    ];
    let mut setup: Vec<Msg> = fields
        .into_iter()
        .map(|(field, value)| set_field(FormId::FullAuto, field, value))
        .collect();
    setup.push(Msg::FormSubmitted(FormId::FullAuto));
    Plan {
        mode: Mode::FullAuto,
        setup,
        pick: None,
    }
}

fn action_plan(args: ActionArgs) -> anyhow::Result<Plan> {
    let form = parse_form(&args.form)?;
    if !form.is_synchronous() {
        bail!("use `clipper full-auto` to run the full pipeline");
    }
    let mut setup = Vec::with_capacity(args.set.len() + 1);
    for assignment in &args.set {
        let Some((field, value)) = assignment.split_once('=') else {
            bail!("expected FIELD=VALUE, got {assignment:?}");
        };
        setup.push(set_field(form, field.trim(), value.to_string()));
    }
    let pick = args.pick.as_deref().map(|arg| pick_target(form, arg));
    let stage = if pick.is_some() {
        ActionStage::Picking
    } else {
        setup.push(Msg::FormSubmitted(form));
        ActionStage::Submitted
    };
    Ok(Plan {
        mode: Mode::Action { form, stage },
        setup,
        pick,
    })
}

fn browse_plan(args: BrowseArgs) -> anyhow::Result<Plan> {
    let form = parse_form(&args.form)?;
    let mut target = PickTarget::new(form, args.field.clone());
    if let Some(filter) = args.filter {
        target = target.with_filter(filter);
    }
    Ok(Plan {
        mode: Mode::Browse {
            form,
            field: args.field,
            html: args.html,
        },
        setup: Vec::new(),
        pick: Some(target),
    })
}

fn parse_form(key: &str) -> anyhow::Result<FormId> {
    match FormId::from_key(key) {
        Some(form) => Ok(form),
        None => {
            let known: Vec<&str> = FormId::ALL.iter().map(|form| form.key()).collect();
            bail!("unknown form {key:?}; expected one of {}", known.join(", "))
        }
    }
}

/// `field` or `field:.mp4,.webm`.
fn pick_target(form: FormId, arg: &str) -> PickTarget {
    match arg.split_once(':') {
        Some((field, filter)) => PickTarget::new(form, field.trim()).with_filter(filter),
        None => PickTarget::new(form, arg.trim()),
    }
}

fn set_field(form: FormId, field: &str, value: String) -> Msg {
    Msg::FieldChanged {
        form,
        field: field.to_string(),
        value,
    }
}

/// Maps a line typed at the picker prompt to a message.
fn picker_choice(line: &str, panel: &FilePanelView) -> Option<Msg> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") {
        return Some(Msg::FilePickerClosed);
    }
    let FilePanelBody::Listing { rows, .. } = &panel.body else {
        return None;
    };
    let row = if line == ".." {
        rows.iter().find(|row| row.icon == FileIcon::Back)?
    } else {
        let index: usize = line.parse().ok()?;
        rows.get(index.checked_sub(1)?)?
    };
    Some(match &row.action {
        RowAction::Navigate(path) => Msg::NavigateRequested { path: path.clone() },
        RowAction::Select(name) => Msg::FileSelected {
            filename: name.clone(),
        },
    })
}

struct Session {
    state: AppState,
    runner: EffectRunner,
    renderer: TerminalRenderer,
    mode: Mode,
    selected: bool,
    folder_result: Option<Result<(), String>>,
    interrupted: bool,
}

impl Session {
    fn new(runner: EffectRunner, mode: Mode) -> Self {
        Self {
            state: AppState::new(),
            runner,
            renderer: TerminalRenderer::default(),
            mode,
            selected: false,
            folder_result: None,
            interrupted: false,
        }
    }

    fn run(
        mut self,
        setup: Vec<Msg>,
        pick: Option<PickTarget>,
        tx: mpsc::Sender<Inbound>,
        rx: mpsc::Receiver<Inbound>,
    ) -> anyhow::Result<ExitCode> {
        for msg in setup {
            self.dispatch(msg);
        }
        if let Some(target) = pick {
            spawn_input_reader(tx);
            self.dispatch(Msg::FilePickerOpened(target));
        } else {
            drop(tx);
        }

        loop {
            if let Some(code) = self.exit_code() {
                return Ok(code);
            }
            let inbound = rx.recv().context("engine event channel closed")?;
            match inbound {
                Inbound::Msg(msg) => self.dispatch(msg),
                Inbound::Input(line) => self.handle_input(&line),
                Inbound::InputClosed => self.dispatch(Msg::FilePickerClosed),
                Inbound::FolderOpened(result) => self.folder_result = Some(result),
                Inbound::Interrupted => self.handle_interrupt(),
            }
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            let view = state.view();
            for block in self.renderer.render(&view) {
                println!("{block}");
            }
            if let (Mode::Browse { html: Some(path), .. }, Some(panel)) =
                (&self.mode, &view.picker)
            {
                if let Err(err) = fs::write(path, html::render_panel(panel)) {
                    engine_warn!("Failed to write file panel to {:?}: {}", path, err);
                }
            }
        }
        self.state = state;
        self.runner.enqueue(effects);
    }

    fn handle_input(&mut self, line: &str) {
        let Some(panel) = self.state.view().picker else {
            return;
        };
        match picker_choice(line, &panel) {
            Some(msg) => {
                if matches!(msg, Msg::FileSelected { .. }) {
                    self.selected = true;
                }
                self.dispatch(msg);
            }
            None if line.trim().is_empty() => {}
            None => println!("Unknown choice: {}", line.trim()),
        }
    }

    fn handle_interrupt(&mut self) {
        let cancelling = matches!(self.state.job().phase(), JobPhase::Cancelling { .. });
        if self.mode == Mode::FullAuto && self.state.job().phase().is_active() && !cancelling {
            engine_info!("Interrupt received; cancelling job");
            self.dispatch(Msg::CancelJobClicked);
        } else {
            self.interrupted = true;
        }
    }

    fn exit_code(&mut self) -> Option<ExitCode> {
        if self.interrupted {
            return Some(ExitCode::from(EXIT_INTERRUPTED));
        }
        match self.mode.clone() {
            Mode::FullAuto => match self.state.job().phase() {
                JobPhase::Finished(JobOutcome::Done) => Some(ExitCode::SUCCESS),
                JobPhase::Finished(_) => Some(ExitCode::FAILURE),
                _ => None,
            },
            Mode::Action {
                form,
                stage: ActionStage::Picking,
            } => {
                if self.state.picker().is_open() {
                    return None;
                }
                if !self.selected {
                    println!("No file selected.");
                    return Some(ExitCode::FAILURE);
                }
                self.mode = Mode::Action {
                    form,
                    stage: ActionStage::Submitted,
                };
                self.dispatch(Msg::FormSubmitted(form));
                None
            }
            Mode::Action {
                form,
                stage: ActionStage::Submitted,
            } => {
                if self.state.forms().get(form).is_busy() {
                    return None;
                }
                Some(match self.state.console().tone() {
                    LogTone::Error => ExitCode::FAILURE,
                    _ => ExitCode::SUCCESS,
                })
            }
            Mode::Browse { form, field, .. } => {
                if self.state.picker().is_open() {
                    return None;
                }
                if !self.selected {
                    return Some(ExitCode::FAILURE);
                }
                println!("{}", self.state.forms().get(form).field(&field));
                Some(ExitCode::SUCCESS)
            }
            Mode::OpenFolder => match self.folder_result.as_ref()? {
                Ok(()) => Some(ExitCode::SUCCESS),
                Err(_) => Some(ExitCode::FAILURE),
            },
        }
    }
}

fn spawn_input_reader(tx: mpsc::Sender<Inbound>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(Inbound::Input(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    engine_warn!("Failed to read stdin: {}", err);
                    break;
                }
            }
        }
        let _ = tx.send(Inbound::InputClosed);
    });
}
