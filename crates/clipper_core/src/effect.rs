use std::collections::BTreeMap;

use crate::{FormId, FullAutoParams};

/// Side effects requested by `update`; executed by the front-end's effect runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitFullAuto(FullAutoParams),
    /// Cancel the active full-auto job, whether still submitting or polling.
    CancelJob,
    CallAction {
        form: FormId,
        endpoint: &'static str,
        payload: BTreeMap<String, String>,
    },
    ListDirectory {
        seq: u64,
        path: String,
    },
    OpenFolder {
        path: String,
    },
}
