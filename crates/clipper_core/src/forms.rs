use std::collections::BTreeMap;

/// Every form of the client. The full-auto form drives the job poller; the
/// others are synchronous single-action forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum FormId {
    #[default]
    FullAuto,
    Download,
    DownloadSubtitle,
    Analyze,
    AutoClip,
    Clip,
    Extract,
    Burn,
}

impl FormId {
    pub const ALL: [FormId; 8] = [
        FormId::FullAuto,
        FormId::Download,
        FormId::DownloadSubtitle,
        FormId::Analyze,
        FormId::AutoClip,
        FormId::Clip,
        FormId::Extract,
        FormId::Burn,
    ];

    /// Short name used on the command line and in picker targets.
    pub fn key(self) -> &'static str {
        match self {
            FormId::FullAuto => "full-auto",
            FormId::Download => "download",
            FormId::DownloadSubtitle => "download-sub",
            FormId::Analyze => "analyze",
            FormId::AutoClip => "auto-clip",
            FormId::Clip => "clip",
            FormId::Extract => "extract",
            FormId::Burn => "burn",
        }
    }

    /// Backend endpoint below `/api/`.
    pub fn endpoint(self) -> &'static str {
        match self {
            FormId::FullAuto => "full-auto",
            FormId::Download => "download",
            FormId::DownloadSubtitle => "download-subtitle",
            FormId::Analyze => "analyze",
            FormId::AutoClip => "auto-map",
            FormId::Clip => "clip",
            FormId::Extract => "extract-subtitle",
            FormId::Burn => "burn",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|form| form.key() == key)
    }

    pub fn from_endpoint(endpoint: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|form| form.endpoint() == endpoint.trim_start_matches('/'))
    }

    /// Whether submitting the form is a plain request/response call.
    pub fn is_synchronous(self) -> bool {
        self != FormId::FullAuto
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    fields: BTreeMap<String, String>,
    busy: bool,
}

impl FormState {
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub(crate) fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }
}

/// One `FormState` per `FormId`, indexed by discriminant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Forms {
    forms: [FormState; 8],
}

impl Forms {
    pub fn get(&self, id: FormId) -> &FormState {
        &self.forms[id as usize]
    }

    pub fn get_mut(&mut self, id: FormId) -> &mut FormState {
        &mut self.forms[id as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormId, &FormState)> {
        FormId::ALL.into_iter().zip(self.forms.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnalysisMethod {
    #[default]
    Ai,
    MostReplayed,
}

impl AnalysisMethod {
    /// Anything other than `ai` selects the most-replayed heatmap analysis.
    pub fn from_form_value(value: &str) -> Self {
        if value.trim().is_empty() || value.trim().eq_ignore_ascii_case("ai") {
            AnalysisMethod::Ai
        } else {
            AnalysisMethod::MostReplayed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMethod::Ai => "ai",
            AnalysisMethod::MostReplayed => "replayed",
        }
    }
}

/// Parameters of one full-auto pipeline submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullAutoParams {
    pub url: String,
    pub api_key: String,
    pub model: String,
    pub watermark: String,
    pub burn_subtitle: bool,
    pub analysis_method: AnalysisMethod,
}

impl FullAutoParams {
    pub(crate) fn from_form(form: &FormState) -> Self {
        Self {
            url: form.field("url").trim().to_string(),
            api_key: form.field("api_key").to_string(),
            model: form.field("model").to_string(),
            watermark: form.field("watermark").to_string(),
            burn_subtitle: parse_checkbox(form.field("burn_subtitle")),
            analysis_method: AnalysisMethod::from_form_value(form.field("analysis_method")),
        }
    }
}

fn parse_checkbox(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "on" | "yes" | "1"
    )
}

#[cfg(test)]
mod tests {
    use super::{AnalysisMethod, FormId, FormState, FullAutoParams};

    #[test]
    fn keys_and_endpoints_round_trip() {
        for form in FormId::ALL {
            assert_eq!(FormId::from_key(form.key()), Some(form));
            assert_eq!(FormId::from_endpoint(form.endpoint()), Some(form));
        }
        assert_eq!(FormId::from_endpoint("/auto-map"), Some(FormId::AutoClip));
        assert_eq!(FormId::from_key("nope"), None);
    }

    #[test]
    fn full_auto_params_read_form_fields() {
        let mut form = FormState::default();
        form.set_field("url", " https://youtu.be/x ");
        form.set_field("burn_subtitle", "on");
        form.set_field("analysis_method", "replayed");

        let params = FullAutoParams::from_form(&form);
        assert_eq!(params.url, "https://youtu.be/x");
        assert!(params.burn_subtitle);
        assert_eq!(params.analysis_method, AnalysisMethod::MostReplayed);
        assert_eq!(params.model, "");
    }

    #[test]
    fn blank_analysis_method_defaults_to_ai() {
        assert_eq!(AnalysisMethod::from_form_value(""), AnalysisMethod::Ai);
        assert_eq!(AnalysisMethod::from_form_value("AI"), AnalysisMethod::Ai);
        assert_eq!(AnalysisMethod::from_form_value("heatmap").as_str(), "replayed");
    }
}
