pub const CONSOLE_PLACEHOLDER: &str = "Ready.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogTone {
    #[default]
    Info,
    Success,
    Error,
}

/// The console panel shows only the most recent message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleState {
    text: String,
    tone: LogTone,
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self {
            text: CONSOLE_PLACEHOLDER.to_string(),
            tone: LogTone::Info,
        }
    }
}

impl ConsoleState {
    pub fn log(&mut self, text: impl Into<String>, tone: LogTone) {
        self.text = text.into();
        self.tone = tone;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tone(&self) -> LogTone {
        self.tone
    }
}

/// A piece of console text. Timestamps are clickable in the front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleSegment {
    Text(String),
    /// Timestamp without the surrounding brackets, e.g. `00:01:02.500`.
    Timestamp(String),
}

/// Splits `[HH:MM:SS]` / `[HH:MM:SS.fff]` markers out of `text`.
pub fn split_timestamps(text: &str) -> Vec<ConsoleSegment> {
    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find('[') {
        let open = cursor + offset;
        match match_timestamp(&text[open..]) {
            Some(len) => {
                if plain_start < open {
                    segments.push(ConsoleSegment::Text(text[plain_start..open].to_string()));
                }
                segments.push(ConsoleSegment::Timestamp(
                    text[open + 1..open + len - 1].to_string(),
                ));
                cursor = open + len;
                plain_start = cursor;
            }
            None => cursor = open + 1,
        }
    }

    if plain_start < text.len() {
        segments.push(ConsoleSegment::Text(text[plain_start..].to_string()));
    }
    segments
}

/// Returns the byte length of a bracketed timestamp at the start of `input`.
fn match_timestamp(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    // "[00:00:00"
    if bytes.len() < 10 || bytes[0] != b'[' {
        return None;
    }
    for group in 0..3 {
        let at = 1 + group * 3;
        if !bytes[at].is_ascii_digit() || !bytes[at + 1].is_ascii_digit() {
            return None;
        }
        if group < 2 && bytes[at + 2] != b':' {
            return None;
        }
    }
    let mut end = 9;
    if bytes[end] == b'.' {
        let digits = bytes[end + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits == 0 {
            return None;
        }
        end += 1 + digits;
    }
    (bytes.get(end) == Some(&b']')).then_some(end + 1)
}

#[cfg(test)]
mod tests {
    use super::{split_timestamps, ConsoleSegment, ConsoleState, LogTone, CONSOLE_PLACEHOLDER};

    fn text(s: &str) -> ConsoleSegment {
        ConsoleSegment::Text(s.to_string())
    }

    fn stamp(s: &str) -> ConsoleSegment {
        ConsoleSegment::Timestamp(s.to_string())
    }

    #[test]
    fn plain_text_is_one_segment() {
        assert_eq!(split_timestamps("no stamps here"), vec![text("no stamps here")]);
        assert!(split_timestamps("").is_empty());
    }

    #[test]
    fn timestamps_are_split_out() {
        assert_eq!(
            split_timestamps("[00:01:02] intro\n[00:10:00.250] peak"),
            vec![
                stamp("00:01:02"),
                text(" intro\n"),
                stamp("00:10:00.250"),
                text(" peak"),
            ]
        );
    }

    #[test]
    fn malformed_brackets_stay_text() {
        assert_eq!(
            split_timestamps("[0:01:02] [00:01:02.] [ab:cd:ef] [00:01:02"),
            vec![text("[0:01:02] [00:01:02.] [ab:cd:ef] [00:01:02")]
        );
    }

    #[test]
    fn multibyte_text_around_stamps_is_preserved() {
        assert_eq!(
            split_timestamps("✂️ [01:00:00] ✅"),
            vec![text("✂️ "), stamp("01:00:00"), text(" ✅")]
        );
    }

    #[test]
    fn clear_restores_placeholder() {
        let mut console = ConsoleState::default();
        console.log("boom", LogTone::Error);
        assert_eq!(console.tone(), LogTone::Error);
        console.clear();
        assert_eq!(console.text(), CONSOLE_PLACEHOLDER);
        assert_eq!(console.tone(), LogTone::Info);
    }
}
