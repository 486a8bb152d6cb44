//! Remote file browser state.
//!
//! The picker is an explicit value owned by `AppState`. Its invariant: a
//! `PickTarget` is present exactly while the panel is open.

use crate::FormId;

/// One entry of a server-side directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    pub size: u64,
    pub ext: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryListing {
    pub current_path: String,
    pub parent_path: Option<String>,
    pub entries: Vec<FileEntry>,
}

/// The form field that receives the next selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickTarget {
    pub form: FormId,
    pub field: String,
    pub extension_filter: Option<String>,
}

impl PickTarget {
    pub fn new(form: FormId, field: impl Into<String>) -> Self {
        Self {
            form,
            field: field.into(),
            extension_filter: None,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        let filter = filter.into();
        self.extension_filter = (!filter.trim().is_empty()).then_some(filter);
        self
    }

    /// Filters are comma separated, e.g. `.mp4,.webm`. A missing filter accepts everything.
    pub fn accepts(&self, entry: &FileEntry) -> bool {
        match &self.extension_filter {
            None => true,
            Some(filter) => filter
                .split(',')
                .map(str::trim)
                .filter(|ext| !ext.is_empty())
                .any(|ext| {
                    let ext = ext.trim_start_matches('.');
                    entry
                        .ext
                        .trim_start_matches('.')
                        .eq_ignore_ascii_case(ext)
                }),
        }
    }
}

/// What the panel body currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListingState {
    #[default]
    Empty,
    Loading {
        path: String,
    },
    Loaded(DirectoryListing),
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilePicker {
    target: Option<PickTarget>,
    listing: ListingState,
    nav_seq: u64,
}

impl FilePicker {
    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<&PickTarget> {
        self.target.as_ref()
    }

    pub fn listing(&self) -> &ListingState {
        &self.listing
    }

    /// Sequence number of the most recent navigation.
    pub fn nav_seq(&self) -> u64 {
        self.nav_seq
    }

    /// Opens the panel for `target`, replacing any previous target, and
    /// starts a navigation to the root. Returns the navigation sequence.
    pub fn open(&mut self, target: PickTarget) -> u64 {
        self.target = Some(target);
        self.begin_navigation("")
    }

    pub fn begin_navigation(&mut self, path: &str) -> u64 {
        self.nav_seq += 1;
        self.listing = ListingState::Loading {
            path: path.to_string(),
        };
        self.nav_seq
    }

    /// Applies a listing. Responses for anything but the latest navigation
    /// are dropped; returns whether the listing was applied.
    pub fn apply_listing(&mut self, seq: u64, listing: DirectoryListing) -> bool {
        if seq != self.nav_seq || !self.is_open() {
            return false;
        }
        self.listing = ListingState::Loaded(listing);
        true
    }

    /// Shows an inline error. The pick target is left untouched.
    pub fn apply_failure(&mut self, seq: u64, message: impl Into<String>) -> bool {
        if seq != self.nav_seq || !self.is_open() {
            return false;
        }
        self.listing = ListingState::Failed {
            message: message.into(),
        };
        true
    }

    /// Takes the target for a selection, closing the panel. `None` when no
    /// picker is open.
    pub fn take_for_selection(&mut self) -> Option<PickTarget> {
        let target = self.target.take()?;
        self.listing = ListingState::Empty;
        Some(target)
    }

    pub fn close(&mut self) {
        self.target = None;
        self.listing = ListingState::Empty;
    }
}

#[cfg(test)]
mod tests {
    use super::{DirectoryListing, FileEntry, FilePicker, ListingState, PickTarget};
    use crate::FormId;

    fn listing(path: &str) -> DirectoryListing {
        DirectoryListing {
            current_path: path.to_string(),
            parent_path: None,
            entries: Vec::new(),
        }
    }

    fn file(ext: &str) -> FileEntry {
        FileEntry {
            name: format!("a{ext}"),
            path: format!("/r/a{ext}"),
            is_dir: false,
            size: 1,
            ext: ext.to_string(),
        }
    }

    #[test]
    fn stale_listing_is_dropped() {
        let mut picker = FilePicker::default();
        let first = picker.open(PickTarget::new(FormId::Clip, "video"));
        let second = picker.begin_navigation("/root/sub");

        assert!(!picker.apply_listing(first, listing("/root")));
        assert_eq!(
            picker.listing(),
            &ListingState::Loading {
                path: "/root/sub".to_string()
            }
        );
        assert!(picker.apply_listing(second, listing("/root/sub")));
    }

    #[test]
    fn listing_after_close_is_dropped() {
        let mut picker = FilePicker::default();
        let seq = picker.open(PickTarget::new(FormId::Clip, "video"));
        picker.close();
        assert!(!picker.apply_listing(seq, listing("/root")));
        assert_eq!(picker.listing(), &ListingState::Empty);
    }

    #[test]
    fn failure_keeps_target() {
        let mut picker = FilePicker::default();
        let seq = picker.open(PickTarget::new(FormId::Burn, "subtitle"));
        assert!(picker.apply_failure(seq, "boom"));
        assert!(picker.is_open());
        assert_eq!(picker.target().map(|t| t.field.as_str()), Some("subtitle"));
    }

    #[test]
    fn filter_accepts_listed_extensions() {
        let target = PickTarget::new(FormId::Clip, "video").with_filter(".mp4, webm");
        assert!(target.accepts(&file(".mp4")));
        assert!(target.accepts(&file(".WEBM")));
        assert!(!target.accepts(&file(".srt")));

        let open = PickTarget::new(FormId::Clip, "video").with_filter("  ");
        assert_eq!(open.extension_filter, None);
        assert!(open.accepts(&file(".srt")));
    }
}
