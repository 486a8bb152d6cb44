use clipper_core::{
    update, AppState, DirectoryListing, Effect, FileEntry, FileIcon, FilePanelBody, FormId, Msg,
    PickTarget, RowAction,
};
use pretty_assertions::assert_eq;

fn entry(name: &str, path: &str, is_dir: bool, size: u64, ext: &str) -> FileEntry {
    FileEntry {
        name: name.to_string(),
        path: path.to_string(),
        is_dir,
        size,
        ext: ext.to_string(),
    }
}

fn open(target: PickTarget) -> (AppState, u64) {
    let (state, effects) = update(AppState::new(), Msg::FilePickerOpened(target));
    let seq = match effects.as_slice() {
        [Effect::ListDirectory { seq, path }] => {
            assert_eq!(path, "");
            *seq
        }
        other => panic!("unexpected effects {other:?}"),
    };
    (state, seq)
}

fn rows(state: &AppState) -> Vec<clipper_core::FileRowView> {
    match state.view().picker.expect("picker open").body {
        FilePanelBody::Listing { rows, .. } => rows,
        other => panic!("expected listing, got {other:?}"),
    }
}

#[test]
fn root_listing_renders_single_video_row() {
    let (state, seq) = open(PickTarget::new(FormId::Clip, "video"));
    let (state, effects) = update(
        state,
        Msg::ListingLoaded {
            seq,
            listing: DirectoryListing {
                current_path: "/root".to_string(),
                parent_path: None,
                entries: vec![entry("a.mp4", "/root/a.mp4", false, 2048, ".mp4")],
            },
        },
    );
    assert!(effects.is_empty());

    let rows = rows(&state);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].icon, FileIcon::Video);
    assert_eq!(rows[0].size_label.as_deref(), Some("2.0 KB"));
    assert_eq!(rows[0].action, RowAction::Select("a.mp4".to_string()));
}

#[test]
fn parent_entry_comes_first_and_server_order_is_kept() {
    let (state, seq) = open(PickTarget::new(FormId::Burn, "subtitle"));
    let (state, _) = update(
        state,
        Msg::ListingLoaded {
            seq,
            listing: DirectoryListing {
                current_path: "/root/results".to_string(),
                parent_path: Some("/root".to_string()),
                entries: vec![
                    entry("z.srt", "/root/results/z.srt", false, 512, ".srt"),
                    entry("clips", "/root/results/clips", true, 0, ""),
                    entry("notes.txt", "/root/results/notes.txt", false, 5_242_880, ".txt"),
                ],
            },
        },
    );

    let rows = rows(&state);
    let names: Vec<_> = rows.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(names, vec!["..", "z.srt", "clips", "notes.txt"]);
    assert_eq!(rows[0].icon, FileIcon::Back);
    assert_eq!(rows[0].action, RowAction::Navigate("/root".to_string()));
    assert_eq!(rows[1].icon, FileIcon::Subtitle);
    assert_eq!(rows[1].size_label.as_deref(), Some("512 B"));
    assert_eq!(rows[2].icon, FileIcon::Folder);
    assert_eq!(rows[2].size_label, None);
    assert_eq!(
        rows[2].action,
        RowAction::Navigate("/root/results/clips".to_string())
    );
    assert_eq!(rows[3].icon, FileIcon::File);
    assert_eq!(rows[3].size_label.as_deref(), Some("5.0 MB"));
}

#[test]
fn select_fills_target_field_and_clears_target() {
    let (state, _) = open(PickTarget::new(FormId::Clip, "video"));
    let (mut state, effects) = update(
        state,
        Msg::FileSelected {
            filename: "a.mp4".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    assert_eq!(state.forms().get(FormId::Clip).field("video"), "a.mp4");
    assert!(!state.picker().is_open());
    assert!(state.view().picker.is_none());
}

#[test]
fn select_without_target_is_noop() {
    let state = AppState::new();
    let (mut next, effects) = update(
        state.clone(),
        Msg::FileSelected {
            filename: "a.mp4".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
    assert_eq!(next, state);
}

#[test]
fn close_always_clears_target() {
    let (state, _) = open(PickTarget::new(FormId::Analyze, "file"));
    let (state, _) = update(state, Msg::FilePickerClosed);
    assert!(state.picker().target().is_none());
    assert_eq!(state.forms().get(FormId::Analyze).field("file"), "");

    let (state, effects) = update(state, Msg::FilePickerClosed);
    assert!(effects.is_empty());
    assert!(!state.picker().is_open());
}

#[test]
fn reopening_replaces_previous_target() {
    let (state, _) = open(PickTarget::new(FormId::Analyze, "file"));
    let (state, effects) = update(
        state,
        Msg::FilePickerOpened(PickTarget::new(FormId::Burn, "video").with_filter(".mp4")),
    );
    assert_eq!(effects.len(), 1);
    let (state, _) = update(
        state,
        Msg::FileSelected {
            filename: "v.mp4".to_string(),
        },
    );
    assert_eq!(state.forms().get(FormId::Burn).field("video"), "v.mp4");
    assert_eq!(state.forms().get(FormId::Analyze).field("file"), "");
}

#[test]
fn navigate_issues_listing_with_fresh_sequence() {
    let (state, first) = open(PickTarget::new(FormId::Clip, "video"));
    let (state, effects) = update(
        state,
        Msg::NavigateRequested {
            path: "/root/sub".to_string(),
        },
    );
    let second = match effects.as_slice() {
        [Effect::ListDirectory { seq, path }] => {
            assert_eq!(path, "/root/sub");
            *seq
        }
        other => panic!("unexpected effects {other:?}"),
    };
    assert!(second > first);

    // The root listing answers late and must not replace the pending navigation.
    let (state, _) = update(
        state,
        Msg::ListingLoaded {
            seq: first,
            listing: DirectoryListing {
                current_path: "/root".to_string(),
                parent_path: None,
                entries: Vec::new(),
            },
        },
    );
    assert_eq!(
        state.view().picker.unwrap().body,
        FilePanelBody::Loading {
            path: "/root/sub".to_string()
        }
    );
}

#[test]
fn navigate_while_closed_is_ignored() {
    let (state, effects) = update(
        AppState::new(),
        Msg::NavigateRequested {
            path: "/tmp".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert!(!state.picker().is_open());
}

#[test]
fn listing_failure_shows_error_and_keeps_target() {
    let (state, seq) = open(PickTarget::new(FormId::Clip, "video"));
    let (state, _) = update(
        state,
        Msg::ListingFailed {
            seq,
            error: "Error loading files".to_string(),
        },
    );
    let panel = state.view().picker.expect("still open");
    assert_eq!(panel.target_field, "video");
    assert_eq!(
        panel.body,
        FilePanelBody::Error {
            message: "Error loading files".to_string()
        }
    );
}

#[test]
fn extension_filter_marks_rows_without_hiding_them() {
    let (state, seq) = open(PickTarget::new(FormId::Burn, "subtitle").with_filter(".srt,.vtt"));
    let (state, _) = update(
        state,
        Msg::ListingLoaded {
            seq,
            listing: DirectoryListing {
                current_path: "/r".to_string(),
                parent_path: None,
                entries: vec![
                    entry("a.mp4", "/r/a.mp4", false, 10, ".mp4"),
                    entry("a.srt", "/r/a.srt", false, 10, ".srt"),
                    entry("sub", "/r/sub", true, 0, ""),
                ],
            },
        },
    );
    let flags: Vec<_> = rows(&state).iter().map(|row| row.matches_filter).collect();
    assert_eq!(flags, vec![false, true, true]);
}
