/// Icon category shown next to a file browser row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileIcon {
    Back,
    Folder,
    Video,
    Subtitle,
    File,
}

const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".webm", ".mkv"];
const SUBTITLE_EXTENSIONS: &[&str] = &[".vtt", ".srt"];

/// Picks the icon for an entry. Directories always get the folder icon.
pub fn icon_for(is_dir: bool, ext: &str) -> FileIcon {
    if is_dir {
        return FileIcon::Folder;
    }
    let ext = ext.trim();
    let matches = |list: &[&str]| list.iter().any(|known| known.eq_ignore_ascii_case(ext));
    if matches(VIDEO_EXTENSIONS) {
        FileIcon::Video
    } else if matches(SUBTITLE_EXTENSIONS) {
        FileIcon::Subtitle
    } else {
        FileIcon::File
    }
}

/// Human-readable byte size: `B` below 1 KiB, one-decimal `KB` below 1 MiB,
/// one-decimal `MB` above.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let b = bytes as f64;
    if b < MB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / MB)
    }
}

/// `round(100 * step / total)`, clamped to `0..=100`. A zero total reads as 0%.
pub fn progress_percent(step: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (f64::from(step) * 100.0 / f64::from(total)).round();
    percent.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::{format_size, icon_for, progress_percent, FileIcon};

    #[test]
    fn sizes_switch_units_at_binary_boundaries() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_size(5_242_880), "5.0 MB");
    }

    #[test]
    fn percent_rounds_and_clamps() {
        assert_eq!(progress_percent(2, 5), 40);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(5, 5), 100);
        assert_eq!(progress_percent(9, 5), 100);
        assert_eq!(progress_percent(3, 0), 0);
    }

    #[test]
    fn icons_follow_extension_category() {
        assert_eq!(icon_for(false, ".mp4"), FileIcon::Video);
        assert_eq!(icon_for(false, ".MKV"), FileIcon::Video);
        assert_eq!(icon_for(false, ".srt"), FileIcon::Subtitle);
        assert_eq!(icon_for(false, ".txt"), FileIcon::File);
        assert_eq!(icon_for(false, ""), FileIcon::File);
        assert_eq!(icon_for(true, ".mp4"), FileIcon::Folder);
    }
}
