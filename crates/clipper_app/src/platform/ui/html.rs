//! HTML rendering of the file panel.
//!
//! All server-provided text goes through [`Markup`], which escapes element
//! text and attribute values. Row actions are carried in `data-*` attributes
//! for the page script to read, never spliced into inline handlers.

use clipper_core::{FileIcon, FilePanelBody, FilePanelView, RowAction};

#[derive(Debug, Default)]
pub struct Markup {
    out: String,
}

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag and attribute names are trusted; attribute values are escaped.
    pub fn open(&mut self, tag: &'static str, attrs: &[(&'static str, &str)]) -> &mut Self {
        self.out.push('<');
        self.out.push_str(tag);
        for (name, value) in attrs {
            self.out.push(' ');
            self.out.push_str(name);
            self.out.push_str("=\"");
            self.out.push_str(&escape_html(value));
            self.out.push('"');
        }
        self.out.push('>');
        self
    }

    pub fn text(&mut self, text: &str) -> &mut Self {
        self.out.push_str(&escape_html(text));
        self
    }

    pub fn close(&mut self, tag: &'static str) -> &mut Self {
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
        self
    }

    /// `<tag attrs>text</tag>`
    pub fn element(
        &mut self,
        tag: &'static str,
        attrs: &[(&'static str, &str)],
        text: &str,
    ) -> &mut Self {
        self.open(tag, attrs).text(text).close(tag)
    }

    pub fn finish(self) -> String {
        self.out
    }
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn render_panel(panel: &FilePanelView) -> String {
    let mut markup = Markup::new();
    markup.open(
        "div",
        &[
            ("class", "file-panel"),
            ("data-form", panel.target_form.key()),
            ("data-field", panel.target_field.as_str()),
        ],
    );
    match &panel.body {
        FilePanelBody::Loading { .. } => {
            markup.element("div", &[("class", "loading")], "Loading...");
        }
        FilePanelBody::Error { message } => {
            markup.element("div", &[("class", "error")], &format!("Error: {message}"));
        }
        FilePanelBody::Listing { current_path, rows } => {
            markup.element("div", &[("class", "file-panel-path")], current_path);
            if rows.is_empty() {
                markup.element("div", &[("class", "empty")], "Empty folder");
            } else {
                markup.open("ul", &[("class", "file-list")]);
                for row in rows {
                    let class = if row.matches_filter {
                        "file-item"
                    } else {
                        "file-item dimmed"
                    };
                    let (action, value) = match &row.action {
                        RowAction::Navigate(path) => ("navigate", path.as_str()),
                        RowAction::Select(name) => ("select", name.as_str()),
                    };
                    markup.open(
                        "li",
                        &[
                            ("class", class),
                            ("data-kind", icon_kind(row.icon)),
                            ("data-action", action),
                            ("data-value", value),
                        ],
                    );
                    markup.element("span", &[("class", "file-icon")], icon_glyph(row.icon));
                    markup.element("span", &[("class", "file-name")], &row.name);
                    if let Some(size) = &row.size_label {
                        markup.element("span", &[("class", "file-size")], size);
                    }
                    markup.close("li");
                }
                markup.close("ul");
            }
        }
    }
    markup.close("div");
    markup.finish()
}

fn icon_kind(icon: FileIcon) -> &'static str {
    match icon {
        FileIcon::Back => "back",
        FileIcon::Folder => "folder",
        FileIcon::Video => "video",
        FileIcon::Subtitle => "subtitle",
        FileIcon::File => "file",
    }
}

fn icon_glyph(icon: FileIcon) -> &'static str {
    match icon {
        FileIcon::Back => "\u{2b06}\u{fe0f}",
        FileIcon::Folder => "\u{1f4c1}",
        FileIcon::Video => "\u{1f3ac}",
        FileIcon::Subtitle => "\u{1f4dd}",
        FileIcon::File => "\u{1f4c4}",
    }
}
