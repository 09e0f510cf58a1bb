use crate::timeline::Timeline;

use std::fmt::Write;

/// Default project name in the rendered artifact.
pub const DEFAULT_PROJECT_NAME: &str = "Session1";

impl Timeline {
    /// Render the export artifact: one `Song` element followed by one `Clip`
    /// element per clip, in timeline order.
    pub fn render_xml(&self, project_name: &str) -> String {
        let mut xml = String::with_capacity(128 + self.clips.len() * 96);

        let (uri, title, duration_ms) = self
            .song
            .as_ref()
            .map(|s| (s.uri.as_str(), s.title.as_str(), s.duration_ms))
            .unwrap_or(("", "", 0));

        // Writing into a String cannot fail.
        let _ = writeln!(xml, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        let _ = writeln!(xml, r#"<Project name="{}">"#, escape(project_name));
        let _ = writeln!(
            xml,
            r#"  <Song uri="{}" title="{}" durationMs="{}"/>"#,
            escape(uri),
            escape(title),
            duration_ms
        );
        for clip in &self.clips {
            let _ = writeln!(
                xml,
                r#"  <Clip file="{}" startSongMs="{}" endSongMs="{}"/>"#,
                escape(&clip.file),
                clip.start_ms,
                clip.end_ms
            );
        }
        let _ = writeln!(xml, "</Project>");

        xml
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
