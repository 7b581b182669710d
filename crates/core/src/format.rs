use crate::render::{TranscriptSection, View};

/// Format seconds as MM:SS timestamp
pub fn format_timestamp(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let mins = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    format!("{:02}:{:02}", mins, secs)
}

/// Markdown-ish rendering of a view, one section per heading.
pub fn format_view_readable(view: &View) -> String {
    let mut output = String::new();

    if let Some(error) = &view.error {
        output.push_str(&format!("**Error:** {}\n\n", error));
    }

    if let Some(job_id) = &view.job_id {
        output.push_str("## Job ID\n\n");
        output.push_str(&format!("{}\n\n", job_id));
    }

    if let Some(rows) = &view.video {
        output.push_str("## Video\n\n");
        for row in rows {
            output.push_str(&format!("**{}:** {}\n", row.label, row.value));
        }
        output.push('\n');
    }

    if let Some(tiles) = &view.frames {
        output.push_str("## Frame Thumbnails\n\n");
        for tile in tiles {
            match tile.placeholder() {
                Some(placeholder) => {
                    output.push_str(&format!("• {}: {}\n", tile.alt, placeholder))
                }
                None => output.push_str(&format!("• {}: {}\n", tile.alt, tile.url)),
            }
        }
        output.push('\n');
    }

    if let Some(transcript) = &view.transcript {
        output.push_str("## Transcript\n\n");
        match transcript {
            TranscriptSection::Loading => output.push_str("Loading transcript...\n"),
            TranscriptSection::Text(text) => {
                output.push_str(text.trim());
                output.push('\n');
            }
            TranscriptSection::Fields(fields) => {
                for field in fields {
                    output.push_str(&format!("### {}\n\n{}\n\n", field.label, field.value));
                }
            }
        }
        output.push('\n');
    }

    if let Some(tones) = &view.tones {
        output.push_str("## Tone Variations\n\n");
        for tone in tones {
            output.push_str(&format!("### {}\n\n{}\n\n", tone.label, tone.value));
        }
    }

    output
}
