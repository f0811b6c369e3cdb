//! Rendering of raw post text into HTML ("cooking").

use maud::html;

/// Text-rendering service of the host platform.
pub trait Cooker: Send + Sync {
    /// Render raw post source into HTML.
    fn cook(&self, raw: &str) -> String;
}

/// Renders raw text as escaped HTML paragraphs.
///
/// Blank lines separate paragraphs; a single newline becomes `<br>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParagraphCooker;

impl Cooker for ParagraphCooker {
    fn cook(&self, raw: &str) -> String {
        let normalized = raw.replace("\r\n", "\n");
        let paragraphs: Vec<Vec<&str>> = normalized
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| p.lines().map(str::trim_end).collect())
            .collect();

        html! {
            @for lines in &paragraphs {
                p {
                    @for (i, line) in lines.iter().enumerate() {
                        @if i > 0 { br; }
                        (line)
                    }
                }
            }
        }
        .into_string()
    }
}
