//! Colour and width handling for command output.

use descendants::NumberingScheme;
use owo_colors::{OwoColorize, Style};
use terminal_size::{Width, terminal_size};

/// Narrowest name column worth printing.
const MIN_NAME_WIDTH: usize = 12;

/// How output is styled. Colour support is probed once per command.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    color: bool,
}

impl Palette {
    pub fn detect() -> Self {
        Self {
            color: supports_color::on(supports_color::Stream::Stdout).is_some(),
        }
    }

    fn paint(self, text: &str, style: Style) -> String {
        if self.color {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn healthy(self, text: &str) -> String {
        self.paint(text, Style::new().green())
    }

    pub fn problem(self, text: &str) -> String {
        self.paint(text, Style::new().yellow())
    }

    pub fn muted(self, text: &str) -> String {
        self.paint(text, Style::new().dimmed())
    }

    /// Styles a descendant code. Merged d'Aboville codes stand out from
    /// single-lineage ones.
    pub fn code(self, scheme: NumberingScheme, code: &str) -> String {
        let style = match scheme {
            NumberingScheme::Record => Style::new().green(),
            NumberingScheme::DAboville if is_merged(code) => Style::new().magenta().bold(),
            _ => Style::new().bright_blue().bold(),
        };
        self.paint(code, style)
    }
}

/// Whether a d'Aboville code names more than one lineage.
fn is_merged(code: &str) -> bool {
    code.contains(['|', '{'])
}

/// Room for the trailing name column once `used` columns are taken.
///
/// `None` hides the column. Output that is not a terminal is not limited.
pub fn name_width(used: usize) -> Option<usize> {
    match terminal_size() {
        Some((Width(columns), _)) => usize::from(columns)
            .checked_sub(used)
            .filter(|width| *width >= MIN_NAME_WIDTH),
        None => Some(usize::MAX),
    }
}

/// Cuts `text` down to `width` characters, ending in `…` when shortened.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}
