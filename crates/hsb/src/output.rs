//! Colored terminal output utilities.

use console::{Style, Term};

/// Width of separator lines.
const RULE_WIDTH: usize = 60;

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    bold: Style,
    cyan_bold: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            bold: Style::new().bold(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a highlighted message (cyan bold).
    pub(crate) fn highlight(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&self.cyan_bold.apply_to(msg).to_string());
    }

    /// Print `label` in bold followed by a plain value.
    pub(crate) fn field(&self, label: &str, value: &str) {
        let _ = self
            .term
            .write_line(&format!("{} {value}", self.bold.apply_to(label)));
    }

    /// Print `label` in bold followed by a count, green when `ok`, red otherwise.
    pub(crate) fn count(&self, label: &str, count: usize, ok: bool) {
        let style = if ok { &self.green } else { &self.red };
        let _ = self.term.write_line(&format!(
            "{} {}",
            self.bold.apply_to(label),
            style.apply_to(count)
        ));
    }

    /// Print a separator line.
    pub(crate) fn separator(&self) {
        let _ = self.term.write_line(&"=".repeat(RULE_WIDTH));
    }

    /// Print a thin separator line.
    pub(crate) fn rule(&self) {
        let _ = self.term.write_line(&"-".repeat(RULE_WIDTH));
    }
}
