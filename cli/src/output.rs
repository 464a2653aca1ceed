//! Terminal output utilities for styled CLI output.
//!
//! Commands print through [`Output`] instead of calling `println!` directly.

use console::{Term, style};
use roster_business::{Notice, NoticeLevel, Notices, UserRecord};
use std::fmt::Display;

/// Terminal output helper for consistent styled output.
pub struct Output {
    term: Term,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    fn line(&self, text: &str) {
        drop(self.term.write_line(text));
    }

    /// Print a success message with a green checkmark.
    pub fn success(&self, message: impl Display) {
        self.line(&format!("{} {}", style("✓").green().bold(), message));
    }

    /// Print an error message with a red X.
    pub fn error(&self, message: impl Display) {
        self.line(&format!("{} {}", style("✗").red().bold(), message));
    }

    pub fn warning(&self, message: impl Display) {
        self.line(&format!("{} {}", style("⚠").yellow().bold(), message));
    }

    pub fn info(&self, message: impl Display) {
        self.line(&format!("{} {}", style("ℹ").blue().bold(), message));
    }

    pub fn print(&self, message: impl Display) {
        self.line(&message.to_string());
    }

    pub fn newline(&self) {
        self.line("");
    }

    pub fn header(&self, message: impl Display) {
        self.line(&style(message).bold().cyan().to_string());
    }

    /// Print a labeled value with indentation.
    pub fn labeled_indent(&self, label: impl Display, value: impl Display, indent: usize) {
        let spaces = " ".repeat(indent);
        self.line(&format!("{spaces}{}: {}", style(label).dim(), value));
    }

    pub fn dim(&self, message: impl Display) {
        self.line(&style(message).dim().to_string());
    }

    pub fn notice(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Success => self.success(&notice.message),
            NoticeLevel::Error => self.error(&notice.message),
        }
    }

    /// Print every notice published since the last call.
    pub fn notices(&self, notices: &Notices) {
        for notice in notices.drain() {
            self.notice(&notice);
        }
    }

    /// One user as a card: name, email, status.
    pub fn user_card(&self, user: &UserRecord) {
        self.line(&format!(
            "{} {}",
            style(format!("#{}", user.id)).dim(),
            style(user.full_name()).white().bold()
        ));
        self.labeled_indent("Email", &user.email, 2);
        self.labeled_indent("Status", status_label(user), 2);
    }
}

/// Status text, styled red when the user is inactive.
pub fn status_label(user: &UserRecord) -> String {
    if user.is_inactive() {
        style(user.status_label()).red().to_string()
    } else {
        style(user.status_label()).green().to_string()
    }
}
