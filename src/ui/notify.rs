use ratatui::style::{Color, Style};

/// Transient notification channel for user-facing outcomes. Views receive
/// this as an injected capability rather than reaching for a global, which
/// also makes validation paths testable with a recording implementation.
pub trait Notifier {
    fn success(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// Severity levels shown in the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    pub fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Holds the footer message text plus its severity. The footer shows at
/// most one message; each notification replaces the previous one.
#[derive(Debug, Default)]
pub struct StatusLine {
    message: Option<(String, StatusKind)>,
}

impl StatusLine {
    pub fn clear(&mut self) {
        self.message = None;
    }

    pub fn message(&self) -> Option<(&str, StatusKind)> {
        self.message
            .as_ref()
            .map(|(text, kind)| (text.as_str(), *kind))
    }

    pub fn success(&mut self, message: &str) {
        self.message = Some((message.to_string(), StatusKind::Info));
    }

    pub fn error(&mut self, message: &str) {
        self.message = Some((message.to_string(), StatusKind::Error));
    }
}

impl Notifier for StatusLine {
    fn success(&mut self, message: &str) {
        StatusLine::success(self, message);
    }

    fn error(&mut self, message: &str) {
        StatusLine::error(self, message);
    }
}
