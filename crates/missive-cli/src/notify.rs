//! User-facing notifications

use std::io::Write;
#[cfg(test)]
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Success,
    Failure,
}

/// Where command outcomes are reported; a short title plus optional detail
pub trait Notifier: Send + Sync {
    fn notify(&self, style: Style, title: &str, message: Option<&str>);

    fn success(&self, title: &str, message: Option<&str>) {
        self.notify(Style::Success, title, message);
    }

    fn failure(&self, title: &str, message: Option<&str>) {
        self.notify(Style::Failure, title, message);
    }
}

/// Writes notifications to stderr so stdout stays usable for data
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, style: Style, title: &str, message: Option<&str>) {
        let line = format_notification(style, title, message);
        let _ = writeln!(std::io::stderr(), "{}", line);
    }
}

pub fn format_notification(style: Style, title: &str, message: Option<&str>) -> String {
    let marker = match style {
        Style::Success => "✓",
        Style::Failure => "✗",
    };
    match message {
        Some(message) if !message.is_empty() => format!("{} {}: {}", marker, title, message),
        _ => format!("{} {}", marker, title),
    }
}

/// Keeps notifications in memory for assertions
#[cfg(test)]
#[derive(Default)]
pub struct RecordingNotifier {
    entries: Mutex<Vec<(Style, String, Option<String>)>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn entries(&self) -> Vec<(Style, String, Option<String>)> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, style: Style, title: &str, message: Option<&str>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((style, title.to_string(), message.map(str::to_string)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(
            format_notification(Style::Success, "Message sent successfully", None),
            "✓ Message sent successfully"
        );
        assert_eq!(
            format_notification(Style::Failure, "Import failed", Some("Please select a JSON file")),
            "✗ Import failed: Please select a JSON file"
        );
        assert_eq!(format_notification(Style::Failure, "Error", Some("")), "✗ Error");
    }

    #[test]
    fn test_recording() {
        let notifier = RecordingNotifier::default();
        notifier.success("ok", None);
        notifier.failure("bad", Some("detail"));

        let entries = notifier.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1], (Style::Failure, "bad".to_string(), Some("detail".to_string())));
    }
}
