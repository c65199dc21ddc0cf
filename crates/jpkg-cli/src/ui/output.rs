//! Terminal implementation of the core [`Reporter`].

use crossterm::style::Stylize;
use jpkg_core::Reporter;
use jpkg_schema::{PackageName, Version};

use super::theme::Theme;

/// Prints progress lines to stdout and problems to stderr.
#[derive(Debug, Clone, Default)]
pub struct ConsoleReporter {
    theme: Theme,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn package_line(&self, icon: &str, name: &PackageName, version: &Version) -> String {
        let theme = &self.theme;
        let name_col = format!("{:<width$}", name.as_str(), width = theme.layout.name_width);
        let version_col = format!(
            "{:<width$}",
            version.as_str(),
            width = theme.layout.version_width
        );
        format!(
            "  {} {} {}",
            icon,
            name_col.with(theme.colors.package_name),
            version_col.with(theme.colors.version)
        )
    }
}

impl Reporter for ConsoleReporter {
    fn section(&self, title: &str) {
        println!();
        println!("{}", title.bold());
    }

    fn installing(&self, name: &PackageName, version: &Version, step: &str) {
        let icon = self.theme.icons.active.with(self.theme.colors.active);
        let line = self.package_line(&icon.to_string(), name, version);
        println!("{line} {}", step.with(self.theme.colors.secondary));
    }

    fn done(&self, name: &PackageName, version: &Version, detail: &str) {
        let icon = self.theme.icons.success.with(self.theme.colors.success);
        let line = self.package_line(&icon.to_string(), name, version);
        println!("{line} {}", detail.with(self.theme.colors.success));
    }

    fn failed(&self, name: &PackageName, version: &Version, reason: &str) {
        let icon = self.theme.icons.error.with(self.theme.colors.error);
        let line = self.package_line(&icon.to_string(), name, version);
        eprintln!("{line} {}", reason.with(self.theme.colors.error));
    }

    fn info(&self, msg: &str) {
        println!("  {} {msg}", self.theme.icons.info.with(self.theme.colors.active));
    }

    fn success(&self, msg: &str) {
        println!(
            "  {} {msg}",
            self.theme.icons.success.with(self.theme.colors.success)
        );
    }

    fn warning(&self, msg: &str) {
        eprintln!(
            "  {} {}",
            self.theme.icons.warning.with(self.theme.colors.warning),
            msg.with(self.theme.colors.warning)
        );
    }

    fn error(&self, msg: &str) {
        eprintln!(
            "  {} {}",
            self.theme.icons.error.with(self.theme.colors.error),
            msg.with(self.theme.colors.error)
        );
    }

    fn summary(&self, count: usize, action: &str, elapsed_secs: f64) {
        println!();
        println!(
            "  {} {count} package{} {action} in {elapsed_secs:.2}s",
            self.theme.icons.success.with(self.theme.colors.success),
            if count == 1 { "" } else { "s" }
        );
    }
}
