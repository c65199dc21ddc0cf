//! Rendering of planned actions.

use std::io::{self, Write};

use crossterm::style::Stylize;
use jpkg_core::{Action, ActionKind};

use super::theme::Theme;

/// One line per action, in execution order.
pub fn write_actions<W: Write>(out: &mut W, actions: &[Action]) -> io::Result<()> {
    let theme = Theme::default();

    writeln!(out)?;
    for action in actions {
        let package = &action.package;
        let name_col = format!(
            "{:<width$}",
            package.name.as_str(),
            width = theme.layout.name_width
        );
        let (verb, change) = match &action.kind {
            ActionKind::Install => ("install", package.version.to_string()),
            ActionKind::Reinstall => ("reinstall", package.version.to_string()),
            ActionKind::Update { previous } => {
                ("update", format!("{previous}  ->  {}", package.version))
            }
        };
        writeln!(
            out,
            "  {} {} {}",
            format!("{verb:<9}").with(theme.colors.secondary),
            name_col.with(theme.colors.package_name),
            change.with(theme.colors.version)
        )?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jpkg_schema::Package;

    #[test]
    fn test_write_actions() {
        let actions = vec![
            Action {
                package: Package::meta("lib", "2", &[]),
                kind: ActionKind::Update {
                    previous: "1".into(),
                },
            },
            Action {
                package: Package::meta("app", "1", &["lib"]),
                kind: ActionKind::Reinstall,
            },
        ];

        let mut out = Vec::new();
        write_actions(&mut out, &actions).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lib = text.find("lib").unwrap();
        let app = text.find("app").unwrap();
        assert!(lib < app);
        assert!(text.contains("1  ->  2"));
        assert!(text.contains("reinstall"));
    }
}
