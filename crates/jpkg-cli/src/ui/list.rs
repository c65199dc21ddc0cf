//! List and search output formatting
//!
//! Provides column-aligned rendering for `jpkg list`, `jpkg available` and
//! `jpkg search`.

use std::io::{self, Write};

use crossterm::style::Stylize;
use jpkg_schema::Package;

use super::theme::Theme;

/// Column headers
pub fn write_header<W: Write>(out: &mut W) -> io::Result<()> {
    let theme = Theme::default();

    let header = format!(
        "  {:<nw$} {:<vw$} {}",
        "name",
        "version",
        "kind",
        nw = theme.layout.name_width,
        vw = theme.layout.version_width,
    );
    writeln!(out)?;
    writeln!(out, "{}", header.with(theme.colors.header))
}

/// A single `name version kind` row
pub fn write_row<W: Write>(out: &mut W, package: &Package) -> io::Result<()> {
    let theme = Theme::default();

    let name_part = format!(
        "{:<width$}",
        package.name.as_str(),
        width = theme.layout.name_width
    );
    let version_part = format!(
        "{:<width$}",
        package.version.as_str(),
        width = theme.layout.version_width
    );

    writeln!(
        out,
        "  {} {} {}",
        name_part.with(theme.colors.package_name),
        version_part.with(theme.colors.version),
        package.kind.label().with(theme.colors.secondary)
    )
}

/// Count footer, e.g. "3 packages installed"
pub fn write_footer<W: Write>(out: &mut W, count: usize, status: &str) -> io::Result<()> {
    let theme = Theme::default();
    let msg = format!(
        "  {count} package{} {status}",
        if count == 1 { "" } else { "s" }
    );
    writeln!(out)?;
    writeln!(out, "{}", msg.with(theme.colors.secondary))
}

/// Header, one row per package and footer.
pub fn write_packages<'a, W, I>(out: &mut W, packages: I, status: &str) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Package>,
{
    write_header(out)?;
    let mut count = 0;
    for package in packages {
        write_row(out, package)?;
        count += 1;
    }
    write_footer(out, count, status)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(packages: &[Package], status: &str) -> String {
        let mut out = Vec::new();
        write_packages(&mut out, packages, status).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_rows_and_footer() {
        let packages = vec![
            Package::archive("lib", "1.2.0", &[]),
            Package::meta("group", "1", &["lib"]),
        ];
        let text = render(&packages, "installed");

        assert!(text.contains("lib"));
        assert!(text.contains("1.2.0"));
        assert!(text.contains("archive"));
        assert!(text.contains("meta"));
        assert!(text.contains("2 packages installed"));
    }

    #[test]
    fn test_singular_footer() {
        let text = render(&[Package::meta("only", "1", &[])], "available");
        assert!(text.contains("1 package available"));
    }
}
