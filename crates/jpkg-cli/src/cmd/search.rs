//! Search command

use anyhow::Result;
use crossterm::style::Stylize;

use crate::ops::Context;
use crate::ui::{Theme, list::write_packages};

/// Search available packages whose name contains any of the queries
pub fn search(ctx: &Context, queries: &[String]) -> Result<()> {
    let catalog = ctx.available()?;
    let results = catalog.search(queries);

    if results.is_empty() {
        let theme = Theme::default();
        println!();
        println!(
            "  {} No packages found matching '{}'",
            theme.icons.info.blue(),
            queries.join(", ").white()
        );
        println!();
        return Ok(());
    }

    write_packages(&mut std::io::stdout().lock(), results, "found")?;
    Ok(())
}
