//! Confirmation prompts.

use std::io::{self, BufRead, Write};

/// Ask a yes/no question on stdout. An empty answer counts as yes, a closed
/// stdin as no.
pub fn confirm(question: &str) -> io::Result<bool> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    confirm_with(question, &mut stdin.lock(), &mut stdout)
}

pub fn confirm_with<R: BufRead, W: Write>(
    question: &str,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    write!(output, "{question} (Y/n): ")?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        // stdin closed
        writeln!(output)?;
        return Ok(false);
    }
    let response = answer.trim().to_lowercase();

    Ok(response.is_empty() || response == "y" || response == "yes")
}
