use std::io::{self, BufRead, Write};

/// Ask a yes/no question, defaulting to "no" on empty input or end of input.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<bool> {
    let mut answer = String::new();
    loop {
        write!(output, "{} (y/N): ", question)?;
        output.flush()?;

        answer.clear();
        if input.read_line(&mut answer)? == 0 {
            writeln!(output)?;
            return Ok(false);
        }

        match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "" | "n" | "no" => return Ok(false),
            _ => writeln!(output, "Please answer y or n.")?,
        }
    }
}

pub fn confirm_on_terminal(question: &str) -> io::Result<bool> {
    confirm(&mut io::stdin().lock(), &mut io::stdout(), question)
}
