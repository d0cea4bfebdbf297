use crate::utils::error::Result;
use crate::utils::validation::validate_non_empty_string;
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

/// Prompt/answer helper over a line-oriented input and an output sink.
///
/// Every `prompt_*` method returns `Ok(None)` once the input is exhausted.
#[derive(Debug)]
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    pub fn prompt_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Reads a non-blank answer, re-prompting after blank ones.
    pub fn prompt_text(&mut self, prompt: &str, field: &str) -> Result<Option<String>> {
        loop {
            let Some(line) = self.prompt_line(prompt)? else {
                return Ok(None);
            };
            match validate_non_empty_string(field, &line) {
                Ok(()) => return Ok(Some(line.trim().to_string())),
                Err(_) => self.say(format!("{} cannot be empty.", field))?,
            }
        }
    }

    /// Reads a number, re-prompting until the answer parses.
    pub fn prompt_number<T: FromStr>(&mut self, prompt: &str) -> Result<Option<T>> {
        loop {
            let Some(line) = self.prompt_line(prompt)? else {
                return Ok(None);
            };
            match line.trim().parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => {
                    tracing::debug!("Rejected numeric input {:?}", line);
                    self.say(format!("'{}' is not a valid number, please try again.", line.trim()))?;
                }
            }
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_prompt_number_reprompts_on_garbage() {
        let mut console = console("abc\n\n42\n");
        let value: Option<u32> = console.prompt_number("Enter Book ID: ").unwrap();
        assert_eq!(value, Some(42));

        let output = String::from_utf8(console.output().clone()).unwrap();
        assert_eq!(output.matches("Enter Book ID: ").count(), 3);
        assert!(output.contains("'abc' is not a valid number"));
    }

    #[test]
    fn test_prompt_text_rejects_blank_and_trims() {
        let mut console = console("   \n  Dune \r\n");
        let title = console.prompt_text("Enter Book Title: ", "Title").unwrap();
        assert_eq!(title.as_deref(), Some("Dune"));

        let output = String::from_utf8(console.output().clone()).unwrap();
        assert!(output.contains("Title cannot be empty."));
    }

    #[test]
    fn test_end_of_input_yields_none() {
        let mut console = console("");
        assert_eq!(console.prompt_line("> ").unwrap(), None);
        assert_eq!(console.prompt_number::<u32>("> ").unwrap(), None);
        assert_eq!(console.prompt_text("> ", "Name").unwrap(), None);
    }
}
