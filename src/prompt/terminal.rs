use std::io::{self, BufRead, Write};

use console::style;

use crate::error::{ReleaseError, Result};
use crate::prompt::{Ask, Choice, Prompter, Reply};
use crate::ui;

/// Prompts on stdout and reads answers line by line from stdin.
pub struct TerminalPrompter<R = io::StdinLock<'static>, W = io::Stdout> {
    input: R,
    output: W,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        TerminalPrompter {
            input: io::stdin().lock(),
            output: io::stdout(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn with_io(input: R, output: W) -> Self {
        TerminalPrompter { input, output }
    }

    fn read_line(&mut self) -> Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ReleaseError::prompt("input closed before an answer was given"));
        }
        Ok(line.trim().to_string())
    }

    /// Displays a numbered list and accepts a 1-based index selection.
    /// Default selection is the first entry if user presses Enter.
    fn select(&mut self, message: &str, choices: &[Choice]) -> Result<Option<String>> {
        if choices.is_empty() {
            return Err(ReleaseError::prompt(format!("no choices for '{}'", message)));
        }

        writeln!(self.output, "\n{}", style(message).bold())?;
        for (i, choice) in choices.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, choice.label)?;
        }

        loop {
            write!(self.output, "\nSelect (1-{}) [default: 1]: ", choices.len())?;
            let selection = self.read_line()?;

            let index = if selection.is_empty() {
                1
            } else {
                selection.parse::<usize>().unwrap_or(0)
            };

            if index > 0 && index <= choices.len() {
                return Ok(choices[index - 1].value.clone());
            }
            ui::display_error("Invalid selection");
        }
    }

    fn input(&mut self, message: &str, default: Option<&str>) -> Result<String> {
        match default {
            Some(default) => write!(self.output, "\n{} [{}]: ", message, default)?,
            None => write!(self.output, "\n{}: ", message)?,
        }
        let line = self.read_line()?;

        Ok(match default {
            Some(default) if line.is_empty() => default.to_string(),
            _ => line,
        })
    }

    /// Accepts "y"/"yes" and "n"/"no" case-insensitively; Enter takes the default.
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        let hint = if default { "(Y/n)" } else { "(y/N)" };
        write!(self.output, "\n{} {}: ", message, hint)?;

        let response = self.read_line()?.to_lowercase();
        Ok(match response.as_str() {
            "y" | "yes" => true,
            "n" | "no" => false,
            _ => default,
        })
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask(&mut self, ask: &Ask) -> Result<Reply> {
        match ask {
            Ask::Select { message, choices } => self.select(message, choices).map(Reply::Selected),
            Ask::Input { message, default } => {
                self.input(message, default.as_deref()).map(Reply::Text)
            }
            Ask::Confirm { message, default } => {
                self.confirm(message, *default).map(Reply::Confirmed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> TerminalPrompter<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalPrompter::with_io(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn select_ask() -> Ask {
        Ask::Select {
            message: "Pick".to_string(),
            choices: vec![Choice::value("patch"), Choice::value("minor"), Choice::other("Other (specify)")],
        }
    }

    #[test]
    fn test_select_by_index() {
        let mut p = prompter("2\n");
        assert_eq!(
            p.ask(&select_ask()).unwrap(),
            Reply::Selected(Some("minor".to_string()))
        );
    }

    #[test]
    fn test_select_defaults_to_first() {
        let mut p = prompter("\n");
        assert_eq!(
            p.ask(&select_ask()).unwrap(),
            Reply::Selected(Some("patch".to_string()))
        );
    }

    #[test]
    fn test_select_other_and_retry_on_invalid() {
        let mut p = prompter("9\n3\n");
        assert_eq!(p.ask(&select_ask()).unwrap(), Reply::Selected(None));
    }

    #[test]
    fn test_input_uses_default_on_enter() {
        let mut p = prompter("\n");
        let ask = Ask::Input {
            message: "Tag".to_string(),
            default: Some("latest".to_string()),
        };
        assert_eq!(p.ask(&ask).unwrap(), Reply::Text("latest".to_string()));
    }

    #[test]
    fn test_confirm_answers() {
        let ask = Ask::Confirm {
            message: "Continue?".to_string(),
            default: false,
        };
        assert_eq!(prompter("YES\n").ask(&ask).unwrap(), Reply::Confirmed(true));
        assert_eq!(prompter("\n").ask(&ask).unwrap(), Reply::Confirmed(false));
        assert_eq!(prompter("n\n").ask(&ask).unwrap(), Reply::Confirmed(false));
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut p = prompter("");
        assert!(p.ask(&select_ask()).is_err());
    }

    #[test]
    fn test_select_writes_numbered_list() {
        let mut p = prompter("1\n");
        p.ask(&select_ask()).unwrap();
        let written = String::from_utf8(p.output).unwrap();
        assert!(written.contains("1. patch"));
        assert!(written.contains("3. Other (specify)"));
    }
}
