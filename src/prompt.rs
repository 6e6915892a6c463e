// Terminal questions: yes/no choices and free-text answers.
// Generic over the reader/writer so the flow can be driven from tests.

use crate::error::Error;
use std::io::{self, BufRead, Write};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `question` and return the answer line without the trailing newline.
    pub fn ask_line(&mut self, question: &str) -> Result<String, Error> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::InputClosed(question.trim().to_string()));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Ask until the answer is a yes (`y`, `yes`, `o`, `oui`) or a no (`n`, `no`, `non`).
    pub fn ask_yes_no(&mut self, question: &str) -> Result<bool, Error> {
        let mut answer = self.ask_line(&format!("{question} (y/n): "))?;
        loop {
            match parse_yes_no(&answer) {
                Some(yes) => return Ok(yes),
                None => answer = self.ask_line("Please answer 'y' (yes) or 'n' (no): ")?,
            }
        }
    }
}

fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" | "o" | "oui" => Some(true),
        "n" | "no" | "non" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_yes_no_accepts_variants() {
        for (input, expected) in [("y\n", true), ("OUI\n", true), (" o \n", true), ("n\n", false), ("Non\r\n", false)] {
            assert_eq!(prompter(input).ask_yes_no("Q?").unwrap(), expected, "{input:?}");
        }
    }

    #[test]
    fn test_yes_no_reasks_until_valid() {
        let mut p = prompter("maybe\n\nn\n");
        assert!(!p.ask_yes_no("Add a distractor?").unwrap());
        let shown = String::from_utf8(p.output).unwrap();
        assert_eq!(shown.matches("Please answer").count(), 2);
    }

    #[test]
    fn test_line_is_kept_verbatim() {
        let mut p = prompter("  a red mug  \n");
        assert_eq!(p.ask_line("Description: ").unwrap(), "  a red mug  ");
    }

    #[test]
    fn test_eof_is_input_closed() {
        let mut p = prompter("");
        assert!(matches!(p.ask_line("Name: "), Err(Error::InputClosed(_))));
        let mut p = prompter("what\n");
        assert!(matches!(p.ask_yes_no("Q?"), Err(Error::InputClosed(_))));
    }
}
