//! User input and interaction handling.
//!
//! [`Prompter`] is the seam between the workflow and the terminal.
//! [`DialoguerPrompter`] drives dialoguer widgets on an interactive
//! terminal; [`LinePrompter`] speaks plain lines over any reader/writer pair
//! and is used when stdin is piped.

use console::style;
use dialoguer::{Confirm, Input, Select};
use std::io::{BufRead, Write};

use crate::error::{Error, Result};

/// How a question or message is decorated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    Plain,
    Info,
    Warn,
    Error,
    Success,
}

impl Style {
    /// Applies the style to `text` with ANSI colours.
    pub fn paint(&self, text: &str) -> String {
        match self {
            Style::Plain => text.to_string(),
            Style::Info => style(text).black().on_blue().to_string(),
            Style::Warn => style(text).black().on_yellow().to_string(),
            Style::Error => style(text).black().on_red().to_string(),
            Style::Success => style(text).black().on_green().to_string(),
        }
    }
}

const EMPTY_ANSWER: &str = "This field is required. Please provide a value.";
const KEEP_ASKING_BOOL: &str = "Please answer y or n.";

/// Interactive questions and one-way messages.
pub trait Prompter {
    /// Asks a free-text question until a non-empty answer is given.
    fn ask(&mut self, question: &str, style: Style) -> Result<String>;

    /// Asks a yes/no question; true for `y`/`yes`.
    fn ask_bool(&mut self, question: &str, style: Style) -> Result<bool>;

    /// Shows `options` as a numbered list and returns the 0-based choice.
    fn ask_multiple_choice(
        &mut self,
        question: &str,
        options: &[String],
        style: Style,
    ) -> Result<usize>;

    /// Prints a message line.
    fn say(&mut self, style: Style, message: &str);
}

/// Parses a yes/no answer. `None` means the answer is not acceptable.
pub fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Parses a 1-based selection into a 0-based index within `len`.
pub fn parse_choice(answer: &str, len: usize) -> Option<usize> {
    match answer.trim().parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Some(n - 1),
        _ => None,
    }
}

/// Prompter backed by dialoguer widgets.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn ask(&mut self, question: &str, style: Style) -> Result<String> {
        let answer: String = Input::new()
            .with_prompt(style.paint(question))
            .validate_with(|input: &String| -> std::result::Result<(), &'static str> {
                if input.trim().is_empty() {
                    Err(EMPTY_ANSWER)
                } else {
                    Ok(())
                }
            })
            .interact_text()?;
        Ok(answer.trim().to_string())
    }

    fn ask_bool(&mut self, question: &str, style: Style) -> Result<bool> {
        Ok(Confirm::new().with_prompt(style.paint(question)).interact()?)
    }

    fn ask_multiple_choice(
        &mut self,
        question: &str,
        options: &[String],
        style: Style,
    ) -> Result<usize> {
        let selection = Select::new()
            .with_prompt(style.paint(question))
            .default(0)
            .items(options)
            .interact()?;
        Ok(selection)
    }

    fn say(&mut self, style: Style, message: &str) {
        println!("{}", style.paint(message));
    }
}

/// Line-oriented prompter over arbitrary input and output streams.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Gives back the output stream, e.g. to inspect what was written.
    pub fn into_output(self) -> W {
        self.output
    }

    fn write(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::Prompt("input ended before an answer was given".to_string()));
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, question: &str, style: Style) -> Result<String> {
        loop {
            self.write(&style.paint(question))?;
            let answer = self.read_line()?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            self.write(&format!("{}\n", Style::Error.paint(EMPTY_ANSWER)))?;
        }
    }

    fn ask_bool(&mut self, question: &str, style: Style) -> Result<bool> {
        let question = format!("{question} [y/n] ");
        loop {
            self.write(&style.paint(&question))?;
            let answer = self.read_line()?;
            if let Some(value) = parse_yes_no(&answer) {
                return Ok(value);
            }
            self.write(&format!("{}\n", Style::Error.paint(KEEP_ASKING_BOOL)))?;
        }
    }

    fn ask_multiple_choice(
        &mut self,
        question: &str,
        options: &[String],
        style: Style,
    ) -> Result<usize> {
        if options.is_empty() {
            return Err(Error::Prompt("no options to choose from".to_string()));
        }
        loop {
            self.write(&format!("{}\n", style.paint(question)))?;
            for (i, option) in options.iter().enumerate() {
                self.write(&format!("  [{}] {}\n", i + 1, option))?;
            }
            self.write(&format!("Enter a number between 1 and {}: ", options.len()))?;
            let answer = self.read_line()?;
            if let Some(index) = parse_choice(&answer, options.len()) {
                return Ok(index);
            }
            let message = format!("'{answer}' is not a valid choice.");
            self.write(&format!("{}\n", Style::Error.paint(&message)))?;
        }
    }

    fn say(&mut self, style: Style, message: &str) {
        // Messages are best effort; a broken output stream surfaces on the
        // next question instead.
        let _ = self.write(&format!("{}\n", style.paint(message)));
    }
}
