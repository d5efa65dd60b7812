//! Terminal questions asked while sorting

use crate::error::Result;
use crossterm::{
    ExecutableCommand,
    style::{Color, Print, Stylize, style},
};
use dialoguer::Input;
use std::io::stderr;

/// One line of an option legend: key and what it does
pub type LegendEntry = (&'static str, &'static str);

/// Asks the user free-text questions
pub trait Prompter {
    /// Ask `question` and return the raw answer
    fn ask(&mut self, question: &str) -> Result<String>;

    /// Show what each accepted answer does
    fn help(&mut self, legend: &[LegendEntry]);
}

/// Reads answers from the terminal
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, question: &str) -> Result<String> {
        let answer = Input::<String>::new()
            .with_prompt(question)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }

    fn help(&mut self, legend: &[LegendEntry]) {
        let mut out = stderr();
        for (key, text) in legend {
            let _ = out.execute(Print(style(*key).with(Color::Cyan).bold()));
            let _ = out.execute(Print(format!(" - {}\n", text)));
        }
    }
}
