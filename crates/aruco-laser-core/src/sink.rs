//! Output capability for draw commands.

use crate::DrawCommand;
use std::convert::Infallible;

/// Receiver of draw commands and page breaks.
///
/// The first page is implicitly open; `page_break` closes the current page
/// and opens the next one.
pub trait DrawCommandSink {
    type Error;

    fn draw(&mut self, command: &DrawCommand) -> Result<(), Self::Error>;

    fn page_break(&mut self) -> Result<(), Self::Error>;

    fn draw_all(&mut self, commands: &[DrawCommand]) -> Result<(), Self::Error> {
        for command in commands {
            self.draw(command)?;
        }
        Ok(())
    }
}

impl<S: DrawCommandSink + ?Sized> DrawCommandSink for &mut S {
    type Error = S::Error;

    fn draw(&mut self, command: &DrawCommand) -> Result<(), Self::Error> {
        (**self).draw(command)
    }

    fn page_break(&mut self) -> Result<(), Self::Error> {
        (**self).page_break()
    }
}

/// In-memory sink that keeps every command grouped by page.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordingSink {
    pages: Vec<Vec<DrawCommand>>,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
        }
    }

    pub fn pages(&self) -> &[Vec<DrawCommand>] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All commands in drawing order, across pages.
    pub fn commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.pages.iter().flatten()
    }
}

impl DrawCommandSink for RecordingSink {
    type Error = Infallible;

    fn draw(&mut self, command: &DrawCommand) -> Result<(), Infallible> {
        if let Some(page) = self.pages.last_mut() {
            page.push(command.clone());
        }
        Ok(())
    }

    fn page_break(&mut self) -> Result<(), Infallible> {
        self.pages.push(Vec::new());
        Ok(())
    }
}
