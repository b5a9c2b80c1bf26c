// Rendering surface: where the menu and the pages put their output.
// `TerminalSurface` draws with `dialoguer` and `crossterm`; the
// `RecordingSurface` keeps every element in memory and replays scripted
// user interactions, which makes it usable for tests and headless hosts.

use crossterm::style::Stylize;
use dialoguer::Select;
use std::collections::VecDeque;
use std::io;

/// A single-choice selection control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectBox<'a> {
    pub label: &'a str,
    pub options: &'a [&'a str],
    /// Currently selected option, `None` when there is nothing to select.
    pub index: Option<usize>,
    pub disabled: bool,
}

/// What the user did with a selectbox during one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// No new choice; keep the current selection.
    Unchanged,
    /// The user picked the option at this index.
    Selected(usize),
    /// The user dismissed the control (e.g. Esc in the terminal).
    Closed,
}

pub trait Surface {
    fn selectbox(&mut self, select: &SelectBox<'_>) -> io::Result<Interaction>;
    fn title(&mut self, text: &str);
    fn write(&mut self, text: &str);
    fn caption(&mut self, text: &str);
    fn error(&mut self, text: &str);
}

/// Interactive terminal surface.
///
/// Note: `Select::interact_opt()` is keyboard-driven: arrow keys and Enter
/// choose an option, Esc or `q` closes the menu.
#[derive(Debug, Default)]
pub struct TerminalSurface;

impl TerminalSurface {
    pub fn new() -> Self {
        TerminalSurface
    }
}

impl Surface for TerminalSurface {
    fn selectbox(&mut self, select: &SelectBox<'_>) -> io::Result<Interaction> {
        let current = select.index.and_then(|i| select.options.get(i).copied());
        if select.disabled || select.options.is_empty() {
            // Non-interactive: show where we are and move on.
            println!(
                "{} {}",
                select.label.bold(),
                current.unwrap_or("(no activities)").dim()
            );
            return Ok(Interaction::Unchanged);
        }

        let choice = Select::new()
            .with_prompt(select.label)
            .items(select.options)
            .default(select.index.unwrap_or(0))
            .interact_opt()?;
        Ok(match choice {
            Some(index) => Interaction::Selected(index),
            None => Interaction::Closed,
        })
    }

    fn title(&mut self, text: &str) {
        println!("\n{}", text.bold().underlined());
    }

    fn write(&mut self, text: &str) {
        println!("{text}");
    }

    fn caption(&mut self, text: &str) {
        println!("{}", text.dim());
    }

    fn error(&mut self, text: &str) {
        println!("{}", text.red().bold());
    }
}

/// One element produced during a render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    SelectBox {
        label: String,
        options: Vec<String>,
        index: Option<usize>,
        disabled: bool,
    },
    Title(String),
    Text(String),
    Caption(String),
    Error(String),
}

/// In-memory surface with scripted interactions.
///
/// Each enabled selectbox consumes the next queued interaction; when the
/// queue is empty the selection is left unchanged.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    elements: Vec<Element>,
    interactions: VecDeque<Interaction>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interactions(interactions: impl IntoIterator<Item = Interaction>) -> Self {
        RecordingSurface {
            elements: Vec::new(),
            interactions: interactions.into_iter().collect(),
        }
    }

    pub fn push_interaction(&mut self, interaction: Interaction) {
        self.interactions.push_back(interaction);
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Drain everything rendered so far, as a host does between re-renders.
    pub fn take_elements(&mut self) -> Vec<Element> {
        std::mem::take(&mut self.elements)
    }

    pub fn errors(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                Element::Error(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                Element::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Options of the last rendered selectbox.
    pub fn last_choices(&self) -> Option<&[String]> {
        self.elements.iter().rev().find_map(|e| match e {
            Element::SelectBox { options, .. } => Some(options.as_slice()),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn selectbox(&mut self, select: &SelectBox<'_>) -> io::Result<Interaction> {
        self.elements.push(Element::SelectBox {
            label: select.label.to_string(),
            options: select.options.iter().map(|o| o.to_string()).collect(),
            index: select.index,
            disabled: select.disabled,
        });
        if select.disabled {
            return Ok(Interaction::Unchanged);
        }
        Ok(self.interactions.pop_front().unwrap_or(Interaction::Unchanged))
    }

    fn title(&mut self, text: &str) {
        self.elements.push(Element::Title(text.to_string()));
    }

    fn write(&mut self, text: &str) {
        self.elements.push(Element::Text(text.to_string()));
    }

    fn caption(&mut self, text: &str) {
        self.elements.push(Element::Caption(text.to_string()));
    }

    fn error(&mut self, text: &str) {
        self.elements.push(Element::Error(text.to_string()));
    }
}
