//! Command Menu (TUI popup)
//!
//! Displays a selectable list of commands when the user types "/"

use ratatui::{
    crossterm::event::{self, Event, KeyCode, KeyEventKind},
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::io;

/// Command menu item
#[derive(Debug, Clone)]
pub struct CommandItem {
    /// Command name
    pub name: &'static str,
    /// Description
    pub description: &'static str,
}

/// All available commands
pub fn get_commands() -> Vec<CommandItem> {
    vec![
        CommandItem {
            name: "/catalog",
            description: "Show the schema catalog preview",
        },
        CommandItem {
            name: "/help",
            description: "Show help",
        },
        CommandItem {
            name: "/quit",
            description: "Exit",
        },
    ]
}

/// Result of running the command menu
#[derive(Debug, Clone, PartialEq)]
pub enum MenuResult {
    /// User selected a command
    Command(String),
    /// User cancelled (ESC)
    Cancelled,
}

/// Display the command menu and return the selection
pub fn show_command_menu() -> io::Result<MenuResult> {
    let commands = get_commands();
    let mut state = ListState::default();
    state.select(Some(0));

    let mut terminal = ratatui::init();
    let result = run_menu(&mut terminal, &commands, &mut state);
    ratatui::restore();

    result
}

fn run_menu(
    terminal: &mut ratatui::DefaultTerminal,
    commands: &[CommandItem],
    state: &mut ListState,
) -> io::Result<MenuResult> {
    loop {
        terminal.draw(|f| ui(f, commands, state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(MenuResult::Cancelled),
                KeyCode::Enter => {
                    if let Some(item) = state.selected().and_then(|i| commands.get(i)) {
                        return Ok(MenuResult::Command(item.name.to_string()));
                    }
                }
                KeyCode::Down | KeyCode::Char('j') => move_selection(state, commands.len(), 1),
                KeyCode::Up | KeyCode::Char('k') => move_selection(state, commands.len(), -1),
                _ => {}
            }
        }
    }
}

/// Move the highlighted row, staying inside the list
fn move_selection(state: &mut ListState, len: usize, delta: isize) {
    if len == 0 {
        return;
    }
    let current = state.selected().unwrap_or(0) as isize;
    let next = (current + delta).clamp(0, len as isize - 1);
    state.select(Some(next as usize));
}

fn ui(f: &mut Frame, commands: &[CommandItem], state: &mut ListState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let border = Style::default().fg(Color::Magenta);

    let header = Paragraph::new(
        Line::from(" 💊 FAERS NLP → SQL ")
            .style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).border_style(border))
    .alignment(Alignment::Center);
    f.render_widget(header, chunks[0]);

    let items: Vec<ListItem> = commands
        .iter()
        .map(|cmd| ListItem::new(format!("  {:12} {}", cmd.name, cmd.description)))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).border_style(border))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::REVERSED)
                .fg(Color::Black)
                .bg(Color::Magenta),
        );
    f.render_stateful_widget(list, chunks[1], state);

    let help = Paragraph::new(
        Line::from(" ↑/k: Up  ↓/j: Down  Enter: Select  ESC/q: Cancel ")
            .style(Style::default().fg(Color::Gray)),
    )
    .block(Block::default().borders(Borders::ALL).border_style(border))
    .alignment(Alignment::Center);
    f.render_widget(help, chunks[2]);
}
