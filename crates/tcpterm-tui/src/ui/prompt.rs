//! Target prompt
//!
//! Shown while not connected: asks for a target and shows why the last
//! attempt failed, if it did.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Paragraph, Wrap},
};
use tcpterm_app::StateMachine;

use crate::InputCapture;

const PROMPT_HEIGHT: u16 = 1;
const INPUT_HEIGHT: u16 = 3;
const ERROR_HEIGHT: u16 = 2;
const HELP_HEIGHT: u16 = 1;

/// Render the target prompt.
pub fn render<H>(
    frame: &mut Frame,
    machine: &StateMachine<H>,
    capture: &InputCapture,
    area: Rect,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(PROMPT_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(ERROR_HEIGHT),
            Constraint::Length(HELP_HEIGHT),
            Constraint::Min(0),
        ])
        .split(area);

    let [prompt_area, input_area, error_area, help_area, _] = chunks.as_ref() else {
        return;
    };

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let prompt = Line::styled("What's host ip:port ?", bold);
    frame.render_widget(Paragraph::new(prompt), *prompt_area);

    super::input::render(frame, capture.target(), capture.default_target(), *input_area);

    if let Some(error) = machine.last_error() {
        let error = Paragraph::new(error.to_string())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true });
        frame.render_widget(error, *error_area);
    }

    super::render_help(frame, "enter: connect • esc: exit", *help_area);
}
