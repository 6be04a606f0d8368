//! Connected view
//!
//! Header with the remote address, the message log (newest at the bottom),
//! the message input and key help.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};
use tcpterm_app::{Direction as LogDirection, MessageLog, StateMachine};

use crate::InputState;

const HEADER_HEIGHT: u16 = 1;
const LOG_MIN_HEIGHT: u16 = 3;
const INPUT_HEIGHT: u16 = 3;
const HELP_HEIGHT: u16 = 1;
const BORDER_SIZE: u16 = 2;

/// Render the connected view.
pub fn render<H>(frame: &mut Frame, machine: &StateMachine<H>, input: &InputState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(LOG_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(HELP_HEIGHT),
        ])
        .split(area);

    let [header_area, log_area, input_area, help_area] = chunks.as_ref() else {
        return;
    };

    let remote = machine.session().map(|s| s.remote_addr).unwrap_or_default();
    let mut header = vec![Span::styled(
        format!("Connected on {remote}"),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )];
    if machine.is_awaiting_reply() {
        header.push(Span::styled(" (waiting for reply)", Style::default().fg(Color::DarkGray)));
    }
    frame.render_widget(Line::from(header), *header_area);

    render_log(frame, machine.message_log(), *log_area);
    super::input::render(frame, input, "", *input_area);
    super::render_help(frame, "enter: send • esc: exit • ctrl+c: close connection", *help_area);
}

fn render_log(frame: &mut Frame, log: Option<&MessageLog>, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;

    let items: Vec<ListItem> = match log {
        Some(log) if !log.is_empty() => log
            .entries()
            .iter()
            .skip(log.len().saturating_sub(visible_height))
            .map(|entry| {
                let color = match entry.direction {
                    LogDirection::Sent => Color::Cyan,
                    LogDirection::Received => Color::Yellow,
                };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{}:", entry.direction.label()),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" "),
                    Span::raw(entry.content.as_str()),
                ]))
            })
            .collect(),
        _ => vec![ListItem::new(Line::styled(
            "send something...",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    frame.render_widget(List::new(items).block(block), area);
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};
    use tcpterm_app::{Command, Event, Session};

    use super::*;
    use crate::{InputCapture, ui::test_support::screen};

    fn connected() -> StateMachine<u32> {
        let mut machine = StateMachine::new();
        let _ = machine.handle(Event::UserSubmitTarget("localhost:9000".into()));
        let epoch = machine.last_epoch();
        let session = Session::new(epoch, "127.0.0.1:9000", 1);
        let _ = machine.handle(Event::Connected { session });
        machine
    }

    fn draw(machine: &StateMachine<u32>, height: u16) -> String {
        let capture = InputCapture::new("localhost:8080");
        let mut terminal = Terminal::new(TestBackend::new(60, height)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, machine, capture.message(), area);
            })
            .unwrap();
        screen(&terminal)
    }

    /// Send `text` and answer it with `reply`.
    fn exchange(machine: &mut StateMachine<u32>, text: &str, reply: &str) {
        let commands = machine.handle(Event::UserSubmitMessage(text.into()));
        let Some(Command::Send { session, .. }) = commands.into_iter().next() else {
            panic!("expected a send");
        };
        let _ = machine.handle(Event::Received { session, bytes: reply.as_bytes().to_vec() });
    }

    #[test]
    fn empty_log_shows_placeholder() {
        let text = draw(&connected(), 12);

        assert!(text.contains("Connected on 127.0.0.1:9000"));
        assert!(text.contains("send something..."));
        assert!(text.contains("enter: send • esc: exit • ctrl+c: close connection"));
    }

    #[test]
    fn log_lists_messages_in_order() {
        let mut machine = connected();
        exchange(&mut machine, "ping", "pong");

        let text = draw(&machine, 12);
        let ping = text.find("you: ping");
        let pong = text.find("server: pong");
        assert!(ping.is_some() && pong.is_some() && ping < pong);
        assert!(!text.contains("send something..."));
    }

    #[test]
    fn log_keeps_newest_at_bottom() {
        let mut machine = connected();
        for n in 0..10 {
            exchange(&mut machine, &format!("m{n}"), &format!("r{n}"));
        }

        // 4 visible log rows
        let text = draw(&machine, 11);
        assert!(text.contains("server: r9"));
        assert!(text.contains("you: m8"));
        assert!(!text.contains("you: m0"));
    }

    #[test]
    fn shows_pending_reply() {
        let mut machine = connected();
        let _ = machine.handle(Event::UserSubmitMessage("ping".into()));

        assert!(draw(&machine, 12).contains("(waiting for reply)"));
    }
}
