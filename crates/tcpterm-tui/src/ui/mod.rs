//! UI rendering
//!
//! Rendering functions that convert state machine observers into terminal
//! output using ratatui widgets. All functions are pure (no I/O). There is
//! one view per connection state.

mod chat;
mod connecting;
mod input;
mod prompt;

pub use connecting::Spinner;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
};
use tcpterm_app::{ConnectionState, StateMachine};

use crate::InputCapture;

/// Render the view for the current connection state.
pub fn render<H>(
    frame: &mut Frame,
    machine: &StateMachine<H>,
    capture: &InputCapture,
    spinner: &Spinner,
) {
    let area = frame.area();
    match machine.connection_state() {
        ConnectionState::NotConnected => prompt::render(frame, machine, capture, area),
        ConnectionState::Connecting => connecting::render(frame, machine, spinner, area),
        ConnectionState::Connected => chat::render(frame, machine, capture.message(), area),
        ConnectionState::Closed => render_goodbye(frame, area),
    }
}

fn render_goodbye(frame: &mut Frame, area: Rect) {
    frame.render_widget(Paragraph::new("Bye Bye ;)"), area);
}

/// Render a dimmed key help line.
fn render_help(frame: &mut Frame, text: &str, area: Rect) {
    let line = Line::styled(text, Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::{Terminal, backend::TestBackend};

    /// Flatten the backend buffer into one string per row.
    pub fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};
    use tcpterm_app::{Event, Session};

    use super::{test_support::screen, *};

    fn draw(machine: &StateMachine<u32>, capture: &InputCapture) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|frame| render(frame, machine, capture, &Spinner::default())).unwrap();
        screen(&terminal)
    }

    #[test]
    fn each_state_has_its_view() {
        let capture = InputCapture::new("localhost:8080");
        let mut machine = StateMachine::<u32>::new();
        assert!(draw(&machine, &capture).contains("What's host ip:port ?"));

        let _ = machine.handle(Event::UserSubmitTarget("localhost:9000".into()));
        assert!(draw(&machine, &capture).contains("waiting to connect to localhost:9000"));

        let epoch = machine.last_epoch();
        let session = Session::new(epoch, "127.0.0.1:9000", 1);
        let _ = machine.handle(Event::Connected { session });
        assert!(draw(&machine, &capture).contains("Connected on 127.0.0.1:9000"));

        let _ = machine.handle(Event::UserCancel);
        assert!(draw(&machine, &capture).contains("Bye Bye ;)"));
    }
}
