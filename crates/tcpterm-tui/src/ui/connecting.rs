//! Connecting indicator
//!
//! Spinner plus the target being dialed.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tcpterm_app::StateMachine;

const FRAMES: [&str; 4] = ["∙∙∙", "●∙∙", "∙●∙", "∙∙●"];

/// In-flight indicator, advanced by the driver's tick.
#[derive(Debug, Default, Clone)]
pub struct Spinner {
    frame: usize,
}

impl Spinner {
    /// Move to the next frame.
    pub fn advance(&mut self) {
        self.frame = (self.frame + 1) % FRAMES.len();
    }

    /// Current frame.
    pub fn frame(&self) -> &'static str {
        FRAMES.get(self.frame).copied().unwrap_or(FRAMES[0])
    }
}

/// Render the connecting view.
pub fn render<H>(frame: &mut Frame, machine: &StateMachine<H>, spinner: &Spinner, area: Rect) {
    let target = machine.target().unwrap_or_default();
    let line = Line::from(vec![
        Span::styled(spinner.frame(), Style::default().fg(Color::Magenta)),
        Span::raw(format!(" waiting to connect to {target}")),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
