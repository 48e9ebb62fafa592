use freesms_core::theme::{Element, Theme};
use ratatui::{
    prelude::{Alignment, Frame, Rect},
    text::Span,
    widgets::{block::Title, Block, Borders, Paragraph},
};

use crate::ui::app::ActionStatus;

pub fn render_header(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    status: ActionStatus,
    user_id: &str,
    api_key: &str,
) {
    let title = Title::from(" freesms v0.1.0 ").alignment(Alignment::Left);

    let (status_text, element) = build_status(status, user_id, api_key);
    let status_span = Span::styled(status_text, theme.style(element));

    let header_paragraph = Paragraph::new(status_span)
        .alignment(Alignment::Left)
        .block(
            Block::new()
                .borders(Borders::ALL)
                .title(title)
                .style(theme.text_style()),
        );

    frame.render_widget(header_paragraph, area);
}

fn build_status(status: ActionStatus, user_id: &str, api_key: &str) -> (String, Element) {
    match status {
        ActionStatus::Saving => ("freemobilesms :: saving...".to_string(), Element::Warning),
        ActionStatus::Testing => (
            "freemobilesms :: sending test SMS...".to_string(),
            Element::Warning,
        ),
        ActionStatus::Idle => {
            if !user_id.is_empty() && !api_key.is_empty() {
                (
                    format!("freemobilesms :: configured :: {}", user_id),
                    Element::Accent,
                )
            } else {
                (
                    "freemobilesms :: credentials not set".to_string(),
                    Element::Danger,
                )
            }
        }
    }
}
