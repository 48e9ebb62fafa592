use freesms_core::theme::{Element, Theme};
use ratatui::{
    prelude::{Alignment, Constraint, Direction, Frame, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::ui::app::{ActionStatus, AppMode, FormSelection};

#[allow(clippy::too_many_arguments)]
pub fn render_form(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    mode: AppMode,
    selection: FormSelection,
    status: ActionStatus,
    user_id: &str,
    api_key: &str,
    edit_buffer: &str,
) {
    let block = Block::new()
        .title(" SMS credentials ")
        .borders(Borders::ALL)
        .style(theme.style(Element::Border));

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Account id
            Constraint::Length(1), // API key
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Actions
            Constraint::Min(0),    // Spacer
            Constraint::Length(1), // Hint
        ])
        .split(inner_area);

    // Helper to create a form row
    let create_form_line = |label: &str, value: &str, is_selected: bool, is_editing: bool| {
        let value_style = if is_selected {
            theme.highlight_style()
        } else {
            theme.text_style()
        };

        let display_value = if is_editing {
            format!("{}_", value) // Cursor marker while editing
        } else {
            value.to_owned()
        };

        Line::from(vec![
            Span::styled(
                format!("{:<12}", label),
                theme.style(Element::Warning).add_modifier(Modifier::BOLD),
            ),
            Span::styled(display_value, value_style),
        ])
    };

    // Account id
    let user_value = if matches!(mode, AppMode::EditingUserId) {
        edit_buffer
    } else {
        user_id
    };
    let user_line = create_form_line(
        "Account id:",
        user_value,
        selection == FormSelection::UserId,
        matches!(mode, AppMode::EditingUserId),
    );
    frame.render_widget(Paragraph::new(user_line), chunks[0]);

    // API key, masked unless being edited
    let api_value = if matches!(mode, AppMode::EditingApiKey) {
        edit_buffer.to_owned()
    } else {
        mask_api_key(api_key)
    };
    let api_line = create_form_line(
        "API key:",
        &api_value,
        selection == FormSelection::ApiKey,
        matches!(mode, AppMode::EditingApiKey),
    );
    frame.render_widget(Paragraph::new(api_line), chunks[1]);

    // Actions
    let action_line = match status {
        ActionStatus::Saving => Line::from(Span::styled(
            "Saving configuration...",
            theme.style(Element::Warning),
        )),
        ActionStatus::Testing => Line::from(Span::styled(
            "Sending test SMS...",
            theme.style(Element::Warning),
        )),
        ActionStatus::Idle => Line::from(vec![
            action_span("[ Save ]", selection == FormSelection::Save, theme),
            Span::raw("  "),
            action_span("[ Test ]", selection == FormSelection::Test, theme),
        ]),
    };
    frame.render_widget(Paragraph::new(action_line), chunks[3]);

    // Hint
    let hint = match mode {
        AppMode::Normal => "[\u{2191}\u{2193}] Navigate | [ENTER] Edit/Run | [S]ave | [T]est",
        _ => "[ENTER] Apply | [ESC] Cancel",
    };
    let hint_paragraph = Paragraph::new(hint)
        .alignment(Alignment::Center)
        .style(theme.style(Element::Inactive));
    frame.render_widget(hint_paragraph, chunks[5]);
}

fn action_span<'a>(label: &'a str, is_selected: bool, theme: &Theme) -> Span<'a> {
    if is_selected {
        Span::styled(label, theme.highlight_style())
    } else {
        Span::styled(label, theme.accent_style())
    }
}

fn mask_api_key(api_key: &str) -> String {
    if api_key.is_empty() {
        String::new()
    } else if api_key.len() <= 8 {
        "*".repeat(api_key.len())
    } else {
        format!("{}...{}", &api_key[..4], &api_key[api_key.len() - 4..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_keys_are_fully_masked() {
        assert_eq!(mask_api_key(""), "");
        assert_eq!(mask_api_key("abc"), "***");
        assert_eq!(mask_api_key("12345678"), "********");
    }

    #[test]
    fn long_keys_keep_only_the_edges() {
        assert_eq!(mask_api_key("abcdefghijkl"), "abcd...ijkl");
    }
}
