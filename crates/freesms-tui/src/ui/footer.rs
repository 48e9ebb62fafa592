use freesms_core::theme::{Element, Theme};
use ratatui::{
    prelude::{Alignment, Frame, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::ui::app::{AppMode, Toast, ToastKind};

pub fn render_footer(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    mode: AppMode,
    toast: Option<&Toast>,
) {
    let footer_block = Block::default()
        .borders(Borders::ALL)
        .style(theme.style(Element::Border));

    let inner_area = footer_block.inner(area);

    let content = match toast {
        Some(toast) => {
            let (prefix, element) = match toast.kind {
                ToastKind::Success => ("\u{2714} ", Element::Accent),
                ToastKind::Error => ("\u{2716} ", Element::Danger),
            };
            Line::from(vec![
                Span::styled(prefix, theme.style(element)),
                Span::styled(toast.message.clone(), theme.text_style()),
            ])
        }
        None => {
            let hints = match mode {
                AppMode::Normal => Line::from(vec![
                    Span::raw("[S]"),
                    Span::styled("ave", theme.style(Element::Inactive)),
                    Span::raw(" | "),
                    Span::raw("[T]"),
                    Span::styled("est", theme.style(Element::Inactive)),
                    Span::raw(" | "),
                    Span::raw("[D]"),
                    Span::styled("ark/light", theme.style(Element::Inactive)),
                    Span::raw(" | "),
                    Span::raw("[Q]"),
                    Span::styled("uit", theme.style(Element::Inactive)),
                ]),
                _ => Line::from(Span::styled(
                    "editing... [ENTER] Apply | [ESC] Cancel",
                    theme.style(Element::Inactive),
                )),
            };
            hints.alignment(Alignment::Center)
        }
    };

    let footer_paragraph = Paragraph::new(content).style(theme.text_style());

    frame.render_widget(footer_block, area);
    frame.render_widget(footer_paragraph, inner_area);
}
