//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from view state ([`App`]) and
//! input handling ([`crate::input`]).
//!
//! ## For contributors
//!
//! * Until the first load settles the whole screen is a loading indicator.
//! * After that the layout is three rows: page tabs, the card list of the
//!   current page, and a one-line status bar.  The article detail is drawn
//!   as a centred overlay on top.
//! * Colours and styles are defined inline.

use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::App;
use crate::load::SlotStatus;
use crate::source::Article;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    if !app.is_ready() {
        draw_loading(frame, frame.area());
        return;
    }

    let [tabs_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_page_tabs(app, frame, tabs_area);
    draw_cards(app, frame, main_area);
    draw_status_bar(app, frame, status_area);

    if app.detail_open {
        if let Some(article) = app.selected_article() {
            draw_detail(&article, frame, main_area);
        }
    }
}

fn draw_loading(frame: &mut Frame, area: Rect) {
    let [middle] = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .areas(area);
    let loading = Paragraph::new(Line::from(Span::styled(
        "Loading..",
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(loading, middle);
}

fn status_marker(status: &SlotStatus) -> Span<'static> {
    match status {
        SlotStatus::Pending => Span::styled(" ·", Style::default().fg(Color::DarkGray)),
        SlotStatus::Loading => Span::styled(" …", Style::default().fg(Color::Yellow)),
        SlotStatus::Loaded(n) => Span::styled(format!(" {n}"), Style::default().fg(Color::Green)),
        SlotStatus::Failed(_) => Span::styled(" !", Style::default().fg(Color::Red)),
    }
}

/// One tab per page, labelled with its source and load status.
fn draw_page_tabs(app: &App, frame: &mut Frame, area: Rect) {
    let titles: Vec<Line> = app
        .statuses
        .iter()
        .enumerate()
        .map(|(i, status)| {
            Line::from(vec![
                Span::raw(format!("{} {}", i + 1, app.source_name(i))),
                status_marker(status),
            ])
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().title(" Newsby ").borders(Borders::ALL))
        .select(app.page)
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .fg(Color::Cyan),
        );
    frame.render_widget(tabs, area);
}

/// Render the scrollable card list of the current page.
fn draw_cards(app: &mut App, frame: &mut Frame, area: Rect) {
    let articles = app.visible_articles();
    let title = format!(" {} ", app.source_name(app.page));

    if articles.is_empty() {
        let message = match &app.statuses[app.page] {
            SlotStatus::Failed(reason) => format!("Could not load this page: {reason}"),
            _ => "No articles".to_string(),
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let list_items: Vec<ListItem> = articles
        .iter()
        .map(|article| {
            let date_str = article
                .published()
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();

            ListItem::new(Text::from(vec![
                Line::from(Span::styled(
                    article.title.clone(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(vec![
                    Span::styled(
                        format!("{date_str:<17}"),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        article.url.clone().unwrap_or_default(),
                        Style::default().fg(Color::Cyan),
                    ),
                ]),
            ]))
        })
        .collect();

    let list = List::new(list_items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// The in-app "web page": everything we know about the selected article.
fn draw_detail(article: &Article, frame: &mut Frame, area: Rect) {
    let [popup] = Layout::horizontal([Constraint::Percentage(80)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::vertical([Constraint::Percentage(80)])
        .flex(Flex::Center)
        .areas(popup);

    let field = |label: &'static str, value: Option<&str>| {
        Line::from(vec![
            Span::styled(label, Style::default().fg(Color::DarkGray)),
            Span::raw(value.unwrap_or("-").to_string()),
        ])
    };

    let published = article
        .published()
        .map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string());

    let mut lines = vec![
        Line::from(Span::styled(
            article.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        field("By        ", article.author.as_deref()),
        field("Published ", published.as_deref()),
        field("Link      ", article.url.as_deref()),
        field("Image     ", article.url_to_image.as_deref()),
        Line::raw(""),
    ];
    if let Some(description) = &article.description {
        lines.push(Line::raw(description.clone()));
    }

    let detail = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(" Article (Esc: back) ")
            .borders(Borders::ALL),
    );

    frame.render_widget(Clear, popup);
    frame.render_widget(detail, popup);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(app.status.clone(), Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("page {}/{}", app.page + 1, app.page_count()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  q: quit  ←/→: page  ↑/↓: select  Enter: open  r: reload"),
    ]));
    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::app_with_cards;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(app: &mut App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol().chars().next().unwrap_or(' '))
            .collect()
    }

    #[test]
    fn shows_loading_until_ready() {
        let mut app = app_with_cards(2);
        let text = render(&mut app);
        assert!(text.contains("Loading.."));
        assert!(!text.contains("Story 0"));
    }

    #[tokio::test]
    async fn shows_cards_once_ready() {
        let mut app = app_with_cards(2);
        // Every fetch fails against the empty mock, so page 1 keeps its cards.
        app.feed().load().await;

        let text = render(&mut app);
        assert!(text.contains("Story 0"));
        assert!(text.contains("Story 1"));
        assert!(!text.contains("No image"), "cards without image are hidden");
        assert!(text.contains("page 1/3"));
    }

    #[tokio::test]
    async fn failed_empty_page_shows_reason() {
        let mut app = app_with_cards(0);
        app.feed().load().await;
        app.next_page();
        app.statuses[1] = SlotStatus::Failed("api error: nope".into());

        let text = render(&mut app);
        assert!(text.contains("Could not load this page"));
    }

    #[tokio::test]
    async fn detail_overlay_shows_link() {
        let mut app = app_with_cards(1);
        app.feed().load().await;
        app.select_first();
        app.toggle_detail();

        let text = render(&mut app);
        assert!(text.contains("Article (Esc: back)"));
        assert!(text.contains("https://example.com/0.jpg"));
    }
}
