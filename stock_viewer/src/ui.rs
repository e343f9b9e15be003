//! Rendering of the view-model with ratatui.
//!
//! Rendering is a pure function of [`App`] and [`Theme`]; it never mutates
//! state or triggers fetches.
use chrono::{DateTime, Local, Utc};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, BorderType, Chart, Dataset, GraphType, Paragraph, Wrap};
use stock_common::format;
use stock_common::model::{HistoricalSeries, Quote, StockInfo};

use crate::app::{App, Card, DetailView, Screen, Slot};
use crate::theme::Theme;

/// Rows taken by one card, borders included.
const CARD_HEIGHT: u16 = 5;
/// Rows taken by the detail panel, borders included.
const INFO_HEIGHT: u16 = 9;

/// Draws the whole screen.
pub fn render(frame: &mut Frame, app: &App, theme: &Theme) {
    let area = frame.area();
    frame.render_widget(Block::default().style(theme.surface(theme.background)), area);

    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header, app, theme);
    match app.screen() {
        Screen::Grid => render_grid(frame, body, app, theme),
        Screen::Detail(detail) => render_detail(frame, body, detail, theme),
    }
    render_footer(frame, footer, app, theme);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let mut spans = vec![Span::styled(" Stock Price Viewer", theme.heading())];
    if let Screen::Detail(detail) = app.screen() {
        spans.push(Span::styled(format!("  ›  {}", detail.symbol), theme.heading()));
    }
    if app.is_refreshing() {
        spans.push(Span::styled("  refreshing…", Style::default().fg(theme.secondary_text)));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(theme.surface(theme.frame)),
        area,
    );
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let keys = match app.screen() {
        Screen::Grid => " ←↑↓→ move  Enter open  r refresh  q quit",
        Screen::Detail(_) => " Esc back  w window  r refresh  q quit",
    };
    let refreshed = app
        .last_refresh()
        .map(|at| format!("Updated {} ", at.format("%H:%M:%S")))
        .unwrap_or_default();
    let [left, right] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(refreshed.len() as u16)]).areas(area);
    let style = Style::default().fg(theme.secondary_text).bg(theme.frame);
    frame.render_widget(Paragraph::new(keys).style(style), left);
    frame.render_widget(
        Paragraph::new(refreshed).style(style).alignment(Alignment::Right),
        right,
    );
}

fn render_grid(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let cards = app.cards();
    if cards.is_empty() || area.height == 0 {
        return;
    }
    let columns = app.settings().display.grid_columns.max(1);
    let visible_rows = usize::from((area.height / CARD_HEIGHT).max(1));
    let selected_row = app.selected() / columns;
    // keep the selected row on screen
    let first_row = selected_row.saturating_sub(visible_rows - 1);

    let row_areas = Layout::vertical(vec![Constraint::Length(CARD_HEIGHT); visible_rows]).split(area);
    let column_constraints = vec![Constraint::Ratio(1, columns as u32); columns];

    for (offset, row_area) in row_areas.iter().enumerate() {
        let row = first_row + offset;
        let start = row * columns;
        if start >= cards.len() {
            break;
        }
        let cells = Layout::horizontal(column_constraints.clone()).split(*row_area);
        for (column, cell) in cells.iter().enumerate() {
            let index = start + column;
            if let Some(card) = cards.get(index) {
                render_card(frame, *cell, card, index == app.selected(), theme);
            }
        }
    }
}

fn render_card(frame: &mut Frame, area: Rect, card: &Card, selected: bool, theme: &Theme) {
    let border = if selected { theme.accent } else { theme.border };
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(Span::styled(format!(" {} ", card.symbol), theme.heading()))
        .style(theme.surface(theme.card));

    let lines = match &card.quote {
        Slot::Loading => vec![Line::styled("Loading...", Style::default().fg(theme.secondary_text))],
        Slot::Ready(quote) => {
            let color = theme.direction(quote.direction());
            let mut lines = vec![
                Line::styled(
                    format::price(Some(quote.price())),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Line::styled(
                    format::signed_change(quote.change(), quote.change_percent()),
                    Style::default().fg(color),
                ),
            ];
            if let Some(note) = quote_note(quote) {
                lines.push(Line::styled(note, Style::default().fg(theme.secondary_text)));
            }
            lines
        }
        Slot::Unavailable(reason) => vec![Line::styled(reason.as_str(), Style::default().fg(theme.text))],
    };

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

fn render_detail(frame: &mut Frame, area: Rect, detail: &DetailView, theme: &Theme) {
    let [title, chart, info] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(6),
        Constraint::Length(INFO_HEIGHT),
    ])
    .areas(area);

    let name = detail
        .info
        .ready()
        .and_then(|info| info.name.clone())
        .unwrap_or_default();
    let title_line = Line::from(vec![
        Span::styled(format!(" {} ", detail.symbol), theme.heading()),
        Span::styled(name, Style::default().fg(theme.secondary_text)),
        Span::styled(
            format!("  [{}]", detail.window.label()),
            Style::default().fg(theme.accent),
        ),
    ]);
    frame.render_widget(Paragraph::new(title_line), title);

    render_chart(frame, chart, detail, theme);
    render_info(frame, info, &detail.info, theme);
}

fn chart_block<'a>(detail: &DetailView, theme: &Theme) -> Block<'a> {
    Block::bordered()
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            format!(" {} - {} Prices ", detail.symbol, detail.window.label()),
            theme.heading(),
        ))
        .style(theme.surface(theme.frame))
}

fn render_chart(frame: &mut Frame, area: Rect, detail: &DetailView, theme: &Theme) {
    let block = chart_block(detail, theme);
    let series = match &detail.chart {
        Slot::Ready(series) if !series.is_empty() => series,
        Slot::Ready(_) => {
            let text = Paragraph::new("No price history for this window").block(block);
            frame.render_widget(text, area);
            return;
        }
        Slot::Loading => {
            frame.render_widget(Paragraph::new("Loading chart...").block(block), area);
            return;
        }
        Slot::Unavailable(reason) => {
            frame.render_widget(Paragraph::new(reason.as_str()).block(block), area);
            return;
        }
    };

    let data = chart_points(series);
    let (x_bounds, y_bounds) = chart_bounds(series);
    let time_format = if detail.window.is_intraday() { "%H:%M" } else { "%m-%d" };
    let x_labels = [x_bounds[0], (x_bounds[0] + x_bounds[1]) / 2.0, x_bounds[1]]
        .into_iter()
        .map(|x| time_label(x, time_format))
        .collect::<Vec<_>>();
    let y_labels = [y_bounds[0], (y_bounds[0] + y_bounds[1]) / 2.0, y_bounds[1]]
        .into_iter()
        .map(|y| format!("{:.2}", y))
        .collect::<Vec<_>>();
    let axis_style = Style::default().fg(theme.secondary_text);

    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(theme.accent))
        .data(&data);
    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .title("Time")
                .style(axis_style)
                .bounds(x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("Price ($)")
                .style(axis_style)
                .bounds(y_bounds)
                .labels(y_labels),
        );
    frame.render_widget(chart, area);
}

fn render_info(frame: &mut Frame, area: Rect, info: &Slot<StockInfo>, theme: &Theme) {
    let (rows, title) = match info {
        Slot::Ready(info) => (info.rows(), " Details ".to_string()),
        Slot::Loading => (placeholder_rows("Loading..."), " Details ".to_string()),
        Slot::Unavailable(reason) => (placeholder_rows(format::NOT_AVAILABLE), format!(" Details - {} ", reason)),
    };
    let lines: Vec<Line> = rows
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{:<16}", format!("{label}:")), Style::default().fg(theme.secondary_text)),
                Span::styled(value, Style::default().fg(theme.text)),
            ])
        })
        .collect();
    let block = Block::bordered()
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(title, theme.heading()))
        .style(theme.surface(theme.background));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn placeholder_rows(value: &str) -> Vec<(&'static str, String)> {
    StockInfo::default()
        .rows()
        .into_iter()
        .map(|(label, _)| (label, value.to_string()))
        .collect()
}

/// Currency and local market time, e.g. `USD as of 15:59`.
fn quote_note(quote: &Quote) -> Option<String> {
    let time = quote
        .market_time()
        .map(|at| format!("as of {}", at.with_timezone(&Local).format("%H:%M")));
    match (quote.currency(), time) {
        (Some(currency), Some(time)) => Some(format!("{currency} {time}")),
        (Some(currency), None) => Some(currency.to_string()),
        (None, time) => time,
    }
}

/// `(unix seconds, price)` pairs for the chart widget.
pub fn chart_points(series: &HistoricalSeries) -> Vec<(f64, f64)> {
    series
        .points()
        .iter()
        .map(|point| (point.timestamp.timestamp() as f64, point.price))
        .collect()
}

/// Axis bounds with a little headroom; never zero-width.
pub fn chart_bounds(series: &HistoricalSeries) -> ([f64; 2], [f64; 2]) {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) => (first.timestamp.timestamp() as f64, last.timestamp.timestamp() as f64),
        _ => (0.0, 1.0),
    };
    let x = if last > first { [first, last] } else { [first - 1.0, first + 1.0] };

    let (low, high) = series.price_bounds().unwrap_or((0.0, 1.0));
    let pad = if high > low { (high - low) * 0.05 } else { (high.abs() * 0.01).max(0.01) };
    (x, [low - pad, high + pad])
}

fn time_label(seconds: f64, time_format: &str) -> String {
    DateTime::<Utc>::from_timestamp(seconds as i64, 0)
        .map(|at| at.with_timezone(&Local).format(time_format).to_string())
        .unwrap_or_default()
}
