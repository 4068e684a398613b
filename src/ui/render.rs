use std::time::Instant;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::chart::ChartSeries;
use crate::format::{format_currency, format_pct, Trend};
use crate::state::StatusKind;
use crate::theme::Theme;
use crate::types::*;

pub fn draw(f: &mut Frame, app: &mut App) {
    let t = app.theme();

    // Fill background
    let bg_block = Block::default().style(Style::default().bg(t.bg));
    f.render_widget(bg_block, f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // top bar
            Constraint::Min(5),    // main
            Constraint::Length(1), // bottom bar
        ])
        .split(f.area());

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(chunks[1]);

    draw_top_bar(f, app, &t, chunks[0]);
    draw_table(f, app, &t, main[0]);
    draw_chart(f, app, &t, main[1]);
    draw_bottom_bar(f, app, &t, chunks[2]);
}

// -- Top bar --

fn draw_top_bar(f: &mut Frame, app: &App, t: &Theme, area: Rect) {
    let state = &app.state;
    let mut spans: Vec<Span> = vec![
        Span::styled(" pulse ", Style::default().fg(t.title).add_modifier(Modifier::BOLD)),
        Span::styled("\u{2689} ", Style::default().fg(t.dim)),
    ];

    for (i, currency) in Currency::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" \u{b7} ", Style::default().fg(t.dim)));
        }
        let style = if *currency == state.currency {
            Style::default().fg(t.title).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(t.dim)
        };
        spans.push(Span::styled(currency.label(), style));
    }

    spans.push(Span::styled(" \u{2502} ", Style::default().fg(t.dim)));
    spans.push(Span::styled(
        format!("{} of {} coins ", app.visible_assets().len(), state.assets.len()),
        Style::default().fg(t.dim),
    ));
    spans.push(Span::styled(format!("[{}]", state.theme.label()), Style::default().fg(t.accent)));

    // Right-align refresh info
    let refresh_info = if state.listing_in_flight() {
        "loading...".to_string()
    } else {
        app.last_refresh_display.clone()
    };

    if !refresh_info.is_empty() {
        let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let pad = (area.width as usize).saturating_sub(used + refresh_info.len() + 1);
        if pad > 0 {
            spans.push(Span::raw(" ".repeat(pad)));
        }
        spans.push(Span::styled(refresh_info, Style::default().fg(t.dim)));
    }

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(t.border)),
    );
    f.render_widget(bar, area);
}

// -- Asset table --

fn draw_table(f: &mut Frame, app: &mut App, t: &Theme, area: Rect) {
    if app.state.assets.is_empty() {
        let (msg, color) = match app.state.status {
            Some(ref s) if s.kind == StatusKind::Error && !app.state.listing_in_flight() => {
                (format!("  Error: {}", s.text), t.error)
            }
            _ => ("  Fetching market data...".to_string(), t.dim),
        };
        f.render_widget(Paragraph::new(msg).style(Style::default().fg(color)), area);
        return;
    }

    let table_height = area.height.saturating_sub(1) as usize;
    app.page_height = table_height.max(1);
    app.adjust_scroll();

    let visible = app.visible_assets();
    if visible.is_empty() {
        let p = Paragraph::new("  No matches for filter.").style(Style::default().fg(t.dim));
        f.render_widget(p, area);
        return;
    }

    let currency = app.state.currency;
    let chart_asset = app.state.selected.as_deref();

    let header = Row::new(
        ["#", "Name", "Ticker", "Price", "24h%", "MCap", "Volume"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(t.dim))),
    )
    .height(1);

    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(app.page_height)
        .map(|(i, asset)| {
            let rank = asset
                .market_cap_rank
                .map(|r| r.to_string())
                .unwrap_or_else(|| (i + 1).to_string());
            let is_charted = chart_asset == Some(asset.id.as_str());
            let name = if is_charted {
                format!("\u{25b8} {}", asset.name)
            } else {
                asset.name.clone()
            };
            let name_style = if is_charted {
                Style::default().fg(t.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(t.fg)
            };

            let cells = vec![
                Cell::from(rank).style(Style::default().fg(t.dim)),
                Cell::from(name).style(name_style),
                Cell::from(asset.symbol.to_uppercase()).style(Style::default().fg(t.accent)),
                Cell::from(format_currency(asset.current_price, currency)).style(Style::default().fg(t.fg)),
                pct_cell(asset.price_change_percentage_24h, t),
                Cell::from(format_currency(asset.market_cap, currency)).style(Style::default().fg(t.dim)),
                Cell::from(format_currency(asset.total_volume, currency)).style(Style::default().fg(t.dim)),
            ];

            let style = if i == app.cursor {
                Style::default().bg(t.highlight_bg).fg(t.highlight_fg)
            } else {
                Style::default().bg(t.bg)
            };

            Row::new(cells).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(12),
        Constraint::Length(6),
        Constraint::Length(14),
        Constraint::Length(8),
        Constraint::Length(22),
        Constraint::Length(20),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::NONE))
        .column_spacing(1);

    f.render_widget(table, area);
}

fn pct_cell(change: f64, t: &Theme) -> Cell<'static> {
    let color = match Trend::of(change) {
        Trend::Up => t.positive,
        Trend::Down => t.negative,
    };
    Cell::from(format_pct(change)).style(Style::default().fg(color))
}

// -- Chart panel --

fn draw_chart(f: &mut Frame, app: &App, t: &Theme, area: Rect) {
    let state = &app.state;
    let days = app.config.history_days;

    let title = match (state.selected_asset(), state.selected.as_deref()) {
        (Some(a), _) => format!(
            " {} ({}) \u{b7} {}D \u{b7} {} ",
            a.name,
            a.symbol.to_uppercase(),
            days,
            state.currency.label()
        ),
        (None, Some(id)) => format!(" {} \u{b7} {}D \u{b7} {} ", id, days, state.currency.label()),
        (None, None) => " Chart ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(t.accent));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let inner = match state.selected_asset() {
        Some(a) if !a.image.is_empty() && inner.height > 4 => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), Constraint::Length(1)])
                .split(inner);
            let icon = Paragraph::new(format!(" icon: {}", a.image)).style(Style::default().fg(t.dim));
            f.render_widget(icon, parts[1]);
            parts[0]
        }
        _ => inner,
    };

    match state.chart {
        Some(ref series) if !series.is_empty() => {
            draw_series(f, series, state.history_in_flight(), t, inner);
        }
        Some(_) => {
            let msg = Paragraph::new("  No price data available.").style(Style::default().fg(t.dim));
            f.render_widget(msg, inner);
        }
        None if state.history_in_flight() => {
            let msg = Paragraph::new("  Loading price history...").style(Style::default().fg(t.dim));
            f.render_widget(msg, inner);
        }
        None if state.selected.is_none() => {
            let msg = Paragraph::new("  Press Enter on a coin to chart it.").style(Style::default().fg(t.dim));
            f.render_widget(msg, inner);
        }
        None => {
            let msg = Paragraph::new("  No chart data. Press R to retry.").style(Style::default().fg(t.dim));
            f.render_widget(msg, inner);
        }
    }
}

fn draw_series(f: &mut Frame, series: &ChartSeries, reloading: bool, t: &Theme, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // stats
            Constraint::Min(3),    // chart
        ])
        .split(area);

    let currency = series.currency;
    let change = series.change_pct().unwrap_or(0.0);
    let line_color = match Trend::of(change) {
        Trend::Up => t.positive,
        Trend::Down => t.negative,
    };
    let (lo, hi) = series.min_max().unwrap_or((0.0, 0.0));
    let last = series.last_price().unwrap_or(0.0);

    let mut stats = vec![
        Span::styled(format!(" {} ", format_currency(last, currency)), Style::default().fg(t.fg)),
        Span::styled(format!(" {} ", format_pct(change)), Style::default().fg(line_color)),
        Span::styled(
            format!(" Lo: {}  Hi: {} ", format_currency(lo, currency), format_currency(hi, currency)),
            Style::default().fg(t.dim),
        ),
    ];
    if let Some(p) = series.points.last() {
        stats.push(Span::styled(
            format!(" as of {}", p.timestamp.format("%Y-%m-%d")),
            Style::default().fg(t.dim),
        ));
    }
    if reloading {
        stats.push(Span::styled(" reloading...", Style::default().fg(t.dim)));
    }
    f.render_widget(Paragraph::new(Line::from(stats)), chunks[0]);

    let data = series.data();
    let datasets = vec![Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(line_color))
        .data(&data)];

    let x_labels: Vec<Span> = series.axis_labels().into_iter().map(Span::raw).collect();
    let y_labels = vec![
        Span::raw(format_currency(lo, currency)),
        Span::raw(format_currency(hi, currency)),
    ];

    let chart = Chart::new(datasets)
        .style(Style::default().bg(t.bg))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(t.axis))
                .bounds(series.x_bounds())
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(t.axis))
                .bounds(series.y_bounds())
                .labels(y_labels),
        );
    f.render_widget(chart, chunks[1]);
}

// -- Bottom bar --

fn draw_bottom_bar(f: &mut Frame, app: &App, t: &Theme, area: Rect) {
    if app.input_mode == InputMode::Search {
        let n = app.visible_assets().len();
        let text = format!(" / {}_  ({} results)", app.state.query, n);
        let bar = Paragraph::new(text).style(Style::default().fg(t.input_accent));
        f.render_widget(bar, area);
        return;
    }

    let hints = " j/k \u{2195} | Enter chart | / search | c/C currency | t theme | r refresh | R reload chart | q quit ";
    let mut spans = vec![Span::styled(hints, Style::default().fg(t.dim))];

    if !app.state.query.is_empty() {
        spans.push(Span::styled(
            format!(" [/{}]", app.state.query),
            Style::default().fg(t.accent),
        ));
    }

    if let Some(ref status) = app.state.status {
        if status.is_visible(Instant::now()) {
            let color: Color = match status.kind {
                StatusKind::Success => t.positive,
                StatusKind::Error => t.error,
            };
            spans.push(Span::styled(format!(" \u{2502} {}", status.text), Style::default().fg(color)));
        }
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
