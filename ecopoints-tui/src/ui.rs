use ecopoints_core::{CollectionPoint, CollectionType};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, TableState, Wrap},
};

use crate::app::App;

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    let snapshot = &app.snapshot;
    let header = Paragraph::new(format!(
        "Center {} · {} of {} points visible",
        snapshot.center,
        snapshot.visible_count(),
        snapshot.markers.len()
    ))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("ecopoints – {}", app.service.source().location)),
    );
    frame.render_widget(header, *header_area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(40), Constraint::Min(0)])
        .split(*content_area);
    let [filter_area, points_area] = columns.as_ref() else {
        return;
    };

    draw_filters(frame, app, *filter_area);
    draw_points(frame, app, *points_area);

    let nav_hint = "1-5 toggle · a show all · ↑/↓ move · Enter center · r reload · q quit";
    let status_text = if app.is_loading {
        format!("Loading… · {nav_hint}")
    } else if let Some(msg) = &app.error_message {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_filters(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let items = CollectionType::ALL
        .into_iter()
        .enumerate()
        .map(|(idx, kind)| {
            let mark = if app.snapshot.is_selected(kind) {
                "[x]"
            } else {
                "[ ]"
            };
            let line = format!(
                "{} {mark} {} ({})",
                idx + 1,
                kind.display_name(),
                app.snapshot.count(kind)
            );
            ListItem::new(line).style(Style::default().fg(category_color(kind)))
        })
        .collect::<Vec<ListItem<'_>>>();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Filters"));
    frame.render_widget(list, area);
}

fn draw_points(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let rows_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(6)])
        .split(area);
    let [table_area, details_area] = rows_area.as_ref() else {
        return;
    };

    if app.snapshot.is_empty() {
        let text = if app.is_loading {
            "Loading collection points…"
        } else {
            "Nothing loaded yet. Press r to load the dataset."
        };
        let paragraph = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Points"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let rows = app.snapshot.visible().map(|point| {
        Row::new(vec![
            Cell::from(point.name.clone()),
            Cell::from(point.category.display_name()),
            Cell::from(point.coordinate.to_string()),
        ])
        .style(Style::default().fg(category_color(point.category)))
    });

    let column_widths = [
        Constraint::Min(24),
        Constraint::Length(28),
        Constraint::Length(22),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec!["Name", "Category", "Lat, Lng"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title("Points (↑/↓)"))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .column_spacing(1);

    let mut state = TableState::default();
    if app.snapshot.visible_count() > 0 {
        state.select(Some(app.list_index));
    }
    frame.render_stateful_widget(table, *table_area, &mut state);

    let details = Paragraph::new(details_text(app.selected_point()))
        .block(Block::default().borders(Borders::ALL).title("Details"))
        .wrap(Wrap { trim: true });
    frame.render_widget(details, *details_area);
}

fn details_text(point: Option<&CollectionPoint>) -> String {
    let Some(point) = point else {
        return "No point selected.".to_owned();
    };

    let unknown = "–";
    format!(
        "{} ({})\nAddress: {}\nHours: {}\nMaterials: {}",
        point.name,
        point.id,
        point.details.address.as_deref().unwrap_or(unknown),
        point.details.opening_hours.as_deref().unwrap_or(unknown),
        point.details.materials.as_deref().unwrap_or(unknown),
    )
}

fn category_color(kind: CollectionType) -> Color {
    match kind {
        CollectionType::Recyclable => Color::Blue,
        CollectionType::Organic => Color::Green,
        CollectionType::Hazardous => Color::Red,
        CollectionType::Cooperative => Color::Yellow,
        CollectionType::DropOff => Color::Gray,
    }
}
