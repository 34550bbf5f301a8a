//! The viewer chrome: toolbar, book surface, thumbnail overlay, page
//! counter, and the placeholder states.
//!
//! Chrome never validates anything on its own; every control funnels into a
//! [`flipbook_core::PageFlipEngine`] entry point through a [`Message`], and
//! visibility of the share/download/print controls is the AND of the
//! publication's settings flag and an action being available.

use iced::widget::{
    button, column, container, horizontal_space, image as img, mouse_area, row, scrollable,
    slider, stack, text,
};
use iced::{Color, ContentFit, Element, Length};

use flipbook_core::Page;

use crate::{Message, Viewer};

/// Neutral gray matching the default `backgroundColor` setting (`#f5f5f5`).
pub const DEFAULT_BACKGROUND: Color = Color {
    r: 0.961,
    g: 0.961,
    b: 0.961,
    a: 1.0,
};

const THUMBS_PER_ROW: usize = 6;
const THUMB_WIDTH: f32 = 90.0;
const THUMB_HEIGHT: f32 = 127.0;

pub fn view(viewer: &Viewer) -> Element<'_, Message> {
    let mut layout = column![toolbar(viewer), book_area(viewer)];
    if viewer.engine.settings().show_page_numbers {
        layout = layout.push(page_counter(viewer));
    }

    let background = viewer.background;
    container(layout)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(move |_| container::Style {
            background: Some(background.into()),
            ..container::Style::default()
        })
        .into()
}

pub fn loading<'a>() -> Element<'a, Message> {
    container(text("Loading publication...").size(16))
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

/// Terminal state for an empty or failed publication: the message, the
/// configured background, and no controls at all.
pub fn placeholder(message: &str, background: Color) -> Element<'_, Message> {
    container(text(message).size(16))
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .style(move |_| container::Style {
            background: Some(background.into()),
            ..container::Style::default()
        })
        .into()
}

fn toolbar(viewer: &Viewer) -> Element<'_, Message> {
    let engine = &viewer.engine;
    let settings = engine.settings();

    let zoom_label = format!("{}%", (engine.zoom() * 100.0).round() as i32);
    let mut controls = row![
        button(text("-").size(14))
            .on_press_maybe(engine.can_zoom_out().then_some(Message::ZoomOut)),
        text(zoom_label).size(14),
        button(text("+").size(14)).on_press_maybe(engine.can_zoom_in().then_some(Message::ZoomIn)),
    ]
    .spacing(5)
    .align_y(iced::Alignment::Center);

    if settings.show_thumbnails {
        let style = if engine.thumbnails_open() {
            button::primary
        } else {
            button::secondary
        };
        controls = controls.push(
            button(text("Pages").size(14))
                .style(style)
                .on_press(Message::ToggleThumbnails),
        );
    }
    if let Some(action) = viewer.share_action() {
        controls = controls.push(button(text("Share").size(14)).on_press(action));
    }
    if let Some(action) = viewer.download_action() {
        controls = controls.push(button(text("Download").size(14)).on_press(action));
    }
    if let Some(action) = viewer.print_action() {
        controls = controls.push(button(text("Print").size(14)).on_press(action));
    }
    if settings.show_fullscreen_button {
        let label = if engine.is_fullscreen() {
            "Exit fullscreen"
        } else {
            "Fullscreen"
        };
        controls = controls.push(button(text(label).size(14)).on_press(Message::ToggleFullscreen));
    }

    let title: Element<'_, Message> = match viewer.title.as_deref() {
        Some(title) => text(title).size(16).into(),
        None => horizontal_space().into(),
    };

    row![title, horizontal_space(), controls]
        .spacing(10)
        .padding(10)
        .align_y(iced::Alignment::Center)
        .into()
}

fn book_area(viewer: &Viewer) -> Element<'_, Message> {
    let engine = &viewer.engine;
    let dims = engine.dimensions();
    // Zoom scales the rendered surface only; the layout keeps its computed
    // dimensions.
    let width = dims.width as f32 * engine.zoom();
    let height = dims.height as f32 * engine.zoom();

    let page: Element<'_, Message> = match viewer.pages.get(engine.current_page()) {
        Some(handle) => img(handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fixed(width))
            .height(Length::Fixed(height))
            .into(),
        None => container(text("Loading page...").size(14))
            .center_x(Length::Fixed(width))
            .center_y(Length::Fixed(height))
            .into(),
    };

    let surface = mouse_area(page)
        .on_press(Message::SwipePressed)
        .on_move(Message::SwipeMoved)
        .on_release(Message::SwipeReleased);

    let book = row![
        button(text("<").size(18))
            .on_press_maybe((!engine.is_first_page()).then_some(Message::Prev)),
        container(surface)
            .center_x(Length::Fill)
            .center_y(Length::Fill),
        button(text(">").size(18)).on_press_maybe((!engine.is_last_page()).then_some(Message::Next)),
    ]
    .spacing(10)
    .padding(10)
    .align_y(iced::Alignment::Center)
    .width(Length::Fill)
    .height(Length::Fill);

    if engine.thumbnails_open() {
        stack![book, thumbnail_overlay(viewer)]
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    } else {
        book.into()
    }
}

fn thumbnail_overlay(viewer: &Viewer) -> Element<'_, Message> {
    let mut grid = column![].spacing(10);
    for (row_index, chunk) in viewer.engine.pages().chunks(THUMBS_PER_ROW).enumerate() {
        let mut strip = row![].spacing(10);
        for (offset, page) in chunk.iter().enumerate() {
            let index = row_index * THUMBS_PER_ROW + offset;
            strip = strip.push(thumbnail_tile(viewer, index, page));
        }
        grid = grid.push(strip);
    }

    let panel = column![
        row![
            horizontal_space(),
            button(text("Close").size(14)).on_press(Message::CloseThumbnails)
        ]
        .padding(10),
        scrollable(container(grid).padding(10).center_x(Length::Fill))
            .width(Length::Fill)
            .height(Length::Fill),
    ];

    container(panel)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(|_| container::Style {
            background: Some(
                Color {
                    a: 0.85,
                    ..Color::BLACK
                }
                .into(),
            ),
            ..container::Style::default()
        })
        .into()
}

fn thumbnail_tile<'a>(viewer: &'a Viewer, index: usize, page: &'a Page) -> Element<'a, Message> {
    let preview: Element<'a, Message> = match viewer.thumbnails.get(&index) {
        Some(handle) => img(handle.clone())
            .content_fit(ContentFit::Cover)
            .width(Length::Fixed(THUMB_WIDTH))
            .height(Length::Fixed(THUMB_HEIGHT))
            .into(),
        None => container(text(page.page_number.to_string()).size(14))
            .center_x(Length::Fixed(THUMB_WIDTH))
            .center_y(Length::Fixed(THUMB_HEIGHT))
            .into(),
    };

    let style = if index == viewer.engine.current_page() {
        button::primary
    } else {
        button::secondary
    };
    button(
        column![preview, text(page.page_number.to_string()).size(12)]
            .spacing(4)
            .align_x(iced::Alignment::Center),
    )
    .style(style)
    .on_press(Message::GoTo(index))
    .into()
}

fn page_counter(viewer: &Viewer) -> Element<'_, Message> {
    let engine = &viewer.engine;
    let total = engine.page_count();
    let current = engine.current_page();

    let readout = text(format!("Page {} of {}", current + 1, total)).size(14);
    let track = slider(0..=(total - 1) as u16, current as u16, |value| {
        Message::GoTo(value as usize)
    })
    .width(Length::Fixed(220.0));

    container(
        row![readout, track]
            .spacing(20)
            .align_y(iced::Alignment::Center),
    )
    .center_x(Length::Fill)
    .padding(10)
    .into()
}

/// Parse a `#rgb` or `#rrggbb` color. Malformed values fall back to the
/// default background upstream.
pub fn parse_background_color(value: &str) -> Option<Color> {
    let hex = value.trim().strip_prefix('#')?;
    let (r, g, b) = match hex.len() {
        3 => {
            let component = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
            (
                component(0).ok()?,
                component(1).ok()?,
                component(2).ok()?,
            )
        }
        6 => (
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        ),
        _ => return None,
    };
    Some(Color::from_rgb8(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_colors() {
        let color = parse_background_color("#f5f5f5").unwrap();
        assert!((color.r - DEFAULT_BACKGROUND.r).abs() < 0.005);
        assert!((color.g - DEFAULT_BACKGROUND.g).abs() < 0.005);
        assert!((color.b - DEFAULT_BACKGROUND.b).abs() < 0.005);
    }

    #[test]
    fn parses_three_digit_colors() {
        let color = parse_background_color("#fff").unwrap();
        assert_eq!(color, Color::from_rgb8(255, 255, 255));
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!(parse_background_color("f5f5f5").is_none());
        assert!(parse_background_color("#12345").is_none());
        assert!(parse_background_color("#gggggg").is_none());
        assert!(parse_background_color("").is_none());
    }
}
