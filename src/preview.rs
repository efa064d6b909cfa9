// Preview module for rendering photos in the terminal

use crate::domain::PhotoAsset;
use image::{DynamicImage, GenericImageView, Pixel};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use std::io;
use std::path::{Path, PathBuf};

const MAX_IMAGE_WIDTH: u32 = 160;
/// Height is halved because we render 2 pixels per terminal row using half-blocks
const MAX_IMAGE_HEIGHT: u32 = 100;

/// Preview content that can be either plain text or styled image lines
#[derive(Debug, Clone)]
pub enum PreviewContent {
    /// Plain text lines (placeholders, errors)
    Text(Vec<String>),
    /// Styled lines with color information
    Styled(Vec<Line<'static>>),
}

/// Local filesystem path behind a `file://` uri
pub fn local_path(uri: &str) -> Option<PathBuf> {
    uri.strip_prefix("file://").map(PathBuf::from)
}

/// Loads an image from a file path
pub fn load_image(path: &Path) -> io::Result<DynamicImage> {
    image::open(path).map_err(|e| io::Error::other(format!("Image loading error: {}", e)))
}

/// Calculates new dimensions to fit image within max width and height while preserving aspect ratio
pub fn calculate_resize_dimensions(
    original_width: u32,
    original_height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if original_width == 0 || original_height == 0 {
        return (0, 0);
    }

    let width_ratio = max_width as f64 / original_width as f64;
    let height_ratio = max_height as f64 / original_height as f64;
    let ratio = width_ratio.min(height_ratio);

    if ratio >= 1.0 {
        (original_width, original_height)
    } else {
        let new_width = (original_width as f64 * ratio) as u32;
        let new_height = (original_height as f64 * ratio) as u32;
        (new_width, new_height)
    }
}

/// Converts an image to styled lines using half-block characters.
/// The upper half block (▀) takes the upper pixel as foreground and the lower
/// pixel as background, giving 2 pixels per cell.
pub fn image_to_halfblock_lines(img: &DynamicImage, width: u32, height: u32) -> Vec<Line<'static>> {
    let height = if height % 2 == 0 { height } else { height + 1 };

    // Triangle is fast enough for camera-sized photos
    let img = img.resize_exact(width, height, image::imageops::FilterType::Triangle);
    let img = img.to_rgb8();

    let term_height = height / 2;
    let mut lines = Vec::with_capacity(term_height as usize);

    for y in 0..term_height {
        let upper_y = y * 2;
        let lower_y = upper_y + 1;

        let mut spans = Vec::with_capacity(width as usize);
        for x in 0..width {
            let upper = img.get_pixel(x, upper_y).to_rgb();
            let lower = if lower_y < height {
                img.get_pixel(x, lower_y).to_rgb()
            } else {
                upper
            };

            let style = Style::default()
                .fg(Color::Rgb(upper[0], upper[1], upper[2]))
                .bg(Color::Rgb(lower[0], lower[1], lower[2]));
            spans.push(Span::styled("▀", style));
        }

        lines.push(Line::from(spans));
    }

    lines
}

/// Renders a photo with a short header (name, dimensions, date taken)
pub fn generate_photo_preview(asset: &PhotoAsset) -> io::Result<PreviewContent> {
    let path = match local_path(&asset.uri) {
        Some(path) => path,
        None => {
            return Ok(PreviewContent::Text(vec![
                format!("Photo: {}", asset.filename),
                String::new(),
                format!("[No local file for {}]", asset.uri),
            ]))
        }
    };

    let img = load_image(&path)?;
    let (original_width, original_height) = img.dimensions();
    let (new_width, new_height) = calculate_resize_dimensions(
        original_width,
        original_height,
        MAX_IMAGE_WIDTH,
        MAX_IMAGE_HEIGHT,
    );

    let header_style = Style::default().add_modifier(Modifier::BOLD);
    let info_style = Style::default().fg(Color::Gray);

    let mut lines: Vec<Line<'static>> = vec![
        Line::from(vec![
            Span::styled("Photo: ", header_style),
            Span::styled(asset.filename.clone(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled(
                format!("{}×{} px", original_width, original_height),
                info_style,
            ),
            Span::raw("  "),
            Span::styled(
                format!("Taken: {}", asset.creation_time.format("%Y-%m-%d %H:%M")),
                info_style,
            ),
        ]),
        Line::from(""),
    ];
    lines.extend(image_to_halfblock_lines(&img, new_width, new_height));

    Ok(PreviewContent::Styled(lines))
}
