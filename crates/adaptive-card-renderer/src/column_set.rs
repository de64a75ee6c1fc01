//! Column track sizing.
//!
//! A column's size directive maps to a track: `stretch` (or no directive) is
//! one proportional share, `auto` sizes to content, a bare non-negative number
//! is a proportional weight and `<n>px` is a fixed width. Anything else falls
//! back to `auto`.

use crate::context::RenderContext;
use crate::element::CardElement;
use crate::errors::RenderError;
use crate::output::RenderedElement;
use crate::renderer::render_item;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TrackSize {
    Auto,
    /// Share of the space left after pixel and auto tracks.
    Proportional(f64),
    Pixel(f64),
}

impl Default for TrackSize {
    fn default() -> Self {
        TrackSize::Proportional(1.0)
    }
}

pub fn parse_size_directive(directive: Option<&str>) -> TrackSize {
    let Some(raw) = directive else {
        return TrackSize::default();
    };
    let directive = raw.trim().to_ascii_lowercase();
    match directive.as_str() {
        "stretch" => TrackSize::default(),
        "auto" => TrackSize::Auto,
        other => match other.strip_suffix("px") {
            Some(pixels) => parse_non_negative(pixels).map_or(TrackSize::Auto, TrackSize::Pixel),
            None => parse_non_negative(other).map_or(TrackSize::Auto, TrackSize::Proportional),
        },
    }
}

fn parse_non_negative(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
        .map(f64::abs)
}

/// Render every column and pair it with its track.
///
/// Columns go through the normal dispatch path and the unsupported-element
/// policy, so a hidden or skipped column yields `None` content. Entries that
/// are not `Column` elements get a stretch track.
pub fn layout_columns(
    columns: &[CardElement],
    context: &mut RenderContext,
) -> Result<Vec<(TrackSize, Option<RenderedElement>)>, RenderError> {
    let mut tracks = Vec::with_capacity(columns.len());
    for (index, column) in columns.iter().enumerate() {
        let track = parse_size_directive(column.column_size());
        debug!(column = index, directive = ?column.column_size(), ?track, "column track");
        let rendered = render_item(column, context)?;
        tracks.push((track, rendered));
    }
    Ok(tracks)
}

/// Resolve tracks to widths within `available` pixels.
///
/// Pixel tracks take their width, auto tracks take the measured content width
/// at the same index (zero when missing), and the remainder is split between
/// proportional tracks by weight. Proportional tracks collapse to zero when
/// nothing remains or every weight is zero.
pub fn resolve_track_widths(tracks: &[TrackSize], available: f64, content_widths: &[f64]) -> Vec<f64> {
    let fixed: f64 = tracks
        .iter()
        .enumerate()
        .map(|(index, track)| match track {
            TrackSize::Pixel(width) => *width,
            TrackSize::Auto => content_widths.get(index).copied().unwrap_or(0.0),
            TrackSize::Proportional(_) => 0.0,
        })
        .sum();
    let total_weight: f64 = tracks
        .iter()
        .map(|track| match track {
            TrackSize::Proportional(weight) => *weight,
            _ => 0.0,
        })
        .sum();
    let remaining = (available - fixed).max(0.0);

    tracks
        .iter()
        .enumerate()
        .map(|(index, track)| match track {
            TrackSize::Pixel(width) => *width,
            TrackSize::Auto => content_widths.get(index).copied().unwrap_or(0.0),
            TrackSize::Proportional(weight) if total_weight > 0.0 => {
                remaining * weight / total_weight
            }
            TrackSize::Proportional(_) => 0.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_stretch_are_one_share() {
        assert_eq!(parse_size_directive(None), TrackSize::Proportional(1.0));
        assert_eq!(
            parse_size_directive(Some("Stretch")),
            TrackSize::Proportional(1.0)
        );
    }

    #[test]
    fn keywords_are_case_insensitive_and_trimmed() {
        assert_eq!(parse_size_directive(Some("AUTO")), TrackSize::Auto);
        assert_eq!(parse_size_directive(Some(" auto ")), TrackSize::Auto);
        assert_eq!(
            parse_size_directive(Some(" stretch")),
            TrackSize::Proportional(1.0)
        );
    }

    #[test]
    fn numbers_become_weights() {
        assert_eq!(
            parse_size_directive(Some("2")),
            TrackSize::Proportional(2.0)
        );
        assert_eq!(
            parse_size_directive(Some("0.5")),
            TrackSize::Proportional(0.5)
        );
        assert_eq!(
            parse_size_directive(Some("0")),
            TrackSize::Proportional(0.0)
        );
        assert_eq!(
            parse_size_directive(Some("-0")),
            TrackSize::Proportional(0.0)
        );
    }

    #[test]
    fn pixel_directives() {
        assert_eq!(parse_size_directive(Some("50px")), TrackSize::Pixel(50.0));
        assert_eq!(parse_size_directive(Some("12.5PX")), TrackSize::Pixel(12.5));
        assert_eq!(parse_size_directive(Some("px")), TrackSize::Auto);
    }

    #[test]
    fn unparseable_falls_back_to_auto() {
        for directive in ["wide", "", "-1", "NaN", "inf", "-3px", "1.5.2"] {
            assert_eq!(
                parse_size_directive(Some(directive)),
                TrackSize::Auto,
                "directive {directive:?}"
            );
        }
    }

    #[test]
    fn widths_split_remaining_space_by_weight() {
        let tracks = [
            TrackSize::Proportional(1.0),
            TrackSize::Auto,
            TrackSize::Proportional(2.0),
            TrackSize::Pixel(40.0),
        ];
        let widths = resolve_track_widths(&tracks, 400.0, &[0.0, 60.0, 0.0, 0.0]);
        assert_eq!(widths, vec![100.0, 60.0, 200.0, 40.0]);
    }

    #[test]
    fn zero_weights_collapse() {
        let tracks = [TrackSize::Proportional(0.0), TrackSize::Pixel(30.0)];
        assert_eq!(resolve_track_widths(&tracks, 100.0, &[]), vec![0.0, 30.0]);
    }

    #[test]
    fn overfull_rows_leave_nothing_for_shares() {
        let tracks = [TrackSize::Pixel(300.0), TrackSize::Proportional(1.0)];
        assert_eq!(resolve_track_widths(&tracks, 200.0, &[]), vec![300.0, 0.0]);
    }
}
