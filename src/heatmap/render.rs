//! Pure layout of one season's heatmap.
//!
//! [`render`] turns points into a [`HeatmapScene`]; the Leptos component only
//! draws the scene, so everything positional is testable without a browser.

use crate::api::{Season, SeasonalDataPoint};

use super::scale::{BandScale, ColorScale, Rgb, ScaleSpec};

pub const DEFAULT_SIZE: (f64, f64) = (450.0, 450.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

pub const MARGINS: Margins = Margins {
    top: 80.0,
    right: 25.0,
    bottom: 60.0,
    left: 50.0,
};

/// Title baseline relative to the top of the grid.
pub const TITLE_OFFSET: f64 = -40.0;

/// Short forms for weekday x labels; anything else is shown as-is.
const DAY_ABBREV: [(&str, &str); 7] = [
    ("Monday", "Mon"),
    ("Tuesday", "Tue"),
    ("Wednesday", "Wed"),
    ("Thursday", "Thu"),
    ("Friday", "Fri"),
    ("Saturday", "Sat"),
    ("Sunday", "Sun"),
];

pub fn abbreviate_x_label(label: &str) -> &str {
    DAY_ABBREV
        .iter()
        .find(|(full, _)| *full == label)
        .map(|(_, short)| *short)
        .unwrap_or(label)
}

/// One drawn rectangle. Coordinates are relative to the grid origin (inside
/// the margins).
#[derive(Debug, Clone, PartialEq)]
pub struct SceneCell {
    pub point: SeasonalDataPoint,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Rgb,
}

impl SceneCell {
    /// Stable key for keyed lists and hover highlighting.
    pub fn key(&self) -> String {
        format!("{}:{}", self.point.category_x, self.point.category_y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub label: String,
    /// Center of the band along its axis.
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapScene {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    pub inner_width: f64,
    pub inner_height: f64,
    pub scale: ScaleSpec,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub cells: Vec<SceneCell>,
}

/// Lay out `points` for `season` in a `size` (width, height) box.
///
/// Returns `None` when there is nothing to draw.
pub fn render(points: &[SeasonalDataPoint], season: Season, size: (f64, f64)) -> Option<HeatmapScene> {
    if points.is_empty() {
        return None;
    }

    let (width, height) = size;
    let inner_width = (width - MARGINS.left - MARGINS.right).max(0.0);
    let inner_height = (height - MARGINS.top - MARGINS.bottom).max(0.0);

    let scale = ScaleSpec::from_points(points);
    let x = BandScale::new(scale.x_domain.clone(), (0.0, inner_width));
    let y = BandScale::new(scale.y_domain.clone(), (inner_height, 0.0));
    let color = ColorScale::new(scale.color_domain);

    let cells = points
        .iter()
        .filter_map(|p| {
            Some(SceneCell {
                x: x.position(&p.category_x)?,
                y: y.position(&p.category_y)?,
                width: x.bandwidth(),
                height: y.bandwidth(),
                fill: color.color(p.value),
                point: p.clone(),
            })
        })
        .collect();

    let x_ticks = x
        .domain()
        .iter()
        .filter_map(|label| {
            Some(Tick {
                label: abbreviate_x_label(label).to_string(),
                position: x.center(label)?,
            })
        })
        .collect();

    let y_ticks = y
        .domain()
        .iter()
        .filter_map(|label| {
            Some(Tick {
                label: label.clone(),
                position: y.center(label)?,
            })
        })
        .collect();

    Some(HeatmapScene {
        title: season.name().to_string(),
        width,
        height,
        margins: MARGINS,
        inner_width,
        inner_height,
        scale,
        x_ticks,
        y_ticks,
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week_points() -> Vec<SeasonalDataPoint> {
        vec![
            SeasonalDataPoint::new("Monday", "11-1", 8.0),
            SeasonalDataPoint::new("Tuesday", "11-1", 2.0),
            SeasonalDataPoint::new("Monday", "5-7", 5.0),
            SeasonalDataPoint::new("Holiday", "5-7", 1.0),
        ]
    }

    #[test]
    fn test_empty_points_render_nothing() {
        assert!(render(&[], Season::Fall, DEFAULT_SIZE).is_none());
    }

    #[test]
    fn test_one_cell_per_point_inside_grid() {
        let scene = render(&week_points(), Season::Winter, DEFAULT_SIZE).unwrap();
        assert_eq!(scene.cells.len(), 4);
        assert_eq!(scene.inner_width, 375.0);
        assert_eq!(scene.inner_height, 310.0);
        for cell in &scene.cells {
            assert!(cell.x >= 0.0 && cell.x + cell.width <= scene.inner_width + 1e-9);
            assert!(cell.y >= 0.0 && cell.y + cell.height <= scene.inner_height + 1e-9);
        }
    }

    #[test]
    fn test_x_labels_abbreviated_y_labels_untouched() {
        let scene = render(&week_points(), Season::Spring, DEFAULT_SIZE).unwrap();
        let x: Vec<_> = scene.x_ticks.iter().map(|t| t.label.as_str()).collect();
        let y: Vec<_> = scene.y_ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(x, vec!["Mon", "Tue", "Holiday"]);
        assert_eq!(y, vec!["11-1", "5-7"]);
    }

    #[test]
    fn test_title_is_season_name() {
        let scene = render(&week_points(), Season::Summer, DEFAULT_SIZE).unwrap();
        assert_eq!(scene.title, "Summer");
    }

    #[test]
    fn test_hottest_cell_is_darkest() {
        let scene = render(&week_points(), Season::Winter, DEFAULT_SIZE).unwrap();
        let hottest = scene.cells.iter().find(|c| c.point.value == 8.0).unwrap();
        let coolest = scene.cells.iter().find(|c| c.point.value == 1.0).unwrap();
        assert!(hottest.fill.luma() < coolest.fill.luma());
    }

    #[test]
    fn test_tiny_size_never_negative() {
        let scene = render(&week_points(), Season::Fall, (40.0, 40.0)).unwrap();
        assert_eq!(scene.inner_width, 0.0);
        assert_eq!(scene.inner_height, 0.0);
        assert!(scene.cells.iter().all(|c| c.width >= 0.0 && c.height >= 0.0));
    }

    #[test]
    fn test_abbreviation_table() {
        assert_eq!(abbreviate_x_label("Saturday"), "Sat");
        assert_eq!(abbreviate_x_label("sat"), "sat");
    }
}
