use crate::error::{DashboardError, DashboardResult};
use crate::render::Color;

pub(super) const TEXT_COLOR: Color = Color::rgb(0.0, 0.0, 0.0);
pub(super) const AXIS_COLOR: Color = Color::rgb(0.2, 0.2, 0.2);
pub(super) const GRID_COLOR: Color = Color::rgb(0.88, 0.88, 0.88);

/// Pixel rectangle that holds the data marks of a chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> DashboardResult<Self> {
        if !(left.is_finite() && top.is_finite() && right.is_finite() && bottom.is_finite()) {
            return Err(DashboardError::InvalidData(
                "plot area must be finite".to_owned(),
            ));
        }
        if right <= left || bottom <= top {
            return Err(DashboardError::InvalidData(format!(
                "container too small for plot area (left={left:.1}, top={top:.1}, right={right:.1}, bottom={bottom:.1})"
            )));
        }
        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }

    #[must_use]
    pub fn center_x(self) -> f64 {
        (self.left + self.right) / 2.0
    }

    #[must_use]
    pub fn center_y(self) -> f64 {
        (self.top + self.bottom) / 2.0
    }
}

pub(super) fn estimate_text_width(text: &str, font_size_px: f64) -> f64 {
    // Keep this estimate deterministic and backend-independent.
    let units = text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.62,
            '.' | ',' => 0.34,
            '-' | '+' | '%' | '$' => 0.42,
            ' ' => 0.33,
            _ => 0.58,
        }
    });
    units * font_size_px
}

#[cfg(test)]
mod tests {
    use super::{PlotArea, estimate_text_width};

    #[test]
    fn plot_area_rejects_inverted_bounds() {
        assert!(PlotArea::new(10.0, 10.0, 5.0, 50.0).is_err());
        assert!(PlotArea::new(10.0, 60.0, 50.0, 50.0).is_err());
        let plot = PlotArea::new(10.0, 20.0, 110.0, 220.0).expect("valid plot");
        assert_eq!(plot.width(), 100.0);
        assert_eq!(plot.center_y(), 120.0);
    }

    #[test]
    fn wider_text_estimates_wider() {
        assert!(estimate_text_width("50,000", 12.0) > estimate_text_width("500", 12.0));
        assert_eq!(estimate_text_width("", 12.0), 0.0);
    }
}
