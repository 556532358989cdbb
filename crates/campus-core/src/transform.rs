//! Normalized-to-canvas coordinate transform.
//!
//! Map data lives in a 0-100 space. The map image is drawn with a small
//! stretch and shift, so every point a renderer draws (nodes, pathways
//! and computed routes) must go through [`CanvasTransform::to_canvas`].
//! Applying it in one place keeps all layers aligned.

use crate::node::Point;
use serde::{Deserialize, Serialize};

/// A point in canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

/// Scale and offset applied to normalized coordinates before drawing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasTransform {
    /// Horizontal stretch; above 1 widens the drawing.
    pub scale_x: f64,
    /// Vertical stretch; above 1 makes it taller.
    pub scale_y: f64,
    /// Horizontal shift in percent of the canvas width.
    pub offset_x: f64,
    /// Vertical shift in percent of the canvas height.
    pub offset_y: f64,
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self {
            scale_x: 1.25,
            scale_y: 1.25,
            offset_x: -5.5,
            offset_y: -5.5,
        }
    }
}

impl CanvasTransform {
    /// The transform that maps 0-100 straight onto the canvas.
    pub fn identity() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Converts a normalized map point to canvas pixels.
    pub fn to_canvas(&self, point: Point, width: f64, height: f64) -> CanvasPoint {
        CanvasPoint {
            x: ((point.x + self.offset_x) / 100.0) * width * self.scale_x,
            y: ((point.y + self.offset_y) / 100.0) * height * self.scale_y,
        }
    }

    /// Converts a sequence of points, preserving order.
    pub fn to_canvas_all<I>(&self, points: I, width: f64, height: f64) -> Vec<CanvasPoint>
    where
        I: IntoIterator<Item = Point>,
    {
        points
            .into_iter()
            .map(|p| self.to_canvas(p, width, height))
            .collect()
    }
}
