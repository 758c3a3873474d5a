//! Axis-aligned data bounds

/// Data-space extent of a trace, `[x_min, y_min, x_max, y_max]`
///
/// Built from the first and last coordinate of each axis, so a descending
/// axis yields `x_min > x_max`. [`Bounds::union`] normalizes the order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Bounds {
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self { x_min, y_min, x_max, y_max }
    }

    pub fn from_array([x_min, y_min, x_max, y_max]: [f64; 4]) -> Self {
        Self { x_min, y_min, x_max, y_max }
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.x_min, self.y_min, self.x_max, self.y_max]
    }

    /// Same extent with min <= max on each axis
    pub fn normalized(&self) -> Bounds {
        self.union(self)
    }

    /// Smallest bounds covering both, with min <= max on each axis
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            x_min: self.x_min.min(self.x_max).min(other.x_min.min(other.x_max)),
            y_min: self.y_min.min(self.y_max).min(other.y_min.min(other.y_max)),
            x_max: self.x_max.max(self.x_min).max(other.x_max.max(other.x_min)),
            y_max: self.y_max.max(self.y_min).max(other.y_max.max(other.y_min)),
        }
    }
}
