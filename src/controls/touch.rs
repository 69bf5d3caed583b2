//! On-screen touch pads.
//!
//! A d-pad sits in the bottom-left corner and the enter/exit pad in the
//! bottom-right. All sizes are logical pixels.

use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchControl {
    Forward,
    Backward,
    Left,
    Right,
    Enter,
}

impl TouchControl {
    pub const ALL: [TouchControl; 5] = [
        TouchControl::Forward,
        TouchControl::Backward,
        TouchControl::Left,
        TouchControl::Right,
        TouchControl::Enter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TouchControl::Forward => "W",
            TouchControl::Backward => "S",
            TouchControl::Left => "A",
            TouchControl::Right => "D",
            TouchControl::Enter => "E",
        }
    }
}

/// Which window edge a pad is measured from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HorizontalAnchor {
    Left(f32),
    Right(f32),
}

/// Placement of one pad relative to the bottom of the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PadAnchor {
    pub horizontal: HorizontalAnchor,
    pub bottom: f32,
    pub size: f32,
}

#[derive(Resource, Clone, Debug)]
pub struct TouchLayout {
    pub pad_size: f32,
    pub pad_gap: f32,
    pub margin: f32,
    pub enter_size: f32,
}

impl Default for TouchLayout {
    fn default() -> Self {
        Self {
            pad_size: 64.0,
            pad_gap: 8.0,
            margin: 24.0,
            enter_size: 96.0,
        }
    }
}

impl TouchLayout {
    pub fn anchor(&self, control: TouchControl) -> PadAnchor {
        let step = self.pad_size + self.pad_gap;
        let (column, row) = match control {
            TouchControl::Left => (0.0, 1.0),
            TouchControl::Right => (2.0, 1.0),
            TouchControl::Forward => (1.0, 2.0),
            TouchControl::Backward => (1.0, 0.0),
            TouchControl::Enter => {
                return PadAnchor {
                    horizontal: HorizontalAnchor::Right(self.margin),
                    bottom: self.margin,
                    size: self.enter_size,
                };
            }
        };
        PadAnchor {
            horizontal: HorizontalAnchor::Left(self.margin + column * step),
            bottom: self.margin + row * step,
            size: self.pad_size,
        }
    }

    /// Screen rectangle of a pad, top-left origin like touch positions.
    pub fn rect(&self, control: TouchControl, window: Vec2) -> Rect {
        let anchor = self.anchor(control);
        let min_x = match anchor.horizontal {
            HorizontalAnchor::Left(left) => left,
            HorizontalAnchor::Right(right) => window.x - right - anchor.size,
        };
        let max_y = window.y - anchor.bottom;
        Rect::new(min_x, max_y - anchor.size, min_x + anchor.size, max_y)
    }

    /// The pad under a touch, if any.
    pub fn control_at(&self, position: Vec2, window: Vec2) -> Option<TouchControl> {
        TouchControl::ALL
            .into_iter()
            .find(|&control| self.rect(control, window).contains(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Vec2 = Vec2::new(1280.0, 720.0);

    #[test]
    fn pad_centres_map_to_their_control() {
        let layout = TouchLayout::default();
        for control in TouchControl::ALL {
            let centre = layout.rect(control, WINDOW).center();
            assert_eq!(layout.control_at(centre, WINDOW), Some(control));
        }
    }

    #[test]
    fn pads_do_not_overlap() {
        let layout = TouchLayout::default();
        for a in TouchControl::ALL {
            for b in TouchControl::ALL {
                if a != b {
                    let overlap = layout.rect(a, WINDOW).intersect(layout.rect(b, WINDOW));
                    assert!(overlap.is_empty(), "{a:?} overlaps {b:?}");
                }
            }
        }
    }

    #[test]
    fn enter_pad_hugs_bottom_right() {
        let layout = TouchLayout::default();
        let rect = layout.rect(TouchControl::Enter, WINDOW);
        assert_eq!(rect.max, Vec2::new(1280.0 - 24.0, 720.0 - 24.0));
    }

    #[test]
    fn centre_of_screen_is_not_a_pad() {
        let layout = TouchLayout::default();
        assert_eq!(layout.control_at(WINDOW / 2.0, WINDOW), None);
    }
}
