/// Axis-aligned bounding boxes and the overlap test shared by every pairwise check.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// True when the two boxes share interior area. Touching edges do not count.
pub fn collides(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contained_box_collides() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert!(collides(&outer, &inner));
        assert!(collides(&inner, &outer));
    }

    #[test]
    fn zero_sized_box_on_edge_does_not_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let dot = Rect::new(10.0, 5.0, 0.0, 0.0);
        assert!(!collides(&a, &dot));
    }
}
