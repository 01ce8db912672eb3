use glam::DVec2;

use crate::components::entity::Entity;

/// Visible area of the level.
/// Features use it to skip sounds for off-screen entities.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewer {
    /// Visible width in world units.
    pub width: f64,
    /// Visible height in world units.
    pub height: f64,
    /// View center position in world space.
    pub center: DVec2,
    /// Optional bounds for view clamping (min, max).
    pub bounds: Option<(DVec2, DVec2)>,
}

impl Viewer {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            center: DVec2::ZERO,
            bounds: None,
        }
    }

    /// Set world bounds for view clamping.
    pub fn set_bounds(&mut self, min: DVec2, max: DVec2) {
        self.bounds = Some((min, max));
    }

    /// Clear view bounds (allow the view to move anywhere).
    pub fn clear_bounds(&mut self) {
        self.bounds = None;
    }

    /// Move view center to target position, applying bounds.
    pub fn look_at(&mut self, target: DVec2) {
        self.center = target;
        self.clamp_to_bounds();
    }

    fn clamp_to_bounds(&mut self) {
        if let Some((min, max)) = self.bounds {
            let half = DVec2::new(self.width / 2.0, self.height / 2.0);
            // Viewport larger than bounds: center on them
            self.center.x = if self.width >= max.x - min.x {
                (min.x + max.x) / 2.0
            } else {
                self.center.x.clamp(min.x + half.x, max.x - half.x)
            };
            self.center.y = if self.height >= max.y - min.y {
                (min.y + max.y) / 2.0
            } else {
                self.center.y.clamp(min.y + half.y, max.y - half.y)
            };
        }
    }

    /// Check if a world-space point is visible in the viewport.
    pub fn is_visible(&self, point: DVec2) -> bool {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        point.x >= self.center.x - half_w
            && point.x <= self.center.x + half_w
            && point.y >= self.center.y - half_h
            && point.y <= self.center.y + half_h
    }

    /// Check if a world-space rectangle overlaps the viewport.
    pub fn is_rect_visible(&self, rect_center: DVec2, rect_half_size: DVec2) -> bool {
        let half = DVec2::new(self.width / 2.0, self.height / 2.0);
        let cam_min = self.center - half;
        let cam_max = self.center + half;
        let rect_min = rect_center - rect_half_size;
        let rect_max = rect_center + rect_half_size;

        rect_max.x >= cam_min.x
            && rect_min.x <= cam_max.x
            && rect_max.y >= cam_min.y
            && rect_min.y <= cam_max.y
    }

    /// Whether an entity, grown by `margin` on each side, overlaps the view.
    pub fn is_viewable(&self, entity: &Entity, margin: DVec2) -> bool {
        self.is_rect_visible(entity.pos, entity.size / 2.0 + margin)
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(320.0, 240.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;

    #[test]
    fn look_at_moves_view() {
        let mut view = Viewer::new(100.0, 100.0);
        view.look_at(DVec2::new(500.0, 300.0));
        assert_eq!(view.center, DVec2::new(500.0, 300.0));
    }

    #[test]
    fn bounds_clamp_view() {
        let mut view = Viewer::new(100.0, 100.0);
        view.set_bounds(DVec2::ZERO, DVec2::new(500.0, 400.0));

        view.look_at(DVec2::ZERO);
        assert_eq!(view.center, DVec2::new(50.0, 50.0));

        view.look_at(DVec2::new(1000.0, 1000.0));
        assert_eq!(view.center, DVec2::new(450.0, 350.0));

        view.clear_bounds();
        view.look_at(DVec2::new(-500.0, -500.0));
        assert_eq!(view.center, DVec2::new(-500.0, -500.0));
    }

    #[test]
    fn is_visible_detects_points_in_view() {
        let mut view = Viewer::new(100.0, 100.0);
        view.center = DVec2::new(50.0, 50.0);

        assert!(view.is_visible(DVec2::new(50.0, 50.0)));
        assert!(view.is_visible(DVec2::new(0.0, 0.0)));
        assert!(!view.is_visible(DVec2::new(-1.0, 50.0)));
        assert!(!view.is_visible(DVec2::new(101.0, 50.0)));
    }

    #[test]
    fn entity_viewable_with_margin() {
        let mut view = Viewer::new(100.0, 100.0);
        view.center = DVec2::new(50.0, 50.0);
        let entity = Entity::new(EntityId(1))
            .with_pos(DVec2::new(-20.0, 50.0))
            .with_size(DVec2::new(16.0, 16.0));

        assert!(!view.is_viewable(&entity, DVec2::ZERO));
        assert!(view.is_viewable(&entity, DVec2::new(16.0, 0.0)));
    }
}
