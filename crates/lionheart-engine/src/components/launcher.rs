use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Projectile launcher attached to an entity.
///
/// Firing is a spawn request: the host creates `projectile` at the entity
/// position plus `offset` and gives it the requested direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Launcher {
    /// Template name of the launched entity.
    pub projectile: String,
    #[serde(default)]
    pub offset_x: f64,
    #[serde(default)]
    pub offset_y: f64,
    /// Base direction; features usually scale it per axis.
    #[serde(default)]
    pub vx: f64,
    #[serde(default)]
    pub vy: f64,
}

impl Launcher {
    pub fn new(projectile: impl Into<String>, direction: DVec2) -> Self {
        Self {
            projectile: projectile.into(),
            offset_x: 0.0,
            offset_y: 0.0,
            vx: direction.x,
            vy: direction.y,
        }
    }

    pub fn with_offset(mut self, offset: DVec2) -> Self {
        self.offset_x = offset.x;
        self.offset_y = offset.y;
        self
    }

    pub fn offset(&self) -> DVec2 {
        DVec2::new(self.offset_x, self.offset_y)
    }

    pub fn direction(&self) -> DVec2 {
        DVec2::new(self.vx, self.vy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_launcher_node() {
        let launcher: Launcher = serde_json::from_str(
            r#"{ "projectile": "Bullet", "offsetY": 8.0, "vx": -1.0, "vy": 0.5 }"#,
        )
        .unwrap();
        assert_eq!(launcher.projectile, "Bullet");
        assert_eq!(launcher.offset(), DVec2::new(0.0, 8.0));
        assert_eq!(launcher.direction(), DVec2::new(-1.0, 0.5));
    }
}
