use glam::DVec2;

/// A 2D force whose direction eases toward a destination.
///
/// Each update moves every axis of `direction` toward `destination` by
/// `velocity * extrp`, snapping once the remaining gap is below
/// `sensibility`. A zero velocity makes the direction jump immediately.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Force {
    pub direction: DVec2,
    pub destination: DVec2,
    pub velocity: f64,
    pub sensibility: f64,
}

impl Force {
    pub fn new(direction: DVec2) -> Self {
        Self {
            direction,
            destination: direction,
            velocity: 0.0,
            sensibility: 0.0,
        }
    }

    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_sensibility(mut self, sensibility: f64) -> Self {
        self.sensibility = sensibility;
        self
    }

    pub fn set_direction(&mut self, direction: DVec2) {
        self.direction = direction;
    }

    pub fn set_destination(&mut self, destination: DVec2) {
        self.destination = destination;
    }

    /// Drop both current and target direction to zero.
    pub fn zero(&mut self) {
        self.direction = DVec2::ZERO;
        self.destination = DVec2::ZERO;
    }

    pub fn update(&mut self, extrp: f64) {
        if self.velocity <= 0.0 {
            self.direction = self.destination;
            return;
        }
        let step = self.velocity * extrp;
        self.direction.x = approach(self.direction.x, self.destination.x, step, self.sensibility);
        self.direction.y = approach(self.direction.y, self.destination.y, step, self.sensibility);
    }
}

fn approach(current: f64, target: f64, step: f64, sensibility: f64) -> f64 {
    let next = if current < target {
        (current + step).min(target)
    } else {
        (current - step).max(target)
    };
    if (target - next).abs() <= sensibility {
        target
    } else {
        next
    }
}
