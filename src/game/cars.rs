//! Player car and NPC traffic entities.
//!
//! Both cars share `CarBody` (continuous position + mirrored rectangle); the
//! player is a singleton and NPCs live in their own collection, so no dynamic
//! dispatch is involved.

use super::types::{NpcId, Position, Rect, Steer};

/// Positional state shared by every car.
#[derive(Debug, Clone)]
pub struct CarBody {
    pub pos: Position,
    pub rect: Rect,
}

impl CarBody {
    /// Body of the given size centred on `(center_x, center_y)`.
    pub fn centered(center_x: f64, center_y: f64, width: f64, height: f64) -> Self {
        let pos = Position::new(center_x - width / 2.0, center_y - height / 2.0);
        Self {
            pos,
            rect: Rect::at(pos, width.round() as i32, height.round() as i32),
        }
    }

    /// Body of the given size with its top-left corner at `pos`.
    pub fn at(pos: Position, width: f64, height: f64) -> Self {
        Self {
            pos,
            rect: Rect::at(pos, width.round() as i32, height.round() as i32),
        }
    }

    /// Re-derive the rectangle from the continuous position.
    fn sync_rect(&mut self) {
        self.rect = Rect::at(self.pos, self.rect.width, self.rect.height);
    }
}

/// The car the player steers. Its vertical position never changes.
#[derive(Debug, Clone)]
pub struct PlayerCar {
    pub body: CarBody,
    /// Construction-time centre, restored on reset.
    initial_center: (f64, f64),
    /// Signed horizontal velocity in pixels/frame.
    pub horizontal_speed: f64,
    pub acceleration: f64,
    pub max_horizontal_speed: f64,
}

impl PlayerCar {
    pub fn new(
        center_x: f64,
        center_y: f64,
        width: f64,
        height: f64,
        acceleration: f64,
        max_horizontal_speed: f64,
    ) -> Self {
        Self {
            body: CarBody::centered(center_x, center_y, width, height),
            initial_center: (center_x, center_y),
            horizontal_speed: 0.0,
            acceleration,
            max_horizontal_speed,
        }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect
    }

    /// Accelerate in `direction`, clamp the velocity, then move by it.
    pub fn move_horizontal(&mut self, direction: Steer) {
        self.horizontal_speed = (self.horizontal_speed + direction.sign() * self.acceleration)
            .clamp(-self.max_horizontal_speed, self.max_horizontal_speed);
        self.body.pos.x += self.horizontal_speed;
        self.body.sync_rect();
    }

    /// Apply one frame of held steering keys. Releasing the key for the
    /// current direction of travel stops the car at once (no coasting).
    pub fn steer(&mut self, left_held: bool, right_held: bool) {
        if left_held {
            self.move_horizontal(Steer::Left);
        } else if self.horizontal_speed < 0.0 {
            self.horizontal_speed = 0.0;
        }

        if right_held {
            self.move_horizontal(Steer::Right);
        } else if self.horizontal_speed > 0.0 {
            self.horizontal_speed = 0.0;
        }
    }

    /// Keep the car inside `[0, screen_width]` horizontally.
    pub fn update(&mut self, screen_width: f64) {
        let width = self.body.rect.width as f64;
        if self.body.pos.x < 0.0 {
            self.body.pos.x = 0.0;
        }
        if self.body.pos.x + width > screen_width {
            self.body.pos.x = screen_width - width;
        }
        self.body.sync_rect();
    }

    /// Return to the construction-time position with zero velocity.
    pub fn reset_position(&mut self) {
        let (cx, cy) = self.initial_center;
        let width = self.body.rect.width as f64;
        let height = self.body.rect.height as f64;
        self.body = CarBody::centered(cx, cy, width, height);
        self.horizontal_speed = 0.0;
    }
}

/// Result of advancing an NPC by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NpcStatus {
    Alive,
    Despawned,
}

/// Oncoming traffic car with a fixed speed.
#[derive(Debug, Clone)]
pub struct NpcCar {
    pub id: NpcId,
    pub body: CarBody,
    /// Own speed in pixels/frame, constant for the car's lifetime.
    pub speed: f64,
    /// Index into the configured lane positions.
    pub lane: usize,
}

impl NpcCar {
    pub fn new(id: NpcId, body: CarBody, speed: f64, lane: usize) -> Self {
        Self {
            id,
            body,
            speed,
            lane,
        }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect
    }

    /// Move by the road speed relative to the car's own speed. Cars faster
    /// than the road drift up the screen, slower ones fall behind.
    ///
    /// Despawns once the top edge is strictly below `screen_height`.
    pub fn update(&mut self, road_speed: f64, screen_height: f64) -> NpcStatus {
        self.body.pos.y += road_speed - self.speed;
        self.body.sync_rect();

        if self.body.rect.top() as f64 > screen_height {
            NpcStatus::Despawned
        } else {
            NpcStatus::Alive
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> PlayerCar {
        PlayerCar::new(420.0, 400.0, 50.0, 100.0, 0.5, 10.0)
    }

    fn npc_with_top(top: f64, speed: f64) -> NpcCar {
        NpcCar::new(
            NpcId(1),
            CarBody::at(Position::new(100.0, top), 50.0, 100.0),
            speed,
            0,
        )
    }

    #[test]
    fn test_player_initial_rect() {
        let car = player();
        assert_eq!(car.rect(), Rect::new(395, 350, 50, 100));
        assert_eq!(car.horizontal_speed, 0.0);
    }

    #[test]
    fn test_move_horizontal_accelerates() {
        let mut car = player();
        car.move_horizontal(Steer::Right);
        assert_eq!(car.horizontal_speed, 0.5);
        assert_eq!(car.body.pos.x, 395.5);
        car.move_horizontal(Steer::Right);
        assert_eq!(car.horizontal_speed, 1.0);
        assert_eq!(car.body.pos.x, 396.5);
        assert_eq!(car.rect().x, 396);
    }

    #[test]
    fn test_move_horizontal_clamps_velocity() {
        let mut car = player();
        for _ in 0..100 {
            car.move_horizontal(Steer::Left);
        }
        assert_eq!(car.horizontal_speed, -10.0);

        for _ in 0..100 {
            car.move_horizontal(Steer::Right);
        }
        assert_eq!(car.horizontal_speed, 10.0);
    }

    #[test]
    fn test_straight_keeps_velocity() {
        let mut car = player();
        car.horizontal_speed = 3.0;
        car.move_horizontal(Steer::Straight);
        assert_eq!(car.horizontal_speed, 3.0);
        assert_eq!(car.body.pos.x, 398.0);
    }

    #[test]
    fn test_steer_release_stops_instantly() {
        let mut car = player();
        for _ in 0..5 {
            car.steer(false, true);
        }
        assert!(car.horizontal_speed > 0.0);
        let x = car.body.pos.x;

        car.steer(false, false);
        assert_eq!(car.horizontal_speed, 0.0);
        assert_eq!(car.body.pos.x, x);

        car.steer(true, false);
        assert_eq!(car.horizontal_speed, -0.5);
        car.steer(false, false);
        assert_eq!(car.horizontal_speed, 0.0);
    }

    #[test]
    fn test_update_clamps_left_edge() {
        let mut car = player();
        car.body = CarBody::at(Position::new(-20.0, 350.0), 50.0, 100.0);
        car.update(840.0);
        assert_eq!(car.rect().left(), 0);
        assert_eq!(car.body.pos.x, 0.0);
    }

    #[test]
    fn test_update_clamps_right_edge() {
        let mut car = player();
        car.body = CarBody::at(Position::new(820.0, 350.0), 50.0, 100.0);
        car.update(840.0);
        assert_eq!(car.rect().right(), 840);
    }

    #[test]
    fn test_pinned_at_wall_does_not_jitter() {
        let mut car = player();
        for _ in 0..200 {
            car.move_horizontal(Steer::Right);
            car.update(840.0);
            assert!(car.rect().right() <= 840);
        }
        assert_eq!(car.rect().right(), 840);
        assert_eq!(car.horizontal_speed, 10.0);
    }

    #[test]
    fn test_update_never_changes_vertical_position() {
        let mut car = player();
        for _ in 0..50 {
            car.move_horizontal(Steer::Left);
            car.update(840.0);
        }
        assert_eq!(car.rect().top(), 350);
    }

    #[test]
    fn test_reset_position() {
        let mut car = player();
        for _ in 0..30 {
            car.move_horizontal(Steer::Left);
        }
        car.update(840.0);
        car.reset_position();
        assert_eq!(car.rect(), Rect::new(395, 350, 50, 100));
        assert_eq!(car.horizontal_speed, 0.0);
    }

    #[test]
    fn test_npc_moves_down_when_road_faster() {
        let mut npc = npc_with_top(100.0, 10.0);
        let status = npc.update(30.0, 650.0);
        assert_eq!(status, NpcStatus::Alive);
        assert_eq!(npc.rect().top(), 120);
    }

    #[test]
    fn test_npc_moves_up_when_faster_than_road() {
        let mut npc = npc_with_top(200.0, 15.0);
        npc.update(5.0, 650.0);
        assert_eq!(npc.rect().top(), 190);
    }

    #[test]
    fn test_npc_despawn_boundary() {
        let mut npc = npc_with_top(640.0, 0.0);
        // Top lands exactly on the boundary: survives
        assert_eq!(npc.update(10.0, 650.0), NpcStatus::Alive);
        assert_eq!(npc.rect().top(), 650);
        // One more pixel: despawns
        assert_eq!(npc.update(1.0, 650.0), NpcStatus::Despawned);
        assert_eq!(npc.rect().top(), 651);
    }

    #[test]
    fn test_npc_fractional_speeds_accumulate() {
        let mut npc = npc_with_top(0.0, 0.0);
        for _ in 0..4 {
            npc.update(0.25, 650.0);
        }
        assert_eq!(npc.rect().top(), 1);
    }
}
