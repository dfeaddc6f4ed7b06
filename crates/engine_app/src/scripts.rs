//! Sample gameplay scripts for the demo scene.
//!
//! `Player` pushes its own body around from keyboard events and tells the
//! camera where to look. `CameraController` follows the "YellowCubic" body
//! (or whatever the player last pointed it at) and can nudge the cubic
//! upwards with the space bar.

use std::collections::BTreeSet;

use engine_component::FieldValue;
use engine_math::{Vec2, Vec3};
use engine_script::{
    Behavior, EntityHandle, FrameTime, Rigidbody2DAccessor, ScriptError, ScriptEvent,
    ScriptFieldMap, ScriptRef, TransformAccessor,
};

/// Key codes delivered in [`ScriptEvent::KeyPressed`].
pub mod keys {
    pub const SPACE: u16 = 32;
    pub const A: u16 = 65;
    pub const D: u16 = 68;
    pub const S: u16 = 83;
    pub const W: u16 = 87;
}

/// Keys currently held down, tracked from press/release events.
#[derive(Debug, Default, Clone)]
pub struct KeyState {
    held: BTreeSet<u16>,
}

impl KeyState {
    pub fn apply(&mut self, event: &ScriptEvent) {
        match event {
            ScriptEvent::KeyPressed { key, .. } => {
                self.held.insert(*key);
            }
            ScriptEvent::KeyReleased { key } => {
                self.held.remove(key);
            }
            _ => {}
        }
    }

    #[must_use]
    pub fn is_pressed(&self, key: u16) -> bool {
        self.held.contains(&key)
    }
}

fn speed_field(speed: f32) -> ScriptFieldMap {
    let mut fields = ScriptFieldMap::new();
    fields.insert("speed", speed);
    fields
}

fn set_speed(speed: &mut f32, name: &str, value: FieldValue) -> Result<(), ScriptError> {
    match name {
        "speed" => *speed = value.extract(name)?,
        _ => return Err(ScriptError::UnknownField(name.to_string())),
    }
    Ok(())
}

/// Follows the cubic, or a focus point set by another script.
#[derive(Debug)]
pub struct CameraController {
    entity: EntityHandle,
    pub speed: f32,
    keys: KeyState,
    transform: Option<TransformAccessor>,
    cubic: Option<EntityHandle>,
    focus: Option<Vec3>,
}

impl CameraController {
    pub const CLASS: &'static str = "Camera";
    pub const TARGET: &'static str = "YellowCubic";

    #[must_use]
    pub fn new(entity: EntityHandle) -> Self {
        Self {
            entity,
            speed: 5.0,
            keys: KeyState::default(),
            transform: None,
            cubic: None,
            focus: None,
        }
    }

    /// Look at `position` instead of the cubic from the next frame on.
    pub fn follow(&mut self, position: Vec3) {
        self.focus = Some(position);
    }

    #[must_use]
    pub fn focus(&self) -> Option<Vec3> {
        self.focus
    }
}

impl Behavior for CameraController {
    fn on_create(&mut self) -> Result<(), ScriptError> {
        self.entity
            .log()
            .warn(format!("Camera::on_create - {}", self.entity.id()));
        self.transform = self.entity.transform();
        self.cubic = self.entity.find_entity_by_name(Self::TARGET);
        Ok(())
    }

    fn on_update(&mut self, frame_time: FrameTime) -> Result<(), ScriptError> {
        let dt = frame_time.as_seconds();

        // The cubic may have been destroyed since on_create.
        if self.keys.is_pressed(keys::SPACE)
            && let Some(cubic) = &self.cubic
            && cubic.has::<Rigidbody2DAccessor>()
            && let Some(body) = cubic.get::<Rigidbody2DAccessor>()
        {
            body.apply_linear_impulse_to_center(Vec2::new(0.0, dt * self.speed / 5.0), true)?;
        }

        let Some(transform) = &self.transform else {
            return Ok(());
        };
        let target = match (self.focus, &self.cubic) {
            (Some(focus), _) => focus,
            (None, Some(cubic)) if cubic.exists() => match cubic.transform() {
                Some(cubic_transform) => cubic_transform.translation()?,
                None => return Ok(()),
            },
            _ => return Ok(()),
        };

        let offset = dt * self.speed;
        let mut position = transform.translation()?;
        position.x = target.x;
        position.y = target.y;
        if self.keys.is_pressed(keys::A) {
            position.x -= offset;
        }
        if self.keys.is_pressed(keys::D) {
            position.x += offset;
        }
        if self.keys.is_pressed(keys::W) {
            position.y += offset;
        }
        if self.keys.is_pressed(keys::S) {
            position.y -= offset;
        }
        transform.set_translation(position)
    }

    fn on_event(&mut self, event: &ScriptEvent) -> Result<(), ScriptError> {
        self.keys.apply(event);
        Ok(())
    }

    fn fields(&self) -> ScriptFieldMap {
        speed_field(self.speed)
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), ScriptError> {
        set_speed(&mut self.speed, name, value)
    }
}

/// Keyboard-driven body that keeps the camera on itself.
#[derive(Debug)]
pub struct Player {
    entity: EntityHandle,
    pub speed: f32,
    keys: KeyState,
    body: Option<Rigidbody2DAccessor>,
    camera: Option<ScriptRef>,
}

impl Player {
    pub const CLASS: &'static str = "Player";

    #[must_use]
    pub fn new(entity: EntityHandle) -> Self {
        Self {
            entity,
            speed: 0.1,
            keys: KeyState::default(),
            body: None,
            camera: None,
        }
    }
}

impl Behavior for Player {
    fn on_create(&mut self) -> Result<(), ScriptError> {
        self.entity
            .log()
            .warn(format!("Player::on_create - {}", self.entity.id()));
        self.body = self.entity.get::<Rigidbody2DAccessor>();
        self.camera = self.entity.find_script_by_name("Camera");
        Ok(())
    }

    fn on_update(&mut self, frame_time: FrameTime) -> Result<(), ScriptError> {
        let mut velocity = Vec2::ZERO;
        if self.keys.is_pressed(keys::D) {
            velocity.x += 1.0;
        } else if self.keys.is_pressed(keys::A) {
            velocity.x -= 1.0;
        }
        if self.keys.is_pressed(keys::SPACE) {
            velocity.y += 2.0;
        }
        velocity *= self.speed * frame_time.as_seconds();

        if let Some(body) = &self.body {
            body.apply_linear_impulse_to_center(velocity, true)?;
        }

        // The camera may have been destroyed since on_create.
        if let Some(camera) = &self.camera
            && camera.instance().is_some_and(|instance| !instance.is_destroyed())
            && let Some(transform) = self.entity.transform()
        {
            let position = transform.translation()?;
            camera.with_mut(|camera: &mut CameraController| camera.follow(position))?;
        }
        Ok(())
    }

    fn on_event(&mut self, event: &ScriptEvent) -> Result<(), ScriptError> {
        self.keys.apply(event);
        Ok(())
    }

    fn fields(&self) -> ScriptFieldMap {
        speed_field(self.speed)
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), ScriptError> {
        set_speed(&mut self.speed, name, value)
    }
}

/// Register the sample classes.
pub fn register_all(classes: &mut engine_script::ScriptClassRegistry) {
    classes.register(CameraController::CLASS, CameraController::new);
    classes.register(Player::CLASS, Player::new);
}
