//! The DNA unit: wanders, eats, fights and breeds on a cooldown.

use std::collections::VecDeque;

use bevy_ecs::prelude::*;
use glam::Vec3;
use sge_ecs::{Tag, TimeStep, TransformComponent};
use sge_input::MouseButton;
use sge_physics::{BodyType, CollisionPoints, DEFAULT_FLOOR_HEIGHT, PhysicsWorld, RigidBody};
use sge_scene::{ScriptContext, ScriptableEntity};

use super::{CameraController, Food};
use crate::resources::Population;

/// Seconds between two actions.
pub const ACTION_DELAY: f32 = 0.25;
pub const START_HEALTH: f32 = 100.0;
pub const START_DAMAGE: f32 = 1.0;
/// Health spent on every action tick.
pub const ENERGY_PER_ACTION: f32 = 0.5;
pub const MOVEMENT_SPEED: f32 = 5.0;
/// Distance at which a destination counts as reached.
pub const ARRIVAL_RADIUS: f32 = 2.0;
pub const SEARCH_RANGE: i32 = 5;
pub const EXTENDED_SEARCH_RANGE: i32 = 25;
/// Short moves before one long move.
pub const LOCAL_SEARCH_MOVES: u32 = 5;
pub const MAX_QUEUED_ACTIONS: usize = 1;
/// No more births once the population has bred this many times.
pub const BREED_CAP: u32 = 250;
pub const LAUNCH_FORCE: f32 = 250.0;
pub const LAUNCH_LIFT: f32 = 1500.0;
/// Height dead units are parked at.
pub const GRAVEYARD_HEIGHT: f32 = 100.0;
/// Spawn positions are drawn within this many units of the origin.
pub const SPAWN_RANGE: i32 = 10;
pub const GOTO_RAYCAST_DISTANCE: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitAction {
    /// Walk to a random point within `range`.
    Wander { range: i32 },
    /// Spawn a copy of this unit.
    Breed { generation: u32 },
}

#[derive(Debug, Clone)]
pub struct Unit {
    selected: bool,
    dead: bool,
    sex: u8,
    action_time: f32,
    health: f32,
    damage: f32,
    disabled: bool,
    destination: Vec3,
    in_transit: bool,
    local_search_moves: u32,
    actions: VecDeque<UnitAction>,
}

impl Default for Unit {
    fn default() -> Self {
        Self {
            selected: false,
            dead: false,
            sex: 0,
            action_time: 0.0,
            health: 0.0,
            damage: START_DAMAGE,
            disabled: false,
            destination: Vec3::ZERO,
            in_transit: false,
            local_search_moves: 0,
            actions: VecDeque::new(),
        }
    }
}

impl Unit {
    pub fn select(&mut self) {
        self.selected = true;
    }

    pub fn deselect(&mut self) {
        self.selected = false;
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Knocked into the air by an enemy; recovers on landing.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn set_health(&mut self, health: f32) {
        self.health = health;
    }

    pub fn sex(&self) -> u8 {
        self.sex
    }

    pub fn set_sex(&mut self, sex: u8) {
        self.sex = sex & 1;
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.in_transit.then_some(self.destination)
    }

    pub fn queued_actions(&self) -> impl Iterator<Item = &UnitAction> {
        self.actions.iter()
    }

    /// Two units are friendly unless both are of sex 1.
    pub fn is_friendly(&self, other_sex: u8) -> bool {
        self.sex & other_sex == 0
    }

    pub fn goto(&mut self, destination: Vec3) {
        self.destination = destination;
        self.in_transit = true;
    }

    fn reset(&mut self, ctx: &mut ScriptContext<'_>) {
        self.in_transit = false;
        self.health = START_HEALTH;
        self.damage = START_DAMAGE;
        self.disabled = false;
        self.dead = false;
        self.selected = false;
        self.actions.clear();

        let floor = Self::floor_height(ctx);
        let (sex, position) = {
            let mut rng = super::rng(ctx);
            let sex = u8::from(rng.coin());
            let position = Vec3::new(rng.offset(SPAWN_RANGE), floor, rng.offset(SPAWN_RANGE));
            (sex, position)
        };
        self.sex = sex;

        if let Some(mut rb) = ctx.component_mut::<RigidBody>() {
            rb.set_position(position);
            rb.set_body_type(BodyType::Dynamic);
        }
        if let Some(mut transform) = ctx.component_mut::<TransformComponent>() {
            transform.position = position;
        }
    }

    fn floor_height(ctx: &ScriptContext<'_>) -> f32 {
        ctx.resource::<PhysicsWorld>()
            .map_or(DEFAULT_FLOOR_HEIGHT, |physics| physics.properties().floor_height)
    }

    fn position(ctx: &ScriptContext<'_>) -> Option<Vec3> {
        ctx.component::<TransformComponent>().map(|t| t.position)
    }

    fn generate_action(&mut self) {
        if self.actions.len() >= MAX_QUEUED_ACTIONS {
            return;
        }

        // Levy walk: a run of short moves, then one long one.
        self.local_search_moves += 1;
        let range = if self.local_search_moves > LOCAL_SEARCH_MOVES {
            self.local_search_moves = 0;
            EXTENDED_SEARCH_RANGE
        } else {
            SEARCH_RANGE
        };
        self.actions.push_back(UnitAction::Wander { range });
    }

    fn perform(&mut self, ctx: &mut ScriptContext<'_>, action: UnitAction) {
        match action {
            UnitAction::Wander { range } => {
                let Some(position) = Self::position(ctx) else {
                    return;
                };
                let offset = {
                    let mut rng = super::rng(ctx);
                    Vec3::new(rng.offset(range), 0.0, rng.offset(range))
                };
                self.goto(position + offset);
            }
            UnitAction::Breed { generation } => {
                let parent = ctx.entity();
                ctx.duplicate_entity(parent, move |world, baby| {
                    world
                        .entity_mut(baby)
                        .insert(Tag::new(format!("Baby_{generation}")));
                });
                tracing::debug!("Unit {:?} bred generation {}", parent, generation);
            }
        }
    }

    fn process_input(&mut self, ctx: &mut ScriptContext<'_>) {
        if !self.selected || !ctx.input().is_mouse_button_pressed(MouseButton::Right) {
            return;
        }
        let Some((_, hit)) = CameraController::pick(ctx, GOTO_RAYCAST_DISTANCE) else {
            return;
        };
        let Some(position) = Self::position(ctx) else {
            return;
        };
        self.goto(Vec3::new(hit.point.x, position.y, hit.point.z));
    }

    fn process_goto(&mut self, ctx: &mut ScriptContext<'_>, ts: TimeStep) {
        if !self.in_transit {
            return;
        }
        let Some(position) = Self::position(ctx) else {
            return;
        };
        let Some(mut rb) = ctx.component_mut::<RigidBody>() else {
            return;
        };

        let direction = self.destination - position;
        if direction.length() <= ARRIVAL_RADIUS {
            rb.body.velocity = Vec3::ZERO;
            rb.body.force = Vec3::ZERO;
            self.in_transit = false;
            return;
        }

        let velocity = direction * MOVEMENT_SPEED * 1000.0 * ts.seconds();
        rb.body.velocity.x = velocity.x.clamp(-MOVEMENT_SPEED, MOVEMENT_SPEED);
        rb.body.velocity.z = velocity.z.clamp(-MOVEMENT_SPEED, MOVEMENT_SPEED);
        rb.body.velocity.y = 0.0;
    }

    fn battle(&mut self, ctx: &mut ScriptContext<'_>, enemy: Entity) -> bool {
        let Some(mine) = ctx.component::<RigidBody>().map(RigidBody::position) else {
            return false;
        };
        if let Some(mut rb) = ctx.get_mut::<RigidBody>(enemy) {
            let mut impulse = (rb.position() - mine) * LAUNCH_FORCE;
            impulse.y = LAUNCH_LIFT;
            rb.add_impulse(impulse);
        }

        let damage = self.damage;
        if let Some(unit) = ctx.script_mut::<Unit>(enemy) {
            unit.in_transit = false;
            unit.disabled = true;
            unit.health -= damage;
        }
        false
    }

    fn breed(&mut self, ctx: &mut ScriptContext<'_>) -> bool {
        if self.actions.len() >= MAX_QUEUED_ACTIONS {
            return false;
        }

        let mut population = ctx
            .world_mut()
            .get_resource_or_insert_with(Population::default);
        if population.births > BREED_CAP {
            return false;
        }
        let generation = population.births;
        population.births += 1;

        self.actions.push_back(UnitAction::Breed { generation });
        true
    }

    fn eat(&mut self, ctx: &mut ScriptContext<'_>, food: Entity) -> bool {
        let Some((properties, range)) = ctx
            .script_mut::<Food>(food)
            .map(|f| (f.eat(), f.spawn_range()))
        else {
            return false;
        };
        Food::respawn(ctx, food, range);
        self.health += properties.health_regen;
        true
    }

    fn die(&mut self, ctx: &mut ScriptContext<'_>) {
        self.in_transit = false;
        self.dead = true;

        if let Some(mut rb) = ctx.component_mut::<RigidBody>() {
            let mut position = rb.position();
            position.y = GRAVEYARD_HEIGHT;
            rb.set_position(position);
            rb.set_body_type(BodyType::Static);
        }
        tracing::debug!("Unit {:?} died", ctx.entity());
    }
}

impl ScriptableEntity for Unit {
    fn kind(&self) -> &'static str {
        "Unit"
    }

    fn on_start(&mut self, ctx: &mut ScriptContext<'_>) {
        self.reset(ctx);
    }

    fn on_update(&mut self, ctx: &mut ScriptContext<'_>, ts: TimeStep) {
        if self.dead {
            return;
        }
        if self.health <= 0.0 {
            self.die(ctx);
            return;
        }

        self.action_time += ts.seconds();
        if self.disabled {
            let floor = Self::floor_height(ctx);
            if Self::position(ctx).is_some_and(|p| p.y <= floor) {
                self.disabled = false;
            }
            return;
        }

        if self.action_time >= ACTION_DELAY {
            match self.actions.pop_front() {
                Some(action) => self.perform(ctx, action),
                None if !self.selected => self.generate_action(),
                None => {}
            }
            self.health -= ENERGY_PER_ACTION;
            self.action_time = 0.0;
        }

        self.process_input(ctx);
        self.process_goto(ctx, ts);
    }

    fn on_collision_enter(
        &mut self,
        ctx: &mut ScriptContext<'_>,
        _points: &CollisionPoints,
        other: Entity,
    ) -> bool {
        if let Some(other_sex) = ctx.script::<Unit>(other).map(Unit::sex) {
            return if self.is_friendly(other_sex) {
                self.breed(ctx)
            } else {
                self.battle(ctx, other)
            };
        }
        if ctx.script::<Food>(other).is_some() {
            return self.eat(ctx, other);
        }
        false
    }
}
