use engine::{Actor, Body, Control, EdgeTrigger, Rect, Size2, Vec2};

use super::entity::{
    Capabilities, Damageable, Entity, EntityCore, GameContext, Physics, Player, GROUP_LADDER,
    GROUP_PLAYER, GROUP_SOLID_PLAYER, GROUP_WALLS,
};
use super::resources::{Model, Sound};
use super::util::{blend, cycle, decrement};
use super::variables::{VAR_ARTIFACTS, VAR_UPGRADES};

pub(crate) const UPGRADE_DOUBLE_JUMP: i32 = 1;
pub(crate) const UPGRADE_CLIMB: i32 = 2;
pub(crate) const UPGRADE_DASH: i32 = 4;
pub(crate) const UPGRADE_BALL: i32 = 8;
pub(crate) const UPGRADE_SLIDE: i32 = 16;

pub(crate) const WALK_SPEED: f32 = 0.075;
pub(crate) const MAX_HORZ_SPEED: f32 = 0.2;
pub(crate) const MAX_FALL_SPEED: f32 = 0.2;
pub(crate) const JUMP_VEL: f32 = 0.15;
pub(crate) const GRAVITY: f32 = 0.005;
pub(crate) const MAX_LIFE: i32 = 31;
pub(crate) const NORMAL_SIZE: Size2 = Size2::new(0.7, 1.9);

const BALL_HEIGHT: f32 = 0.9;
const CLIMB_DELAY: i32 = 10;
const HURT_DELAY: i32 = 50;
const DIE_DELAY: i32 = 150;
const DIE_FADE: i32 = 100;
const DASH_DELAY: i32 = 40;
const DASH_BOOST: f32 = 4.0;
const WALL_JUMP_PUSH: f32 = 0.04;
const LADDER_DELAY: i32 = 10;
const LADDER_OFFSET: f32 = 0.1;
const LADDER_SPEED: f32 = WALK_SPEED * 0.75;
const LANDING_DEBOUNCE: i32 = 15;
const FOOTSTEP_PERIOD: i32 = 30;
const HURT_BLINK: i32 = 200;
const UPGRADE_BLINK: i32 = 200;
const ARTIFACT_BLINK: i32 = 50;
const RESPAWN_BLINK: i32 = 20;
const SMOOTHING_STEPS: usize = 10;
const SMOOTHING_KEEP: f32 = 0.95;
const SLIDE_DAMPING_STEPS: usize = 8;
const SLIDE_DAMPING: f32 = 0.97;
const STOP_THRESHOLD: f32 = 0.001;
const GROUND_PROBE: f32 = 0.1;
const WALL_PROBE_REACH: f32 = 0.7;
const SPRITE_SIZE: f32 = 3.0;

/// Animation and physics mode, picked fresh every tick in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LocomotionMode {
    Ball,
    Sliding,
    Hurt,
    Ladder,
    WallClimb,
    Falling,
    Dashing,
    Walking,
    Standing,
}

impl LocomotionMode {
    fn action(self) -> i32 {
        match self {
            LocomotionMode::Standing => 0,
            LocomotionMode::Walking => 1,
            LocomotionMode::Dashing => 2,
            LocomotionMode::Falling => 3,
            LocomotionMode::WallClimb => 4,
            LocomotionMode::Ladder => 5,
            LocomotionMode::Hurt => 6,
            LocomotionMode::Sliding => 7,
            LocomotionMode::Ball => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Facing {
    Left,
    Right,
}

pub(crate) struct Hero {
    core: EntityCore,
    control: Control,
    vel: Vec2,
    facing: Facing,
    ground: bool,
    jump_button: EdgeTrigger,
    dash_button: EdgeTrigger,
    restart_button: EdgeTrigger,
    time: i32,
    climb_delay: i32,
    hurt_delay: i32,
    dash_delay: i32,
    die_delay: i32,
    ladder_delay: i32,
    footstep_delay: i32,
    debounce_landing: i32,
    blinking: i32,
    ladder_x: f32,
    life: i32,
    double_jumped: bool,
    ball: bool,
    sliding: bool,
    ladder: bool,
    upgrades: i32,
    artifact_count: i32,
}

impl Hero {
    pub(crate) fn new() -> Self {
        Self {
            core: EntityCore::new(Body {
                pos: Vec2::ZERO,
                size: NORMAL_SIZE,
                group: GROUP_PLAYER | GROUP_SOLID_PLAYER,
                mask: GROUP_WALLS | GROUP_LADDER,
                solid: false,
            }),
            control: Control::default(),
            vel: Vec2::ZERO,
            facing: Facing::Right,
            ground: false,
            jump_button: EdgeTrigger::default(),
            dash_button: EdgeTrigger::default(),
            restart_button: EdgeTrigger::default(),
            time: 0,
            climb_delay: 0,
            hurt_delay: 0,
            dash_delay: 0,
            die_delay: 0,
            ladder_delay: 0,
            footstep_delay: 0,
            debounce_landing: 0,
            blinking: 0,
            ladder_x: 0.0,
            life: MAX_LIFE,
            double_jumped: false,
            ball: false,
            sliding: false,
            ladder: false,
            upgrades: 0,
            artifact_count: 0,
        }
    }

    pub(crate) fn mode(&self) -> LocomotionMode {
        if self.ball {
            LocomotionMode::Ball
        } else if self.sliding {
            LocomotionMode::Sliding
        } else if self.hurt_delay > 0 || self.life < 0 {
            LocomotionMode::Hurt
        } else if self.ladder {
            LocomotionMode::Ladder
        } else if !self.ground {
            if self.climb_delay > 0 {
                LocomotionMode::WallClimb
            } else {
                LocomotionMode::Falling
            }
        } else if self.vel.x != 0.0 {
            if self.dash_delay > 0 {
                LocomotionMode::Dashing
            } else {
                LocomotionMode::Walking
            }
        } else {
            LocomotionMode::Standing
        }
    }

    #[cfg(test)]
    pub(crate) fn velocity(&self) -> Vec2 {
        self.vel
    }

    #[cfg(test)]
    pub(crate) fn life(&self) -> i32 {
        self.life
    }

    #[cfg(test)]
    pub(crate) fn is_on_ground(&self) -> bool {
        self.ground
    }

    #[cfg(test)]
    pub(crate) fn is_blinking(&self) -> bool {
        self.blinking > 0
    }

    fn has_upgrade(&self, upgrade: i32) -> bool {
        self.upgrades & upgrade != 0
    }

    fn facing_wall(&self, physics: &dyn Physics) -> bool {
        let body = &self.core.body;
        let front = match self.facing {
            Facing::Right => WALL_PROBE_REACH,
            Facing::Left => -WALL_PROBE_REACH,
        };
        let probe = Rect::new(
            Vec2::new(
                body.pos.x + body.size.width / 2.0 + front,
                body.pos.y + 0.3,
            ),
            Size2::new(0.01, 0.9),
        );
        physics.is_solid(body, probe)
    }

    fn air_move(&mut self, c: &Control, game: &mut GameContext<'_>) {
        let mut wanted_speed = 0.0;

        if self.ladder_delay > 0 && (c.up || c.down) {
            self.ladder = true;
        }

        if self.ladder {
            self.core.body.pos.x = self.ladder_x + LADDER_OFFSET;

            if c.jump || c.left || c.right {
                self.ladder = false;
            } else if c.up {
                self.vel.y = LADDER_SPEED;
            } else if c.down {
                self.vel.y = -LADDER_SPEED;
            } else {
                self.vel.y = 0.0;
            }
        }

        if self.climb_delay == 0 && !self.ladder {
            if c.left {
                wanted_speed -= WALK_SPEED;
            }
            if c.right {
                wanted_speed += WALK_SPEED;
            }
        }

        if self.has_upgrade(UPGRADE_DASH)
            && self.dash_button.pressed(c.dash)
            && self.ground
            && self.dash_delay == 0
        {
            game.play_sound(Sound::Jump);
            self.dash_delay = DASH_DELAY;
        }

        if self.dash_delay > 0 {
            wanted_speed *= DASH_BOOST;
            self.vel.x = wanted_speed;
        }

        for _ in 0..SMOOTHING_STEPS {
            self.vel.x = blend(self.vel.x, wanted_speed, SMOOTHING_KEEP);
        }

        if self.vel.x.abs() < STOP_THRESHOLD {
            self.vel.x = 0.0;
        }
    }

    fn compute_velocity(&mut self, c: &Control, game: &mut GameContext<'_>, physics: &dyn Physics) {
        self.air_move(c, game);

        if self.ground {
            self.double_jumped = false;
        }

        if self.vel.x > 0.0 {
            self.facing = Facing::Right;
        }
        if self.vel.x < 0.0 {
            self.facing = Facing::Left;
        }

        if self.life > 0 && !self.ladder {
            self.vel.y -= GRAVITY;
        }

        self.sliding = false;

        if self.has_upgrade(UPGRADE_SLIDE)
            && !self.ball
            && !self.ground
            && self.vel.y < 0.0
            && (c.left || c.right)
            && self.facing_wall(physics)
        {
            // sliding only re-arms the double jump with the climb upgrade
            self.double_jumped = !self.has_upgrade(UPGRADE_CLIMB);
            for _ in 0..SLIDE_DAMPING_STEPS {
                self.vel.y *= SLIDE_DAMPING;
            }
            self.sliding = true;
            self.dash_delay = 0;
        }

        if self.jump_button.pressed(c.jump) {
            if self.ground {
                game.play_sound(Sound::Jump);
                self.vel.y = JUMP_VEL;
                self.double_jumped = false;
            } else if self.has_upgrade(UPGRADE_CLIMB) && self.facing_wall(physics) {
                game.play_sound(Sound::Jump);
                self.vel.x = match self.facing {
                    Facing::Right => -WALL_JUMP_PUSH,
                    Facing::Left => WALL_JUMP_PUSH,
                };
                self.dash_delay = if c.dash { DASH_DELAY } else { 0 };
                self.vel.y = JUMP_VEL;
                self.climb_delay = CLIMB_DELAY;
                self.double_jumped = false;
            } else if self.has_upgrade(UPGRADE_DOUBLE_JUMP) && !self.double_jumped {
                game.play_sound(Sound::Jump);
                self.vel.y = JUMP_VEL;
                self.double_jumped = true;
            }
        }

        // releasing jump early cuts the ascent
        if !self.ladder && self.vel.y > 0.0 && !c.jump {
            self.vel.y = 0.0;
        }

        self.vel.x = self.vel.x.clamp(-MAX_HORZ_SPEED, MAX_HORZ_SPEED);
        self.vel.y = self.vel.y.max(-MAX_FALL_SPEED);
    }

    fn handle_ball(&mut self, physics: &dyn Physics) {
        if !self.ladder && self.control.down && !self.ball && self.has_upgrade(UPGRADE_BALL) {
            self.ball = true;
            self.core.body.size = Size2::new(NORMAL_SIZE.width, BALL_HEIGHT);
        }

        if self.control.up && self.ball {
            let body = &self.core.body;
            let standing = Rect::new(body.pos, NORMAL_SIZE);
            if !physics.is_solid(body, standing) {
                self.ball = false;
                self.core.body.size = NORMAL_SIZE;
            }
        }
    }

    fn die(&mut self, game: &mut GameContext<'_>) {
        game.play_sound(Sound::Die);
        self.ball = false;
        self.core.body.size = NORMAL_SIZE;
        self.die_delay = DIE_DELAY;
    }

    fn respawn(&mut self, game: &mut GameContext<'_>) {
        game.respawn();
        self.blinking = RESPAWN_BLINK;
        self.vel = Vec2::ZERO;
        self.life = MAX_LIFE;
    }
}

impl Entity for Hero {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn kind(&self) -> &'static str {
        "Hero"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PLAYER | Capabilities::DAMAGEABLE
    }

    fn enter(&mut self, game: &mut GameContext<'_>) {
        game.set_ambient_light(0.0);
        self.upgrades = game.variable(VAR_UPGRADES).get();
        self.artifact_count = game.variable(VAR_ARTIFACTS).get();
    }

    fn tick(&mut self, game: &mut GameContext<'_>, physics: &dyn Physics) {
        decrement(&mut self.blinking);
        decrement(&mut self.hurt_delay);

        if self.ground {
            decrement(&mut self.dash_delay);
        }

        if self.hurt_delay > 0 || self.life <= 0 {
            self.control = Control::default();
        }

        if self.restart_button.pressed(self.control.restart) {
            self.life = 0;
        }

        if self.life <= 0 {
            decrement(&mut self.die_delay);

            if self.die_delay < DIE_FADE {
                game.set_ambient_light((self.die_delay - DIE_FADE) as f32 / DIE_FADE as f32);
            }

            if self.die_delay == 0 {
                self.respawn(game);
            }
        }

        self.time += 1;
        let control = self.control;
        self.compute_velocity(&control, game, physics);

        let falling = self.vel.y < 0.0;
        let trace = physics.slide_move(&mut self.core.body, self.vel);

        // only a vertical block stops the body; horizontal speed is kept
        if trace.blocked_y {
            self.vel.y = 0.0;
        }

        let was_on_ground = self.ground;
        let body = &self.core.body;
        let probe = Rect::new(
            Vec2::new(body.pos.x, body.pos.y - GROUND_PROBE),
            Size2::new(body.size.width, GROUND_PROBE),
        );
        self.ground = physics.is_solid(body, probe);

        if self.ground && !was_on_ground && falling {
            if self.debounce_landing == 0 {
                self.debounce_landing = LANDING_DEBOUNCE;
                game.play_sound(Sound::Land);
            }
            self.dash_delay = 0;
        }

        decrement(&mut self.footstep_delay);

        if self.ground && (control.left || control.right) && self.footstep_delay == 0 {
            self.footstep_delay = FOOTSTEP_PERIOD;
            game.play_sound(Sound::Footstep1);
        }

        decrement(&mut self.debounce_landing);
        decrement(&mut self.climb_delay);
        decrement(&mut self.ladder_delay);

        self.handle_ball(physics);

        let full = GROUP_PLAYER | GROUP_SOLID_PLAYER;
        self.core.body.group = if self.blinking > 0 {
            full.without(GROUP_SOLID_PLAYER)
        } else {
            full
        };
    }

    fn add_actors(&self, actors: &mut Vec<Actor>) {
        let body = &self.core.body;
        let mut actor = Actor::new(Model::Hero.id(), body.pos, Size2::square(SPRITE_SIZE));
        actor.pos += Vec2::new(-(SPRITE_SIZE - body.size.width) * 0.5, -0.1);

        let mode = self.mode();
        actor.action = mode.action();
        actor.ratio = match mode {
            LocomotionMode::Ball | LocomotionMode::Sliding => cycle(self.time, 30),
            LocomotionMode::Hurt => 1.0 - self.hurt_delay as f32 / HURT_DELAY as f32,
            LocomotionMode::Ladder => {
                if self.vel.y == 0.0 {
                    0.3
                } else {
                    cycle(self.time, 40)
                }
            }
            LocomotionMode::WallClimb => 1.0 - self.climb_delay as f32 / CLIMB_DELAY as f32,
            LocomotionMode::Falling => {
                if self.vel.y > 0.0 {
                    0.0
                } else {
                    1.0
                }
            }
            LocomotionMode::Dashing => ((DASH_DELAY - self.dash_delay) as f32 / 10.0).min(1.0),
            LocomotionMode::Walking => cycle(self.time, 50),
            LocomotionMode::Standing => cycle(self.time, 300),
        };

        match mode {
            LocomotionMode::Ladder => actor.pos += Vec2::new(0.05, -0.5),
            LocomotionMode::Falling => actor.pos.y -= 0.3,
            _ => {}
        }

        // the climb sprite faces away from the wall
        let mirrored = mode == LocomotionMode::WallClimb;
        actor.flip_x = mirrored != (self.facing == Facing::Left);
        actor.blinking = self.blinking > 0;
        actor.z_order = 1;
        actors.push(actor);
    }

    fn on_collision(&mut self, other: &mut dyn Entity, _game: &mut GameContext<'_>) {
        if other.capabilities().contains(Capabilities::CLIMBABLE) {
            self.ladder_delay = LADDER_DELAY;
            self.ladder_x = other.body().pos.x;
        }
    }

    fn as_damageable(&mut self) -> Option<&mut dyn Damageable> {
        Some(self)
    }

    fn as_player(&mut self) -> Option<&mut dyn Player> {
        Some(self)
    }

    fn as_player_ref(&self) -> Option<&dyn Player> {
        Some(self)
    }
}

impl Damageable for Hero {
    fn on_damage(&mut self, amount: i32, game: &mut GameContext<'_>) {
        if self.life <= 0 || self.blinking > 0 {
            return;
        }

        self.life -= amount;

        if self.life < 0 {
            self.die(game);
            return;
        }

        self.hurt_delay = HURT_DELAY;
        self.blinking = HURT_BLINK;
        game.play_sound(Sound::Hurt);
    }
}

impl Player for Hero {
    fn think(&mut self, control: Control) {
        self.control = control;
    }

    fn position(&self) -> Vec2 {
        self.core.body.pos
    }

    fn translate(&mut self, delta: Vec2) {
        self.core.body.pos += delta;
        self.ladder_x += delta.x;
    }

    fn health(&self) -> f32 {
        (self.life as f32 / MAX_LIFE as f32).clamp(0.0, 1.0)
    }

    fn artifact_count(&self) -> i32 {
        self.artifact_count
    }

    fn add_artifact(&mut self, game: &mut GameContext<'_>) {
        self.artifact_count += 1;
        game.variable(VAR_ARTIFACTS).set(self.artifact_count);
        game.text_box(&format!("artifacts: {}", self.artifact_count));
        self.blinking = ARTIFACT_BLINK;
    }

    fn add_upgrade(&mut self, upgrade: i32, game: &mut GameContext<'_>) {
        self.upgrades |= upgrade;
        self.blinking = UPGRADE_BLINK;
        self.life = MAX_LIFE;
        game.variable(VAR_UPGRADES).set(self.upgrades);
    }
}

#[cfg(test)]
pub(crate) fn upgraded(upgrades: i32) -> Hero {
    let mut hero = Hero::new();
    hero.upgrades = upgrades;
    hero
}
