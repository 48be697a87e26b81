use std::collections::BTreeMap;
use std::mem;
use std::rc::Rc;

use engine::{find_contacts, Actor, Body, Control, Size2, Vec2, View};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::entities::HERO_KIND;
use super::entity::{Entity, EntityId, GameContext, PhysicsProbe, SharedState};
use super::error::GameError;
use super::events::GameEvent;
use super::factory::{EntityConfig, EntityRegistry};
use super::quest::{Quest, Room};
use super::resources::{background_resource, Model};
use super::variables::VarId;

/// Spawned static entities get `level * LEVEL_ID_STRIDE + index`.
pub(crate) const LEVEL_ID_STRIDE: i32 = 1000;
pub(crate) const PLAYER_ID: EntityId = EntityId(-1);
const CAMERA_MARGIN: f32 = 8.0;
const CAMERA_LIFT: f32 = 1.5;
const RESPAWN_LIFT: f32 = 0.01;
const BACKGROUND_SIZE: f32 = 16.0;

/// Progress captured by the last `SaveRequested`.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct SaveSnapshot {
    pub(crate) level: usize,
    pub(crate) position: Vec2,
    pub(crate) vars: BTreeMap<VarId, i32>,
}

/// The running game: active entities, pending spawns, events, variables and
/// the save snapshot for one quest.
pub(crate) struct GameWorld {
    quest: Rc<Quest>,
    registry: Rc<EntityRegistry>,
    shared: SharedState,
    entities: Vec<Box<dyn Entity>>,
    has_player: bool,
    level: usize,
    theme: i32,
    transform: Vec2,
    should_load_level: bool,
    should_load_vars: bool,
    saved: SaveSnapshot,
    finished: bool,
    debug: bool,
    ticks: u64,
}

impl GameWorld {
    pub(crate) fn new(quest: Rc<Quest>, registry: Rc<EntityRegistry>, start_level: usize) -> Self {
        Self {
            quest,
            registry,
            shared: SharedState::default(),
            entities: Vec::new(),
            has_player: false,
            level: start_level,
            theme: 0,
            transform: Vec2::ZERO,
            should_load_level: true,
            should_load_vars: true,
            saved: SaveSnapshot::default(),
            finished: false,
            debug: false,
            ticks: 0,
        }
    }

    pub(crate) fn level(&self) -> usize {
        self.level
    }

    pub(crate) fn room_count(&self) -> usize {
        self.quest.rooms.len()
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished
    }

    #[cfg(test)]
    pub(crate) fn saved(&self) -> &SaveSnapshot {
        &self.saved
    }

    #[cfg(test)]
    pub(crate) fn vars(&self) -> &super::variables::VariableStore {
        &self.shared.vars
    }

    #[cfg(test)]
    pub(crate) fn entities(&self) -> &[Box<dyn Entity>] {
        &self.entities
    }

    #[cfg(test)]
    pub(crate) fn pending_spawns(&self) -> usize {
        self.shared.spawned.len()
    }

    /// Queues an entity from outside the entity pass; it becomes active at
    /// the end of the next tick.
    #[cfg(test)]
    pub(crate) fn spawn(&mut self, entity: Box<dyn Entity>) {
        self.shared.spawned.push(entity);
    }

    /// Artifacts the player carries, or zero before the first level load.
    pub(crate) fn artifact_count(&self) -> i32 {
        self.player()
            .and_then(|entity| entity.as_player_ref())
            .map_or(0, |player| player.artifact_count())
    }

    pub(crate) fn player_position(&self) -> Option<Vec2> {
        self.player().map(|player| player.body().pos)
    }

    /// One simulation step.
    pub(crate) fn tick(&mut self, control: &Control, view: &mut dyn View) -> Result<(), GameError> {
        self.debug = control.debug;

        if self.should_load_level {
            self.load_level(view)?;
        }

        if let Some(player) = self.player_mut().and_then(|entity| entity.as_player()) {
            player.think(*control);
        }

        self.update_entities(view);

        if mem::take(&mut self.shared.respawn_requested) {
            self.respawn();
        }

        self.process_events();
        self.update_camera(view);
        self.ticks += 1;

        if self.ticks % 1000 == 0 {
            debug!(tick = self.ticks, digest = %self.state_digest(), "world_digest");
        }
        Ok(())
    }

    pub(crate) fn draw(&self, view: &mut dyn View) {
        let Some(room) = self.quest.rooms.get(self.level) else {
            return;
        };
        if !self.has_player {
            return;
        }

        let tileset = Model::Tiles(self.theme).id();
        for (x, y, tile) in room.tiles.occupied() {
            let mut actor = Actor::new(tileset, Vec2::new(x as f32, y as f32), Size2::square(1.0));
            actor.action = tile;
            actor.z_order = -1;
            view.send_actor(actor);
        }

        let mut actors = Vec::new();
        for entity in &self.entities {
            actors.clear();
            entity.add_actors(&mut actors);
            for actor in &actors {
                view.send_actor(*actor);
            }
            if self.debug {
                view.send_actor(debug_actor(entity.body()));
            }
        }

        if let Some(player) = self.player().and_then(|entity| entity.as_player_ref()) {
            let mut lifebar = Actor::new(
                Model::Lifebar.id(),
                Vec2::new(-7.5, 6.5),
                Size2::new(0.5, 1.0),
            );
            lifebar.ratio = player.health();
            lifebar.screen_space = true;
            lifebar.z_order = 10;
            view.send_actor(lifebar);
        }

        let half = BACKGROUND_SIZE / 2.0;
        let mut background = Actor::new(
            Model::Background.id(),
            Vec2::new(-half, -half),
            Size2::square(BACKGROUND_SIZE),
        );
        background.screen_space = true;
        background.z_order = -2;
        view.send_actor(background);
    }

    /// SHA-256 over entity ids, positions and the variable map, as lowercase
    /// hex. Equal digests mean equal simulation state.
    pub(crate) fn state_digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update((self.level as u64).to_le_bytes());
        for entity in &self.entities {
            let core = entity.core();
            hasher.update(core.id.0.to_le_bytes());
            hasher.update(core.body.pos.x.to_bits().to_le_bytes());
            hasher.update(core.body.pos.y.to_bits().to_le_bytes());
            hasher.update([u8::from(core.dead)]);
        }
        for (id, value) in self.shared.vars.iter() {
            hasher.update(id.to_le_bytes());
            hasher.update(value.to_le_bytes());
        }
        hasher
            .finalize()
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect()
    }

    fn player(&self) -> Option<&dyn Entity> {
        self.entities
            .iter()
            .chain(self.shared.spawned.iter())
            .find(|entity| entity.core().id == PLAYER_ID)
            .map(|entity| entity.as_ref())
    }

    fn player_mut(&mut self) -> Option<&mut Box<dyn Entity>> {
        self.entities
            .iter_mut()
            .chain(self.shared.spawned.iter_mut())
            .find(|entity| entity.core().id == PLAYER_ID)
    }

    /// Tick every entity, dispatch contacts, drop the dead, then activate
    /// the spawned.
    fn update_entities(&mut self, view: &mut dyn View) {
        let Some(room) = self.quest.rooms.get(self.level) else {
            return;
        };

        for index in 0..self.entities.len() {
            let (before, rest) = self.entities.split_at_mut(index);
            let Some((entity, after)) = rest.split_first_mut() else {
                break;
            };
            let probe = PhysicsProbe::new(&room.tiles, before, after);
            let mut game = GameContext::new(&mut self.shared, view);
            entity.tick(&mut game, &probe);
        }

        let bodies: Vec<Body> = self.entities.iter().map(|entity| *entity.body()).collect();
        for contact in find_contacts(&bodies) {
            let (left, right) = self.entities.split_at_mut(contact.b);
            let first = &mut left[contact.a];
            let second = &mut right[0];
            let mut game = GameContext::new(&mut self.shared, view);
            if contact.notify_a {
                first.on_collision(second.as_mut(), &mut game);
            }
            if contact.notify_b {
                second.on_collision(first.as_mut(), &mut game);
            }
        }

        self.remove_dead(view);
        self.flush_spawned(view);
    }

    fn remove_dead(&mut self, view: &mut dyn View) {
        let mut game = GameContext::new(&mut self.shared, view);
        for entity in self.entities.iter_mut().filter(|entity| entity.is_dead()) {
            entity.leave(&mut game);
        }
        self.entities.retain(|entity| !entity.is_dead());
    }

    fn flush_spawned(&mut self, view: &mut dyn View) {
        let spawned = mem::take(&mut self.shared.spawned);
        for mut entity in spawned {
            let mut game = GameContext::new(&mut self.shared, view);
            entity.enter(&mut game);
            self.entities.push(entity);
        }
    }

    fn process_events(&mut self) {
        for event in self.shared.events.take_batch() {
            match event {
                GameEvent::LevelBoundaryTouched {
                    transform,
                    target_level,
                } => {
                    info!(
                        from = self.level,
                        to = target_level,
                        dx = transform.x,
                        dy = transform.y,
                        "level_boundary_touched"
                    );
                    self.should_load_level = true;
                    self.transform = transform;
                    self.level = target_level;
                }
                GameEvent::SaveRequested => self.save(),
                GameEvent::GameFinished => {
                    info!(level = self.level, "game_finished");
                    self.finished = true;
                }
            }
        }
    }

    fn save(&mut self) {
        let position = self.player_position().unwrap_or(Vec2::ZERO);
        self.saved = SaveSnapshot {
            level: self.level,
            position,
            vars: self.shared.vars.snapshot(),
        };
        info!(
            level = self.level,
            x = position.x,
            y = position.y,
            var_count = self.saved.vars.len(),
            "game_saved"
        );
    }

    fn respawn(&mut self) {
        let position = self.player_position().unwrap_or(Vec2::ZERO);
        self.level = self.saved.level;
        self.transform = self.saved.position - position + Vec2::new(0.0, RESPAWN_LIFT);
        self.should_load_level = true;
        self.should_load_vars = true;
        info!(level = self.level, "player_respawning");
    }

    fn update_camera(&self, view: &mut dyn View) {
        let (Some(room), Some(pos)) = (self.quest.rooms.get(self.level), self.player_position())
        else {
            return;
        };
        let camera = Vec2::new(
            clamp_inside(pos.x, room.tiles.width() as f32),
            clamp_inside(pos.y + CAMERA_LIFT, room.tiles.height() as f32),
        );
        view.set_camera_pos(camera);
    }

    /// Tears down the arena and rebuilds it from the target room. The player
    /// instance survives reloads.
    fn load_level(&mut self, view: &mut dyn View) -> Result<(), GameError> {
        let quest = Rc::clone(&self.quest);
        let room = quest
            .rooms
            .get(self.level)
            .ok_or(GameError::NoSuchLevel {
                level: self.level,
                room_count: quest.rooms.len(),
            })?;

        let mut player = self.take_player();
        self.entities.clear();
        self.shared.spawned.clear();

        if self.should_load_vars {
            self.shared.vars.restore(&self.saved.vars);
            self.should_load_vars = false;
        }

        self.spawn_room(room, view)?;
        self.theme = room.theme;
        view.play_music(room.theme);
        view.preload(background_resource(room.theme));

        if player.is_none() {
            let mut hero =
                self.registry
                    .create(HERO_KIND, &EntityConfig::default(), PLAYER_ID, room.start)?;
            if hero.as_player().is_none() {
                return Err(GameError::NotAPlayer { kind: hero.kind() });
            }
            player = Some(hero);
            self.shared.events.send(GameEvent::SaveRequested);
        }

        if let Some(mut entity) = player {
            if let Some(hero) = entity.as_player() {
                hero.translate(self.transform);
            }
            self.shared.spawned.push(entity);
            self.has_player = true;
        }

        self.transform = Vec2::ZERO;
        self.should_load_level = false;
        view.set_ambient_light(0.0);

        info!(
            level = self.level,
            theme = room.theme,
            entity_count = self.shared.spawned.len(),
            "level_loaded"
        );
        Ok(())
    }

    fn take_player(&mut self) -> Option<Box<dyn Entity>> {
        let position = self
            .entities
            .iter()
            .position(|entity| entity.core().id == PLAYER_ID);
        if let Some(index) = position {
            return Some(self.entities.swap_remove(index));
        }
        let position = self
            .shared
            .spawned
            .iter()
            .position(|entity| entity.core().id == PLAYER_ID)?;
        Some(self.shared.spawned.swap_remove(position))
    }

    /// Room entities queue like any other spawn and enter in the flush.
    fn spawn_room(&mut self, room: &Room, view: &mut dyn View) -> Result<(), GameError> {
        let base = self.level as i32 * LEVEL_ID_STRIDE;
        let mut game = GameContext::new(&mut self.shared, view);
        for (index, spawner) in room.spawners.iter().enumerate() {
            let id = EntityId(base + index as i32);
            let entity = self
                .registry
                .create(&spawner.name, &spawner.config, id, spawner.pos)?;
            game.spawn(entity);
        }
        Ok(())
    }
}

/// Keeps the camera `CAMERA_MARGIN` inside a room of `extent` units; rooms
/// narrower than the view are centred.
fn clamp_inside(value: f32, extent: f32) -> f32 {
    let low = CAMERA_MARGIN;
    let high = extent - CAMERA_MARGIN;
    if high < low {
        extent / 2.0
    } else {
        value.clamp(low, high)
    }
}

fn debug_actor(body: &Body) -> Actor {
    let mut actor = Actor::new(Model::Rect.id(), body.pos, body.size);
    actor.z_order = 10;
    actor
}
