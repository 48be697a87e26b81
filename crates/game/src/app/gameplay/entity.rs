use std::fmt;
use std::ops::BitOr;

use engine::{Actor, Body, CollisionGroup, Control, Rect, SolidQuery, TileGrid, Trace, Vec2, View};

use super::events::{EventQueue, GameEvent};
use super::resources::Sound;
use super::variables::{VarId, Variable, VariableStore};

pub(crate) const GROUP_WALLS: CollisionGroup = CollisionGroup::from_bits(1);
pub(crate) const GROUP_PLAYER: CollisionGroup = CollisionGroup::from_bits(2);
/// Set on the player only while it is not blinking.
pub(crate) const GROUP_SOLID_PLAYER: CollisionGroup = CollisionGroup::from_bits(4);
pub(crate) const GROUP_BONUS: CollisionGroup = CollisionGroup::from_bits(8);
pub(crate) const GROUP_LADDER: CollisionGroup = CollisionGroup::from_bits(16);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct EntityId(pub(crate) i32);

impl EntityId {
    /// Entity-local variables share the entity's id. Negative ids name
    /// game-wide variables, so the player has no local slot.
    pub(crate) fn var(self) -> Option<VarId> {
        (self.0 >= 0).then_some(self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State every entity carries regardless of kind.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct EntityCore {
    pub(crate) id: EntityId,
    pub(crate) body: Body,
    /// Removed in the removal pass of the tick it was set in.
    pub(crate) dead: bool,
}

impl EntityCore {
    pub(crate) fn new(body: Body) -> Self {
        Self {
            id: EntityId::default(),
            body,
            dead: false,
        }
    }
}

/// Optional interfaces an entity declares, queried instead of inspecting
/// concrete types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Capabilities(u8);

impl Capabilities {
    pub(crate) const NONE: Capabilities = Capabilities(0);
    pub(crate) const DAMAGEABLE: Capabilities = Capabilities(1);
    pub(crate) const PLAYER: Capabilities = Capabilities(2);
    pub(crate) const CLIMBABLE: Capabilities = Capabilities(4);

    pub(crate) const fn contains(self, other: Capabilities) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }
}

impl BitOr for Capabilities {
    type Output = Capabilities;

    fn bitor(self, rhs: Capabilities) -> Capabilities {
        Capabilities(self.0 | rhs.0)
    }
}

pub(crate) trait Damageable {
    fn on_damage(&mut self, amount: i32, game: &mut GameContext<'_>);
}

pub(crate) trait Player {
    fn think(&mut self, control: Control);
    fn position(&self) -> Vec2;
    /// Moves the player and everything it is latched onto.
    fn translate(&mut self, delta: Vec2);
    fn health(&self) -> f32;
    fn artifact_count(&self) -> i32;
    fn add_artifact(&mut self, game: &mut GameContext<'_>);
    fn add_upgrade(&mut self, upgrade: i32, game: &mut GameContext<'_>);
}

pub(crate) trait Entity {
    fn core(&self) -> &EntityCore;
    fn core_mut(&mut self) -> &mut EntityCore;
    fn kind(&self) -> &'static str;

    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
    }

    /// Called once when the entity becomes active.
    fn enter(&mut self, _game: &mut GameContext<'_>) {}
    /// Called once in the removal pass, before the entity is dropped.
    fn leave(&mut self, _game: &mut GameContext<'_>) {}
    fn tick(&mut self, _game: &mut GameContext<'_>, _physics: &dyn Physics) {}
    fn add_actors(&self, actors: &mut Vec<Actor>);
    fn on_collision(&mut self, _other: &mut dyn Entity, _game: &mut GameContext<'_>) {}

    fn as_damageable(&mut self) -> Option<&mut dyn Damageable> {
        None
    }

    fn as_player(&mut self) -> Option<&mut dyn Player> {
        None
    }

    fn as_player_ref(&self) -> Option<&dyn Player> {
        None
    }

    fn body(&self) -> &Body {
        &self.core().body
    }

    fn is_dead(&self) -> bool {
        self.core().dead
    }
}

/// World state entities may touch while the entity list itself is borrowed.
#[derive(Default)]
pub(crate) struct SharedState {
    pub(crate) vars: VariableStore,
    pub(crate) events: EventQueue<GameEvent>,
    pub(crate) spawned: Vec<Box<dyn Entity>>,
    pub(crate) respawn_requested: bool,
}

/// The game as seen by entities.
pub(crate) struct GameContext<'a> {
    state: &'a mut SharedState,
    view: &'a mut dyn View,
}

impl<'a> GameContext<'a> {
    pub(crate) fn new(state: &'a mut SharedState, view: &'a mut dyn View) -> Self {
        Self { state, view }
    }

    pub(crate) fn play_sound(&mut self, sound: Sound) {
        self.view.play_sound(sound.id());
    }

    pub(crate) fn stop_music(&mut self) {
        self.view.stop_music();
    }

    pub(crate) fn text_box(&mut self, message: &str) {
        self.view.text_box(message);
    }

    pub(crate) fn set_ambient_light(&mut self, amount: f32) {
        self.view.set_ambient_light(amount);
    }

    /// Queues an entity; it becomes active at the end of the current tick.
    pub(crate) fn spawn(&mut self, entity: Box<dyn Entity>) {
        self.state.spawned.push(entity);
    }

    pub(crate) fn variable(&mut self, id: VarId) -> &mut Variable {
        self.state.vars.slot(id)
    }

    pub(crate) fn post_event(&mut self, event: GameEvent) {
        self.state.events.send(event);
    }

    /// Sends the player back to the last save once the current tick ends.
    pub(crate) fn respawn(&mut self) {
        self.state.respawn_requested = true;
    }
}

/// Collision queries available to a ticking entity.
pub(crate) trait Physics {
    /// True when `rect` hits the edifice or a solid body `mover` reacts to.
    fn is_solid(&self, mover: &Body, rect: Rect) -> bool;
    fn slide_move(&self, body: &mut Body, delta: Vec2) -> Trace;
}

/// Physics view for one entity: the room tiles plus every other active
/// entity, dead ones included.
pub(crate) struct PhysicsProbe<'a> {
    edifice: &'a TileGrid,
    before: &'a [Box<dyn Entity>],
    after: &'a [Box<dyn Entity>],
}

impl<'a> PhysicsProbe<'a> {
    pub(crate) fn new(
        edifice: &'a TileGrid,
        before: &'a [Box<dyn Entity>],
        after: &'a [Box<dyn Entity>],
    ) -> Self {
        Self {
            edifice,
            before,
            after,
        }
    }

    fn others(&self) -> impl Iterator<Item = &Body> + '_ {
        self.before
            .iter()
            .chain(self.after.iter())
            .map(|entity| entity.body())
    }
}

impl Physics for PhysicsProbe<'_> {
    fn is_solid(&self, mover: &Body, rect: Rect) -> bool {
        if self.edifice.is_box_solid(rect) {
            return true;
        }
        self.others()
            .any(|other| other.blocks(mover) && other.rect().overlaps(&rect))
    }

    fn slide_move(&self, body: &mut Body, delta: Vec2) -> Trace {
        let query = MoverQuery {
            probe: self,
            mover: *body,
        };
        engine::slide_move(&query, body, delta)
    }
}

struct MoverQuery<'p, 'a> {
    probe: &'p PhysicsProbe<'a>,
    mover: Body,
}

impl SolidQuery for MoverQuery<'_, '_> {
    fn is_solid(&self, rect: Rect) -> bool {
        self.probe.is_solid(&self.mover, rect)
    }
}

#[cfg(test)]
mod tests {
    use engine::Size2;

    use super::super::orchestrator::{LEVEL_ID_STRIDE, PLAYER_ID};
    use super::*;

    struct Block {
        core: EntityCore,
    }

    impl Entity for Block {
        fn core(&self) -> &EntityCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut EntityCore {
            &mut self.core
        }

        fn kind(&self) -> &'static str {
            "block"
        }

        fn add_actors(&self, _actors: &mut Vec<Actor>) {}
    }

    fn block_at(x: f32, y: f32) -> Box<dyn Entity> {
        Box::new(Block {
            core: EntityCore::new(Body {
                pos: Vec2::new(x, y),
                size: Size2::square(1.0),
                group: GROUP_WALLS,
                mask: CollisionGroup::NONE,
                solid: true,
            }),
        })
    }

    fn walker() -> Body {
        Body {
            pos: Vec2::new(1.0, 1.0),
            size: Size2::new(0.5, 1.0),
            group: GROUP_PLAYER,
            mask: GROUP_WALLS,
            solid: false,
        }
    }

    #[test]
    fn capabilities_contain_declared_flags_only() {
        let caps = Capabilities::DAMAGEABLE | Capabilities::PLAYER;
        assert!(caps.contains(Capabilities::PLAYER));
        assert!(caps.contains(Capabilities::DAMAGEABLE | Capabilities::PLAYER));
        assert!(!caps.contains(Capabilities::CLIMBABLE));
        assert!(!caps.contains(Capabilities::NONE));
    }

    #[test]
    fn only_room_entities_own_a_local_variable() {
        assert_eq!(PLAYER_ID.var(), None);
        assert_eq!(EntityId(0).var(), Some(0));
        let id = EntityId(2 * LEVEL_ID_STRIDE + 5);
        assert_eq!(id.var(), Some(2005));
    }

    #[test]
    fn solid_entity_blocks_reacting_mover() {
        let tiles = TileGrid::empty(8, 8);
        let others = vec![block_at(3.0, 1.0)];
        let probe = PhysicsProbe::new(&tiles, &others, &[]);

        let mut body = walker();
        let trace = probe.slide_move(&mut body, Vec2::new(2.0, 0.0));
        assert!(trace.blocked_x);
        assert!(body.rect().right() <= 3.0);
        assert!(body.rect().right() > 2.9);
    }

    #[test]
    fn mover_ignoring_walls_passes_through_blocks() {
        let tiles = TileGrid::empty(8, 8);
        let others = vec![block_at(3.0, 1.0)];
        let probe = PhysicsProbe::new(&tiles, &[], &others);

        let mut body = walker();
        body.mask = CollisionGroup::NONE;
        let trace = probe.slide_move(&mut body, Vec2::new(2.0, 0.0));
        assert!(!trace.blocked_x);
        assert_eq!(body.pos, Vec2::new(3.0, 1.0));
    }

    #[test]
    fn edifice_tiles_are_solid_for_everyone() {
        let mut tiles = TileGrid::empty(8, 8);
        tiles.set_tile(1, 0, 1);
        let probe = PhysicsProbe::new(&tiles, &[], &[]);

        let mut body = walker();
        body.mask = CollisionGroup::NONE;
        let trace = probe.slide_move(&mut body, Vec2::new(0.0, -0.5));
        assert!(trace.blocked_y);
        assert!((body.pos.y - 1.0).abs() < 0.01);
    }
}
