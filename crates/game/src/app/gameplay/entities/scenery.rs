use engine::{Actor, Body, Size2};

use super::super::entity::{Entity, EntityCore, GameContext, Physics};
use super::super::resources::Model;
use super::super::util::cycle;

const TREE_SIZE: f32 = 4.0;

fn decoration(size: Size2) -> EntityCore {
    EntityCore::new(Body {
        size,
        ..Body::default()
    })
}

pub(crate) struct Tree {
    core: EntityCore,
    time: i32,
}

impl Tree {
    pub(crate) fn new() -> Self {
        Self {
            core: decoration(Size2::square(TREE_SIZE)),
            time: 0,
        }
    }
}

impl Entity for Tree {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn kind(&self) -> &'static str {
        "tree"
    }

    fn tick(&mut self, _game: &mut GameContext<'_>, _physics: &dyn Physics) {
        self.time += 1;
    }

    fn add_actors(&self, actors: &mut Vec<Actor>) {
        let mut actor = Actor::new(Model::Tree.id(), self.core.body.pos, self.core.body.size);
        actor.ratio = cycle(self.time, 30);
        actors.push(actor);
    }
}

pub(crate) struct Owl {
    core: EntityCore,
}

impl Owl {
    pub(crate) fn new() -> Self {
        Self {
            core: decoration(Size2::square(1.0)),
        }
    }
}

impl Entity for Owl {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn kind(&self) -> &'static str {
        "owl"
    }

    fn add_actors(&self, actors: &mut Vec<Actor>) {
        actors.push(Actor::new(
            Model::Owl.id(),
            self.core.body.pos,
            self.core.body.size,
        ));
    }
}
