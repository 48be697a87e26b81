mod tiles;

use std::ops::{BitOr, BitOrAssign};

use crate::geom::{Rect, Size2, Vec2};

pub use tiles::{TileGrid, TileGridError, EMPTY_TILE, SOLID_TILE_LIMIT};

/// Bodies closer than this count as touching for the contact pass.
pub const CONTACT_MARGIN: f32 = 0.01;
const SLIDE_BISECT_STEPS: u32 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CollisionGroup(u32);

impl CollisionGroup {
    pub const NONE: CollisionGroup = CollisionGroup(0);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn intersects(self, other: CollisionGroup) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn without(self, other: CollisionGroup) -> Self {
        Self(self.0 & !other.0)
    }
}

impl BitOr for CollisionGroup {
    type Output = CollisionGroup;

    fn bitor(self, rhs: CollisionGroup) -> CollisionGroup {
        CollisionGroup(self.0 | rhs.0)
    }
}

impl BitOrAssign for CollisionGroup {
    fn bitor_assign(&mut self, rhs: CollisionGroup) {
        self.0 |= rhs.0;
    }
}

/// Physical footprint of an entity.
///
/// `group` is what the body is, `mask` is what it reacts to. A `solid` body
/// blocks movers whose mask intersects its group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub size: Size2,
    pub group: CollisionGroup,
    pub mask: CollisionGroup,
    pub solid: bool,
}

impl Body {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn reacts_to(&self, other: &Body) -> bool {
        self.mask.intersects(other.group)
    }

    pub fn blocks(&self, mover: &Body) -> bool {
        self.solid && mover.reacts_to(self)
    }
}

pub trait SolidQuery {
    fn is_solid(&self, rect: Rect) -> bool;
}

/// Per-axis result of a slide move. `blocked_x`/`blocked_y` are set when the
/// requested displacement on that axis could not be completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Trace {
    pub blocked_x: bool,
    pub blocked_y: bool,
}

/// Moves `body` by `delta`, horizontal axis first, stopping each axis at the
/// last free position found by bisection.
pub fn slide_move(query: &dyn SolidQuery, body: &mut Body, delta: Vec2) -> Trace {
    let blocked_x = !move_along(query, body, Vec2::new(delta.x, 0.0));
    let blocked_y = !move_along(query, body, Vec2::new(0.0, delta.y));
    Trace {
        blocked_x,
        blocked_y,
    }
}

fn move_along(query: &dyn SolidQuery, body: &mut Body, delta: Vec2) -> bool {
    if delta == Vec2::ZERO {
        return true;
    }
    let start = body.rect();
    if !query.is_solid(start.translated(delta)) {
        body.pos += delta;
        return true;
    }

    let mut free = 0.0f32;
    let mut blocked = 1.0f32;
    for _ in 0..SLIDE_BISECT_STEPS {
        let mid = (free + blocked) * 0.5;
        if query.is_solid(start.translated(delta * mid)) {
            blocked = mid;
        } else {
            free = mid;
        }
    }
    body.pos += delta * free;
    false
}

/// A touching pair found by [`find_contacts`]; `a < b` always.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: usize,
    pub b: usize,
    pub notify_a: bool,
    pub notify_b: bool,
}

/// Touching pairs in list order. A side is notified only when its own mask
/// intersects the other side's group; pairs nobody reacts to are skipped.
pub fn find_contacts(bodies: &[Body]) -> Vec<Contact> {
    let mut contacts = Vec::new();
    for (a, first) in bodies.iter().enumerate() {
        let reach = first.rect().inflated(CONTACT_MARGIN);
        for (offset, second) in bodies[a + 1..].iter().enumerate() {
            let notify_a = first.reacts_to(second);
            let notify_b = second.reacts_to(first);
            if !notify_a && !notify_b {
                continue;
            }
            if !reach.overlaps(&second.rect()) {
                continue;
            }
            contacts.push(Contact {
                a,
                b: a + 1 + offset,
                notify_a,
                notify_b,
            });
        }
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALLS: CollisionGroup = CollisionGroup::from_bits(1);
    const PLAYER: CollisionGroup = CollisionGroup::from_bits(2);
    const BONUS: CollisionGroup = CollisionGroup::from_bits(4);

    fn ground() -> TileGrid {
        let mut grid = TileGrid::empty(8, 8);
        for x in 0..8 {
            grid.set_tile(x, 0, 1);
        }
        grid.set_tile(5, 1, 1);
        grid.set_tile(5, 2, 1);
        grid
    }

    fn mover(x: f32, y: f32) -> Body {
        Body {
            pos: Vec2::new(x, y),
            size: Size2::new(0.7, 1.9),
            group: PLAYER,
            mask: WALLS,
            solid: false,
        }
    }

    #[test]
    fn free_move_applies_full_delta() {
        let mut body = mover(1.0, 1.5);
        let trace = slide_move(&ground(), &mut body, Vec2::new(0.2, 0.1));
        assert_eq!(trace, Trace::default());
        assert!((body.pos.x - 1.2).abs() < 1e-5);
        assert!((body.pos.y - 1.6).abs() < 1e-5);
    }

    #[test]
    fn falling_onto_floor_blocks_vertical_axis_only() {
        let mut body = mover(1.0, 1.05);
        let trace = slide_move(&ground(), &mut body, Vec2::new(0.1, -0.2));
        assert!(!trace.blocked_x);
        assert!(trace.blocked_y);
        assert!(body.pos.y >= 1.0);
        assert!(body.pos.y < 1.001);
        assert!((body.pos.x - 1.1).abs() < 1e-5);
    }

    #[test]
    fn wall_stops_horizontal_axis_and_vertical_continues() {
        let mut body = mover(4.2, 1.5);
        let trace = slide_move(&ground(), &mut body, Vec2::new(0.2, 0.05));
        assert!(trace.blocked_x);
        assert!(!trace.blocked_y);
        assert!(body.pos.x + body.size.width <= 5.0);
        assert!(body.pos.x + body.size.width > 4.99);
        assert!((body.pos.y - 1.55).abs() < 1e-5);
    }

    #[test]
    fn zero_delta_reports_nothing_blocked() {
        let mut body = mover(1.0, 1.0);
        let trace = slide_move(&ground(), &mut body, Vec2::ZERO);
        assert_eq!(trace, Trace::default());
        assert_eq!(body.pos, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn contacts_respect_masks_per_side() {
        let player = Body {
            mask: WALLS,
            ..mover(0.0, 0.0)
        };
        let pickup = Body {
            pos: Vec2::new(0.5, 0.5),
            size: Size2::square(1.0),
            group: BONUS,
            mask: PLAYER,
            solid: false,
        };
        let contacts = find_contacts(&[player, pickup]);
        assert_eq!(
            contacts,
            vec![Contact {
                a: 0,
                b: 1,
                notify_a: false,
                notify_b: true
            }]
        );
    }

    #[test]
    fn touching_within_margin_counts_as_contact() {
        let player = mover(0.0, 1.0);
        let spikes = Body {
            pos: Vec2::new(0.705, 1.0),
            size: Size2::new(1.0, 0.9),
            group: WALLS,
            mask: PLAYER,
            solid: true,
        };
        let contacts = find_contacts(&[player, spikes]);
        assert_eq!(contacts.len(), 1);
        assert!(contacts[0].notify_a && contacts[0].notify_b);

        let far = Body {
            pos: Vec2::new(0.8, 1.0),
            ..spikes
        };
        assert!(find_contacts(&[player, far]).is_empty());
    }

    #[test]
    fn indifferent_pairs_are_skipped() {
        let a = Body {
            group: BONUS,
            mask: CollisionGroup::NONE,
            ..mover(0.0, 0.0)
        };
        let b = Body {
            group: BONUS,
            mask: WALLS,
            ..mover(0.0, 0.0)
        };
        assert!(find_contacts(&[a, b]).is_empty());
    }

    #[test]
    fn solid_body_blocks_only_matching_movers() {
        let wall = Body {
            group: WALLS,
            solid: true,
            ..Body::default()
        };
        assert!(wall.blocks(&mover(0.0, 0.0)));
        let ghost = Body {
            mask: BONUS,
            ..mover(0.0, 0.0)
        };
        assert!(!wall.blocks(&ghost));
    }
}
