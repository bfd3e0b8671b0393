use std::collections::{BTreeMap, VecDeque};

use super::{BoundaryChecker, Direction, Position};

/// Item stacks carried by a character, keyed by item slug.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    items: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quantity(&self, item: &str) -> u32 {
        self.items.get(item).copied().unwrap_or(0)
    }

    pub fn contains(&self, item: &str) -> bool {
        self.quantity(item) > 0
    }

    pub fn add(&mut self, item: impl Into<String>, quantity: u32) {
        if quantity == 0 {
            return;
        }
        *self.items.entry(item.into()).or_insert(0) += quantity;
    }

    /// Removes up to `quantity` items and returns how many were actually removed.
    pub fn remove(&mut self, item: &str, quantity: u32) -> u32 {
        let Some(held) = self.items.get_mut(item) else {
            return 0;
        };
        let removed = quantity.min(*held);
        *held -= removed;
        if *held == 0 {
            self.items.remove(item);
        }
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.items.iter().map(|(slug, qty)| (slug.as_str(), *qty))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The player or an NPC standing on the tile grid.
///
/// Movement is tile based: `move_destination` holds the tile the character is
/// walking into during the current tick and `path` the waypoints after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Character {
    pub slug: String,
    pub position: Position,
    pub facing: Direction,
    pub move_destination: Option<Position>,
    pub path: VecDeque<Position>,
    pub inventory: Inventory,
}

impl Character {
    pub fn new(slug: impl Into<String>, position: Position) -> Self {
        Self {
            slug: slug.into(),
            position,
            facing: Direction::default(),
            move_destination: None,
            path: VecDeque::new(),
            inventory: Inventory::new(),
        }
    }

    pub fn is_moving(&self) -> bool {
        self.move_destination.is_some() || !self.path.is_empty()
    }

    /// Tile directly in front of the character.
    pub fn facing_tile(&self) -> Position {
        self.position.offset(self.facing)
    }

    /// Appends `tiles` single-tile waypoints in `direction` after the last queued one.
    pub fn walk(&mut self, direction: Direction, tiles: u32) {
        let mut cursor = self
            .path
            .back()
            .copied()
            .or(self.move_destination)
            .unwrap_or(self.position);
        for _ in 0..tiles {
            cursor = cursor.offset(direction);
            self.path.push_back(cursor);
        }
    }

    /// Drops all queued movement, leaving the character on its current tile.
    pub fn stop(&mut self) {
        self.move_destination = None;
        self.path.clear();
    }

    /// Places the character on `position` and cancels any movement.
    pub fn warp(&mut self, position: Position) {
        self.stop();
        self.position = position;
    }

    /// Advances movement by one tick.
    ///
    /// The character arrives on its pending destination, then starts walking
    /// toward the next waypoint. Each axis of the waypoint is checked
    /// separately against `bounds`; an invalid axis keeps its current value,
    /// and a step that ends up going nowhere stops the walk.
    ///
    /// Returns `true` if the character's position changed.
    pub fn step(&mut self, bounds: &BoundaryChecker) -> bool {
        let before = self.position;
        if let Some(destination) = self.move_destination.take() {
            self.position = destination;
        }

        if let Some(next) = self.path.pop_front() {
            if let Some(direction) = Direction::between(self.position, next) {
                self.facing = direction;
            }
            let (valid_x, valid_y) = bounds.get_boundary_validity(next);
            let target = Position::new(
                if valid_x { next.x } else { self.position.x },
                if valid_y { next.y } else { self.position.y },
            );
            if target == self.position {
                self.path.clear();
            } else {
                self.move_destination = Some(target);
            }
        }

        self.position != before
    }
}
