use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use engine::{TileGrid, TileGridError, Vec2};
use serde::Deserialize;
use thiserror::Error;

use super::factory::EntityConfig;

#[derive(Debug, Error)]
pub(crate) enum QuestError {
    #[error("failed to read quest file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse quest file {path} at {json_path}: {source}")]
    Parse {
        path: PathBuf,
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("room {room} has bad tiles: {source}")]
    Tiles {
        room: usize,
        #[source]
        source: TileGridError,
    },
    #[error("quest file {path} contains no rooms")]
    Empty { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spawner {
    pub(crate) name: String,
    pub(crate) pos: Vec2,
    pub(crate) config: EntityConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Room {
    pub(crate) tiles: TileGrid,
    pub(crate) spawners: Vec<Spawner>,
    pub(crate) theme: i32,
    pub(crate) start: Vec2,
}

/// Ordered rooms of one game. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Quest {
    pub(crate) rooms: Vec<Room>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct QuestFile {
    rooms: Vec<RoomFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RoomFile {
    tiles: TilesFile,
    #[serde(default)]
    spawners: Vec<SpawnerFile>,
    #[serde(default)]
    theme: i32,
    start: Vec2,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TilesFile {
    width: u32,
    height: u32,
    cells: Vec<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SpawnerFile {
    name: String,
    pos: Vec2,
    #[serde(default)]
    config: BTreeMap<String, String>,
}

impl Quest {
    pub(crate) fn load(path: &Path) -> Result<Self, QuestError> {
        let raw = fs::read_to_string(path).map_err(|source| QuestError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &raw)
    }

    fn parse(path: &Path, raw: &str) -> Result<Self, QuestError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let file: QuestFile =
            serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
                let json_path = error.path().to_string();
                QuestError::Parse {
                    path: path.to_path_buf(),
                    json_path,
                    source: error.into_inner(),
                }
            })?;

        if file.rooms.is_empty() {
            return Err(QuestError::Empty {
                path: path.to_path_buf(),
            });
        }

        let rooms = file
            .rooms
            .into_iter()
            .enumerate()
            .map(|(index, room)| {
                let tiles = TileGrid::new(room.tiles.width, room.tiles.height, room.tiles.cells)
                    .map_err(|source| QuestError::Tiles {
                        room: index,
                        source,
                    })?;
                let spawners = room
                    .spawners
                    .into_iter()
                    .map(|spawner| Spawner {
                        name: spawner.name,
                        pos: spawner.pos,
                        config: EntityConfig::new(spawner.config),
                    })
                    .collect();
                Ok(Room {
                    tiles,
                    spawners,
                    theme: room.theme,
                    start: room.start,
                })
            })
            .collect::<Result<Vec<_>, QuestError>>()?;

        Ok(Self { rooms })
    }

    /// Three connected rooms holding the eight artifacts and the bed.
    pub(crate) fn demo() -> Self {
        let mut first = RoomBuilder::new(0, Vec2::new(3.0, 1.0));
        first.door_right();
        first.platform(11, 15, 2);
        first.platform(17, 20, 4);
        first.platform(26, 30, 6);
        first.spawn("savepoint", 6.0, 1.0);
        first.spawn("artifact", 13.0, 3.0);
        first.spawn("artifact", 18.0, 5.0);
        first.spawn("artifact", 28.0, 7.0);
        first.spawn_with("ladder", 25.0, 1.0, &[("height", "7")]);
        first.spawn("tree", 20.0, 1.0);
        first.spawn("owl", 21.0, 5.0);
        first.spawn_with(
            "boundary",
            31.0,
            1.0,
            &[("target_level", "1"), ("dx", "-29"), ("height", "4")],
        );

        let mut second = RoomBuilder::new(1, Vec2::new(3.0, 1.0));
        second.door_left();
        second.door_right();
        second.platform(6, 9, 2);
        second.platform(18, 22, 4);
        second.spawn_with("upgrade", 7.0, 3.0, &[("upgrade", "1")]);
        second.spawn("spikes", 12.0, 1.0);
        second.spawn("spikes", 13.0, 1.0);
        second.spawn("spikes", 14.0, 1.0);
        second.spawn("artifact", 13.0, 3.5);
        second.spawn("artifact", 20.0, 5.0);
        second.spawn("artifact", 27.0, 2.0);
        second.spawn("savepoint", 24.0, 1.0);
        second.spawn_with(
            "boundary",
            0.0,
            1.0,
            &[("target_level", "0"), ("dx", "29"), ("height", "4")],
        );
        second.spawn_with(
            "boundary",
            31.0,
            1.0,
            &[("target_level", "2"), ("dx", "-29"), ("height", "4")],
        );

        let mut third = RoomBuilder::new(2, Vec2::new(3.0, 1.0));
        third.door_left();
        third.platform(9, 13, 2);
        third.spawn("artifact", 11.0, 3.0);
        third.spawn("artifact", 16.0, 2.0);
        third.spawn_with("upgrade", 5.0, 1.0, &[("upgrade", "4")]);
        third.spawn("tree", 19.0, 1.0);
        third.spawn("bed", 24.0, 1.0);
        third.spawn_with(
            "boundary",
            0.0,
            1.0,
            &[("target_level", "1"), ("dx", "29"), ("height", "4")],
        );

        Self {
            rooms: vec![first.build(), second.build(), third.build()],
        }
    }
}

const DEMO_WIDTH: u32 = 32;
const DEMO_HEIGHT: u32 = 16;
const WALL_TILE: i32 = 1;
const PLATFORM_TILE: i32 = 2;
const DOOR_HEIGHT: u32 = 4;

struct RoomBuilder {
    tiles: TileGrid,
    spawners: Vec<Spawner>,
    theme: i32,
    start: Vec2,
}

impl RoomBuilder {
    fn new(theme: i32, start: Vec2) -> Self {
        let mut tiles = TileGrid::empty(DEMO_WIDTH, DEMO_HEIGHT);
        for x in 0..DEMO_WIDTH {
            tiles.set_tile(x, 0, WALL_TILE);
            tiles.set_tile(x, DEMO_HEIGHT - 1, WALL_TILE);
        }
        for y in 0..DEMO_HEIGHT {
            tiles.set_tile(0, y, WALL_TILE);
            tiles.set_tile(DEMO_WIDTH - 1, y, WALL_TILE);
        }
        Self {
            tiles,
            spawners: Vec::new(),
            theme,
            start,
        }
    }

    fn door_left(&mut self) {
        self.carve_door(0);
    }

    fn door_right(&mut self) {
        self.carve_door(DEMO_WIDTH - 1);
    }

    fn carve_door(&mut self, x: u32) {
        for y in 1..=DOOR_HEIGHT {
            self.tiles.set_tile(x, y, 0);
        }
    }

    fn platform(&mut self, from_x: u32, to_x: u32, y: u32) {
        for x in from_x..=to_x {
            self.tiles.set_tile(x, y, PLATFORM_TILE);
        }
    }

    fn spawn(&mut self, name: &str, x: f32, y: f32) {
        self.spawn_with(name, x, y, &[]);
    }

    fn spawn_with(&mut self, name: &str, x: f32, y: f32, config: &[(&str, &str)]) {
        let config = config
            .iter()
            .fold(EntityConfig::default(), |acc, (key, value)| acc.with(key, value));
        self.spawners.push(Spawner {
            name: name.to_string(),
            pos: Vec2::new(x, y),
            config,
        });
    }

    fn build(self) -> Room {
        Room {
            tiles: self.tiles,
            spawners: self.spawners,
            theme: self.theme,
            start: self.start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_ROOM: &str = r#"{
        "rooms": [{
            "tiles": { "width": 2, "height": 2, "cells": [1, 1, 0, 17] },
            "spawners": [
                { "name": "artifact", "pos": { "x": 1.0, "y": 1.0 } },
                { "name": "boundary", "pos": { "x": 0.0, "y": 1.0 },
                  "config": { "target_level": "0", "dx": "1.5" } }
            ],
            "theme": 3,
            "start": { "x": 0.5, "y": 1.0 }
        }]
    }"#;

    #[test]
    fn loads_rooms_from_json_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("quest.json");
        fs::write(&path, ONE_ROOM).expect("write quest");

        let quest = Quest::load(&path).expect("quest");
        assert_eq!(quest.rooms.len(), 1);
        let room = &quest.rooms[0];
        assert_eq!(room.theme, 3);
        assert_eq!(room.start, Vec2::new(0.5, 1.0));
        assert_eq!(room.tiles.tile_at(1, 1), Some(17));
        assert_eq!(room.spawners[1].name, "boundary");
        assert_eq!(room.spawners[1].config.get_float("dx", 0.0), Ok(1.5));
    }

    #[test]
    fn parse_error_reports_json_path() {
        let raw = r#"{ "rooms": [{ "tiles": { "width": 1, "height": 1, "cells": [0] },
            "start": { "x": "left", "y": 0 } }] }"#;
        let err = Quest::parse(Path::new("bad.json"), raw).expect_err("bad start");
        match err {
            QuestError::Parse { json_path, .. } => assert_eq!(json_path, "rooms[0].start.x"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn tile_count_mismatch_is_fatal() {
        let raw = r#"{ "rooms": [{ "tiles": { "width": 2, "height": 2, "cells": [0] },
            "start": { "x": 0, "y": 0 } }] }"#;
        let err = Quest::parse(Path::new("short.json"), raw).expect_err("short tiles");
        assert!(matches!(err, QuestError::Tiles { room: 0, .. }));
    }

    #[test]
    fn empty_quest_is_fatal() {
        let err = Quest::parse(Path::new("empty.json"), r#"{ "rooms": [] }"#)
            .expect_err("no rooms");
        assert!(matches!(err, QuestError::Empty { .. }));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Quest::load(&dir.path().join("absent.json")).expect_err("missing");
        assert!(matches!(err, QuestError::ReadFile { .. }));
    }

    #[test]
    fn demo_rooms_hold_eight_artifacts() {
        let quest = Quest::demo();
        let artifacts = quest
            .rooms
            .iter()
            .flat_map(|room| room.spawners.iter())
            .filter(|spawner| spawner.name == "artifact")
            .count();
        assert_eq!(artifacts, 8);
        assert!(quest
            .rooms
            .iter()
            .any(|room| room.spawners.iter().any(|spawner| spawner.name == "bed")));
    }
}
