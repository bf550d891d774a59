//! The "Hide map" tool and the world map store it resets.

use bevy::prelude::*;
use thiserror::Error;

use super::Tool;

/// One revealed cell of the world map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MapTile {
    pub kind: u16,
    pub light: u8,
    pub color: u8,
}

impl MapTile {
    pub fn is_revealed(&self) -> bool {
        *self != MapTile::default()
    }
}

/// The explored world map, a dense `width * height` grid.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct WorldMap {
    width: usize,
    height: usize,
    tiles: Vec<MapTile>,
}

impl WorldMap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![MapTile::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<MapTile> {
        self.index(x, y).map(|index| self.tiles[index])
    }

    /// Marks a cell as explored. Returns `false` if it is out of bounds.
    pub fn reveal(&mut self, x: usize, y: usize, tile: MapTile) -> bool {
        match self.index(x, y) {
            Some(index) => {
                self.tiles[index] = tile;
                true
            }
            None => false,
        }
    }

    pub fn revealed_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_revealed()).count()
    }

    pub fn tiles(&self) -> &[MapTile] {
        &self.tiles
    }

    /// Forgets every explored cell, one tile at a time.
    pub fn clear(&mut self) {
        for tile in &mut self.tiles {
            *tile = MapTile::default();
        }
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    fn tile_storage(&mut self) -> &mut Vec<MapTile> {
        &mut self.tiles
    }
}

/// Flags telling the map renderer to redraw from scratch.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MapRefresh {
    pub refresh_map: bool,
    pub clear_map: bool,
}

/// Direct access to the map's tile storage.
pub type TilesHandle = fn(&mut WorldMap) -> &mut Vec<MapTile>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("no WorldMap resource to take a handle into")]
    MissingStore,
    #[error("direct tile access is disabled by the host")]
    Disabled,
}

/// Supplied by the host: hands out a [`TilesHandle`] when direct access is possible.
pub trait TileAccess: Send + Sync + 'static {
    fn try_get_direct_handle(&self, world: &World) -> Result<TilesHandle, AccessError>;
}

/// Grants direct access whenever a [`WorldMap`] exists.
pub struct DirectTileAccess;

impl TileAccess for DirectTileAccess {
    fn try_get_direct_handle(&self, world: &World) -> Result<TilesHandle, AccessError> {
        if world.contains_resource::<WorldMap>() {
            Ok(WorldMap::tile_storage)
        } else {
            Err(AccessError::MissingStore)
        }
    }
}

/// Never grants direct access; tools go through the public map API.
pub struct PublicApiOnly;

impl TileAccess for PublicApiOnly {
    fn try_get_direct_handle(&self, _world: &World) -> Result<TilesHandle, AccessError> {
        Err(AccessError::Disabled)
    }
}

/// Resets the explored world map.
pub struct HideMapTool {
    access: Box<dyn TileAccess>,
    tiles: Option<TilesHandle>,
}

impl HideMapTool {
    pub fn new(access: impl TileAccess) -> Self {
        Self {
            access: Box::new(access),
            tiles: None,
        }
    }

    /// Whether `load` resolved direct access to the tile storage.
    pub fn has_direct_handle(&self) -> bool {
        self.tiles.is_some()
    }
}

impl Tool for HideMapTool {
    fn icon_key(&self) -> &'static str {
        "HideMap"
    }

    fn display_name(&self) -> &'static str {
        "Hide map"
    }

    fn description(&self) -> &'static str {
        "Resets the world map"
    }

    fn load(&mut self, world: &mut World) {
        self.tiles = match self.access.try_get_direct_handle(world) {
            Ok(handle) => Some(handle),
            Err(err) => {
                debug!("Hide map will clear tiles one by one: {err}");
                None
            }
        };
    }

    fn activate(&mut self, world: &mut World) {
        match world.get_resource_mut::<WorldMap>() {
            Some(mut map) => match self.tiles {
                Some(tiles) => {
                    let len = map.width * map.height;
                    *tiles(&mut *map) = vec![MapTile::default(); len];
                }
                None => map.clear(),
            },
            None => warn!("Hide map: no WorldMap resource to reset"),
        }

        let mut refresh = world.get_resource_or_init::<MapRefresh>();
        refresh.refresh_map = true;
        refresh.clear_map = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{activate_tool, register_tool};

    fn explored_world() -> World {
        let mut world = World::new();
        let mut map = WorldMap::new(16, 8);
        for x in 0..16 {
            map.reveal(x, 3, MapTile {
                kind: 7,
                light: 200,
                color: 1,
            });
        }
        world.insert_resource(map);
        world
    }

    fn reset_with(access: impl TileAccess) -> World {
        let mut world = explored_world();
        let mut tool = HideMapTool::new(access);
        tool.load(&mut world);
        tool.activate(&mut world);
        world
    }

    #[test]
    fn direct_and_public_paths_agree() {
        let fast = reset_with(DirectTileAccess);
        let slow = reset_with(PublicApiOnly);

        assert_eq!(fast.resource::<WorldMap>(), &WorldMap::new(16, 8));
        assert_eq!(fast.resource::<WorldMap>(), slow.resource::<WorldMap>());

        let flags = MapRefresh {
            refresh_map: true,
            clear_map: true,
        };
        assert_eq!(*fast.resource::<MapRefresh>(), flags);
        assert_eq!(*slow.resource::<MapRefresh>(), flags);
    }

    #[test]
    fn load_resolves_handle_only_when_possible() {
        let mut world = explored_world();

        let mut direct = HideMapTool::new(DirectTileAccess);
        direct.load(&mut world);
        assert!(direct.has_direct_handle());

        let mut disabled = HideMapTool::new(PublicApiOnly);
        disabled.load(&mut world);
        assert!(!disabled.has_direct_handle());

        let mut early = HideMapTool::new(DirectTileAccess);
        early.load(&mut World::new());
        assert!(!early.has_direct_handle());
    }

    #[test]
    fn unresolved_handle_still_resets() {
        let mut world = World::new();
        let mut tool = HideMapTool::new(DirectTileAccess);
        tool.load(&mut world);

        world.insert_resource(explored_world().remove_resource::<WorldMap>().unwrap());
        assert_eq!(world.resource::<WorldMap>().revealed_count(), 16);
        tool.activate(&mut world);
        assert_eq!(world.resource::<WorldMap>().revealed_count(), 0);
    }

    #[test]
    fn flags_are_set_without_a_map() {
        let mut world = World::new();
        let mut tool = HideMapTool::new(PublicApiOnly);
        tool.activate(&mut world);

        assert!(world.resource::<MapRefresh>().refresh_map);
        assert!(world.resource::<MapRefresh>().clear_map);
    }

    #[test]
    fn registered_tool_can_be_activated_repeatedly() {
        let mut world = explored_world();
        register_tool(&mut world, HideMapTool::new(DirectTileAccess)).unwrap();

        activate_tool(&mut world, "HideMap").unwrap();
        world.resource_mut::<WorldMap>().reveal(0, 0, MapTile {
            kind: 1,
            light: 1,
            color: 0,
        });
        world.insert_resource(MapRefresh::default());
        activate_tool(&mut world, "HideMap").unwrap();

        assert_eq!(world.resource::<WorldMap>().revealed_count(), 0);
        assert!(world.resource::<MapRefresh>().refresh_map);
    }

    #[test]
    fn reveal_checks_bounds() {
        let mut map = WorldMap::new(2, 2);
        assert!(!map.reveal(2, 0, MapTile::default()));
        assert!(map.reveal(1, 1, MapTile {
            kind: 3,
            light: 0,
            color: 0,
        }));
        assert_eq!(map.get(1, 1).map(|tile| tile.kind), Some(3));
        assert_eq!(map.get(0, 5), None);
    }
}
