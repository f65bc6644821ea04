mod config;
mod grid;
mod source;

pub use config::{ConfigError, GameConfig, HEALTH_BAR_FRAMES};
pub use grid::{
    CharGrid, GridParse, LabMap, Marker, TileGrid, GUARD_MAP_TILE, HOLE_MAP_TILE,
    INITIAL_ROOM_MARKER, LAB_SIZE, ROOM_HEIGHT, ROOM_OFFSET, ROOM_WIDTH, ROOM_X_CENTER,
    ROOM_Y_CENTER, TILE_SIZE,
};
pub use source::{
    load_lab, load_room_objects, load_room_tiles, DirSource, GridError, MemorySource,
    ResourceKind, RoomSource, LAB_FILE_NAME, ROOMS_DIR_NAME,
};
