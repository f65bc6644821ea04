use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use super::grid::{CharGrid, GridParse, LabMap, TileGrid, LAB_SIZE, ROOM_HEIGHT, ROOM_WIDTH};

pub const LAB_FILE_NAME: &str = "Lab.mashgraph";
pub const ROOMS_DIR_NAME: &str = "rooms";

#[derive(Debug, Error)]
pub enum GridError {
    #[error("failed to read grid resource {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Which text resource of a lab is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Lab,
    RoomObjects(u8),
    RoomBase(u8),
    RoomOverlay(u8),
}

impl ResourceKind {
    /// Path of the resource relative to the lab directory. `None` when the
    /// room type code cannot appear in a file name, such as the `\0` of a
    /// zero-filled lab cell.
    pub fn relative_path(self) -> Option<PathBuf> {
        let path = match self {
            Self::Lab => PathBuf::from(LAB_FILE_NAME),
            Self::RoomObjects(room_type) => {
                Path::new(ROOMS_DIR_NAME).join(format!("{}.mashgraph", file_code(room_type)?))
            }
            Self::RoomBase(room_type) => {
                Path::new(ROOMS_DIR_NAME).join(format!("{}_back.csv", file_code(room_type)?))
            }
            Self::RoomOverlay(room_type) => {
                Path::new(ROOMS_DIR_NAME).join(format!("{}_items.csv", file_code(room_type)?))
            }
        };
        Some(path)
    }

    fn label(self) -> String {
        match self.relative_path() {
            Some(path) => path.display().to_string(),
            None => format!("{self:?}"),
        }
    }
}

fn file_code(room_type: u8) -> Option<char> {
    let portable = room_type.is_ascii_graphic()
        && !matches!(
            room_type,
            b'/' | b'\\' | b':' | b'*' | b'?' | b'"' | b'<' | b'>' | b'|'
        );
    portable.then_some(room_type as char)
}

/// Provider of raw text resources. `Ok(None)` means the resource does not
/// exist; loaders treat that as an all-zero grid.
pub trait RoomSource {
    fn read_text(&self, kind: ResourceKind) -> Result<Option<String>, GridError>;
}

/// Reads resources from a lab directory on disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl RoomSource for DirSource {
    fn read_text(&self, kind: ResourceKind) -> Result<Option<String>, GridError> {
        let Some(relative_path) = kind.relative_path() else {
            return Ok(None);
        };
        let path = self.root.join(relative_path);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(GridError::Read { path, source }),
        }
    }
}

/// In-memory resources, keyed by kind.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    resources: HashMap<ResourceKind, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: ResourceKind, text: impl Into<String>) {
        self.resources.insert(kind, text.into());
    }

    pub fn with(mut self, kind: ResourceKind, text: impl Into<String>) -> Self {
        self.insert(kind, text);
        self
    }
}

impl RoomSource for MemorySource {
    fn read_text(&self, kind: ResourceKind) -> Result<Option<String>, GridError> {
        Ok(self.resources.get(&kind).cloned())
    }
}

pub fn load_lab(source: &dyn RoomSource) -> Result<LabMap, GridError> {
    let text = read_or_empty(source, ResourceKind::Lab)?;
    let parsed = CharGrid::parse(&text, LAB_SIZE, LAB_SIZE);
    report_padding(ResourceKind::Lab, &parsed);
    Ok(LabMap::from_grid(parsed.grid))
}

pub fn load_room_objects(source: &dyn RoomSource, room_type: u8) -> Result<CharGrid, GridError> {
    let kind = ResourceKind::RoomObjects(room_type);
    let text = read_or_empty(source, kind)?;
    let parsed = CharGrid::parse(&text, ROOM_WIDTH, ROOM_HEIGHT);
    report_padding(kind, &parsed);
    Ok(parsed.grid)
}

pub fn load_room_tiles(
    source: &dyn RoomSource,
    room_type: u8,
) -> Result<(TileGrid, TileGrid), GridError> {
    let base = load_tile_layer(source, ResourceKind::RoomBase(room_type))?;
    let overlay = load_tile_layer(source, ResourceKind::RoomOverlay(room_type))?;
    Ok((base, overlay))
}

fn load_tile_layer(source: &dyn RoomSource, kind: ResourceKind) -> Result<TileGrid, GridError> {
    let text = read_or_empty(source, kind)?;
    let parsed = TileGrid::parse(&text, ROOM_WIDTH, ROOM_HEIGHT);
    report_padding(kind, &parsed);
    Ok(parsed.grid)
}

fn read_or_empty(source: &dyn RoomSource, kind: ResourceKind) -> Result<String, GridError> {
    if kind.relative_path().is_none() {
        warn!(resource = ?kind, "grid_resource_unnamed");
        return Ok(String::new());
    }
    match source.read_text(kind)? {
        Some(text) => Ok(text),
        None => {
            warn!(resource = %kind.label(), "grid_resource_missing");
            Ok(String::new())
        }
    }
}

fn report_padding<G>(kind: ResourceKind, parsed: &GridParse<G>) {
    if parsed.padded_cells > 0 {
        warn!(
            resource = %kind.label(),
            padded_cells = parsed.padded_cells,
            "grid_resource_short"
        );
    }
}
