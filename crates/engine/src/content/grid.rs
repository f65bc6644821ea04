use crate::sim::IPoint;

pub const TILE_SIZE: i32 = 16;
pub const ROOM_WIDTH: usize = 31;
pub const ROOM_HEIGHT: usize = 20;
pub const LAB_SIZE: usize = 8;
/// Rows reserved at the top of every room for the HUD strip.
pub const ROOM_OFFSET: usize = 3;
pub const ROOM_Y_CENTER: usize = ROOM_OFFSET + (ROOM_HEIGHT - ROOM_OFFSET) / 2;
pub const ROOM_X_CENTER: usize = ROOM_WIDTH / 2;
pub const HOLE_MAP_TILE: u16 = 774;
pub const GUARD_MAP_TILE: u16 = 780;
pub const INITIAL_ROOM_MARKER: u8 = b'@';

/// Semantic meaning of one object-grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Marker {
    Empty,
    Wall,
    Coral,
    Hole,
    Exit,
    Goal,
    Pearl,
    Guard,
}

impl Marker {
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            b'#' => Self::Wall,
            b'c' => Self::Coral,
            b'h' => Self::Hole,
            b'x' => Self::Exit,
            b'Q' => Self::Goal,
            b'p' => Self::Pearl,
            b'g' => Self::Guard,
            _ => Self::Empty,
        }
    }

    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Empty => b'.',
            Self::Wall => b'#',
            Self::Coral => b'c',
            Self::Hole => b'h',
            Self::Exit => b'x',
            Self::Goal => b'Q',
            Self::Pearl => b'p',
            Self::Guard => b'g',
        }
    }
}

/// Result of parsing a fixed-size grid. `padded_cells` counts cells that had
/// no source content and were zero-filled.
#[derive(Debug, Clone, PartialEq)]
pub struct GridParse<G> {
    pub grid: G,
    pub padded_cells: usize,
}

/// Fixed-size character grid, row-major. Missing content is `\0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharGrid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl CharGrid {
    pub fn zeroed(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    /// One row per line. Characters past `width` are ignored; short rows and
    /// missing rows are zero-filled.
    pub fn parse(text: &str, width: usize, height: usize) -> GridParse<Self> {
        let mut grid = Self::zeroed(width, height);
        let mut filled = 0usize;
        for (row, line) in text.lines().take(height).enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            for (column, byte) in line.bytes().take(width).enumerate() {
                grid.cells[row * width + column] = byte;
                filled += 1;
            }
        }
        GridParse {
            grid,
            padded_cells: width * height - filled,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, column: usize, row: usize) -> Option<u8> {
        if column >= self.width || row >= self.height {
            return None;
        }
        self.cells.get(row * self.width + column).copied()
    }

    pub fn set(&mut self, column: usize, row: usize, byte: u8) -> bool {
        if column >= self.width || row >= self.height {
            return false;
        }
        self.cells[row * self.width + column] = byte;
        true
    }

    pub fn marker_at(&self, column: usize, row: usize) -> Option<Marker> {
        self.get(column, row).map(Marker::from_byte)
    }

    pub fn row(&self, row: usize) -> Option<&[u8]> {
        if row >= self.height {
            return None;
        }
        let start = row * self.width;
        Some(&self.cells[start..start + self.width])
    }

    pub fn find_in_row(&self, row: usize, byte: u8) -> Option<usize> {
        self.row(row)?.iter().position(|&cell| cell == byte)
    }

    pub fn rfind_in_row(&self, row: usize, byte: u8) -> Option<usize> {
        self.row(row)?.iter().rposition(|&cell| cell == byte)
    }

    pub fn find_in_column(&self, column: usize, byte: u8) -> Option<usize> {
        (0..self.height).find(|&row| self.get(column, row) == Some(byte))
    }

    pub fn rfind_in_column(&self, column: usize, byte: u8) -> Option<usize> {
        (0..self.height)
            .rev()
            .find(|&row| self.get(column, row) == Some(byte))
    }
}

/// Fixed-size grid of tile indices, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<u16>,
}

impl TileGrid {
    pub fn zeroed(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![0; width * height],
        }
    }

    /// Whitespace-separated integers in row-major order. Tokens that are not
    /// valid tile indices and cells past the end of input are zero.
    pub fn parse(text: &str, width: usize, height: usize) -> GridParse<Self> {
        let mut grid = Self::zeroed(width, height);
        let mut filled = 0usize;
        for (index, token) in text.split_whitespace().take(width * height).enumerate() {
            if let Ok(tile) = token.parse::<u16>() {
                grid.tiles[index] = tile;
                filled += 1;
            }
        }
        GridParse {
            grid,
            padded_cells: width * height - filled,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_at(&self, column: usize, row: usize) -> Option<u16> {
        if column >= self.width || row >= self.height {
            return None;
        }
        self.tiles.get(row * self.width + column).copied()
    }
}

/// The 8x8 room graph. Each cell is a room-type code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabMap {
    grid: CharGrid,
    initial_room: IPoint,
}

impl LabMap {
    /// Falls back to room (0,0) when no initial-room marker is present. The
    /// last marker wins if several rows carry one.
    pub fn from_grid(grid: CharGrid) -> Self {
        let mut initial_room = IPoint::default();
        for row in 0..grid.height() {
            if let Some(column) = grid.find_in_row(row, INITIAL_ROOM_MARKER) {
                initial_room = IPoint::new(column as i32, row as i32);
            }
        }
        Self { grid, initial_room }
    }

    pub fn initial_room(&self) -> IPoint {
        self.initial_room
    }

    pub fn contains(&self, room: IPoint) -> bool {
        room.x >= 0
            && room.y >= 0
            && (room.x as usize) < self.grid.width()
            && (room.y as usize) < self.grid.height()
    }

    pub fn room_type(&self, room: IPoint) -> Option<u8> {
        if !self.contains(room) {
            return None;
        }
        self.grid.get(room.x as usize, room.y as usize)
    }

    pub fn grid(&self) -> &CharGrid {
        &self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_constants_match_room_layout() {
        assert_eq!(ROOM_Y_CENTER, 11);
        assert_eq!(ROOM_X_CENTER, 15);
    }

    #[test]
    fn short_rows_and_missing_rows_are_zero_filled() {
        let parsed = CharGrid::parse("#x#\n#\n", 3, 3);
        assert_eq!(parsed.grid.row(0), Some(&b"#x#"[..]));
        assert_eq!(parsed.grid.row(1), Some(&[b'#', 0, 0][..]));
        assert_eq!(parsed.grid.row(2), Some(&[0, 0, 0][..]));
        assert_eq!(parsed.padded_cells, 5);
        assert_eq!(parsed.grid.marker_at(1, 1), Some(Marker::Empty));
    }

    #[test]
    fn long_rows_are_truncated_and_crlf_is_stripped() {
        let parsed = CharGrid::parse("abcdef\r\nxy\r\n", 4, 2);
        assert_eq!(parsed.grid.row(0), Some(&b"abcd"[..]));
        assert_eq!(parsed.grid.row(1), Some(&[b'x', b'y', 0, 0][..]));
    }

    #[test]
    fn out_of_range_access_is_none() {
        let grid = CharGrid::zeroed(2, 2);
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get(0, 2), None);
        assert_eq!(grid.row(5), None);
    }

    #[test]
    fn row_and_column_scans_return_first_and_last() {
        let parsed = CharGrid::parse("x.x\n...\nx..\n", 3, 3);
        let grid = parsed.grid;
        assert_eq!(grid.find_in_row(0, b'x'), Some(0));
        assert_eq!(grid.rfind_in_row(0, b'x'), Some(2));
        assert_eq!(grid.find_in_row(1, b'x'), None);
        assert_eq!(grid.find_in_column(0, b'x'), Some(0));
        assert_eq!(grid.rfind_in_column(0, b'x'), Some(2));
        assert_eq!(grid.find_in_column(1, b'x'), None);
    }

    #[test]
    fn tile_grid_zero_fills_bad_and_missing_tokens() {
        let parsed = TileGrid::parse("1 2 bogus\n774", 2, 3);
        let grid = parsed.grid;
        assert_eq!(grid.tile_at(0, 0), Some(1));
        assert_eq!(grid.tile_at(1, 0), Some(2));
        assert_eq!(grid.tile_at(0, 1), Some(0));
        assert_eq!(grid.tile_at(1, 1), Some(774));
        assert_eq!(grid.tile_at(0, 2), Some(0));
        assert_eq!(parsed.padded_cells, 3);
    }

    #[test]
    fn lab_map_finds_initial_room_marker() {
        let text = "ABCDEFGH\nABCDEFGH\nAB@DEFGH\n";
        let lab = LabMap::from_grid(CharGrid::parse(text, LAB_SIZE, LAB_SIZE).grid);
        assert_eq!(lab.initial_room(), IPoint::new(2, 2));
        assert_eq!(lab.room_type(IPoint::new(2, 2)), Some(b'@'));
        assert_eq!(lab.room_type(IPoint::new(1, 0)), Some(b'B'));
        assert_eq!(lab.room_type(IPoint::new(-1, 0)), None);
        assert_eq!(lab.room_type(IPoint::new(0, 8)), None);
    }

    #[test]
    fn lab_without_marker_starts_at_origin() {
        let lab = LabMap::from_grid(CharGrid::parse("AB\n", LAB_SIZE, LAB_SIZE).grid);
        assert_eq!(lab.initial_room(), IPoint::new(0, 0));
    }
}
