//! `.wad` map files.
//!
//! ```text
//! 5 anything after the first token is ignored
//! 11111
//! 10001
//! 10201
//! 10001
//! 11111
//! ```
//!
//! The first token is used as both width and height, so maps are square. Each
//! following line is one row `y`, and character `x` of that line is cell `(x, y)`.
//! `0` is empty; any other digit is a blocking occupant of that kind.

use std::path::Path;

use glam::UVec2;

use crate::error::MapError;

pub const MAP_EXTENSION: &str = "wad";

/// Parsed map contents, before any occupant is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapLayout {
    size: u32,
    cells: Vec<u8>,
}

impl MapLayout {
    pub fn width(&self) -> u32 {
        self.size
    }

    pub fn height(&self) -> u32 {
        self.size
    }

    /// Digit at `(x, y)`, `None` when out of range.
    pub fn digit(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.size || y >= self.size {
            return None;
        }
        Some(self.cells[(y as usize) * (self.size as usize) + (x as usize)])
    }

    /// Non-zero cells with their digit, row-major.
    pub fn blocking(&self) -> impl Iterator<Item = (UVec2, u8)> + '_ {
        let size = self.size as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &digit)| digit != 0)
            .map(move |(idx, &digit)| {
                (UVec2::new((idx % size) as u32, (idx / size) as u32), digit)
            })
    }
}

pub fn load_map(path: impl AsRef<Path>) -> Result<MapLayout, MapError> {
    let path = path.as_ref();
    if path.extension().and_then(|ext| ext.to_str()) != Some(MAP_EXTENSION) {
        return Err(MapError::Extension(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_map(&text)
}

pub fn parse_map(text: &str) -> Result<MapLayout, MapError> {
    let mut lines = text.lines();
    let header = lines.next().ok_or(MapError::MissingHeader)?;
    let token = header
        .split_whitespace()
        .next()
        .ok_or(MapError::MissingHeader)?;
    let size: u32 = token
        .parse()
        .map_err(|_| MapError::InvalidSize(token.to_string()))?;
    if size == 0 {
        return Err(MapError::InvalidSize(token.to_string()));
    }

    let rows: Vec<&str> = lines.collect();
    if rows.len() != size as usize {
        return Err(MapError::RowCount {
            expected: size as usize,
            found: rows.len(),
        });
    }

    let mut cells = Vec::with_capacity((size as usize) * (size as usize));
    for (row, line) in rows.iter().enumerate() {
        let found = line.chars().count();
        if found != size as usize {
            return Err(MapError::RowLength {
                row,
                expected: size as usize,
                found,
            });
        }
        for (column, ch) in line.chars().enumerate() {
            let digit = ch.to_digit(10).ok_or(MapError::InvalidCell {
                column,
                row,
                found: ch,
            })?;
            cells.push(digit as u8);
        }
    }

    Ok(MapLayout { size, cells })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOM: &str = "5 walls\n11111\n10001\n10201\n10001\n11111\n";

    #[test]
    fn parses_square_room() {
        let layout = parse_map(ROOM).unwrap();
        assert_eq!(layout.width(), 5);
        assert_eq!(layout.height(), 5);
        assert_eq!(layout.digit(0, 0), Some(1));
        assert_eq!(layout.digit(1, 1), Some(0));
        assert_eq!(layout.digit(2, 2), Some(2));
        assert_eq!(layout.digit(5, 0), None);
        assert_eq!(layout.blocking().count(), 17);
    }

    #[test]
    fn columns_are_x_rows_are_y() {
        let layout = parse_map("3\n001\n000\n000\n").unwrap();
        assert_eq!(layout.blocking().collect::<Vec<_>>(), vec![(UVec2::new(2, 0), 1)]);

        let layout = parse_map("3\n000\n000\n100\n").unwrap();
        assert_eq!(layout.blocking().collect::<Vec<_>>(), vec![(UVec2::new(0, 2), 1)]);
    }

    #[test]
    fn accepts_missing_final_newline_and_crlf() {
        assert!(parse_map("2\n00\n01").is_ok());
        assert!(parse_map("2\r\n00\r\n01\r\n").is_ok());
    }

    #[test]
    fn header_errors() {
        assert!(matches!(parse_map(""), Err(MapError::MissingHeader)));
        assert!(matches!(parse_map("   \n"), Err(MapError::MissingHeader)));
        assert!(matches!(parse_map("abc\n"), Err(MapError::InvalidSize(_))));
        assert!(matches!(parse_map("0\n"), Err(MapError::InvalidSize(_))));
        assert!(matches!(parse_map("-3\n"), Err(MapError::InvalidSize(_))));
    }

    #[test]
    fn dimension_mismatch_is_fatal() {
        assert!(matches!(
            parse_map("3\n000\n000\n"),
            Err(MapError::RowCount { expected: 3, found: 2 })
        ));
        assert!(matches!(
            parse_map("2\n00\n00\n00\n"),
            Err(MapError::RowCount { expected: 2, found: 3 })
        ));
        assert!(matches!(
            parse_map("3\n000\n0000\n000\n"),
            Err(MapError::RowLength { row: 1, expected: 3, found: 4 })
        ));
        assert!(matches!(
            parse_map("3\n000\n00\n000\n"),
            Err(MapError::RowLength { row: 1, expected: 3, found: 2 })
        ));
    }

    #[test]
    fn non_digit_cell_is_rejected() {
        assert!(matches!(
            parse_map("2\n0#\n00\n"),
            Err(MapError::InvalidCell { column: 1, row: 0, found: '#' })
        ));
    }

    #[test]
    fn extension_is_checked_before_reading() {
        assert!(matches!(
            load_map("does/not/exist.txt"),
            Err(MapError::Extension(_))
        ));
        assert!(matches!(
            load_map("does/not/exist.wad"),
            Err(MapError::Io { .. })
        ));
    }
}
