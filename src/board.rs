//! The board grid and the group/liberty queries built on it.
//!
//! Points are `(x, y)` pairs: `x` is the column from the left, `y` the row
//! from the top, both 0-based.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::constants::{STAR_POINTS_9, STAR_POINTS_13, STAR_POINTS_19};
use crate::error::GoError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "black" => Ok(Color::Black),
            "w" | "white" => Ok(Color::White),
            _ => Err(format!("unknown color: {s}")),
        }
    }
}

pub type Point = (usize, usize);

/// One of the three supported board sizes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BoardSize {
    Nine,
    Thirteen,
    Nineteen,
}

impl BoardSize {
    pub fn lines(self) -> usize {
        match self {
            BoardSize::Nine => 9,
            BoardSize::Thirteen => 13,
            BoardSize::Nineteen => 19,
        }
    }

    /// Star point coordinates along one axis.
    pub fn star_lines(self) -> &'static [usize; 3] {
        match self {
            BoardSize::Nine => &STAR_POINTS_9,
            BoardSize::Thirteen => &STAR_POINTS_13,
            BoardSize::Nineteen => &STAR_POINTS_19,
        }
    }
}

impl TryFrom<usize> for BoardSize {
    type Error = GoError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        match n {
            9 => Ok(BoardSize::Nine),
            13 => Ok(BoardSize::Thirteen),
            19 => Ok(BoardSize::Nineteen),
            other => Err(GoError::UnsupportedBoardSize(other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: BoardSize,
    cells: Vec<Option<Color>>,
}

impl Board {
    pub fn new(size: BoardSize) -> Self {
        let n = size.lines();
        Self {
            size,
            cells: vec![None; n * n],
        }
    }

    pub fn size(&self) -> usize {
        self.size.lines()
    }

    pub fn board_size(&self) -> BoardSize {
        self.size
    }

    fn idx(&self, (x, y): Point) -> usize {
        y * self.size() + x
    }

    pub fn on_board(&self, (x, y): Point) -> bool {
        x < self.size() && y < self.size()
    }

    pub fn get(&self, p: Point) -> Option<Color> {
        if !self.on_board(p) {
            return None;
        }
        self.cells[self.idx(p)]
    }

    /// Overwrite a point. Callers are responsible for rule enforcement.
    pub fn set(&mut self, p: Point, stone: Option<Color>) {
        if self.on_board(p) {
            let i = self.idx(p);
            self.cells[i] = stone;
        }
    }

    /// All points, row by row.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        let s = self.size();
        (0..s).flat_map(move |y| (0..s).map(move |x| (x, y)))
    }

    pub fn neighbors(&self, (x, y): Point) -> impl Iterator<Item = Point> + '_ {
        let s = self.size();
        let mut v = Vec::with_capacity(4);
        if x > 0 {
            v.push((x - 1, y));
        }
        if x + 1 < s {
            v.push((x + 1, y));
        }
        if y > 0 {
            v.push((x, y - 1));
        }
        if y + 1 < s {
            v.push((x, y + 1));
        }
        v.into_iter()
    }

    pub fn diagonal_neighbors(&self, (x, y): Point) -> impl Iterator<Item = Point> + '_ {
        let s = self.size();
        let mut v = Vec::with_capacity(4);
        if x > 0 && y > 0 {
            v.push((x - 1, y - 1));
        }
        if x > 0 && y + 1 < s {
            v.push((x - 1, y + 1));
        }
        if x + 1 < s && y > 0 {
            v.push((x + 1, y - 1));
        }
        if x + 1 < s && y + 1 < s {
            v.push((x + 1, y + 1));
        }
        v.into_iter()
    }

    /// The maximal same-colored group containing `start`, found breadth-first.
    ///
    /// The starting stone comes first. Returns an empty vector for an empty point.
    pub fn connected_group(&self, start: Point) -> Vec<Point> {
        let Some(color) = self.get(start) else {
            return Vec::new();
        };
        let mut visited = vec![false; self.cells.len()];
        let mut queue = VecDeque::from([start]);
        let mut group = Vec::new();
        visited[self.idx(start)] = true;

        while let Some(p) = queue.pop_front() {
            group.push(p);
            for n in self.neighbors(p) {
                let ni = self.idx(n);
                if !visited[ni] && self.get(n) == Some(color) {
                    visited[ni] = true;
                    queue.push_back(n);
                }
            }
        }
        group
    }

    /// Number of distinct empty points adjacent to any stone of `group`.
    pub fn group_liberties(&self, group: &[Point]) -> usize {
        let mut seen = vec![false; self.cells.len()];
        let mut libs = 0;
        for &p in group {
            for n in self.neighbors(p) {
                let ni = self.idx(n);
                if self.get(n).is_none() && !seen[ni] {
                    seen[ni] = true;
                    libs += 1;
                }
            }
        }
        libs
    }

    /// Liberties of the group through `p` (0 for an empty point).
    pub fn liberties_at(&self, p: Point) -> usize {
        self.group_liberties(&self.connected_group(p))
    }

    /// Stones of `color` adjacent to `p` whose groups have no liberties.
    ///
    /// Each stone appears once even if several neighbors share a group.
    pub fn dead_groups_around(&self, p: Point, color: Color) -> Vec<Point> {
        let mut dead: Vec<Point> = Vec::new();
        for n in self.neighbors(p) {
            if self.get(n) != Some(color) || dead.contains(&n) {
                continue;
            }
            let group = self.connected_group(n);
            if self.group_liberties(&group) == 0 {
                dead.extend(group);
            }
        }
        dead
    }

    pub fn count(&self, color: Color) -> usize {
        self.cells.iter().filter(|&&c| c == Some(color)).count()
    }

    pub fn is_star_point(&self, (x, y): Point) -> bool {
        let lines = self.size.star_lines();
        lines.contains(&x) && lines.contains(&y)
    }

    pub fn is_corner(&self, (x, y): Point) -> bool {
        let last = self.size() - 1;
        (x == 0 || x == last) && (y == 0 || y == last)
    }

    pub fn is_edge(&self, (x, y): Point) -> bool {
        let last = self.size() - 1;
        x == 0 || x == last || y == 0 || y == last
    }

    /// Rows of the grid, top to bottom, for rendering clients.
    pub fn rows(&self) -> Vec<Vec<Option<Color>>> {
        self.cells.chunks(self.size()).map(<[_]>::to_vec).collect()
    }
}

/// Parse a GTP vertex (e.g. "D4") on a board with `size` lines.
///
/// Columns use letters A-T skipping I; row 1 is the bottom line. Returns `None`
/// for malformed or off-board vertices. "pass" is not a vertex.
pub fn parse_vertex(s: &str, size: usize) -> Option<Point> {
    let bytes = s.as_bytes();
    if bytes.len() < 2 {
        return None;
    }

    let col_char = bytes[0].to_ascii_uppercase();
    if !col_char.is_ascii_uppercase() || col_char == b'I' {
        return None;
    }
    let mut col = (col_char - b'A') as usize;
    // Skip 'I' column (Go convention to avoid confusion with 'J')
    if col_char > b'I' {
        col -= 1;
    }

    let row: usize = s[1..].parse().ok()?;
    if col >= size || row == 0 || row > size {
        return None;
    }
    Some((col, size - row))
}

/// Convert a point to a GTP vertex string (e.g. "D4").
pub fn vertex_string((x, y): Point, size: usize) -> String {
    let mut c = b'A' + x as u8;
    if c >= b'I' {
        c += 1;
    }
    format!("{}{}", c as char, size - y)
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size() {
            for x in 0..self.size() {
                let ch = match self.get((x, y)) {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None if self.is_star_point((x, y)) => '+',
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
