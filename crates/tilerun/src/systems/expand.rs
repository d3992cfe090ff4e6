//! Lazy decompression of authored tile ranges and patterns.
//!
//! A level stores geometry as tile entries covering rectangular ranges, and
//! entries may stamp a named pattern instead of a literal tile. Patterns nest
//! to any depth, with offsets adding up along the way. `expand_tiles` walks
//! that tree on demand and yields one `Placement` per covered cell, in input
//! order, without building intermediate lists.

use std::collections::HashMap;
use std::iter::FusedIterator;

use crate::assets::manifest::{PatternSpec, TileSpec};
use crate::error::LevelError;

/// Every integer cell of a half-open rectangle, x outer and y inner.
#[derive(Debug, Clone)]
pub struct Span {
    x: i32,
    y: i32,
    x_end: i32,
    y_start: i32,
    y_end: i32,
}

impl Iterator for Span {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        if self.y_start >= self.y_end {
            return None;
        }
        if self.x >= self.x_end {
            return None;
        }
        let cell = (self.x, self.y);
        self.y += 1;
        if self.y >= self.y_end {
            self.y = self.y_start;
            self.x += 1;
        }
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.x >= self.x_end || self.y_start >= self.y_end {
            return (0, Some(0));
        }
        let columns = (self.x_end as i64 - self.x as i64) as u64;
        let height = (self.y_end as i64 - self.y_start as i64) as u64;
        let remaining = (columns * height).saturating_sub((self.y as i64 - self.y_start as i64) as u64);
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for Span {}

/// Cells of `[x_start, x_start + x_len) × [y_start, y_start + y_len)`.
/// Non-positive lengths give an empty span. Fails if either end does not
/// fit in an `i32`.
pub fn expand_span(x_start: i32, x_len: i32, y_start: i32, y_len: i32) -> Result<Span, LevelError> {
    let overflow = || LevelError::CoordinateOverflow {
        x: x_start,
        y: y_start,
        dx: x_len,
        dy: y_len,
    };
    let x_end = x_start.checked_add(x_len.max(0)).ok_or_else(overflow)?;
    let y_end = y_start.checked_add(y_len.max(0)).ok_or_else(overflow)?;
    Ok(Span {
        x: x_start,
        y: y_start,
        x_end,
        y_start,
        y_end,
    })
}

/// Decode one range: `[x, y]`, `[x, width, y]` or `[x, width, y, height]`.
pub fn expand_range(range: &[i32]) -> Result<Span, LevelError> {
    match *range {
        [x_start, x_len, y_start, y_len] => expand_span(x_start, x_len, y_start, y_len),
        [x_start, x_len, y_start] => expand_span(x_start, x_len, y_start, 1),
        [x_start, y_start] => expand_span(x_start, 1, y_start, 1),
        _ => Err(LevelError::MalformedRange { range: range.to_vec() }),
    }
}

/// Concatenate the cells of several ranges, in list order.
/// A malformed range yields its error in place and ends the sequence.
pub fn expand_ranges(ranges: &[Vec<i32>]) -> impl Iterator<Item = Result<(i32, i32), LevelError>> + '_ {
    let mut failed = false;
    ranges
        .iter()
        .map(|range| expand_range(range))
        .flat_map(|span| -> Box<dyn Iterator<Item = Result<(i32, i32), LevelError>>> {
            match span {
                Ok(span) => Box::new(span.map(Ok)),
                Err(err) => Box::new(std::iter::once(Err(err))),
            }
        })
        .take_while(move |cell| {
            if failed {
                return false;
            }
            failed = cell.is_err();
            true
        })
}

/// A literal tile stamped at an absolute cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement<'a> {
    pub tile: &'a TileSpec,
    pub x: i32,
    pub y: i32,
}

/// One level of the walk: a tile list placed at an offset.
#[derive(Debug)]
struct Frame<'a> {
    /// Pattern this frame expands, `None` for the root list.
    pattern: Option<&'a str>,
    tiles: &'a [TileSpec],
    offset_x: i32,
    offset_y: i32,
    /// Index of the tile entry being expanded.
    tile: usize,
    /// Index of the next range of that entry.
    range: usize,
    cells: Option<Span>,
}

impl<'a> Frame<'a> {
    fn new(pattern: Option<&'a str>, tiles: &'a [TileSpec], offset_x: i32, offset_y: i32) -> Self {
        Self {
            pattern,
            tiles,
            offset_x,
            offset_y,
            tile: 0,
            range: 0,
            cells: None,
        }
    }
}

/// Pull-based walk over a tile tree. Created by [`expand_tiles`].
///
/// Yields `Err` once and then stops on the first bad input: a malformed
/// range, a cell pushed off the `i32` grid, an unknown pattern, or a pattern
/// that references itself through any chain.
#[derive(Debug)]
pub struct ExpandTiles<'a> {
    patterns: &'a HashMap<String, PatternSpec>,
    stack: Vec<Frame<'a>>,
}

impl<'a> ExpandTiles<'a> {
    fn fail(&mut self, err: LevelError) -> Option<Result<Placement<'a>, LevelError>> {
        self.stack.clear();
        Some(Err(err))
    }

    /// Patterns currently being expanded, outermost first.
    fn active_chain(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.stack.iter().filter_map(|frame| frame.pattern)
    }
}

impl<'a> Iterator for ExpandTiles<'a> {
    type Item = Result<Placement<'a>, LevelError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let tiles = frame.tiles;
            let Some(entry) = tiles.get(frame.tile) else {
                self.stack.pop();
                continue;
            };

            let next_cell = frame.cells.as_mut().and_then(Iterator::next);
            let (x, y) = match next_cell {
                Some(cell) => cell,
                None => {
                    match entry.ranges.get(frame.range) {
                        Some(range) => match expand_range(range) {
                            Ok(span) => {
                                frame.cells = Some(span);
                                frame.range += 1;
                            }
                            Err(err) => return self.fail(err),
                        },
                        None => {
                            frame.tile += 1;
                            frame.range = 0;
                            frame.cells = None;
                        }
                    }
                    continue;
                }
            };

            let (Some(abs_x), Some(abs_y)) = (x.checked_add(frame.offset_x), y.checked_add(frame.offset_y)) else {
                let err = LevelError::CoordinateOverflow {
                    x,
                    y,
                    dx: frame.offset_x,
                    dy: frame.offset_y,
                };
                return self.fail(err);
            };

            let Some(name) = entry.pattern.as_deref() else {
                return Some(Ok(Placement { tile: entry, x: abs_x, y: abs_y }));
            };

            let patterns = self.patterns;
            let Some((key, pattern)) = patterns.get_key_value(name) else {
                return self.fail(LevelError::UnknownPattern { name: name.to_string() });
            };
            if self.active_chain().any(|active| active == name) {
                let mut chain: Vec<String> = self.active_chain().map(str::to_string).collect();
                chain.push(name.to_string());
                return self.fail(LevelError::PatternCycle { chain });
            }
            self.stack.push(Frame::new(Some(key.as_str()), &pattern.tiles, abs_x, abs_y));
        }
    }
}

impl FusedIterator for ExpandTiles<'_> {}

/// Expand `tiles` against `patterns`, yielding every literal tile placement.
///
/// Later placements at the same cell are meant to overwrite earlier ones, so
/// consumers should apply them in the order they arrive.
pub fn expand_tiles<'a>(tiles: &'a [TileSpec], patterns: &'a HashMap<String, PatternSpec>) -> ExpandTiles<'a> {
    ExpandTiles {
        patterns,
        stack: vec![Frame::new(None, tiles, 0, 0)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(name: &str, ranges: Vec<Vec<i32>>) -> TileSpec {
        TileSpec {
            name: Some(name.to_string()),
            tile_type: Some("ground".to_string()),
            ranges,
            ..Default::default()
        }
    }

    fn pattern_ref(name: &str, ranges: Vec<Vec<i32>>) -> TileSpec {
        TileSpec {
            pattern: Some(name.to_string()),
            ranges,
            ..Default::default()
        }
    }

    fn cells(tiles: &[TileSpec], patterns: &HashMap<String, PatternSpec>) -> Vec<(String, i32, i32)> {
        expand_tiles(tiles, patterns)
            .map(|p| {
                let p = p.unwrap();
                (p.tile.name.clone().unwrap_or_default(), p.x, p.y)
            })
            .collect()
    }

    #[test]
    fn span_covers_rectangle_once() {
        let got: Vec<_> = expand_span(0, 3, 0, 2).unwrap().collect();
        assert_eq!(got, vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)]);
    }

    #[test]
    fn span_size_hint_is_exact() {
        let mut span = expand_span(-2, 4, 10, 3).unwrap();
        assert_eq!(span.size_hint(), (12, Some(12)));
        span.next();
        span.next();
        span.next();
        span.next();
        assert_eq!(span.size_hint(), (8, Some(8)));
        assert_eq!(span.count(), 8);
    }

    #[test]
    fn empty_spans() {
        assert_eq!(expand_span(0, 0, 0, 5).unwrap().count(), 0);
        assert_eq!(expand_span(0, 5, 0, 0).unwrap().count(), 0);
        assert_eq!(expand_span(0, -3, 0, 2).unwrap().count(), 0);
    }

    #[test]
    fn span_reaching_past_i32_is_an_error() {
        match expand_range(&[i32::MAX, 0]) {
            Err(LevelError::CoordinateOverflow { x, dx, .. }) => assert_eq!((x, dx), (i32::MAX, 1)),
            other => panic!("expected CoordinateOverflow, got {other:?}"),
        }
        assert!(expand_span(0, 1, i32::MAX - 1, 2).is_err());
        // The last representable cell is still reachable.
        let got: Vec<_> = expand_range(&[i32::MAX - 1, 0]).unwrap().collect();
        assert_eq!(got, vec![(i32::MAX - 1, 0)]);
    }

    #[test]
    fn pattern_offset_past_i32_is_an_error() {
        let mut patterns = HashMap::new();
        patterns.insert(
            "edge".to_string(),
            PatternSpec { tiles: vec![tile("brick", vec![vec![i32::MAX - 1, 0]])] },
        );
        let tiles = vec![pattern_ref("edge", vec![vec![5, 0]])];

        let results: Vec<_> = expand_tiles(&tiles, &patterns).collect();
        assert_eq!(results.len(), 1);
        match &results[0] {
            Err(LevelError::CoordinateOverflow { x, y, dx, dy }) => {
                assert_eq!((*x, *y, *dx, *dy), (i32::MAX - 1, 0, 5, 0));
            }
            other => panic!("expected CoordinateOverflow, got {other:?}"),
        }
    }

    #[test]
    fn two_value_range_is_single_cell() {
        let got: Vec<_> = expand_range(&[5, 7]).unwrap().collect();
        assert_eq!(got, vec![(5, 7)]);
    }

    #[test]
    fn three_value_range_defaults_height() {
        let got: Vec<_> = expand_range(&[2, 3, 9]).unwrap().collect();
        assert_eq!(got, vec![(2, 9), (3, 9), (4, 9)]);
    }

    #[test]
    fn malformed_range_is_an_error() {
        let cases: [&[i32]; 3] = [&[], &[1], &[1, 2, 3, 4, 5]];
        for bad in cases {
            match expand_range(bad) {
                Err(LevelError::MalformedRange { range }) => assert_eq!(range, bad.to_vec()),
                other => panic!("expected MalformedRange, got {other:?}"),
            }
        }
    }

    #[test]
    fn ranges_concatenate_in_order() {
        let ranges = vec![vec![0, 0], vec![10, 2, 1], vec![-1, -1]];
        let got: Vec<_> = expand_ranges(&ranges).map(Result::unwrap).collect();
        assert_eq!(got, vec![(0, 0), (10, 1), (11, 1), (-1, -1)]);
    }

    #[test]
    fn ranges_stop_after_malformed_entry() {
        let ranges = vec![vec![0, 0], vec![1, 2, 3, 4, 5], vec![9, 9]];
        let got: Vec<_> = expand_ranges(&ranges).collect();
        assert_eq!(got.len(), 2);
        assert!(got[0].is_ok());
        assert!(matches!(got[1], Err(LevelError::MalformedRange { .. })));
    }

    #[test]
    fn literal_tiles_expand_in_entry_order() {
        let tiles = vec![tile("sky", vec![vec![0, 2, 0, 1]]), tile("ground", vec![vec![0, 1]])];
        let got = cells(&tiles, &HashMap::new());
        assert_eq!(
            got,
            vec![
                ("sky".to_string(), 0, 0),
                ("sky".to_string(), 1, 0),
                ("ground".to_string(), 0, 1),
            ]
        );
    }

    #[test]
    fn pattern_applies_offset() {
        let mut patterns = HashMap::new();
        patterns.insert(
            "ledge".to_string(),
            PatternSpec { tiles: vec![tile("brick", vec![vec![0, 2, 0, 1]])] },
        );
        let tiles = vec![pattern_ref("ledge", vec![vec![10, 20]])];

        let got = cells(&tiles, &patterns);
        assert_eq!(got, vec![("brick".to_string(), 10, 20), ("brick".to_string(), 11, 20)]);
    }

    #[test]
    fn nested_patterns_accumulate_offsets() {
        let mut patterns = HashMap::new();
        patterns.insert(
            "cloud".to_string(),
            PatternSpec { tiles: vec![tile("cloud", vec![vec![1, 1]])] },
        );
        patterns.insert(
            "sky-strip".to_string(),
            PatternSpec {
                tiles: vec![pattern_ref("cloud", vec![vec![0, 0], vec![100, 0]])],
            },
        );
        let tiles = vec![pattern_ref("sky-strip", vec![vec![5, 2, 10, 1]])];

        let mut got: Vec<_> = cells(&tiles, &patterns).into_iter().map(|(_, x, y)| (x, y)).collect();
        got.sort_unstable();
        assert_eq!(got, vec![(6, 11), (7, 11), (106, 11), (107, 11)]);
    }

    #[test]
    fn pattern_stamped_over_many_cells_is_lazy() {
        let mut patterns = HashMap::new();
        patterns.insert(
            "block".to_string(),
            PatternSpec { tiles: vec![tile("brick", vec![vec![0, 100, 0, 100]])] },
        );
        let tiles = vec![pattern_ref("block", vec![vec![0, 1000, 0, 1000]])];

        let first: Vec<_> = expand_tiles(&tiles, &patterns).take(3).map(Result::unwrap).collect();
        assert_eq!(first.len(), 3);
        assert_eq!((first[0].x, first[0].y), (0, 0));
        assert_eq!((first[2].x, first[2].y), (0, 2));
    }

    #[test]
    fn unknown_pattern_is_an_error() {
        let tiles = vec![pattern_ref("missing", vec![vec![0, 0]])];
        let patterns = HashMap::new();
        let mut iter = expand_tiles(&tiles, &patterns);
        match iter.next() {
            Some(Err(LevelError::UnknownPattern { name })) => assert_eq!(name, "missing"),
            other => panic!("expected UnknownPattern, got {other:?}"),
        }
        assert!(iter.next().is_none());
    }

    #[test]
    fn self_reference_is_detected() {
        let mut patterns = HashMap::new();
        patterns.insert(
            "loop".to_string(),
            PatternSpec {
                tiles: vec![tile("brick", vec![vec![0, 0]]), pattern_ref("loop", vec![vec![1, 0]])],
            },
        );
        let tiles = vec![pattern_ref("loop", vec![vec![0, 0]])];

        let results: Vec<_> = expand_tiles(&tiles, &patterns).collect();
        assert!(results[0].is_ok());
        match results.last() {
            Some(Err(LevelError::PatternCycle { chain })) => {
                assert_eq!(chain, &vec!["loop".to_string(), "loop".to_string()]);
            }
            other => panic!("expected PatternCycle, got {other:?}"),
        }
    }

    #[test]
    fn mutual_recursion_is_detected() {
        let mut patterns = HashMap::new();
        patterns.insert("a".to_string(), PatternSpec { tiles: vec![pattern_ref("b", vec![vec![0, 0]])] });
        patterns.insert("b".to_string(), PatternSpec { tiles: vec![pattern_ref("a", vec![vec![0, 0]])] });
        let tiles = vec![pattern_ref("a", vec![vec![0, 0]])];

        let err = expand_tiles(&tiles, &patterns)
            .find_map(Result::err)
            .expect("cycle should be reported");
        match err {
            LevelError::PatternCycle { chain } => assert_eq!(chain, vec!["a", "b", "a"]),
            other => panic!("expected PatternCycle, got {other:?}"),
        }
    }

    #[test]
    fn reusing_a_pattern_side_by_side_is_not_a_cycle() {
        let mut patterns = HashMap::new();
        patterns.insert("dot".to_string(), PatternSpec { tiles: vec![tile("dot", vec![vec![0, 0]])] });
        patterns.insert(
            "pair".to_string(),
            PatternSpec {
                tiles: vec![pattern_ref("dot", vec![vec![0, 0]]), pattern_ref("dot", vec![vec![1, 0]])],
            },
        );
        let tiles = vec![pattern_ref("pair", vec![vec![0, 0], vec![0, 5]])];

        let got = cells(&tiles, &patterns);
        assert_eq!(got.len(), 4);
    }

    #[test]
    fn malformed_range_inside_pattern_is_reported() {
        let mut patterns = HashMap::new();
        patterns.insert(
            "broken".to_string(),
            PatternSpec { tiles: vec![tile("brick", vec![vec![0, 0, 0, 0, 0]])] },
        );
        let tiles = vec![pattern_ref("broken", vec![vec![3, 3]])];
        let results: Vec<_> = expand_tiles(&tiles, &patterns).collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(LevelError::MalformedRange { .. })));
    }
}
