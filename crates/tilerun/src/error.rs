use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while loading, building or stepping a level.
#[derive(Debug, Error)]
pub enum LevelError {
    /// A range must hold 2, 3 or 4 integers.
    #[error("malformed range {range:?}: expected 2, 3 or 4 values, got {}", range.len())]
    MalformedRange { range: Vec<i32> },

    #[error("tile entry references unknown pattern `{name}`")]
    UnknownPattern { name: String },

    /// `chain` lists the active patterns, outermost first, ending with the
    /// pattern that was referenced again.
    #[error("pattern cycle detected: {}", chain.join(" -> "))]
    PatternCycle { chain: Vec<String> },

    /// A range or pattern offset reaches past the `i32` cell grid.
    #[error("tile coordinates overflow: ({x}, {y}) + ({dx}, {dy})")]
    CoordinateOverflow { x: i32, y: i32, dx: i32, dy: i32 },

    #[error("no entity constructor registered for `{name}`")]
    UnknownEntity { name: String },

    #[error("collision check attempted before a collision grid was set")]
    MissingCollisionGrid,

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_range_reports_arity() {
        let err = LevelError::MalformedRange { range: vec![1, 2, 3, 4, 5] };
        assert_eq!(
            err.to_string(),
            "malformed range [1, 2, 3, 4, 5]: expected 2, 3 or 4 values, got 5"
        );
    }

    #[test]
    fn cycle_lists_chain() {
        let err = LevelError::PatternCycle {
            chain: vec!["castle".into(), "tower".into(), "castle".into()],
        };
        assert_eq!(err.to_string(), "pattern cycle detected: castle -> tower -> castle");
    }

    #[test]
    fn overflow_shows_both_operands() {
        let err = LevelError::CoordinateOverflow { x: i32::MAX, y: 0, dx: 1, dy: 1 };
        assert_eq!(err.to_string(), "tile coordinates overflow: (2147483647, 0) + (1, 1)");
    }
}
