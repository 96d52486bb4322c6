use thiserror::Error;

/// Top-level error type for outline offsetting.
#[derive(Debug, Error)]
pub enum PathOffsetError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to the precision policy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("precision baseline must be at least one significant digit")]
    ZeroBaseline,
}

/// Errors related to the input outline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("outline has no segments")]
    EmptyOutline,

    #[error("outline is not closed: segment {index} does not end where the next one starts")]
    NotClosed { index: usize },

    #[error("segment {index} is a {kind} curve; only lines and elliptical arcs are supported")]
    UnsupportedSegment { index: usize, kind: &'static str },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors raised while computing an offset or bevel.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OperationError {
    #[error("ambiguous intersection: {0}")]
    AmbiguousIntersection(String),

    #[error("offset collapses the outline: {0}")]
    DegenerateOutline(String),
}

/// Coarse classification of a [`PathOffsetError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid precision request.
    Configuration,
    /// Input outline is not closed or contains a segment other than a line or arc.
    UnsupportedGeometry,
    /// Coincident configuration the solver refuses to guess through.
    AmbiguousIntersection,
    /// The offset distance collapses the whole shape, or a segment has no
    /// direction to work with.
    DegenerateOutline,
}

impl PathOffsetError {
    /// Returns the coarse kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Geometry(GeometryError::Degenerate(_)) => ErrorKind::DegenerateOutline,
            Self::Geometry(_) => ErrorKind::UnsupportedGeometry,
            Self::Operation(OperationError::AmbiguousIntersection(_)) => {
                ErrorKind::AmbiguousIntersection
            }
            Self::Operation(OperationError::DegenerateOutline(_)) => ErrorKind::DegenerateOutline,
        }
    }
}

/// Convenience type alias for results using [`PathOffsetError`].
pub type Result<T> = std::result::Result<T, PathOffsetError>;
