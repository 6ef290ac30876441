use std::collections::BTreeSet;

use thiserror::Error;

macro_rules! validation_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Validation($msg.to_string())
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Validation(format!($fmt, $($arg)*))
    };
}

pub(crate) use validation_error;

/// Result alias used throughout the crate, generic over the vertex type carried by errors.
pub type GraphResult<T, V> = std::result::Result<T, Error<V>>;

/// Every error a graph operation can report.
///
/// The type is generic over the vertex identifier so that a negative-cycle witness or a
/// missing key is handed back in the caller's own vertex type. Index-level algorithms
/// report `Error<usize>` and the graph types translate indices back with
/// [`Error::map_vertices`].
///
/// # Error Categories
///
/// - [`Error::Validation`] - malformed input: undeclared vertex, conflicting edge payload,
///   NaN weight, negative capacity, duplicate disjoint-set key
/// - [`Error::Precondition`] - the algorithm cannot run on this graph shape
/// - [`Error::NegativeCycle`] - a negative-weight cycle makes shortest paths undefined
/// - [`Error::NoPathFound`] - no augmenting path is left in the residual network
/// - [`Error::KeyNotFound`] - a collaborator was asked about a key it never saw
///
/// # Examples
///
/// ```rust
/// use graph_engine::{Error, WeightedGraph};
///
/// let mut graph = WeightedGraph::new(["a", "b"], [("a", "b", -5.0), ("b", "a", 3.0)], true)?;
/// match graph.shortest_path(&"a", &"b") {
///     Err(Error::NegativeCycle { vertices }) => assert_eq!(vertices.len(), 2),
///     other => panic!("unexpected result: {other:?}"),
/// }
/// # Ok::<(), Error<&str>>(())
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error<V> {
    /// Input failed validation at construction, extension or query time.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The graph does not have the shape the algorithm requires, e.g. topological sort on
    /// an undirected or cyclic graph.
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// A negative-weight cycle was found. Shortest-path results are undefined.
    ///
    /// # Fields
    ///
    /// * `vertices` - the vertices lying on the detected cycle
    #[error("Graph contains a negative cycle: {vertices:?}")]
    NegativeCycle {
        /// Vertices on the detected cycle
        vertices: BTreeSet<V>,
    },

    /// The residual network holds no augmenting path from source to sink.
    ///
    /// Ends the Edmonds-Karp loop; public max-flow operations never return it.
    #[error("No augmenting path found")]
    NoPathFound,

    /// A key was looked up in a collaborator structure that does not hold it.
    #[error("Key not found: {0:?}")]
    KeyNotFound(V),
}

impl<V> Error<V> {
    /// Translate the vertices carried by this error into another vertex type.
    pub fn map_vertices<W, F>(self, mut f: F) -> Error<W>
    where
        W: Ord,
        F: FnMut(V) -> W,
    {
        match self {
            Error::Validation(message) => Error::Validation(message),
            Error::Precondition(message) => Error::Precondition(message),
            Error::NegativeCycle { vertices } => Error::NegativeCycle {
                vertices: vertices.into_iter().map(&mut f).collect(),
            },
            Error::NoPathFound => Error::NoPathFound,
            Error::KeyNotFound(key) => Error::KeyNotFound(f(key)),
        }
    }
}
