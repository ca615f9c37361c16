//! Compose parametric 2-D shapes into a deduplicated list of particle
//! placements, with an import key that rebuilds the composition later.
//!
//! ```
//! use pointcraft::{Composition, Edit, ShapeKind, ShapeSpec, Tolerance, dedupe};
//!
//! let composition = Composition::new()
//!     .with(Edit::Add(ShapeSpec::new(ShapeKind::CIRCLE).with_param("count", 4.0)))?
//!     .with(Edit::Add(ShapeSpec::new(ShapeKind::CIRCLE).with_param("count", 8.0)))?;
//!
//! // The 4-point circle's points all coincide with points of the 8-point one.
//! let points = dedupe(composition.candidates(), Tolerance::new(1e-9)?);
//! assert_eq!(points.len(), 8);
//!
//! let token = pointcraft::codec::encode(&composition);
//! let restored = pointcraft::codec::decode(&token, &pointcraft::ShapeRegistry::builtin())?;
//! assert_eq!(restored.len(), 2);
//! # Ok::<(), miette::Report>(())
//! ```

pub mod codec;
pub mod composition;
pub mod dedupe;
pub mod errors;
pub mod export;
pub mod format;
pub mod log;
pub mod point;
pub mod shape;
pub mod types;

pub use composition::{Composition, Edit, Fingerprint, ShapeSpec};
pub use dedupe::{DedupeCache, ProcessedPoint, ProcessedShape, ShapeContext, dedupe, dedupe_grouped};
pub use errors::{CodecError, CompositionError, ImportError, ShapeError};
pub use export::ExportOptions;
pub use format::{round, to_minimal_decimal_string};
pub use point::{Point, PointId, PointIdAllocator};
pub use shape::{Generator, MAX_POINTS, ParamMeta, Parameters, Shape, ShapeKind, ShapeRegistry};
pub use types::{Degrees, NumericError, Precision, Tolerance};
