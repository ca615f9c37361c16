//! Parametric shapes
//!
//! Each shape variant is a zero-sized generator type that knows how to:
//! - Supply default parameters and their metadata
//! - Validate a parameter set
//! - Turn a parameter set into an ordered list of positions
//!
//! A [`Shape`] pairs a variant with its parameters and owns the generated
//! points. The points are only ever written by regeneration.

pub mod circle;
pub mod defaults;
pub mod line;
pub mod polygon;
pub mod registry;

use std::collections::BTreeMap;

use enum_dispatch::enum_dispatch;
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::errors::ShapeError;
use crate::point::{Point, PointIdAllocator};
use crate::types::{NumericError, check_finite, check_integer_at_least, check_non_negative};

pub use circle::Circle;
pub use line::Line;
pub use polygon::Polygon;
pub use registry::ShapeRegistry;

/// Most points one shape may generate. Checked before anything is allocated.
pub const MAX_POINTS: u32 = 10_000;

/// Named numeric parameters of a shape, kept in name order
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(BTreeMap<String, f64>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Parameters(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Presentation metadata for one parameter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamMeta {
    pub name: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

/// Typed reads from a parameter set on behalf of one shape variant
pub(crate) struct ParamReader<'a> {
    shape: &'static str,
    params: &'a Parameters,
}

impl<'a> ParamReader<'a> {
    pub(crate) fn new(shape: &'static str, params: &'a Parameters) -> Self {
        Self { shape, params }
    }

    fn raw(&self, name: &str) -> Result<f64, ShapeError> {
        self.params.get(name).ok_or_else(|| ShapeError::MissingParameter {
            shape: self.shape.to_string(),
            name: name.to_string(),
        })
    }

    fn check(
        &self,
        name: &str,
        check: impl FnOnce(f64) -> Result<f64, NumericError>,
    ) -> Result<f64, ShapeError> {
        let value = self.raw(name)?;
        check(value).map_err(|reason| ShapeError::invalid(self.shape, name, value, reason))
    }

    /// Any finite number
    pub(crate) fn finite(&self, name: &str) -> Result<f64, ShapeError> {
        self.check(name, check_finite)
    }

    /// A finite number no smaller than zero
    pub(crate) fn non_negative(&self, name: &str) -> Result<f64, ShapeError> {
        self.check(name, check_non_negative)
    }

    /// A whole number from `min` up to [`MAX_POINTS`]
    pub(crate) fn count(&self, name: &str, min: u32) -> Result<u32, ShapeError> {
        let value = self.check(name, |v| check_integer_at_least(v, min as f64))?;
        if value > MAX_POINTS as f64 {
            return Err(ShapeError::invalid(
                self.shape,
                name,
                value,
                NumericError::AboveMaximum(MAX_POINTS as f64),
            ));
        }
        Ok(value as u32)
    }

    /// Reject `groups` repetitions of `per` points when the total passes
    /// [`MAX_POINTS`]. The error names the `per` parameter.
    pub(crate) fn total_points(&self, name: &str, per: u32, groups: u32) -> Result<usize, ShapeError> {
        let total = per as u64 * groups as u64;
        if total > MAX_POINTS as u64 {
            let max = (MAX_POINTS / groups.max(1)) as f64;
            return Err(ShapeError::invalid(self.shape, name, per as f64, NumericError::AboveMaximum(max)));
        }
        Ok(total as usize)
    }

    pub(crate) fn point(&self, x: &str, y: &str) -> Result<DVec2, ShapeError> {
        Ok(glam::dvec2(self.finite(x)?, self.finite(y)?))
    }
}

/// Common behavior for all shape variants
#[enum_dispatch]
pub trait Generator {
    /// Type tag used in import keys and the registry
    fn tag(&self) -> &'static str;

    /// Human-readable variant name, used for default shape names
    fn label(&self) -> &'static str;

    /// Metadata for every parameter the variant accepts
    fn metadata(&self) -> &'static [ParamMeta];

    /// Parameter values that always produce a valid point set
    fn defaults(&self) -> Parameters;

    /// Positions for a parameter set, in generation order.
    /// Fails without side effects when a parameter is out of domain.
    fn positions(&self, params: &Parameters) -> Result<Vec<DVec2>, ShapeError>;

    /// Check a parameter set without generating anything
    fn validate(&self, params: &Parameters) -> Result<(), ShapeError> {
        self.positions(params).map(|_| ())
    }

    /// Whether `name` is one of this variant's parameters
    fn accepts(&self, name: &str) -> bool {
        self.metadata().iter().any(|m| m.name == name)
    }

    /// Overlay `overrides` on the defaults and validate the result.
    /// Names the variant does not declare are rejected.
    fn resolve(&self, overrides: &Parameters) -> Result<Parameters, ShapeError> {
        let mut params = self.defaults();
        for (name, value) in overrides.iter() {
            if !self.accepts(name) {
                return Err(ShapeError::UnknownParameter {
                    shape: self.tag().to_string(),
                    name: name.to_string(),
                });
            }
            params.set(name, value);
        }
        self.validate(&params)?;
        Ok(params)
    }

    /// Generate the point set, stamping fresh IDs.
    /// No IDs are allocated when validation fails.
    fn generate(
        &self,
        params: &Parameters,
        ids: &mut PointIdAllocator,
    ) -> Result<Vec<Point>, ShapeError> {
        let positions = self.positions(params)?;
        Ok(ids.points(positions))
    }
}

/// The closed set of built-in shape variants
#[enum_dispatch(Generator)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Circle(Circle),
    Line(Line),
    Polygon(Polygon),
}

impl ShapeKind {
    pub const CIRCLE: ShapeKind = ShapeKind::Circle(Circle);
    pub const LINE: ShapeKind = ShapeKind::Line(Line);
    pub const POLYGON: ShapeKind = ShapeKind::Polygon(Polygon);
}

/// Names are written into line-oriented artifacts, so control characters
/// (line breaks included) become spaces.
pub(crate) fn single_line(name: String) -> String {
    if name.chars().any(char::is_control) {
        name.chars().map(|c| if c.is_control() { ' ' } else { c }).collect()
    } else {
        name
    }
}

/// A shape in a composition: a variant, its parameters and the points
/// generated from them.
#[derive(Debug)]
pub struct Shape {
    id: String,
    name: String,
    kind: ShapeKind,
    parameters: Parameters,
    points: Vec<Point>,
    selected: bool,
    manipulate: bool,
}

impl Shape {
    /// Build a shape from validated parameters
    pub(crate) fn new(
        id: String,
        name: String,
        kind: ShapeKind,
        parameters: Parameters,
        ids: &mut PointIdAllocator,
    ) -> Result<Self, ShapeError> {
        let points = kind.generate(&parameters, ids)?;
        crate::log::debug!(id = %id, kind = kind.tag(), points = points.len(), "shape created");
        Ok(Self {
            id,
            name: single_line(name),
            kind,
            parameters,
            points,
            selected: false,
            manipulate: false,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// The points generated from the current parameters
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Auxiliary helper shapes are shown but never exported
    pub fn is_manipulate(&self) -> bool {
        self.manipulate
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub(crate) fn set_manipulate(&mut self, manipulate: bool) {
        self.manipulate = manipulate;
    }

    pub(crate) fn rename(&mut self, name: String) {
        self.name = single_line(name);
    }

    /// Change one parameter and regenerate. On error nothing changes.
    pub(crate) fn set_parameter(
        &mut self,
        name: &str,
        value: f64,
        ids: &mut PointIdAllocator,
    ) -> Result<(), ShapeError> {
        if !self.kind.accepts(name) {
            return Err(ShapeError::UnknownParameter {
                shape: self.kind.tag().to_string(),
                name: name.to_string(),
            });
        }
        let mut next = self.parameters.clone();
        next.set(name, value);
        let points = self.kind.generate(&next, ids)?;
        crate::log::debug!(id = %self.id, name, value, "parameter changed, shape regenerated");
        self.parameters = next;
        self.points = points;
        Ok(())
    }

    /// Regenerate with fresh IDs. The old IDs are abandoned.
    pub fn regenerate(&mut self, ids: &mut PointIdAllocator) -> Result<(), ShapeError> {
        self.points = self.kind.generate(&self.parameters, ids)?;
        Ok(())
    }
}
