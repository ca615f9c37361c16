//! Composition state - the ordered shapes a user has authored and the edits
//! that change them

use glam::DVec2;

use crate::dedupe::ShapeContext;
use crate::errors::{CompositionError, ShapeError};
use crate::point::{PointId, PointIdAllocator};
use crate::shape::{Generator, Parameters, Shape, ShapeKind};
use crate::types::Tolerance;

/// Description of a shape to add: a variant plus parameter overrides
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeSpec {
    pub kind: ShapeKind,
    /// Display name; a numbered default is used when absent
    pub name: Option<String>,
    /// Overrides applied on top of the variant's defaults
    pub parameters: Parameters,
    pub manipulate: bool,
}

impl ShapeSpec {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            name: None,
            parameters: Parameters::new(),
            manipulate: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: f64) -> Self {
        self.parameters.set(name, value);
        self
    }

    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn manipulate(mut self, manipulate: bool) -> Self {
        self.manipulate = manipulate;
        self
    }
}

/// A change to a composition
#[derive(Clone, Debug, PartialEq)]
pub enum Edit {
    Add(ShapeSpec),
    Remove { id: String },
    RemoveSelected,
    SetParameter { id: String, name: String, value: f64 },
    /// Select a shape; without `additive` every other shape is deselected
    Select { id: String, additive: bool },
    ClearSelection,
    Rename { id: String, name: String },
    SetManipulate { id: String, manipulate: bool },
    /// Swap in a whole new set of shapes (import)
    Replace(Vec<ShapeSpec>),
}

/// Memoization key for point processing. Equal fingerprints guarantee equal
/// dedupe output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fingerprint {
    tolerance: u64,
    shapes: Vec<ShapeStamp>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ShapeStamp {
    selected: bool,
    manipulate: bool,
    name: String,
    points: Vec<PointId>,
}

/// Ordered shapes plus the allocator that stamps their points
#[derive(Debug, Default)]
pub struct Composition {
    shapes: Vec<Shape>,
    ids: PointIdAllocator,
    /// Source of shape ids and default names; never rewinds
    next_seq: u64,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a composition from shape specs, failing on the first invalid one
    pub fn from_specs(specs: Vec<ShapeSpec>) -> Result<Self, CompositionError> {
        let mut composition = Self::new();
        composition.apply(Edit::Replace(specs))?;
        Ok(composition)
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn selected(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|s| s.is_selected())
    }

    /// Total generated points, manipulate shapes included
    pub fn point_count(&self) -> usize {
        self.shapes.iter().map(|s| s.points().len()).sum()
    }

    /// Add one shape, returning it. Parameters are validated before any
    /// point is allocated.
    pub fn add(&mut self, spec: ShapeSpec) -> Result<&Shape, ShapeError> {
        let parameters = spec.kind.resolve(&spec.parameters)?;
        self.push_resolved(spec.kind, spec.name, parameters, spec.manipulate)
    }

    fn push_resolved(
        &mut self,
        kind: ShapeKind,
        name: Option<String>,
        parameters: Parameters,
        manipulate: bool,
    ) -> Result<&Shape, ShapeError> {
        let seq = self.next_seq + 1;
        let id = format!("{}-{}", kind.tag(), seq);
        let name = name.unwrap_or_else(|| format!("{} {}", kind.label(), seq));
        let mut shape = Shape::new(id, name, kind, parameters, &mut self.ids)?;
        shape.set_manipulate(manipulate);
        self.next_seq = seq;
        self.shapes.push(shape);
        Ok(&self.shapes[self.shapes.len() - 1])
    }

    fn index_of(&self, id: &str) -> Result<usize, CompositionError> {
        self.shapes
            .iter()
            .position(|s| s.id() == id)
            .ok_or_else(|| CompositionError::UnknownShape { id: id.to_string() })
    }

    /// Apply an edit. A failed edit changes nothing.
    pub fn apply(&mut self, edit: Edit) -> Result<(), CompositionError> {
        crate::log::debug!(?edit, "applying edit");
        match edit {
            Edit::Add(spec) => {
                self.add(spec)?;
            }
            Edit::Remove { id } => {
                let index = self.index_of(&id)?;
                self.shapes.remove(index);
            }
            Edit::RemoveSelected => {
                self.shapes.retain(|s| !s.is_selected());
            }
            Edit::SetParameter { id, name, value } => {
                let index = self.index_of(&id)?;
                self.shapes[index].set_parameter(&name, value, &mut self.ids)?;
            }
            Edit::Select { id, additive } => {
                let index = self.index_of(&id)?;
                if !additive {
                    for shape in &mut self.shapes {
                        shape.set_selected(false);
                    }
                }
                self.shapes[index].set_selected(true);
            }
            Edit::ClearSelection => {
                for shape in &mut self.shapes {
                    shape.set_selected(false);
                }
            }
            Edit::Rename { id, name } => {
                let index = self.index_of(&id)?;
                self.shapes[index].rename(name);
            }
            Edit::SetManipulate { id, manipulate } => {
                let index = self.index_of(&id)?;
                self.shapes[index].set_manipulate(manipulate);
            }
            Edit::Replace(specs) => {
                // Validate everything before touching the current shapes.
                let resolved = specs
                    .into_iter()
                    .map(|spec| {
                        let parameters = spec.kind.resolve(&spec.parameters)?;
                        Ok((spec, parameters))
                    })
                    .collect::<Result<Vec<_>, ShapeError>>()?;
                self.shapes.clear();
                for (spec, parameters) in resolved {
                    self.push_resolved(spec.kind, spec.name, parameters, spec.manipulate)?;
                }
            }
        }
        Ok(())
    }

    /// Apply an edit by value, for chaining
    pub fn with(mut self, edit: Edit) -> Result<Self, CompositionError> {
        self.apply(edit)?;
        Ok(self)
    }

    /// Every generated point with the context of its shape, in composition
    /// order then point order
    pub fn candidates(&self) -> impl Iterator<Item = (DVec2, ShapeContext<'_>)> {
        self.shapes.iter().enumerate().flat_map(|(index, shape)| {
            let ctx = ShapeContext {
                index,
                name: shape.name(),
                selected: shape.is_selected(),
                manipulate: shape.is_manipulate(),
            };
            shape.points().iter().map(move |p| (p.pos, ctx))
        })
    }

    /// Key for memoizing point processing: selection flags, point
    /// identities, names and the tolerance
    pub fn fingerprint(&self, tolerance: Tolerance) -> Fingerprint {
        Fingerprint {
            tolerance: tolerance.raw().to_bits(),
            shapes: self
                .shapes
                .iter()
                .map(|s| ShapeStamp {
                    selected: s.is_selected(),
                    manipulate: s.is_manipulate(),
                    name: s.name().to_string(),
                    points: s.points().iter().map(|p| p.id).collect(),
                })
                .collect(),
        }
    }
}
