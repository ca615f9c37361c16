//! Text artifact generation: one particle command per deduplicated point,
//! headed by the import key that rebuilds the composition.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::codec;
use crate::composition::Composition;
use crate::dedupe::{ProcessedShape, dedupe_grouped};
use crate::errors::{ImportError, ShapeError};
use crate::format::{format_rounded, to_minimal_decimal_string};
use crate::shape::{ShapeRegistry, single_line};
use crate::types::{Precision, Tolerance, check_non_negative};

/// Marker that starts the import key line
pub const IMPORT_KEY_MARKER: &str = "# [ImportKey]: ";

static IMPORT_KEY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^#\s*\[ImportKey\]:\s*([A-Za-z0-9_-]*)\s*$").expect("import key pattern is valid")
});

/// Settings for the exported artifact
#[derive(Clone, Debug, PartialEq)]
pub struct ExportOptions {
    particle: String,
    speed: f64,
    precision: Precision,
    name_comments: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            particle: "end_rod".to_string(),
            speed: 0.0,
            precision: Precision::default(),
            name_comments: true,
        }
    }
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Particle name; surrounding whitespace is dropped and inner line
    /// breaks become spaces
    pub fn with_particle(mut self, particle: impl Into<String>) -> Self {
        self.particle = single_line(particle.into().trim().to_string());
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Result<Self, ShapeError> {
        self.speed = check_non_negative(speed)
            .map_err(|reason| ShapeError::invalid("export", "speed", speed, reason))?;
        Ok(self)
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Whether each shape's points are headed by a `# <name>` comment
    pub fn with_name_comments(mut self, name_comments: bool) -> Self {
        self.name_comments = name_comments;
        self
    }

    pub fn particle(&self) -> &str {
        &self.particle
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }
}

/// Render the artifact for a composition
pub fn render(composition: &Composition, tolerance: Tolerance, options: &ExportOptions) -> String {
    let token = codec::encode(composition);
    let groups = dedupe_grouped(composition, tolerance);
    render_groups(&token, &groups, options)
}

/// Render the artifact from an already encoded key and processed groups.
/// Manipulate groups are left out.
pub fn render_groups(token: &str, groups: &[ProcessedShape], options: &ExportOptions) -> String {
    let digits = options.precision.digits();
    let speed = to_minimal_decimal_string(options.speed);

    let mut out = String::new();
    out.push_str(IMPORT_KEY_MARKER);
    out.push_str(token);

    for group in ProcessedShape::exportable(groups) {
        if options.name_comments {
            // Groups may be built by hand, so the name is cleaned here too.
            out.push_str("\n# ");
            out.push_str(&single_line(group.name.clone()));
        }
        for point in &group.points {
            out.push_str(&format!(
                "\nparticle {} ^{} ^ ^{} 0 0 0 {} 1",
                options.particle,
                format_rounded(point.pos.x, digits),
                format_rounded(point.pos.y, digits),
                speed,
            ));
        }
    }
    crate::log::debug!(particles = particle_count(groups), bytes = out.len(), "rendered export");
    out
}

/// Number of particle commands an export of these groups contains
pub fn particle_count(groups: &[ProcessedShape]) -> usize {
    ProcessedShape::exportable(groups).map(|g| g.points.len()).sum()
}

/// Find the import key inside a free-form artifact
pub fn find_import_key(text: &str) -> Option<&str> {
    IMPORT_KEY_LINE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Rebuild the composition an artifact was exported from
pub fn import(text: &str, registry: &ShapeRegistry) -> Result<Composition, ImportError> {
    let token = find_import_key(text).ok_or(ImportError::MissingKey)?;
    Ok(codec::decode(token, registry)?)
}
