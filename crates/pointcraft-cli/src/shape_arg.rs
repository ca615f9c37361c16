//! `--shape type[:name=value,...]` parsing

use miette::{Diagnostic, NamedSource, SourceSpan};
use pointcraft::{ShapeRegistry, ShapeSpec};
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ShapeArgError {
    #[error("unknown shape type `{tag}`")]
    #[diagnostic(code(pointcraft::cli::unknown_shape), help("known types: {known}"))]
    UnknownType {
        tag: String,
        known: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a registered shape")]
        span: SourceSpan,
    },

    #[error("expected `name=value`")]
    #[diagnostic(code(pointcraft::cli::bad_assignment))]
    BadAssignment {
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("`{value}` is not a number")]
    #[diagnostic(code(pointcraft::cli::bad_number))]
    BadNumber {
        value: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("expected a number")]
        span: SourceSpan,
    },
}

fn source(text: &str) -> NamedSource<String> {
    NamedSource::new("--shape", text.to_string())
}

/// Parse one `--shape` argument into a spec
pub fn parse(text: &str, registry: &ShapeRegistry) -> Result<ShapeSpec, ShapeArgError> {
    let (tag, rest) = match text.split_once(':') {
        Some((tag, rest)) => (tag, Some(rest)),
        None => (text, None),
    };
    let kind = registry.get(tag.trim()).ok_or_else(|| ShapeArgError::UnknownType {
        tag: tag.trim().to_string(),
        known: registry.tags().collect::<Vec<_>>().join(", "),
        src: source(text),
        span: (0, tag.len()).into(),
    })?;

    let mut spec = ShapeSpec::new(kind);
    let Some(rest) = rest else {
        return Ok(spec);
    };

    let mut offset = tag.len() + 1;
    for part in rest.split(',') {
        let span: SourceSpan = (offset, part.len()).into();
        offset += part.len() + 1;
        if part.trim().is_empty() {
            continue;
        }
        let (name, value) = part
            .split_once('=')
            .ok_or_else(|| ShapeArgError::BadAssignment { src: source(text), span })?;
        let value: f64 = value.trim().parse().map_err(|_| ShapeArgError::BadNumber {
            value: value.trim().to_string(),
            src: source(text),
            span,
        })?;
        spec = spec.with_param(name.trim(), value);
    }
    Ok(spec)
}
