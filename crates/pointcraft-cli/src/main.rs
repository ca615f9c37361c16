mod shape_arg;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, WrapErr};
use pointcraft::export::{self, ExportOptions};
use pointcraft::format::to_minimal_decimal_string;
use pointcraft::{Composition, Edit, Generator, Precision, ShapeRegistry, Tolerance, codec, dedupe};

#[derive(Parser)]
#[command(name = "pointcraft", version, about = "Compose shapes into particle placement commands")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a particle function for a set of shapes
    Export {
        #[command(flatten)]
        shapes: ShapeArgs,
        /// Decimal digits kept in coordinates (1-5)
        #[arg(long, default_value_t = 5)]
        precision: u32,
        /// Particle to place at each point
        #[arg(long, default_value = "end_rod")]
        particle: String,
        /// Particle speed
        #[arg(long, default_value_t = 0.0)]
        speed: f64,
        /// Leave out the `# <shape name>` comments
        #[arg(long)]
        no_names: bool,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
    },
    /// Print the deduplicated point list
    Points {
        #[command(flatten)]
        shapes: ShapeArgs,
    },
    /// Show the shapes stored in an exported file
    Import {
        file: Utf8PathBuf,
    },
    /// List shape types and their parameters
    Shapes,
}

#[derive(Args)]
struct ShapeArgs {
    /// Shape as `type[:name=value,...]`, e.g. `circle:count=12,radius=5`
    #[arg(short, long = "shape", required = true)]
    shapes: Vec<String>,
    /// Merge points closer than this distance
    #[arg(short, long, default_value_t = 0.0)]
    tolerance: f64,
}

impl ShapeArgs {
    fn build(&self, registry: &ShapeRegistry) -> miette::Result<(Composition, Tolerance)> {
        let mut composition = Composition::new();
        for text in &self.shapes {
            let spec = shape_arg::parse(text, registry)?;
            composition
                .apply(Edit::Add(spec))
                .wrap_err_with(|| format!("in --shape {text}"))?;
        }
        Ok((composition, Tolerance::new(self.tolerance)?))
    }
}

fn main() -> miette::Result<()> {
    // Logs go to stderr so stdout stays clean for the artifact
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = ShapeRegistry::builtin();

    match cli.command {
        Command::Export { shapes, precision, particle, speed, no_names, output } => {
            let (composition, tolerance) = shapes.build(&registry)?;
            let options = ExportOptions::new()
                .with_particle(particle)
                .with_speed(speed)?
                .with_precision(Precision::new(precision)?)
                .with_name_comments(!no_names);
            let text = export::render(&composition, tolerance, &options);
            match output {
                Some(path) => {
                    std::fs::write(&path, text + "\n")
                        .into_diagnostic()
                        .wrap_err_with(|| format!("writing {path}"))?;
                    tracing::info!(%path, "export written");
                }
                None => println!("{text}"),
            }
        }
        Command::Points { shapes } => {
            let (composition, tolerance) = shapes.build(&registry)?;
            for point in dedupe(composition.candidates(), tolerance) {
                println!(
                    "{}\t{}\t{}",
                    to_minimal_decimal_string(point.pos.x),
                    to_minimal_decimal_string(point.pos.y),
                    point.source_name
                );
            }
        }
        Command::Import { file } => {
            let text = std::fs::read_to_string(&file)
                .into_diagnostic()
                .wrap_err_with(|| format!("reading {file}"))?;
            let token = export::find_import_key(&text).ok_or(pointcraft::ImportError::MissingKey)?;
            let (composition, skipped) = codec::decode_lenient(token, &registry)?;
            for err in &skipped {
                tracing::warn!("{err}");
            }
            for shape in composition.shapes() {
                println!("{} ({})", shape.name(), shape.kind().tag());
                for (name, value) in shape.parameters().iter() {
                    println!("  {name} = {}", to_minimal_decimal_string(value));
                }
            }
        }
        Command::Shapes => {
            for tag in registry.tags() {
                let Some(kind) = registry.get(tag) else { continue };
                println!("{tag}");
                let defaults = kind.defaults();
                for meta in kind.metadata() {
                    let default = defaults.get(meta.name).unwrap_or_default();
                    println!(
                        "  {:<10} {:<16} default {:<6} {}",
                        meta.name,
                        meta.label,
                        to_minimal_decimal_string(default),
                        meta.description
                    );
                }
            }
        }
    }
    Ok(())
}
