//! Definition language for rpcgen.
//!
//! `rpcgen-schema` reads YAML definitions of models and services, validates
//! them, resolves their type expressions and emits a single Go file with
//! structs, service interfaces and Fiber HTTP wiring.
//!
//! # Architecture
//!
//! ```text
//! Input                 Checks                  Output Backends
//! ───────────     ───────────────────────     ─────────────────
//! *.yml ──> GenDef ──> validate ──> Context ──┬─> Go + Fiber (go.rs)
//!           (def.rs)  (validate.rs)           └─> gofmt-style layout
//! ```
//!
//! # Example
//!
//! ```
//! use rpcgen_schema::{GenDef, GoOptions, Options, output::GO_GENERATOR, parse_all};
//!
//! let def = GenDef::from_yaml_str(
//!     "Models: { Foo: { x: int32, y: string } }",
//! ).unwrap();
//! let opts = Options {
//!     folder: "defs".into(),
//!     output_folder: "api".into(),
//!     output_file: None,
//!     go: GoOptions::new("api", "github.com/gofiber/fiber/v2"),
//! };
//!
//! let go = parse_all(&opts, &[def], &GO_GENERATOR).unwrap();
//! assert!(go.contains("type Foo struct {"));
//! ```
//!
//! # Feature Flags
//!
//! - `backend-go` - Go structs, interfaces and Fiber wiring, checked with the
//!   tree-sitter Go grammar (default)

pub mod context;
pub mod def;
pub mod error;
pub mod input;
pub mod lexical;
pub mod options;
pub mod output;
pub mod traits;
pub mod types;
pub mod validate;

// Re-export commonly used items
pub use context::Context;
pub use def::{Fields, GenDef, Method, Model, Service};
pub use error::{Error, Result};
pub use input::{load_definition, load_folder};
pub use options::{GoOptions, Options};
pub use traits::Generator;
pub use types::{AnyType, BaseType, parse_compound};
pub use validate::validate_gen_def;

/// Validate every definition, collect the declared models, then hand the
/// whole set to `generator`.
///
/// Definitions are processed in the order given; the first error aborts
/// the batch.
pub fn parse_all(opts: &Options, defs: &[GenDef], generator: &dyn Generator) -> Result<String> {
    let mut ctx = Context::new();
    for def in defs {
        validate_gen_def(def)?;
        ctx.collect_models(def)?;
    }
    tracing::debug!(
        definitions = defs.len(),
        models = ctx.len(),
        backend = generator.name(),
        "definitions validated"
    );
    generator.generate_all(opts, defs, &ctx)
}
