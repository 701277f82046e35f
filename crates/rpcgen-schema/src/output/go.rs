//! Go backend: structs, service interfaces and Fiber wiring.
//!
//! For each model `M` the backend emits `type M struct { ... }` with
//! exported members and `json` tags carrying the original field names. For
//! each service `S` it emits one `<method>Params` request struct per method,
//! `type S interface { ... }`, and `initializeFiberS(app, service)` which
//! registers `POST /S.<method>` for every method.

use super::gofmt;
use crate::context::Context;
use crate::def::{GenDef, Method, Model, Service};
use crate::error::Result;
use crate::lexical::{RESERVED_SUFFIX, capital_first};
use crate::options::{GoOptions, Options};
use crate::traits::Generator;
use crate::types::parse_compound;
use std::fmt::{self, Write};

/// Banner written at the top of every generated file.
pub const BANNER: &str = " THIS CODE WAS AUTO GENERATED";

/// Static instance of the Go backend.
pub static GO_GENERATOR: GoGenerator = GoGenerator;

/// Emits a single Go file targeting the Fiber web framework.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoGenerator;

impl Generator for GoGenerator {
    fn name(&self) -> &'static str {
        "go-fiber"
    }

    fn extension(&self) -> &'static str {
        "go"
    }

    fn generate_all(&self, opts: &Options, defs: &[GenDef], ctx: &Context) -> Result<String> {
        generate_go(&opts.go, defs, ctx)
    }
}

/// Generate the formatted Go file for every definition.
pub fn generate_go(opts: &GoOptions, defs: &[GenDef], ctx: &Context) -> Result<String> {
    let mut output = DefOutput::default();
    for def in defs {
        output.add(def, ctx)?;
    }

    let mut source = String::new();
    writeln!(source, "//{BANNER}").unwrap();
    writeln!(source, "package {}", opts.package).unwrap();
    source.push('\n');
    writeln!(source, "import {}", opts.quoted_fiber_import()).unwrap();
    source.push('\n');
    for model in &output.models {
        source.push_str(model);
        source.push_str("\n\n");
    }
    for service in &output.services {
        for params in &service.params_structs {
            source.push_str(params);
            source.push_str("\n\n");
        }
        source.push_str(&service.interface);
        source.push_str("\n\n");
        source.push_str(&service.fiber_initializer);
        source.push_str("\n\n");
    }

    tracing::debug!(
        models = output.models.len(),
        services = output.services.len(),
        "formatting generated Go source"
    );
    gofmt::format(&source)
}

/// Unformatted fragments, in emission order.
#[derive(Debug, Default)]
struct DefOutput {
    models: Vec<String>,
    services: Vec<ServiceOutput>,
}

#[derive(Debug)]
struct ServiceOutput {
    params_structs: Vec<String>,
    interface: String,
    fiber_initializer: String,
}

impl DefOutput {
    fn add(&mut self, def: &GenDef, ctx: &Context) -> Result<()> {
        for (name, model) in &def.models {
            self.models.push(generate_model(name, model, ctx)?.to_string());
        }
        for (name, service) in &def.services {
            self.services.push(generate_service(name, service, ctx)?);
        }
        Ok(())
    }
}

fn generate_model(name: &str, model: &Model, ctx: &Context) -> Result<GoStruct> {
    Ok(GoStruct {
        name: name.to_string(),
        fields: json_fields(model.iter(), ctx)?,
    })
}

fn generate_service(name: &str, service: &Service, ctx: &Context) -> Result<ServiceOutput> {
    let mut params_structs = Vec::with_capacity(service.len());
    let mut interface = GoInterface {
        name: name.to_string(),
        methods: Vec::with_capacity(service.len()),
    };
    let mut handlers = Vec::with_capacity(service.len());

    for (method_name, method) in service.methods() {
        let params = generate_params_struct(method_name, method, ctx)?;
        let returns = method
            .returns()
            .map(|raw| parse_compound(raw, ctx).map(|t| t.to_string()))
            .transpose()?;

        interface.methods.push(GoSignature {
            name: method_name.to_string(),
            params: params
                .fields
                .iter()
                .map(|f| (f.json.clone(), f.ty.clone()))
                .collect(),
            returns: returns.clone(),
        });

        let handler = FiberHandler {
            service: name,
            method: method_name,
            params_struct: &params.name,
            args: params.fields.iter().map(|f| f.name.as_str()).collect(),
            has_return: returns.is_some(),
        };
        let handler = handler.to_string();
        tracing::trace!(service = name, method = method_name, "{handler}");
        handlers.push(handler);

        params_structs.push(params.to_string());
    }

    let mut fiber_initializer = String::new();
    writeln!(
        fiber_initializer,
        "func initializeFiber{name}(app *fiber.App, service {name}) {{"
    )
    .unwrap();
    fiber_initializer.push_str(&handlers.join("\n\n"));
    fiber_initializer.push_str("\n}");

    Ok(ServiceOutput {
        params_structs,
        interface: interface.to_string(),
        fiber_initializer,
    })
}

/// `<method>Params`: the decoded request body of a method.
fn generate_params_struct(method_name: &str, method: &Method, ctx: &Context) -> Result<GoStruct> {
    Ok(GoStruct {
        name: format!("{method_name}{RESERVED_SUFFIX}"),
        fields: json_fields(method.params(), ctx)?,
    })
}

fn json_fields<'a>(
    fields: impl Iterator<Item = (&'a str, &'a str)>,
    ctx: &Context,
) -> Result<Vec<GoField>> {
    fields
        .map(|(name, raw)| {
            Ok(GoField {
                name: capital_first(name),
                ty: parse_compound(raw, ctx)?.to_string(),
                json: name.to_string(),
            })
        })
        .collect()
}

#[derive(Debug)]
struct GoStruct {
    name: String,
    fields: Vec<GoField>,
}

#[derive(Debug)]
struct GoField {
    /// Exported member name.
    name: String,
    /// Rendered Go type.
    ty: String,
    /// Original field name, used as the JSON key.
    json: String,
}

impl fmt::Display for GoStruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "type {} struct {{", self.name)?;
        for field in &self.fields {
            writeln!(f, "{} {} `json:\"{}\"`", field.name, field.ty, field.json)?;
        }
        f.write_str("}")
    }
}

#[derive(Debug)]
struct GoInterface {
    name: String,
    methods: Vec<GoSignature>,
}

impl fmt::Display for GoInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "type {} interface {{", self.name)?;
        for method in &self.methods {
            writeln!(f, "{method}")?;
        }
        f.write_str("}")
    }
}

/// `name(a A, b B) (R, error)`, or `name(a A) error` without a return type.
#[derive(Debug)]
struct GoSignature {
    name: String,
    params: Vec<(String, String)>,
    returns: Option<String>,
}

impl fmt::Display for GoSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, (name, ty)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name} {ty}")?;
        }
        match &self.returns {
            Some(ret) => write!(f, ") ({ret}, error)"),
            None => f.write_str(") error"),
        }
    }
}

/// One `app.Post` registration inside the wiring function.
struct FiberHandler<'a> {
    service: &'a str,
    method: &'a str,
    params_struct: &'a str,
    /// Exported params-struct members, in declaration order.
    args: Vec<&'a str>,
    has_return: bool,
}

const RESPOND_ERROR: &str = "return c.Status(fiber.StatusInternalServerError).JSON(fiber.Map{\"message\": err.Error()})";

impl fmt::Display for FiberHandler<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "app.Post(\"/{}.{}\", func(c *fiber.Ctx) error {{",
            self.service, self.method
        )?;
        writeln!(f, "v := new({})", self.params_struct)?;
        writeln!(f, "if err := c.BodyParser(v); err != nil {{")?;
        writeln!(f, "{RESPOND_ERROR}")?;
        writeln!(f, "}}")?;

        let args = self
            .args
            .iter()
            .map(|a| format!("v.{a}"))
            .collect::<Vec<_>>()
            .join(", ");
        if self.has_return {
            writeln!(f, "ret, err := service.{}({args})", self.method)?;
        } else {
            writeln!(f, "err := service.{}({args})", self.method)?;
        }
        writeln!(f, "if err != nil {{")?;
        writeln!(f, "{RESPOND_ERROR}")?;
        writeln!(f, "}}")?;
        if self.has_return {
            writeln!(f, "return c.JSON(ret)")?;
        } else {
            writeln!(f, "return nil")?;
        }
        f.write_str("})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(yaml: &str) -> String {
        let def = GenDef::from_yaml_str(yaml).unwrap();
        let mut ctx = Context::new();
        ctx.collect_models(&def).unwrap();
        generate_go(
            &GoOptions::new("api", "github.com/gofiber/fiber/v2"),
            &[def],
            &ctx,
        )
        .unwrap()
    }

    #[test]
    fn minimal_model() {
        let out = generate("Models: { Foo: { x: int32, y: string } }");
        insta::assert_snapshot!(out, @r#"
        // THIS CODE WAS AUTO GENERATED
        package api

        import "github.com/gofiber/fiber/v2"

        type Foo struct {
        	X int32  `json:"x"`
        	Y string `json:"y"`
        }
        "#);
    }

    #[test]
    fn model_references() {
        let out = generate("Models:\n  Foo: { a: int32 }\n  Bar: { f: Foo, fs: \"[]Foo\" }\n");
        assert!(out.contains("\tF  Foo   `json:\"f\"`\n"), "{out}");
        assert!(out.contains("\tFs []Foo `json:\"fs\"`\n"), "{out}");
    }

    #[test]
    fn service_wiring() {
        let out = generate("Services:\n  Greeter:\n    hello: { name: string, return: string }\n");
        insta::assert_snapshot!(out, @r#"
        // THIS CODE WAS AUTO GENERATED
        package api

        import "github.com/gofiber/fiber/v2"

        type helloParams struct {
        	Name string `json:"name"`
        }

        type Greeter interface {
        	hello(name string) (string, error)
        }

        func initializeFiberGreeter(app *fiber.App, service Greeter) {
        	app.Post("/Greeter.hello", func(c *fiber.Ctx) error {
        		v := new(helloParams)
        		if err := c.BodyParser(v); err != nil {
        			return c.Status(fiber.StatusInternalServerError).JSON(fiber.Map{"message": err.Error()})
        		}
        		ret, err := service.hello(v.Name)
        		if err != nil {
        			return c.Status(fiber.StatusInternalServerError).JSON(fiber.Map{"message": err.Error()})
        		}
        		return c.JSON(ret)
        	})
        }
        "#);
    }

    #[test]
    fn method_without_return_sends_empty_body() {
        let out = generate("Services: { Events: { fire: { name: string, count: int64 } } }");
        assert!(out.contains("\tfire(name string, count int64) error\n"), "{out}");
        assert!(out.contains("\t\terr := service.fire(v.Name, v.Count)\n"), "{out}");
        assert!(out.contains("\t\treturn nil\n"), "{out}");
        assert!(!out.contains("c.JSON(ret)"), "{out}");
    }

    #[test]
    fn method_with_only_return() {
        let out = generate("Services: { Health: { ping: { return: string } } }");
        assert!(out.contains("type pingParams struct {\n}\n"), "{out}");
        assert!(out.contains("\tping() (string, error)\n"), "{out}");
        assert!(out.contains("\t\tret, err := service.ping()\n"), "{out}");
    }

    #[test]
    fn compound_types_render_as_go() {
        let out = generate(
            "Models:\n  User: { id: string }\n  Index: { byTag: \"map[string][]User\", nested: \"map[int64]map[string]float64\" }\n",
        );
        assert!(out.contains("ByTag  map[string][]User"), "{out}");
        assert!(out.contains("Nested map[int64]map[string]float64"), "{out}");
    }

    #[test]
    fn handlers_are_separated_by_blank_line() {
        let out = generate("Services:\n  S:\n    a: { return: string }\n    b: { x: uint32 }\n");
        assert!(out.contains("\t})\n\n\tapp.Post(\"/S.b\""), "{out}");
        let a = out.find("type aParams").unwrap();
        let b = out.find("type bParams").unwrap();
        let iface = out.find("type S interface").unwrap();
        let init = out.find("func initializeFiberS").unwrap();
        assert!(a < b && b < iface && iface < init);
    }

    #[test]
    fn generator_identity() {
        assert_eq!(GO_GENERATOR.name(), "go-fiber");
        assert_eq!(GO_GENERATOR.extension(), "go");
    }

    #[test]
    fn unknown_type_fails_generation() {
        let def = GenDef::from_yaml_str("Models: { Foo: { x: Bar } }").unwrap();
        let mut ctx = Context::new();
        ctx.collect_models(&def).unwrap();
        let err = generate_go(&GoOptions::new("api", "fiber"), &[def], &ctx).unwrap_err();
        assert!(matches!(err, crate::Error::UnparseableType(ref t) if t == "Bar"));
    }
}
