//! Naming and structural rules for a single definition file.

use crate::def::{Fields, GenDef, Method, Service};
use crate::error::{Error, Result};
use crate::lexical::{RETURN_KEY, capital_first, is_reserved};
use std::collections::HashSet;

/// Validate one definition. Stops at the first violation.
pub fn validate_gen_def(def: &GenDef) -> Result<()> {
    for (model_name, model) in &def.models {
        ensure_not_reserved(model_name)?;
        validate_fields(model)?;
        for field_name in model.names() {
            ensure_not_reserved(field_name)?;
        }
    }
    for (service_name, service) in &def.services {
        ensure_not_reserved(service_name)?;
        validate_service(service)?;
    }
    Ok(())
}

/// Field names must stay distinct once their first letter is upper-cased,
/// since that is the Go member name they become.
pub fn validate_fields(fields: &Fields) -> Result<()> {
    let mut seen = HashSet::new();
    for name in fields.names() {
        let normalized = capital_first(name);
        if !seen.insert(normalized.clone()) {
            return Err(Error::DuplicateField {
                name: name.to_string(),
                normalized,
            });
        }
    }
    Ok(())
}

fn validate_service(service: &Service) -> Result<()> {
    for (method_name, method) in service.methods() {
        ensure_not_reserved(method_name)?;
        if method.entries().is_empty() {
            return Err(Error::EmptyMethod(method_name.to_string()));
        }
        validate_method(method)?;
    }
    Ok(())
}

fn validate_method(method: &Method) -> Result<()> {
    validate_fields(method.entries())?;
    for name in method.entries().names() {
        if name != RETURN_KEY {
            ensure_not_reserved(name)?;
        }
    }
    Ok(())
}

fn ensure_not_reserved(name: &str) -> Result<()> {
    if is_reserved(name) {
        return Err(Error::ReservedName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(yaml: &str) -> Result<()> {
        validate_gen_def(&GenDef::from_yaml_str(yaml).unwrap())
    }

    #[test]
    fn accepts_minimal_definitions() {
        validate("Models: { Foo: { x: int32, y: string } }").unwrap();
        validate("Services: { Greeter: { hello: { name: string, return: string } } }").unwrap();
        validate("Models: {}\nServices: {}").unwrap();
        validate("Models: { Empty: {} }").unwrap();
    }

    #[test]
    fn reserved_model_name() {
        let err = validate("Models: { type: { x: int32 } }").unwrap_err();
        assert!(matches!(err, Error::ReservedName(ref n) if n == "type"));
    }

    #[test]
    fn reserved_suffix_on_every_kind_of_name() {
        for yaml in [
            "Models: { FooParams: { x: int32 } }",
            "Models: { Foo: { xParams: int32 } }",
            "Services: { SParams: { m: { return: string } } }",
            "Services: { S: { mParams: { return: string } } }",
            "Services: { S: { m: { aParams: string } } }",
        ] {
            assert!(
                matches!(validate(yaml), Err(Error::ReservedName(_))),
                "{yaml}"
            );
        }
    }

    #[test]
    fn duplicate_field_ignoring_first_letter_case() {
        let err = validate("Models: { M: { foo: int32, Foo: string } }").unwrap_err();
        match err {
            Error::DuplicateField { name, normalized } => {
                assert_eq!(name, "Foo");
                assert_eq!(normalized, "Foo");
            }
            other => panic!("unexpected error: {other}"),
        }

        // Only the first letter is folded.
        validate("Models: { M: { fooBar: int32, foobar: string } }").unwrap();
    }

    #[test]
    fn duplicate_parameter() {
        let err =
            validate("Services: { S: { m: { id: string, Id: string, return: string } } }")
                .unwrap_err();
        assert!(matches!(err, Error::DuplicateField { .. }));
    }

    #[test]
    fn empty_method() {
        let err = validate("Services: { S: { m: {} } }").unwrap_err();
        assert!(matches!(err, Error::EmptyMethod(ref n) if n == "m"));

        let err = validate("Services: { S: { m: } }").unwrap_err();
        assert!(matches!(err, Error::EmptyMethod(_)));
    }

    #[test]
    fn return_is_only_allowed_inside_methods() {
        validate("Services: { S: { m: { return: string } } }").unwrap();

        let err = validate("Models: { M: { return: string } }").unwrap_err();
        assert!(matches!(err, Error::ReservedName(ref n) if n == "return"));

        let err = validate("Services: { return: { m: { x: string } } }").unwrap_err();
        assert!(matches!(err, Error::ReservedName(_)));

        let err = validate("Services: { S: { return: { x: string } } }").unwrap_err();
        assert!(matches!(err, Error::ReservedName(_)));

        let err = validate("Services: { S: { m: { var: string } } }").unwrap_err();
        assert!(matches!(err, Error::ReservedName(ref n) if n == "var"));
    }

    #[test]
    fn first_failure_wins() {
        // Models are checked before services.
        let err = validate(
            "Models: { M: { a: int32, A: int32 } }\nServices: { S: { m: {} } }",
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateField { .. }));
    }
}
