//! The filter function-call signature table.
//!
//! OData defines a fixed set of string, date and math functions usable in
//! `$filter`. The table maps each name to its overloads; the parser picks
//! the first overload whose parameter types accept the argument types.

use crate::error::{Error, Result};
use odata_metadata::EdmType;
use phf::phf_map;

/// One overload of a filter function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionSignature {
    pub name: &'static str,
    pub return_type: EdmType,
    pub arg_types: &'static [EdmType],
}

use EdmType::{Boolean, DateTime, Decimal, Double, Int32, String as Str};

static FUNCTIONS: phf::Map<&'static str, &'static [FunctionSignature]> = phf_map! {
    "substringof" => &[FunctionSignature { name: "substringof", return_type: Boolean, arg_types: &[Str, Str] }],
    "endswith" => &[FunctionSignature { name: "endswith", return_type: Boolean, arg_types: &[Str, Str] }],
    "startswith" => &[FunctionSignature { name: "startswith", return_type: Boolean, arg_types: &[Str, Str] }],
    "indexof" => &[FunctionSignature { name: "indexof", return_type: Int32, arg_types: &[Str, Str] }],
    "replace" => &[FunctionSignature { name: "replace", return_type: Str, arg_types: &[Str, Str, Str] }],
    "tolower" => &[FunctionSignature { name: "tolower", return_type: Str, arg_types: &[Str] }],
    "toupper" => &[FunctionSignature { name: "toupper", return_type: Str, arg_types: &[Str] }],
    "trim" => &[FunctionSignature { name: "trim", return_type: Str, arg_types: &[Str] }],
    "substring" => &[
        FunctionSignature { name: "substring", return_type: Str, arg_types: &[Str, Int32] },
        FunctionSignature { name: "substring", return_type: Str, arg_types: &[Str, Int32, Int32] },
    ],
    "concat" => &[FunctionSignature { name: "concat", return_type: Str, arg_types: &[Str, Str] }],
    "length" => &[FunctionSignature { name: "length", return_type: Int32, arg_types: &[Str] }],
    "year" => &[FunctionSignature { name: "year", return_type: Int32, arg_types: &[DateTime] }],
    "month" => &[FunctionSignature { name: "month", return_type: Int32, arg_types: &[DateTime] }],
    "day" => &[FunctionSignature { name: "day", return_type: Int32, arg_types: &[DateTime] }],
    "hour" => &[FunctionSignature { name: "hour", return_type: Int32, arg_types: &[DateTime] }],
    "minute" => &[FunctionSignature { name: "minute", return_type: Int32, arg_types: &[DateTime] }],
    "second" => &[FunctionSignature { name: "second", return_type: Int32, arg_types: &[DateTime] }],
    "round" => &[
        FunctionSignature { name: "round", return_type: Double, arg_types: &[Double] },
        FunctionSignature { name: "round", return_type: Decimal, arg_types: &[Decimal] },
    ],
    "floor" => &[
        FunctionSignature { name: "floor", return_type: Double, arg_types: &[Double] },
        FunctionSignature { name: "floor", return_type: Decimal, arg_types: &[Decimal] },
    ],
    "ceiling" => &[
        FunctionSignature { name: "ceiling", return_type: Double, arg_types: &[Double] },
        FunctionSignature { name: "ceiling", return_type: Decimal, arg_types: &[Decimal] },
    ],
};

/// Whether `name` is a known filter function.
pub fn is_function(name: &str) -> bool {
    FUNCTIONS.contains_key(name)
}

/// Resolve a call to a concrete overload, or fail with the unknown-function
/// or no-matching-overload error.
pub fn resolve(name: &str, arg_types: &[EdmType]) -> Result<&'static FunctionSignature> {
    let overloads = FUNCTIONS
        .get(name)
        .ok_or_else(|| Error::UnknownFunction(name.to_string()))?;

    overloads
        .iter()
        .find(|sig| {
            sig.arg_types.len() == arg_types.len()
                && sig
                    .arg_types
                    .iter()
                    .zip(arg_types)
                    .all(|(expected, actual)| expected.accepts(*actual))
        })
        .ok_or_else(|| Error::NoMatchingOverload {
            name: name.to_string(),
            argument_types: arg_types
                .iter()
                .map(|t| t.full_name())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_exact_signature() {
        let sig = resolve("startswith", &[Str, Str]).unwrap();
        assert_eq!(sig.return_type, Boolean);
    }

    #[test]
    fn resolves_overload_by_arity() {
        let two = resolve("substring", &[Str, Int32]).unwrap();
        let three = resolve("substring", &[Str, Int32, Int32]).unwrap();
        assert_eq!(two.arg_types.len(), 2);
        assert_eq!(three.arg_types.len(), 3);
    }

    #[test]
    fn numeric_arguments_promote() {
        // Int32 argument is accepted where Double is expected.
        let sig = resolve("round", &[Int32]).unwrap();
        assert_eq!(sig.return_type, Double);
    }

    #[test]
    fn unknown_function_is_reported() {
        assert!(matches!(
            resolve("frobnicate", &[Str]),
            Err(Error::UnknownFunction(_))
        ));
    }

    #[test]
    fn wrong_argument_types_are_reported() {
        let err = resolve("length", &[Boolean]).unwrap_err();
        match err {
            Error::NoMatchingOverload { name, argument_types } => {
                assert_eq!(name, "length");
                assert_eq!(argument_types, "Edm.Boolean");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
