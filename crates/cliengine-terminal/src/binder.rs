//! Positional binding of argument tokens to a command's argument specs.

use cliengine_types::args::{ArgumentSpec, ArgumentValue, Arguments, ValueType};
use cliengine_types::error::BindError;

const TRUE_LITERALS: &[&str] = &["1", "true", "yes", "y", "t"];
const FALSE_LITERALS: &[&str] = &["0", "false", "no", "n", "f"];

/// Bind `tokens` to `specs` by position.
///
/// The i-th token binds to the i-th spec. Omitted optional arguments take
/// their default, or stay absent when they have none. Binding is
/// all-or-nothing: the first failure aborts and no partial mapping escapes.
pub fn bind<S: AsRef<str>>(specs: &[ArgumentSpec], tokens: &[S]) -> Result<Arguments, BindError> {
    let mut bound = Arguments::new();

    for (i, spec) in specs.iter().enumerate() {
        match tokens.get(i) {
            Some(token) => {
                let token = token.as_ref();
                let value =
                    coerce(&spec.value_type, token).ok_or_else(|| BindError::InvalidArgument {
                        argument: spec.name.clone(),
                        token: token.to_string(),
                        expected: spec.value_type.to_string(),
                    })?;
                bound.insert(spec.name.clone(), value);
            },
            None if spec.required => {
                return Err(BindError::MissingArgument {
                    argument: spec.name.clone(),
                });
            },
            None => {
                if let Some(default) = &spec.default {
                    bound.insert(spec.name.clone(), default.clone());
                }
            },
        }
    }

    if tokens.len() > specs.len() {
        return Err(BindError::TooManyArguments {
            expected: specs.len(),
            given: tokens.len(),
        });
    }

    Ok(bound)
}

/// Convert one token to a value of `value_type`, or `None` if it does not
/// parse. Choice-set tokens bind to the declared spelling of the choice.
pub fn coerce(value_type: &ValueType, token: &str) -> Option<ArgumentValue> {
    match value_type {
        ValueType::Integer => token.parse::<i64>().ok().map(ArgumentValue::Int),
        ValueType::Float => token
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
            .map(ArgumentValue::Float),
        ValueType::String => Some(ArgumentValue::Str(token.to_string())),
        ValueType::Boolean => parse_bool(token).map(ArgumentValue::Bool),
        ValueType::Choice(choices) => choices
            .iter()
            .find(|c| c.eq_ignore_ascii_case(token))
            .map(|c| ArgumentValue::Str(c.clone())),
    }
}

fn parse_bool(token: &str) -> Option<bool> {
    let lower = token.to_ascii_lowercase();
    if TRUE_LITERALS.contains(&lower.as_str()) {
        Some(true)
    } else if FALSE_LITERALS.contains(&lower.as_str()) {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn give_specs() -> Vec<ArgumentSpec> {
        vec![
            ArgumentSpec::required("amount", ValueType::Integer),
            ArgumentSpec::optional("note", ValueType::String),
            ArgumentSpec::optional("loud", ValueType::Boolean).with_default(false),
        ]
    }

    #[test]
    fn bind_all_positions() {
        let args = bind(&give_specs(), &["5", "thanks", "yes"]).unwrap();
        assert_eq!(args.int("amount"), Some(5));
        assert_eq!(args.string("note"), Some("thanks"));
        assert_eq!(args.boolean("loud"), Some(true));
    }

    #[test]
    fn omitted_optional_uses_default_or_stays_absent() {
        let args = bind(&give_specs(), &["5"]).unwrap();
        assert_eq!(args.int("amount"), Some(5));
        assert!(!args.contains("note"));
        assert_eq!(args.boolean("loud"), Some(false));
    }

    #[test]
    fn missing_required_argument() {
        let err = bind::<&str>(&give_specs(), &[]).unwrap_err();
        assert_eq!(
            err,
            BindError::MissingArgument {
                argument: "amount".into()
            }
        );
    }

    #[test]
    fn invalid_integer() {
        let err = bind(&give_specs(), &["five"]).unwrap_err();
        assert_eq!(
            err,
            BindError::InvalidArgument {
                argument: "amount".into(),
                token: "five".into(),
                expected: "int".into(),
            }
        );
    }

    #[test]
    fn too_many_arguments() {
        let err = bind(&give_specs(), &["5", "a", "no", "extra"]).unwrap_err();
        assert_eq!(
            err,
            BindError::TooManyArguments {
                expected: 3,
                given: 4
            }
        );
    }

    #[test]
    fn no_specs_no_tokens() {
        assert!(bind::<&str>(&[], &[]).unwrap().is_empty());
        assert!(bind(&[], &["x"]).is_err());
    }

    #[test]
    fn failure_after_success_returns_nothing() {
        let specs = vec![
            ArgumentSpec::required("a", ValueType::Integer),
            ArgumentSpec::required("b", ValueType::Integer),
        ];
        assert!(matches!(
            bind(&specs, &["1", "x"]),
            Err(BindError::InvalidArgument { ref argument, .. }) if argument == "b"
        ));
    }

    #[test]
    fn coerce_integer() {
        assert_eq!(coerce(&ValueType::Integer, "42"), Some(ArgumentValue::Int(42)));
        assert_eq!(coerce(&ValueType::Integer, "-7"), Some(ArgumentValue::Int(-7)));
        assert_eq!(coerce(&ValueType::Integer, "+3"), Some(ArgumentValue::Int(3)));
        assert_eq!(coerce(&ValueType::Integer, "1.5"), None);
        assert_eq!(coerce(&ValueType::Integer, ""), None);
        assert_eq!(coerce(&ValueType::Integer, "99999999999999999999"), None);
    }

    #[test]
    fn coerce_float() {
        assert_eq!(coerce(&ValueType::Float, "1.5"), Some(ArgumentValue::Float(1.5)));
        assert_eq!(coerce(&ValueType::Float, ".5"), Some(ArgumentValue::Float(0.5)));
        assert_eq!(coerce(&ValueType::Float, "3"), Some(ArgumentValue::Float(3.0)));
        assert_eq!(coerce(&ValueType::Float, "-2."), Some(ArgumentValue::Float(-2.0)));
        assert_eq!(coerce(&ValueType::Float, "abc"), None);
        assert_eq!(coerce(&ValueType::Float, "inf"), None);
        assert_eq!(coerce(&ValueType::Float, "NaN"), None);
    }

    #[test]
    fn coerce_bool_literals() {
        for t in ["true", "TRUE", "Yes", "y", "1", "t"] {
            assert_eq!(coerce(&ValueType::Boolean, t), Some(ArgumentValue::Bool(true)), "{t}");
        }
        for t in ["false", "No", "N", "0", "f"] {
            assert_eq!(coerce(&ValueType::Boolean, t), Some(ArgumentValue::Bool(false)), "{t}");
        }
        assert_eq!(coerce(&ValueType::Boolean, "maybe"), None);
        assert_eq!(coerce(&ValueType::Boolean, "2"), None);
    }

    #[test]
    fn coerce_string_is_verbatim() {
        assert_eq!(
            coerce(&ValueType::String, "Hello World"),
            Some(ArgumentValue::Str("Hello World".into()))
        );
        assert_eq!(coerce(&ValueType::String, ""), Some(ArgumentValue::Str(String::new())));
    }

    #[test]
    fn coerce_choice_uses_declared_spelling() {
        let t = ValueType::choice(["Easy", "Normal", "Hard"]);
        assert_eq!(coerce(&t, "hard"), Some(ArgumentValue::Str("Hard".into())));
        assert_eq!(coerce(&t, "NORMAL"), Some(ArgumentValue::Str("Normal".into())));
        assert_eq!(coerce(&t, "nightmare"), None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_typed_value() -> impl Strategy<Value = (ValueType, ArgumentValue)> {
            prop_oneof![
                any::<i64>().prop_map(|i| (ValueType::Integer, ArgumentValue::Int(i))),
                (-1.0e12f64..1.0e12).prop_map(|x| (ValueType::Float, ArgumentValue::Float(x))),
                ".*".prop_map(|s| (ValueType::String, ArgumentValue::Str(s))),
                any::<bool>().prop_map(|b| (ValueType::Boolean, ArgumentValue::Bool(b))),
                prop::sample::select(vec!["north", "south", "east", "west"]).prop_map(|c| {
                    (
                        ValueType::choice(["north", "south", "east", "west"]),
                        ArgumentValue::Str(c.to_string()),
                    )
                }),
            ]
        }

        proptest! {
            #[test]
            fn bind_roundtrips_canonical_tokens(
                values in prop::collection::vec(arb_typed_value(), 0..6)
            ) {
                let specs: Vec<ArgumentSpec> = values
                    .iter()
                    .enumerate()
                    .map(|(i, (t, _))| ArgumentSpec::required(format!("arg{i}"), t.clone()))
                    .collect();
                let tokens: Vec<String> = values.iter().map(|(_, v)| v.to_string()).collect();

                let bound = bind(&specs, &tokens).unwrap();
                prop_assert_eq!(bound.len(), values.len());
                for (i, (_, v)) in values.iter().enumerate() {
                    let name = format!("arg{i}");
                    prop_assert_eq!(bound.get(&name), Some(v));
                    prop_assert_eq!(bound.get(&name).unwrap().to_string(), tokens[i].clone());
                }
            }

            #[test]
            fn extra_tokens_always_rejected(
                n_specs in 0usize..4,
                extra in 1usize..4,
            ) {
                let specs: Vec<ArgumentSpec> = (0..n_specs)
                    .map(|i| ArgumentSpec::required(format!("s{i}"), ValueType::String))
                    .collect();
                let tokens: Vec<String> = (0..n_specs + extra).map(|i| i.to_string()).collect();
                let is_too_many = matches!(
                    bind(&specs, &tokens),
                    Err(BindError::TooManyArguments { .. })
                );
                prop_assert!(is_too_many);
            }
        }
    }
}
