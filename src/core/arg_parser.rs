// src/core/arg_parser.rs

use crate::models::ParamSpec;
use anyhow::{Context, Result, anyhow};
use std::{collections::VecDeque, fmt::Display, str::FromStr};
use thiserror::Error;

/// Reasons a set of raw arguments does not fit an operation's signature.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// More positional tokens than free parameters.
    #[error("expected at most {expected} positional argument(s), got {got}")]
    TooManyArguments {
        /// Parameters still open for positional tokens.
        expected: usize,
        /// Tokens left over.
        got: usize,
    },
    /// A keyword that names no declared parameter.
    #[error("unexpected keyword argument '{name}'")]
    UnknownKeyword {
        /// The keyword as given.
        name: String,
    },
    /// The same parameter given twice by keyword.
    #[error("got multiple values for argument '{name}'")]
    DuplicateKeyword {
        /// The repeated parameter.
        name: String,
    },
    /// A parameter without value or default.
    #[error("missing required argument '{name}'")]
    MissingArgument {
        /// The unfilled parameter.
        name: String,
    },
}

/// Where the value of a slot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// Named by the caller.
    Keyword,
    /// Injected from the session context.
    Session,
    /// Taken from the positional tokens.
    Positional,
    /// The declared default.
    Default,
}

impl ValueSource {
    /// Values the user actually typed, as opposed to injected or defaulted ones.
    pub fn is_user_supplied(self) -> bool {
        matches!(self, Self::Keyword | Self::Positional)
    }
}

#[derive(Debug, Clone)]
struct ArgSlot {
    value: String,
    source: ValueSource,
}

/// Argument assembly for one call, one slot per declared parameter.
///
/// Slots are filled in stages (keywords, session injection, positional tokens)
/// and then finalized into `BoundArgs`, which applies declared defaults.
#[derive(Debug)]
pub struct CallArgs<'p> {
    params: &'p [ParamSpec],
    slots: Vec<Option<ArgSlot>>,
}

impl<'p> CallArgs<'p> {
    /// Empty slots for the given signature.
    pub fn new(params: &'p [ParamSpec]) -> Self {
        Self {
            params,
            slots: vec![None; params.len()],
        }
    }

    /// Places keyword arguments by parameter name.
    pub fn apply_keywords(&mut self, keyword: Vec<(String, String)>) -> Result<(), BindError> {
        for (name, value) in keyword {
            let index = self
                .params
                .iter()
                .position(|p| p.name == name)
                .ok_or_else(|| BindError::UnknownKeyword { name: name.clone() })?;
            if self.is_filled(index) {
                return Err(BindError::DuplicateKeyword { name });
            }
            self.fill(index, value, ValueSource::Keyword);
        }
        Ok(())
    }

    /// Fills the remaining slots in declaration order, skipping filled ones.
    pub fn apply_positional(&mut self, tokens: VecDeque<String>) -> Result<(), BindError> {
        let free = self.slots.iter().filter(|s| s.is_none()).count();
        if tokens.len() > free {
            return Err(BindError::TooManyArguments {
                expected: free,
                got: tokens.len(),
            });
        }

        let mut tokens = tokens.into_iter();
        for slot in self.slots.iter_mut().filter(|s| s.is_none()) {
            match tokens.next() {
                Some(value) => {
                    *slot = Some(ArgSlot {
                        value,
                        source: ValueSource::Positional,
                    });
                }
                None => break,
            }
        }
        Ok(())
    }

    /// Sets a slot. Out-of-range indexes are ignored.
    pub fn fill(&mut self, index: usize, value: String, source: ValueSource) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(ArgSlot { value, source });
        }
    }

    /// Whether the slot already holds a value.
    pub fn is_filled(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Some(_)))
    }

    /// The current value of a slot.
    pub fn value(&self, index: usize) -> Option<&str> {
        self.slots
            .get(index)
            .and_then(Option::as_ref)
            .map(|slot| slot.value.as_str())
    }

    /// Where the current value of a slot came from.
    pub fn source(&self, index: usize) -> Option<ValueSource> {
        self.slots
            .get(index)
            .and_then(Option::as_ref)
            .map(|slot| slot.source)
    }

    /// Replaces a value in place, keeping where it came from.
    pub fn replace(&mut self, index: usize, value: String) {
        if let Some(Some(slot)) = self.slots.get_mut(index) {
            slot.value = value;
        }
    }

    /// Applies declared defaults and checks that every parameter has a value.
    pub fn finish(self) -> Result<BoundArgs, BindError> {
        let mut values = Vec::with_capacity(self.params.len());
        for (param, slot) in self.params.iter().zip(self.slots) {
            let value = match (slot, &param.default) {
                (Some(slot), _) => slot.value,
                (None, Some(default)) => default.clone(),
                (None, None) => {
                    return Err(BindError::MissingArgument {
                        name: param.name.clone(),
                    });
                }
            };
            values.push((param.name.clone(), value));
        }
        Ok(BoundArgs { values })
    }
}

/// The final, named argument values handed to an operation body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundArgs {
    values: Vec<(String, String)>,
}

impl BoundArgs {
    /// The value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Like `get`, but a missing name is an error of the calling operation.
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name)
            .ok_or_else(|| anyhow!("Argument '{}' is not declared by this command.", name))
    }

    /// Parses an argument into any `FromStr` type.
    pub fn parse<T>(&self, name: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.require(name)?;
        raw.parse::<T>()
            .map_err(|e| anyhow!("{}", e))
            .with_context(|| format!("Invalid value '{}' for '{}'", raw, name))
    }

    /// `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of bound parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the operation takes no parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParamRole;

    fn specs() -> Vec<ParamSpec> {
        vec![
            ParamSpec::new("node", ParamRole::ImplicitContext),
            ParamSpec::new("vm_id", ParamRole::ResolvableIdentifier),
            ParamSpec::new("mode", ParamRole::Ordinary).with_default("soft"),
        ]
    }

    fn tokens(values: &[&str]) -> VecDeque<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_positional_fill_and_defaults() {
        // --- Setup ---
        let params = specs();
        let mut args = CallArgs::new(&params);

        // --- Execute ---
        args.apply_positional(tokens(&["pve1", "101"])).unwrap();
        let bound = args.finish().unwrap();

        // --- Assert ---
        assert_eq!(bound.get("node"), Some("pve1"));
        assert_eq!(bound.get("vm_id"), Some("101"));
        assert_eq!(bound.get("mode"), Some("soft"));
        assert_eq!(bound.len(), 3);
    }

    #[test]
    fn test_positional_skips_slots_filled_by_keyword() {
        let params = specs();
        let mut args = CallArgs::new(&params);

        args.apply_keywords(vec![("node".to_string(), "pve2".to_string())])
            .unwrap();
        args.apply_positional(tokens(&["101", "hard"])).unwrap();

        assert_eq!(args.source(0), Some(ValueSource::Keyword));
        assert_eq!(args.source(1), Some(ValueSource::Positional));
        let bound = args.finish().unwrap();
        assert_eq!(bound.get("node"), Some("pve2"));
        assert_eq!(bound.get("vm_id"), Some("101"));
        assert_eq!(bound.get("mode"), Some("hard"));
    }

    #[test]
    fn test_binding_errors() {
        let params = specs();

        let mut args = CallArgs::new(&params);
        let err = args
            .apply_positional(tokens(&["a", "b", "c", "d"]))
            .unwrap_err();
        assert_eq!(
            err,
            BindError::TooManyArguments {
                expected: 3,
                got: 4
            }
        );

        let mut args = CallArgs::new(&params);
        let err = args
            .apply_keywords(vec![("force".to_string(), "yes".to_string())])
            .unwrap_err();
        assert!(matches!(err, BindError::UnknownKeyword { name } if name == "force"));

        let mut args = CallArgs::new(&params);
        args.apply_positional(tokens(&["pve1"])).unwrap();
        let err = args.finish().unwrap_err();
        assert_eq!(
            err,
            BindError::MissingArgument {
                name: "vm_id".to_string()
            }
        );
    }

    #[test]
    fn test_replace_keeps_source() {
        let params = specs();
        let mut args = CallArgs::new(&params);
        args.fill(1, "web".to_string(), ValueSource::Positional);

        args.replace(1, "101".to_string());

        assert_eq!(args.value(1), Some("101"));
        assert_eq!(args.source(1), Some(ValueSource::Positional));
        assert!(args.source(1).is_some_and(ValueSource::is_user_supplied));
        assert!(!ValueSource::Session.is_user_supplied());
    }

    #[test]
    fn test_bound_args_parse() {
        let params = vec![ParamSpec::new("vm_id", ParamRole::Ordinary)];
        let mut args = CallArgs::new(&params);
        args.apply_positional(tokens(&["abc"])).unwrap();
        let bound = args.finish().unwrap();

        let err = bound.parse::<u32>("vm_id").unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid value 'abc' for 'vm_id'"));
        assert!(bound.require("other").is_err());
    }
}
