//! # Contextual Parameter Injector
//!
//! Sits between the raw tokens of a chat message and an operation body. It is
//! the only place that knows how the session context and the identifier
//! resolver change the calling convention of an operation.
//!
//! For one call it:
//!
//! 1. Applies keyword arguments by name.
//! 2. Fills the implicit-context parameter from the session, or takes the
//!    first positional token for it when no scope is selected.
//! 3. Fills the remaining parameters from the remaining tokens, in order.
//! 4. Resolves the user-supplied value of the resolvable-identifier parameter
//!    against the scope, replacing it in place.
//! 5. Applies declared defaults and invokes the body, catching panics.

use crate::{
    core::{
        arg_parser::{BoundArgs, CallArgs, ValueSource},
        context_resolver::IdentifierResolver,
        errors::DispatchError,
        operation::{Invocation, Operation},
    },
    models::ParamRole,
    state::SessionContext,
};
use std::{
    any::Any,
    collections::VecDeque,
    panic::{self, AssertUnwindSafe},
};

/// Binds the arguments of one call and runs the operation body.
pub struct Injector<'a, H> {
    session: &'a SessionContext,
    resolver: &'a dyn IdentifierResolver<H>,
}

impl<H> std::fmt::Debug for Injector<'_, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Injector")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl<'a, H> Injector<'a, H> {
    /// Creates an injector over the given session and resolver.
    pub fn new(session: &'a SessionContext, resolver: &'a dyn IdentifierResolver<H>) -> Self {
        Self { session, resolver }
    }

    /// Binds the raw arguments and runs the operation.
    ///
    /// # Errors
    /// `Unresolved` and `Usage` are returned before the body runs; `Operation`
    /// wraps whatever the body returned or panicked with.
    pub fn invoke(
        &self,
        operation: &Operation<H>,
        handle: &H,
        positional: Vec<String>,
        keyword: Vec<(String, String)>,
    ) -> Result<String, DispatchError> {
        let command = operation.qualified_name();
        let args = self.bind(operation, handle, positional, keyword)?;
        log::debug!("Final arguments for '{}': {:?}", command, args);

        let invocation = Invocation::new(handle, self.session, args, command.clone());
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| operation.call(&invocation)));

        match outcome {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => Err(DispatchError::Operation {
                command,
                message: format!("{:#}", e),
            }),
            Err(payload) => Err(DispatchError::Operation {
                command,
                message: panic_message(payload.as_ref()),
            }),
        }
    }

    /// Runs steps 1-5 above without calling the body.
    ///
    /// A panicking resolver is reported as an `Operation` failure.
    pub fn bind(
        &self,
        operation: &Operation<H>,
        handle: &H,
        positional: Vec<String>,
        keyword: Vec<(String, String)>,
    ) -> Result<BoundArgs, DispatchError> {
        let usage = |source| DispatchError::Usage {
            command: operation.qualified_name(),
            source,
        };

        let mut tokens: VecDeque<String> = positional.into();
        let mut call = CallArgs::new(operation.params());
        call.apply_keywords(keyword).map_err(usage)?;

        let scope = self.session.get_scope();
        let context_index = operation.position_of(ParamRole::ImplicitContext);
        if let Some(index) = context_index
            && !call.is_filled(index)
        {
            match &scope {
                Some(value) => call.fill(index, value.clone(), ValueSource::Session),
                None => {
                    if let Some(token) = tokens.pop_front() {
                        call.fill(index, token, ValueSource::Positional);
                    }
                }
            }
        }

        call.apply_positional(tokens).map_err(usage)?;

        if let Some(index) = operation.position_of(ParamRole::ResolvableIdentifier)
            && call.source(index).is_some_and(ValueSource::is_user_supplied)
        {
            let resolve_scope = match context_index {
                Some(ci) => call.value(ci).map(str::to_string),
                None => scope,
            };
            let raw = call.value(index).unwrap_or_default().to_string();

            let resolved = panic::catch_unwind(AssertUnwindSafe(|| {
                self.resolver.resolve(handle, resolve_scope.as_deref(), &raw)
            }))
            .map_err(|payload| DispatchError::Operation {
                command: operation.qualified_name(),
                message: panic_message(payload.as_ref()),
            })?;

            match resolved {
                Some(canonical) => {
                    log::debug!(
                        "Resolved identifier '{}' to '{}' (scope: {:?})",
                        raw,
                        canonical,
                        resolve_scope
                    );
                    call.replace(index, canonical);
                }
                None => {
                    return Err(DispatchError::Unresolved {
                        raw,
                        scope: resolve_scope,
                    });
                }
            }
        }

        call.finish().map_err(usage)
    }
}

/// Text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "the command panicked".to_string()
    }
}
