use syn::{Attribute, Expr, Meta, Token, punctuated::Punctuated};

use super::semantic::{ScopeId, SemanticModel};

pub const EQUALITY_ARGUMENT: &str = "equality";
pub const DEFAULT_EQUALITY: bool = true;

/// Generation options read from the opt-in marker's arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Policy {
  pub equality: bool,
}

impl Default for Policy {
  fn default() -> Self {
    Self {
      equality: DEFAULT_EQUALITY,
    }
  }
}

impl Policy {
  /// Accepts `#[auto_serialize(false)]` and `#[auto_serialize(equality = false)]`.
  ///
  /// The first positional argument takes precedence over the named one; an
  /// argument that is not a constant boolean is ignored.
  pub fn extract(model: &impl SemanticModel, scope: ScopeId, marker: &Attribute) -> Self {
    let Meta::List(list) = &marker.meta else {
      return Self::default();
    };
    let Ok(arguments) = list.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated) else {
      return Self::default();
    };

    let positional = arguments
      .iter()
      .find(|argument| !matches!(argument, Expr::Assign(_)))
      .and_then(|argument| model.constant_bool(scope, argument));

    let named = || {
      arguments
        .iter()
        .find_map(|argument| match argument {
          Expr::Assign(assign) if matches!(assign.left.as_ref(), Expr::Path(path) if path.path.is_ident(EQUALITY_ARGUMENT)) => {
            Some(assign.right.as_ref())
          }
          _ => None,
        })
        .and_then(|value| model.constant_bool(scope, value))
    };

    Self {
      equality: positional.or_else(named).unwrap_or(DEFAULT_EQUALITY),
    }
  }
}
