use super::{compile, evaluate};

#[test]
fn test_literal_expressions_fold() {
  let compilation = compile(&[("", "")]);

  for (expr, expected) in [
    ("true", Some(true)),
    ("false", Some(false)),
    ("!true", Some(false)),
    ("(true && false)", Some(false)),
    ("false || !false", Some(true)),
    ("true ^ true", Some(false)),
    ("true & true", Some(true)),
    ("false | false", Some(false)),
    ("true == false", Some(false)),
    ("true != false", Some(true)),
    ("1 == 1", None),
    ("\"true\"", None),
  ] {
    assert_eq!(evaluate(&compilation, "", expr), expected, "{expr}");
  }
}

#[test]
fn test_constants_are_followed_across_modules() {
  let compilation = compile(&[
    ("", "mod config;\nconst BASE: bool = true;\nuse config::DERIVED;"),
    ("config", "pub const DERIVED: bool = !super::BASE;\npub const BOTH: bool = DERIVED || crate::BASE;"),
  ]);

  assert_eq!(evaluate(&compilation, "", "BASE"), Some(true));
  assert_eq!(evaluate(&compilation, "", "DERIVED"), Some(false));
  assert_eq!(evaluate(&compilation, "", "config::BOTH"), Some(true));
  assert_eq!(evaluate(&compilation, "config", "!DERIVED"), Some(true));
}

#[test]
fn test_non_boolean_values_do_not_fold() {
  let compilation = compile(&[(
    "",
    r#"
      const COUNT: u8 = 1;
      const NAME: &str = "x";
      static FLAG: bool = true;
      const fn enabled() -> bool { true }
      const MISTYPED: Flag = true;
    "#,
  )]);

  for expr in ["COUNT", "NAME", "FLAG", "enabled()", "MISTYPED", "UNDEFINED"] {
    assert_eq!(evaluate(&compilation, "", expr), None, "{expr}");
  }
}

#[test]
fn test_cyclic_constants_do_not_fold() {
  let compilation = compile(&[("", "const A: bool = B;\nconst B: bool = !A;")]);

  assert_eq!(evaluate(&compilation, "", "A"), None);
}
