use super::{compile, compile_with, resolve};
use crate::generator::{
  compilation::ExternCrate,
  semantic::{Namespace, SemanticModel},
};

#[test]
fn test_local_items_are_rooted_at_crate() {
  let compilation = compile(&[("", "mod shapes;\npub struct Point;"), ("shapes", "pub struct Circle;")]);

  assert_eq!(
    resolve(&compilation, "", "Point", Namespace::Type).as_deref(),
    Some("crate::Point")
  );
  for spelling in ["shapes::Circle", "crate::shapes::Circle", "self::shapes::Circle"] {
    assert_eq!(
      resolve(&compilation, "", spelling, Namespace::Type).as_deref(),
      Some("crate::shapes::Circle"),
      "{spelling}"
    );
  }
  assert_eq!(
    resolve(&compilation, "shapes", "super::Point", Namespace::Type).as_deref(),
    Some("crate::Point")
  );
}

#[test]
fn test_renamed_import_resolves_to_original() {
  let compilation = compile(&[
    ("", "mod shapes;\nuse shapes::Circle as Round;"),
    ("shapes", "pub struct Circle;"),
  ]);

  assert_eq!(
    resolve(&compilation, "", "Round", Namespace::Type).as_deref(),
    Some("crate::shapes::Circle")
  );
  assert_eq!(resolve(&compilation, "", "Circle", Namespace::Type), None);
}

#[test]
fn test_glob_import_and_local_shadowing() {
  let compilation = compile(&[(
    "",
    r"
      mod shapes { pub struct Circle; pub struct Square; }
      mod scene {
        use super::shapes::*;
        pub struct Square;
      }
    ",
  )]);

  assert_eq!(
    resolve(&compilation, "scene", "Circle", Namespace::Type).as_deref(),
    Some("crate::shapes::Circle")
  );
  assert_eq!(
    resolve(&compilation, "scene", "Square", Namespace::Type).as_deref(),
    Some("crate::scene::Square")
  );
}

#[test]
fn test_self_in_use_group_and_underscore_imports() {
  let compilation = compile(&[(
    "",
    r"
      mod a { pub struct Inner; pub struct Hidden; }
      mod b {
        use crate::a::{self, Inner};
        use crate::a::Hidden as _;
      }
    ",
  )]);

  assert_eq!(
    resolve(&compilation, "b", "a::Inner", Namespace::Type).as_deref(),
    Some("crate::a::Inner")
  );
  assert_eq!(
    resolve(&compilation, "b", "Inner", Namespace::Type).as_deref(),
    Some("crate::a::Inner")
  );
  assert_eq!(resolve(&compilation, "b", "Hidden", Namespace::Type), None);
}

#[test]
fn test_marker_paths_share_one_identity() {
  let compilation = compile(&[(
    "",
    r"
      use autoser;
      use autoser::auto_serialize as serializable;
      extern crate autoser as ser;
      mod nested {}
    ",
  )]);

  let expected = Some("::autoser::auto_serialize");
  for (module, spelling) in [
    ("", "autoser::auto_serialize"),
    ("", "::autoser::auto_serialize"),
    ("", "serializable"),
    ("nested", "ser::auto_serialize"),
    ("nested", "autoser::auto_serialize"),
  ] {
    assert_eq!(
      resolve(&compilation, module, spelling, Namespace::Macro).as_deref(),
      expected,
      "{module}: {spelling}"
    );
  }
}

#[test]
fn test_package_rename_keeps_marker_identity() {
  let compilation = compile_with(&[("", "")], vec![ExternCrate::runtime("ser")]);

  assert_eq!(
    resolve(&compilation, "", "ser::auto_serialize", Namespace::Macro).as_deref(),
    Some("::autoser::auto_serialize")
  );
  assert_eq!(
    compilation
      .symbol_by_metadata_name("autoser::auto_serialize")
      .map(|id| id.to_string())
      .as_deref(),
    Some("::autoser::auto_serialize")
  );
  assert_eq!(resolve(&compilation, "", "autoser::auto_serialize", Namespace::Macro), None);
}

#[test]
fn test_known_crate_surface_rejects_unknown_items() {
  let compilation = compile(&[("", "")]);

  assert_eq!(resolve(&compilation, "", "autoser::missing", Namespace::Macro), None);
  assert_eq!(resolve(&compilation, "", "autoser::auto_serialize::deeper", Namespace::Macro), None);
  assert_eq!(
    resolve(&compilation, "", "serde::de::IgnoredAny", Namespace::Type).as_deref(),
    Some("::serde::de::IgnoredAny")
  );
  assert_eq!(compilation.symbol_by_metadata_name("autoser::missing"), None);
}

#[test]
fn test_same_named_marker_elsewhere_is_different() {
  let compilation = compile(&[(
    "",
    r"
      mod fake { pub use crate::local::auto_serialize; }
      mod local { macro_rules! auto_serialize { () => {} } }
    ",
  )]);

  assert_ne!(
    resolve(&compilation, "", "fake::auto_serialize", Namespace::Macro).as_deref(),
    Some("::autoser::auto_serialize")
  );
}

#[test]
fn test_cyclic_imports_resolve_to_nothing() {
  let compilation = compile(&[(
    "",
    r"
      mod a { pub use super::b::Thing; }
      mod b { pub use super::a::Thing; }
      mod c { pub use self::Loop as Loop; }
    ",
  )]);

  assert_eq!(resolve(&compilation, "a", "Thing", Namespace::Type), None);
  assert_eq!(resolve(&compilation, "", "b::Thing", Namespace::Type), None);
  assert_eq!(resolve(&compilation, "c", "Loop", Namespace::Type), None);
}

#[test]
fn test_builtins_and_local_shadowing() {
  let compilation = compile(&[("", "mod custom { pub struct String; }")]);

  assert_eq!(
    resolve(&compilation, "", "u32", Namespace::Type).as_deref(),
    Some("::core::primitive::u32")
  );
  assert_eq!(
    resolve(&compilation, "", "String", Namespace::Type).as_deref(),
    Some("::alloc::string::String")
  );
  assert_eq!(
    resolve(&compilation, "custom", "String", Namespace::Type).as_deref(),
    Some("crate::custom::String")
  );
}

#[test]
fn test_namespaces_are_separate() {
  let compilation = compile(&[("", "pub fn point() {}\npub const LIMIT: u8 = 3;")]);

  assert_eq!(resolve(&compilation, "", "point", Namespace::Type), None);
  assert_eq!(
    resolve(&compilation, "", "point", Namespace::Value).as_deref(),
    Some("crate::point")
  );
  assert_eq!(
    resolve(&compilation, "", "LIMIT", Namespace::Value).as_deref(),
    Some("crate::LIMIT")
  );
}

#[test]
fn test_raw_identifiers_are_unrawed() {
  let compilation = compile(&[("", "pub struct r#Match;")]);

  assert_eq!(
    resolve(&compilation, "", "Match", Namespace::Type).as_deref(),
    Some("crate::Match")
  );
}
