use super::support::{codes, file_names, fragment, generate, generate_root, report, serialized_fields};
use crate::generator::{
  diagnostics::{DiagnosticCode, Severity},
  orchestrator::CandidateStatus,
};

#[test]
fn test_private_nested_struct_is_rejected_with_location() {
  let output = generate_root("mod inner {\n    #[autoser::auto_serialize]\n    struct Hidden { value: u8 }\n}\n");

  assert_eq!(codes(&output), [DiagnosticCode::NotExtensible]);
  let diagnostic = &output.diagnostics[0];
  assert_eq!(diagnostic.severity, Severity::Error);
  assert_eq!(diagnostic.location.to_string(), "src/lib.rs:3:12");
  assert!(diagnostic.message.contains("`Hidden`"), "{}", diagnostic.message);

  assert!(output.files.is_empty());
  assert!(output.has_errors());
  assert_eq!(
    report(&output, "inner::Hidden").status,
    CandidateStatus::Rejected {
      code: DiagnosticCode::NotExtensible
    }
  );
}

#[test]
fn test_visibility_needed_to_reach_the_crate_root() {
  let output = generate_root(
    r"
      #[autoser::auto_serialize]
      struct RootPrivate { value: u8 }

      mod outer {
        #[autoser::auto_serialize]
        pub(super) struct ParentVisible { pub(super) value: u8 }

        #[autoser::auto_serialize]
        pub(in crate) struct CrateVisible { pub(crate) value: u8 }

        pub mod deeper {
          #[autoser::auto_serialize]
          pub(super) struct TooDeep { pub(super) value: u8 }

          #[autoser::auto_serialize]
          pub struct Public { pub value: u8 }
        }
      }
    ",
  );

  assert_eq!(
    file_names(&output),
    [
      "RootPrivate.autoser.rs",
      "outer.CrateVisible.autoser.rs",
      "outer.ParentVisible.autoser.rs",
      "outer.deeper.Public.autoser.rs",
    ]
  );
  assert_eq!(codes(&output), [DiagnosticCode::NotExtensible]);
  assert!(output.diagnostics[0].message.contains("`TooDeep`"));
}

#[test]
fn test_private_intermediate_module_is_rejected() {
  let output = generate_root(
    "mod a {\n    mod b {\n        #[autoser::auto_serialize]\n        pub struct T { pub x: u8 }\n    }\n}\n",
  );

  assert_eq!(codes(&output), [DiagnosticCode::NotExtensible]);
  let diagnostic = &output.diagnostics[0];
  assert_eq!(diagnostic.location.to_string(), "src/lib.rs:4:20");
  assert!(diagnostic.message.contains("module `a::b`"), "{}", diagnostic.message);
  assert!(output.files.is_empty());
}

#[test]
fn test_module_chain_must_be_visible_from_the_root() {
  let output = generate(&[
    ("", "mod net;
pub(crate) mod store;"),
    (
      "net",
      "pub(super) mod wire;
mod private;
pub(in crate::net) mod scoped;",
    ),
    ("net::wire", "#[autoser::auto_serialize]
pub struct Frame { pub len: u32 }"),
    ("net::private", "#[autoser::auto_serialize]
pub struct Secret { pub key: u64 }"),
    ("net::scoped", "#[autoser::auto_serialize]
pub(crate) struct Scoped { pub(crate) id: u8 }"),
    ("store", "pub mod pages {
  #[autoser::auto_serialize]
  pub struct Page { pub id: u32 }
}"),
  ]);

  assert_eq!(file_names(&output), ["net.wire.Frame.autoser.rs", "store.pages.Page.autoser.rs"]);
  assert_eq!(codes(&output), [DiagnosticCode::NotExtensible; 2]);
  assert!(output.diagnostics[0].message.contains("module `net::private`"));
  assert!(output.diagnostics[1].message.contains("module `net::scoped`"));
}

#[test]
fn test_undeclared_module_is_not_extensible() {
  let output = generate(&[
    ("", ""),
    ("orphan", "#[autoser::auto_serialize]
pub struct Lost { pub value: u8 }"),
  ]);

  assert_eq!(codes(&output), [DiagnosticCode::NotExtensible]);
  assert!(output.files.is_empty());
}

#[test]
fn test_handwritten_serialize_method_conflicts() {
  let output = generate(&[
    ("", "mod shapes;\nmod imp;"),
    ("shapes", "#[autoser::auto_serialize]\npub struct Circle { pub radius: f64 }"),
    ("imp", "use crate::shapes::Circle;\n\nimpl Circle {\n  pub fn serialize(&mut self) {}\n}\n"),
  ]);

  assert_eq!(codes(&output), [DiagnosticCode::ManualSerializeConflict]);
  assert_eq!(output.diagnostics[0].location.to_string(), "src/imp.rs:4:10");
  assert!(output.files.is_empty());
}

#[test]
fn test_serialize_method_on_other_type_does_not_conflict() {
  let output = generate_root(
    r"
      #[autoser::auto_serialize]
      pub struct Point { pub x: i32 }

      pub struct Other;
      impl Other { pub fn serialize(&self) {} }
      impl Point { pub fn render(&self) {} }
    ",
  );

  assert!(output.diagnostics.is_empty());
  assert_eq!(file_names(&output), ["Point.autoser.rs"]);
}

#[test]
fn test_extensibility_is_checked_before_conflicts() {
  let output = generate_root(
    r"
      mod inner {
        #[autoser::auto_serialize]
        struct Both { value: u8 }
        impl Both { fn serialize(&self) {} }
      }
    ",
  );

  assert_eq!(codes(&output), [DiagnosticCode::NotExtensible]);
}

#[test]
fn test_reference_field_warns_and_is_dropped() {
  let output = generate_root(
    "#[autoser::auto_serialize]\npub struct Named {\n    pub id: u32,\n    pub name: &'static str,\n}\n",
  );

  assert_eq!(codes(&output), [DiagnosticCode::UnsupportedReferenceField]);
  let diagnostic = &output.diagnostics[0];
  assert_eq!(diagnostic.severity, Severity::Warning);
  assert_eq!(diagnostic.location.to_string(), "src/lib.rs:4:9");
  assert!(diagnostic.message.contains("field `name` of `Named`"), "{}", diagnostic.message);

  assert!(!output.has_errors());
  assert_eq!(serialized_fields(fragment(&output, "Named.autoser.rs")), ["id"]);
  assert_eq!(output.stats.reference_fields, 1);
}

#[test]
fn test_reference_tuple_field_points_at_its_type() {
  let output = generate_root("#[autoser::auto_serialize]\npub struct Pair(pub u8, pub &'static str);\n");

  assert_eq!(codes(&output), [DiagnosticCode::UnsupportedReferenceField]);
  assert_eq!(output.diagnostics[0].location.to_string(), "src/lib.rs:2:29");
  assert!(output.diagnostics[0].message.contains("field `1`"));
  assert_eq!(serialized_fields(fragment(&output, "Pair.autoser.rs")), ["0"]);
}

#[test]
fn test_struct_without_serializable_fields_is_silently_skipped() {
  let output = generate_root(
    r"
      use std::marker::PhantomData;

      #[autoser::auto_serialize]
      pub struct Unit;

      #[autoser::auto_serialize]
      pub struct Excluded<T> {
        #[autoser::non_serialized]
        pub cache: u8,
        pub marker: PhantomData<T>,
      }
    ",
  );

  assert!(output.diagnostics.is_empty());
  assert!(output.files.is_empty());
  assert_eq!(report(&output, "Unit").status, CandidateStatus::Empty);
  assert_eq!(report(&output, "Excluded").status, CandidateStatus::Empty);
  assert_eq!(output.stats.candidates_empty, 2);
}

#[test]
fn test_only_reference_fields_still_warn() {
  let output = generate_root("#[autoser::auto_serialize]\npub struct View { pub text: &'static str }");

  assert_eq!(codes(&output), [DiagnosticCode::UnsupportedReferenceField]);
  assert!(output.files.is_empty());
  assert_eq!(report(&output, "View").status, CandidateStatus::Empty);
}

#[test]
fn test_one_rejection_does_not_stop_other_structs() {
  let output = generate_root(
    r"
      mod hidden {
        #[autoser::auto_serialize]
        struct Secret { value: u8 }
      }

      #[autoser::auto_serialize]
      pub struct Visible { pub value: u8 }
    ",
  );

  assert_eq!(codes(&output), [DiagnosticCode::NotExtensible]);
  assert_eq!(file_names(&output), ["Visible.autoser.rs"]);
  assert_eq!(output.stats.candidates_rejected, 1);
}
