use super::support::compilation;
use crate::generator::{
  cache::{Fingerprint, GenerationCache},
  codegen::GenerationContext,
  compilation::ExternCrate,
  orchestrator::Orchestrator,
};

const TWO_STRUCTS: &str = r"
  #[autoser::auto_serialize]
  pub struct Point { pub x: i32, pub y: i32 }

  #[autoser::auto_serialize(false)]
  pub struct Reading { pub value: f64 }
";

const ONE_STRUCT: &str = r"
  #[autoser::auto_serialize]
  pub struct Point { pub x: i32, pub y: i32 }
";

fn orchestrator(source: &str) -> Orchestrator {
  Orchestrator::new(compilation(&[("", source)], vec![ExternCrate::runtime("autoser")]))
}

#[test]
fn test_second_pass_is_served_from_cache() {
  let orchestrator = orchestrator(TWO_STRUCTS);
  let mut cache = GenerationCache::new();

  let first = orchestrator.generate_incremental(&mut cache).unwrap();
  let second = orchestrator.generate_incremental(&mut cache).unwrap();

  assert_eq!(first.stats.cache_hits, 0);
  assert_eq!(second.stats.cache_hits, 2);
  assert_eq!(first.files, second.files);
  assert_eq!(first.index, second.index);
  assert_eq!(cache.len(), 2);
}

#[test]
fn test_cached_output_matches_uncached() {
  let orchestrator = orchestrator(TWO_STRUCTS);
  let mut cache = GenerationCache::new();
  orchestrator.generate_incremental(&mut cache).unwrap();

  let cached = orchestrator.generate_incremental(&mut cache).unwrap();
  let fresh = orchestrator.generate().unwrap();

  assert_eq!(cached.files, fresh.files);
  assert_eq!(cached.reports, fresh.reports);
}

#[test]
fn test_removed_structs_are_evicted() {
  let mut cache = GenerationCache::new();
  orchestrator(TWO_STRUCTS).generate_incremental(&mut cache).unwrap();
  assert_eq!(cache.len(), 2);

  let output = orchestrator(ONE_STRUCT).generate_incremental(&mut cache).unwrap();

  assert_eq!(output.stats.cache_hits, 1);
  assert_eq!(cache.len(), 1);
}

#[test]
fn test_changed_policy_misses() {
  let mut cache = GenerationCache::new();
  orchestrator(ONE_STRUCT).generate_incremental(&mut cache).unwrap();

  let changed = ONE_STRUCT.replace("auto_serialize]", "auto_serialize(false)]");
  let output = orchestrator(&changed).generate_incremental(&mut cache).unwrap();

  assert_eq!(output.stats.cache_hits, 0);
  assert_eq!(cache.len(), 1);
}

#[test]
fn test_marker_resolution_follows_dependencies() {
  let mut cache = GenerationCache::new();
  let with_runtime = compilation(&[("", "")], vec![ExternCrate::runtime("autoser")]);
  let without_runtime = compilation(&[("", "")], vec![]);

  assert!(cache.markers(&with_runtime).is_some());
  assert!(cache.markers(&without_runtime).is_none());
  assert!(cache.markers(&with_runtime).is_some());
}

#[test]
fn test_fingerprint_covers_every_context_input() {
  let base = GenerationContext {
    namespace: vec!["shapes".to_string()],
    type_name: syn::parse_quote!(Point),
    generics: syn::Generics::default(),
    fields: vec![syn::parse_quote!(x), syn::parse_quote!(y)],
    equality: true,
  };

  let mut variants = Vec::new();
  let mut flipped = base.clone();
  flipped.equality = false;
  variants.push(flipped);

  let mut moved = base.clone();
  moved.namespace = vec!["shapes".to_string(), "planar".to_string()];
  variants.push(moved);

  let mut reordered = base.clone();
  reordered.fields.reverse();
  variants.push(reordered);

  let mut generic = base.clone();
  generic.generics = syn::parse_quote!(<T>);
  variants.push(generic);

  let mut split = base.clone();
  split.namespace = vec!["sha".to_string(), "pes".to_string()];
  variants.push(split);

  let original = Fingerprint::of_context(&base);
  assert_eq!(original, Fingerprint::of_context(&base.clone()));
  for variant in &variants {
    assert_ne!(original, Fingerprint::of_context(variant), "{variant:?}");
  }
}
