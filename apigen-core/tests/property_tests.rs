//! Property-based tests for apigen-core.
//!
//! Properties tested:
//! - Name assignment is deterministic for a fixed endpoint order
//! - Resolved names are unique within a direction
//! - Sanitized class names are identifiers
//! - A second run over unchanged input writes nothing

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use tempfile::TempDir;

use apigen_core::ir::Direction;
use apigen_core::naming::{sanitize_class_name, Translator};
use apigen_core::{
    ArtifactPlanner, EndpointDescriptor, KotlinRenderer, NameResolver, Pipeline, PipelineOptions,
    RenderConfig, Renderer, VersionStore,
};

// =============================================================================
// Generators for property tests
// =============================================================================

/// A URL path of one to four lowercase segments.
fn arb_url() -> impl Strategy<Value = String> {
    prop::collection::vec("[b-z][a-z_]{0,5}", 1..=4).prop_map(|segments| format!("/{}", segments.join("/")))
}

/// Distinct URLs, in generation order.
fn arb_urls(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_url(), 1..max).prop_map(|urls| {
        let mut seen = std::collections::HashSet::new();
        urls.into_iter().filter(|u| seen.insert(u.clone())).collect()
    })
}

/// A flat sample object with scalar fields.
fn arb_sample() -> impl Strategy<Value = Value> {
    prop::collection::btree_map(
        "[a-z][a-z_]{0,8}",
        prop_oneof![
            any::<i32>().prop_map(Value::from),
            any::<bool>().prop_map(Value::from),
            "[a-z]{0,6}".prop_map(Value::from),
            Just(Value::Null),
        ],
        1..5,
    )
    .prop_map(|fields| Value::Object(fields.into_iter().collect::<Map<String, Value>>()))
}

fn resolver() -> NameResolver {
    let renderer = KotlinRenderer::new();
    NameResolver::new(renderer.type_suffix(), renderer.keywords(), Translator::default())
}

fn descriptors(urls: &[String]) -> Vec<EndpointDescriptor> {
    urls.iter()
        .map(|url| EndpointDescriptor::new("GET", url.as_str(), ""))
        .collect()
}

// =============================================================================
// Naming
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_name_assignment_is_deterministic(urls in arb_urls(12)) {
        let endpoints = descriptors(&urls);
        let refs: Vec<&EndpointDescriptor> = endpoints.iter().collect();

        let first = resolver().assign(Direction::Response, &refs);
        let second = resolver().assign(Direction::Response, &refs);

        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_resolved_names_are_unique(urls in arb_urls(12)) {
        let endpoints = descriptors(&urls);
        let refs: Vec<&EndpointDescriptor> = endpoints.iter().collect();

        let assignment = resolver().assign(Direction::Response, &refs);
        let names = assignment.names();
        let unique: std::collections::HashSet<&str> = names.iter().copied().collect();

        prop_assert_eq!(names.len(), endpoints.len());
        prop_assert_eq!(unique.len(), names.len(), "duplicate names in {:?}", names);
        for name in &names {
            prop_assert!(name.ends_with("Bean"));
        }
    }

    #[test]
    fn prop_sanitized_names_are_identifiers(text in "[a-zA-Z0-9 _\\-./]{0,24}") {
        let renderer = KotlinRenderer::new();
        let mut translator = Translator::default();
        let name = sanitize_class_name(&text, &mut translator, renderer.keywords());

        prop_assert!(name.chars().next().is_some_and(|c| c.is_ascii_alphabetic()));
        prop_assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}

// =============================================================================
// Incremental runs
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_second_run_writes_nothing(
        urls in arb_urls(6),
        samples in prop::collection::vec(arb_sample(), 6),
    ) {
        let dir = TempDir::new().unwrap();
        let endpoints: Vec<EndpointDescriptor> = urls
            .iter()
            .zip(samples)
            .map(|(url, sample)| {
                EndpointDescriptor::new("GET", url.as_str(), "").with_response(json!({
                    "responseOriginal": {"code": 1, "msg": "ok", "data": sample}
                }))
            })
            .collect();

        let renderer = KotlinRenderer::new();
        let run = || {
            let planner = ArtifactPlanner::new(&renderer, RenderConfig::new());
            Pipeline::new(planner, PipelineOptions::new(dir.path()))
                .run(&endpoints)
                .unwrap()
        };

        let first = run();
        let manifest_len = VersionStore::open(dir.path()).len();
        let second = run();

        prop_assert_eq!(second.summary.updated, 0);
        prop_assert_eq!(second.summary.unchanged, first.summary.updated);
        prop_assert_eq!(second.summary.orphaned, 0);
        prop_assert_eq!(VersionStore::open(dir.path()).len(), manifest_len);
    }
}
