//! Artifact planning.
//!
//! The planner decides which endpoints warrant a response or request type,
//! names every type, infers the schemas and renders one artifact per bundle.
//! It also describes one [`ServiceOperation`] per endpoint; when the render
//! config asks for services, the renderer turns those into client files.
//! Planning does no I/O and is all-or-nothing: a single render failure
//! discards the whole plan.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde_json::Value;

use crate::analyzer::SchemaAnalyzer;
use crate::endpoint::{EndpointDescriptor, EndpointKey};
use crate::envelope::{
    extract_request_payload, extract_response_payload, is_empty_payload, response_sample_text,
    RequestPayload,
};
use crate::error::RenderError;
use crate::ir::{Direction, NestedTypes, TypeBundle, TypeSchema};
use crate::manifest::content_hash;
use crate::naming::{NameAssignment, NameResolver, Translator};
use crate::renderer::{RenderConfig, Renderer};
use crate::request::RequestSchemaBuilder;
use crate::service::{ModelRef, OperationBuilder, ServiceOperation};

/// Category used for endpoints that declare none.
pub const DEFAULT_CATEGORY: &str = "uncategorized";

/// One file to emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Path relative to the output root, `/`-separated.
    pub path: String,
    pub content: String,
    /// Endpoint that produced the artifact; `None` for shared files.
    pub origin: Option<EndpointKey>,
}

impl Artifact {
    pub fn hash(&self) -> String {
        content_hash(&self.content)
    }
}

/// Everything one run would emit.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    /// Bundles grouped by category display name, in plan order.
    pub bundles_by_category: BTreeMap<String, Vec<TypeBundle>>,
    pub artifacts: Vec<Artifact>,
    pub response_names: NameAssignment,
    pub request_names: NameAssignment,
    /// Keys of every planned endpoint, warranted or not.
    pub endpoint_keys: HashSet<EndpointKey>,
    /// Client operations in endpoint order.
    pub operations: Vec<ServiceOperation>,
}

impl Plan {
    /// `path -> content hash` for every artifact.
    pub fn hashes(&self) -> BTreeMap<String, String> {
        self.artifacts
            .iter()
            .map(|a| (a.path.clone(), a.hash()))
            .collect()
    }

    pub fn artifact(&self, path: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.path == path)
    }

    pub fn bundle_count(&self) -> usize {
        self.bundles_by_category.values().map(Vec::len).sum()
    }
}

/// Plans artifacts for one renderer.
pub struct ArtifactPlanner<'r> {
    renderer: &'r dyn Renderer,
    resolver: NameResolver,
    config: RenderConfig,
}

impl<'r> ArtifactPlanner<'r> {
    /// Planner with the renderer's own suffix and the default glossary.
    pub fn new(renderer: &'r dyn Renderer, config: RenderConfig) -> Self {
        let resolver = NameResolver::new(renderer.type_suffix(), renderer.keywords(), Translator::default());
        Self::with_resolver(renderer, resolver, config)
    }

    pub fn with_resolver(renderer: &'r dyn Renderer, resolver: NameResolver, config: RenderConfig) -> Self {
        Self {
            renderer,
            resolver,
            config,
        }
    }

    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Plan artifacts for `endpoints`, which must already be deduplicated.
    #[tracing::instrument(skip_all, fields(renderer = self.renderer.id(), endpoints = endpoints.len()))]
    pub fn plan(&mut self, endpoints: &[EndpointDescriptor]) -> Result<Plan, RenderError> {
        let mut responses: Vec<(&EndpointDescriptor, Value)> = Vec::new();
        let mut requests: Vec<(&EndpointDescriptor, RequestPayload)> = Vec::new();

        for endpoint in endpoints {
            let payload = endpoint.response.as_ref().and_then(extract_response_payload);
            match payload {
                Some(payload) if !is_empty_payload(Some(&payload)) => responses.push((endpoint, payload)),
                _ => tracing::trace!(endpoint = %endpoint.key(), "no response payload"),
            }

            if let Some(payload) = endpoint.body.as_ref().and_then(extract_request_payload) {
                requests.push((endpoint, payload));
            }
        }

        let response_endpoints: Vec<&EndpointDescriptor> = responses.iter().map(|(e, _)| *e).collect();
        let request_endpoints: Vec<&EndpointDescriptor> = requests.iter().map(|(e, _)| *e).collect();
        let response_names = self.resolver.assign(Direction::Response, &response_endpoints);
        let request_names = self.resolver.assign(Direction::Request, &request_endpoints);

        let mut plan = Plan {
            endpoint_keys: endpoints.iter().map(EndpointDescriptor::key).collect(),
            ..Plan::default()
        };
        let mut models: HashMap<(EndpointKey, Direction), ModelRef> = HashMap::new();

        for (endpoint, payload) in &responses {
            let Some(name) = response_names.get(&endpoint.key()) else {
                continue;
            };
            let analysis = SchemaAnalyzer::new(&mut self.resolver).analyze(payload, name);
            if analysis.is_empty() {
                tracing::debug!(endpoint = %endpoint.key(), name = %name, "response schema is empty");
                continue;
            }
            let mut bundle = self.bundle(endpoint, name, Direction::Response);
            bundle.root = analysis.root;
            bundle.nested = analysis.nested;
            bundle.sample = endpoint.response.as_ref().and_then(response_sample_text);
            if let Some(model) = self.add_bundle(&mut plan, bundle)? {
                models.insert((endpoint.key(), Direction::Response), model);
            }
        }

        for (endpoint, payload) in &requests {
            let Some(name) = request_names.get(&endpoint.key()) else {
                continue;
            };
            let mut bundle = self.bundle(endpoint, name, Direction::Request);
            match payload {
                RequestPayload::Object(map) => {
                    let analysis = SchemaAnalyzer::new(&mut self.resolver).analyze(&Value::Object(map.clone()), name);
                    bundle.root = analysis.root;
                    bundle.nested = analysis.nested;
                }
                RequestPayload::Params(params) => {
                    bundle.root = RequestSchemaBuilder::new().build(params);
                }
            }
            if bundle.root.is_empty() {
                tracing::debug!(endpoint = %endpoint.key(), name = %name, "request schema is empty");
                continue;
            }
            if let Some(model) = self.add_bundle(&mut plan, bundle)? {
                models.insert((endpoint.key(), Direction::Request), model);
            }
        }

        let payloads: HashMap<EndpointKey, &RequestPayload> =
            requests.iter().map(|(e, payload)| (e.key(), payload)).collect();
        let mut builder = OperationBuilder::new(self.renderer.keywords());
        for endpoint in endpoints {
            let key = endpoint.key();
            let operation = builder.build(
                endpoint,
                payloads.get(&key).copied(),
                models.get(&(key.clone(), Direction::Request)).cloned(),
                models.get(&(key, Direction::Response)).cloned(),
            );
            plan.operations.extend(operation);
        }

        let clients = if self.config.generate_services && !plan.operations.is_empty() {
            self.renderer.render_services(&plan.operations, &self.config)?
        } else {
            Vec::new()
        };

        // Client files decode through the shared envelope.
        if !plan.artifacts.is_empty() || !clients.is_empty() {
            for shared in self.renderer.shared_artifacts(&self.config) {
                plan.artifacts.push(Artifact {
                    path: shared.path,
                    content: shared.content,
                    origin: None,
                });
            }
        }

        for client in clients {
            plan.artifacts.push(Artifact {
                path: client.path,
                content: client.content,
                origin: None,
            });
        }

        plan.response_names = response_names;
        plan.request_names = request_names;

        tracing::debug!(
            bundles = plan.bundle_count(),
            artifacts = plan.artifacts.len(),
            operations = plan.operations.len(),
            categories = plan.bundles_by_category.len(),
            "planned artifacts"
        );
        Ok(plan)
    }

    fn bundle(&self, endpoint: &EndpointDescriptor, name: &str, direction: Direction) -> TypeBundle {
        let category = endpoint.category.trim();
        TypeBundle {
            name: name.to_string(),
            root: TypeSchema::new(),
            nested: NestedTypes::new(),
            category: if category.is_empty() {
                DEFAULT_CATEGORY.to_string()
            } else {
                category.to_string()
            },
            direction,
            origin: endpoint.key(),
            title: endpoint.title.clone(),
            page_id: endpoint.page_id.clone(),
            sample: None,
        }
    }

    /// Render and add `bundle`; returns the model it defines unless its
    /// path was already taken.
    fn add_bundle(&mut self, plan: &mut Plan, bundle: TypeBundle) -> Result<Option<ModelRef>, RenderError> {
        let folder = self.resolver.category_folder(&bundle.category);
        let path = self.renderer.artifact_path(&folder, bundle.direction, &bundle.name);

        if plan.artifact(&path).is_some() {
            tracing::warn!(path = %path, endpoint = %bundle.origin, "artifact path already planned, skipping");
            return Ok(None);
        }

        let content = self.renderer.render_bundle(&bundle, &folder, &self.config)?;
        plan.artifacts.push(Artifact {
            path,
            content,
            origin: Some(bundle.origin.clone()),
        });
        let model = ModelRef::new(bundle.name.clone(), folder, bundle.direction);
        plan.bundles_by_category
            .entry(bundle.category.clone())
            .or_default()
            .push(bundle);
        Ok(Some(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DartRenderer, KotlinRenderer};
    use serde_json::json;

    fn endpoint(url: &str, data: Value) -> EndpointDescriptor {
        EndpointDescriptor::new("GET", url, "")
            .with_category("User")
            .with_response(json!({
                "responseExample": json!({"code": 0, "msg": "ok", "data": data}).to_string()
            }))
    }

    #[test]
    fn test_plan_response_artifact() {
        let renderer = KotlinRenderer::new();
        let mut planner = ArtifactPlanner::new(&renderer, RenderConfig::new());

        let plan = planner
            .plan(&[endpoint("/v1/user/info", json!({"id": 1, "profile": {"nick": "a"}}))])
            .unwrap();

        let paths: Vec<&str> = plan.artifacts.iter().map(|a| a.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["entities/user/response/InfoBean.kt", "entities/ResponseData.kt"]
        );
        assert_eq!(
            plan.artifacts[0].origin,
            Some(EndpointKey::new("/v1/user/info", "GET"))
        );
        assert!(plan.artifacts[0].content.contains("data class ProfileBean("));
        assert_eq!(plan.artifacts[1].origin, None);
        assert_eq!(plan.bundles_by_category["User"].len(), 1);
    }

    #[test]
    fn test_empty_data_suppresses_response() {
        let renderer = KotlinRenderer::new();
        let mut planner = ArtifactPlanner::new(&renderer, RenderConfig::new());

        let plan = planner
            .plan(&[
                endpoint("/a", json!([])),
                endpoint("/b", json!({})),
                endpoint("/c", json!("  ")),
            ])
            .unwrap();

        assert!(plan.artifacts.is_empty());
        assert!(plan.response_names.is_empty());
        assert_eq!(plan.endpoint_keys.len(), 3);
    }

    #[test]
    fn test_scalar_array_reserves_name_without_artifact() {
        let renderer = KotlinRenderer::new();
        let mut planner = ArtifactPlanner::new(&renderer, RenderConfig::new());

        let plan = planner.plan(&[endpoint("/v1/ids", json!([1, 2]))]).unwrap();

        assert_eq!(plan.response_names.names(), vec!["IdsBean"]);
        assert!(plan.artifacts.is_empty());
    }

    #[test]
    fn test_request_artifacts() {
        let renderer = DartRenderer::new();
        let mut planner = ArtifactPlanner::new(&renderer, RenderConfig::new());

        let login = EndpointDescriptor::new("POST", "/v1/auth/login", "Login").with_body(json!({
            "mode": "urlencoded",
            "urlencoded": [
                {"name": "user_name", "type": "string", "require": "1"},
                {"name": "debug", "type": "int", "require": "0", "disable": "1"}
            ]
        }));
        let search = EndpointDescriptor::new("POST", "/v1/goods/search", "Search").with_body(json!({
            "mode": "json",
            "json": "{\"keyword\": \"a\", \"filter\": {\"min\": 1}}"
        }));

        let plan = planner.plan(&[login, search]).unwrap();
        let paths: Vec<&str> = plan.artifacts.iter().map(|a| a.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "models/uncategorized/request/login.dart",
                "models/uncategorized/request/search.dart",
                "models/response_data.dart",
            ]
        );

        let login = plan.artifact("models/uncategorized/request/login.dart").unwrap();
        assert!(login.content.contains("final String userName;"));
        assert!(!login.content.contains("debug"));

        let search = plan.artifact("models/uncategorized/request/search.dart").unwrap();
        assert!(search.content.contains("class Filter {"));
    }

    #[test]
    fn test_colliding_names_resolve_by_depth() {
        let renderer = KotlinRenderer::new();
        let mut planner = ArtifactPlanner::new(&renderer, RenderConfig::new());

        let plan = planner
            .plan(&[
                endpoint("/v1/user/list", json!({"id": 1})),
                endpoint("/v1/order/list", json!({"id": 1})),
            ])
            .unwrap();

        assert_eq!(plan.response_names.names(), vec!["UserListBean", "OrderListBean"]);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let renderer = KotlinRenderer::new();
        let endpoints = vec![
            endpoint("/v1/user/info", json!({"id": 1, "tags": [{"name": "a"}]})),
            endpoint("/v2/user/info", json!({"id": 2})),
        ];

        let first = ArtifactPlanner::new(&renderer, RenderConfig::new())
            .plan(&endpoints)
            .unwrap();
        let second = ArtifactPlanner::new(&renderer, RenderConfig::new())
            .plan(&endpoints)
            .unwrap();

        assert_eq!(first.artifacts, second.artifacts);
    }

    // ==========================================================================
    // Service Operation Tests
    // ==========================================================================

    #[test]
    fn test_operations_reference_planned_models() {
        let renderer = KotlinRenderer::new();
        let mut planner = ArtifactPlanner::new(&renderer, RenderConfig::new());

        let create = EndpointDescriptor::new("POST", "/v1/order/create", "Create order")
            .with_category("Order")
            .with_body(json!({
                "mode": "json",
                "json": "{\"sku\": \"a\", \"items\": [{\"id\": 1}]}"
            }))
            .with_response(json!({
                "responseExample": json!({"code": 0, "data": {"orderId": 7}}).to_string()
            }));
        let ping = EndpointDescriptor::new("GET", "/v1/ping", "Ping");

        let plan = planner
            .plan(&[endpoint("/v1/user/info", json!({"id": 1})), create, ping])
            .unwrap();

        let names: Vec<&str> = plan.operations.iter().map(|op| op.name.as_str()).collect();
        assert_eq!(names, vec!["info", "create", "ping"]);

        assert_eq!(
            plan.operations[0].response,
            Some(ModelRef::new("InfoBean", "user", Direction::Response))
        );
        assert_eq!(
            plan.operations[1].request_model(),
            Some(&ModelRef::new("CreateBean", "order", Direction::Request))
        );
        assert_eq!(
            plan.operations[1].response,
            Some(ModelRef::new("CreateBean", "order", Direction::Response))
        );
        assert_eq!(plan.operations[2].response, None);

        // Services are opt-in.
        assert!(plan.artifact("services/ApiService.kt").is_none());
    }

    #[test]
    fn test_services_are_planned_as_shared_artifacts() {
        let renderer = KotlinRenderer::new();
        let config = RenderConfig::new().with_services(true);
        let mut planner = ArtifactPlanner::new(&renderer, config);

        let plan = planner
            .plan(&[endpoint("/v1/user/info", json!({"id": 1}))])
            .unwrap();

        let paths: Vec<&str> = plan.artifacts.iter().map(|a| a.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "entities/user/response/InfoBean.kt",
                "entities/ResponseData.kt",
                "services/ApiService.kt",
                "repository/ApiRepository.kt",
                "config/OkHttpConfig.kt",
            ]
        );
        assert!(plan.artifacts[2..].iter().all(|a| a.origin.is_none()));
        assert!(plan.artifacts[2]
            .content
            .contains("suspend fun info(): Response<ResponseData<InfoBean>>"));
    }

    #[test]
    fn test_services_without_models() {
        let renderer = DartRenderer::new();
        let mut planner = ArtifactPlanner::new(&renderer, RenderConfig::new().with_services(true));

        let plan = planner
            .plan(&[EndpointDescriptor::new("DELETE", "/v1/cache", "Clear cache")])
            .unwrap();

        let paths: Vec<&str> = plan.artifacts.iter().map(|a| a.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "models/response_data.dart",
                "services/api_service.dart",
                "repositories/api_repository.dart",
                "config/dio_config.dart",
            ]
        );
        assert!(plan.artifacts[1]
            .content
            .contains("Future<ResponseData<dynamic>> cache() async {"));
    }
}
