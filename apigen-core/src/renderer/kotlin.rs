//! Kotlin renderer.
//!
//! Emits one file per bundle holding `@Parcelize` data classes: the root
//! type first, then every nested type in registration order. With client
//! generation enabled it also emits a Retrofit `ApiService`, an
//! `ApiRepository` running calls on the IO dispatcher and an `OkHttpConfig`
//! object.
//!
//! # Type Mappings
//!
//! | Field kind | Kotlin type |
//! |------------|-------------|
//! | `String` | `String` |
//! | `Int` / `Long` | `Int` / `Long` |
//! | `Float` / `Double` | `Float` / `Double` |
//! | `Boolean` | `Boolean` |
//! | `Object`, `File`, `Any` | `Any` |
//! | `Array(T)` | `MutableList<T>` |
//! | `Reference(name)` | `name` |

use std::collections::BTreeSet;
use std::fmt::Write as _;

use super::{check_references, comment_safe, referenced_models, RenderConfig, Renderer, SharedArtifact};
use crate::error::RenderError;
use crate::ir::{FieldKind, FieldType, Primitive, TypeBundle, TypeSchema};
use crate::service::{ModelRef, ServiceOperation};

const KOTLIN_KEYWORDS: &[&str] = &[
    "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in",
    "interface", "is", "null", "object", "out", "package", "return", "super", "this", "throw",
    "true", "try", "typealias", "typeof", "val", "var", "when", "while", "catch", "import",
];

/// Maps field types to Kotlin type expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct KotlinTypeMapper;

impl KotlinTypeMapper {
    pub fn new() -> Self {
        Self
    }

    /// Map a field type, appending `?` when nullable.
    pub fn map_type(&self, ty: &FieldType) -> String {
        let base = self.map_kind(&ty.kind);
        if ty.nullable {
            format!("{base}?")
        } else {
            base
        }
    }

    fn map_kind(&self, kind: &FieldKind) -> String {
        match kind {
            FieldKind::Primitive(p) => self.map_primitive(*p).to_string(),
            FieldKind::Array(element) => format!("MutableList<{}>", self.map_type(element)),
            FieldKind::Reference(name) => name.clone(),
        }
    }

    fn map_primitive(&self, primitive: Primitive) -> &'static str {
        match primitive {
            Primitive::String => "String",
            Primitive::Int => "Int",
            Primitive::Long => "Long",
            Primitive::Float => "Float",
            Primitive::Double => "Double",
            Primitive::Boolean => "Boolean",
            Primitive::Object | Primitive::File | Primitive::Any => "Any",
        }
    }

    /// Property name as written in source; keywords and names that are not
    /// plain identifiers are backtick-quoted.
    pub fn property_name(&self, field: &str) -> String {
        let plain = field.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
            && field.chars().all(|c| c.is_alphanumeric() || c == '_');
        if plain && !KOTLIN_KEYWORDS.contains(&field) {
            field.to_string()
        } else {
            format!("`{}`", field.replace('`', ""))
        }
    }
}

/// Renders `@Parcelize` data classes for Android.
#[derive(Debug, Clone, Default)]
pub struct KotlinRenderer {
    mapper: KotlinTypeMapper,
}

impl KotlinRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn package_of(&self, config: &RenderConfig, folder: &str, bundle: &TypeBundle) -> String {
        format!("{}.entities.{}.{}", config.package, folder, bundle.direction)
    }

    fn write_class(&self, out: &mut String, name: &str, schema: &TypeSchema) {
        out.push_str("@Parcelize\n");
        if schema.is_empty() {
            let _ = writeln!(out, "class {name} : Parcelable");
            return;
        }

        let _ = writeln!(out, "data class {name}(");
        let last = schema.len() - 1;
        for (idx, (field, ty)) in schema.iter().enumerate() {
            let _ = write!(
                out,
                "    var {}: {}",
                self.mapper.property_name(field),
                self.mapper.map_type(ty)
            );
            out.push_str(if idx < last { ",\n" } else { "\n" });
        }
        out.push_str(") : Parcelable\n");
    }

    fn write_root_doc(&self, out: &mut String, bundle: &TypeBundle, config: &RenderConfig) {
        let title = bundle.title.trim();
        out.push_str("/**\n");
        if title.is_empty() || title == bundle.name {
            let _ = writeln!(out, " * {}", bundle.name);
        } else {
            let _ = writeln!(out, " * {} ({})", comment_safe(title), bundle.name);
        }

        if let Some(url) = config.page_url(&bundle.page_id) {
            out.push_str(" *\n");
            let _ = writeln!(out, " * Docs: {url}");
        }

        if let Some(sample) = bundle.sample.as_deref() {
            out.push_str(" *\n * Sample response:\n");
            for line in comment_safe(sample).lines() {
                let _ = writeln!(out, " * {line}");
            }
        }
        out.push_str(" */\n");
    }

    fn model_package(&self, config: &RenderConfig, model: &ModelRef) -> String {
        format!("{}.entities.{}.{}", config.package, model.folder, model.direction)
    }

    /// Type expression for a model; names shared by two models are written
    /// fully qualified.
    fn model_type(&self, config: &RenderConfig, model: &ModelRef, shared: &BTreeSet<&str>) -> String {
        if shared.contains(model.name.as_str()) {
            format!("{}.{}", self.model_package(config, model), model.name)
        } else {
            model.name.clone()
        }
    }

    fn envelope_type(&self, config: &RenderConfig, op: &ServiceOperation, shared: &BTreeSet<&str>) -> String {
        let data = op
            .response
            .as_ref()
            .map_or_else(|| "Parcelable".to_string(), |m| self.model_type(config, m, shared));
        format!("ResponseData<{data}>")
    }

    fn model_imports(&self, out: &mut String, config: &RenderConfig, operations: &[ServiceOperation]) {
        let (models, shared) = referenced_models(operations);
        let mut imports: BTreeSet<String> = models
            .iter()
            .filter(|m| !shared.contains(m.name.as_str()))
            .map(|m| format!("{}.{}", self.model_package(config, m), m.name))
            .collect();
        imports.insert(format!("{}.entities.ResponseData", config.package));
        if operations.iter().any(|op| op.response.is_none()) {
            imports.insert("android.os.Parcelable".to_string());
        }
        for import in imports {
            let _ = writeln!(out, "import {import}");
        }
    }

    /// Retrofit method annotation. Methods Retrofit has no body-carrying
    /// annotation for go through `@HTTP`.
    fn http_annotation(&self, op: &ServiceOperation) -> String {
        let has_body = !op.form_fields().is_empty() || op.request_model().is_some();
        match op.http_method.as_str() {
            "POST" | "PUT" | "PATCH" => format!("@{}(\"{}\")", op.http_method, op.path),
            "GET" | "DELETE" | "HEAD" | "OPTIONS" if !has_body => {
                format!("@{}(\"{}\")", op.http_method, op.path)
            }
            method => format!(
                "@HTTP(method = \"{}\", path = \"{}\", hasBody = {})",
                method, op.path, has_body
            ),
        }
    }

    fn body_ident(op: &ServiceOperation) -> &'static str {
        if op.params().any(|p| p.ident == "body") {
            "requestBody"
        } else {
            "body"
        }
    }

    fn write_operation_doc(&self, out: &mut String, op: &ServiceOperation, config: &RenderConfig) {
        if !config.generate_docs {
            return;
        }
        out.push_str("    /**\n");
        if !op.title.is_empty() {
            let _ = writeln!(out, "     * {}", comment_safe(&op.title));
        }
        if !op.description.is_empty() {
            let _ = writeln!(out, "     * {}", comment_safe(&op.description));
        }
        if !op.category.is_empty() {
            let _ = writeln!(out, "     * Category: {}", comment_safe(&op.category));
        }
        let _ = writeln!(out, "     * API: {} {}", op.http_method, comment_safe(&op.path));
        out.push_str("     */\n");
    }

    fn service_file(&self, operations: &[ServiceOperation], config: &RenderConfig) -> String {
        let (_, shared) = referenced_models(operations);
        let mut out = String::new();
        let _ = writeln!(out, "package {}.services\n", config.package);
        self.model_imports(&mut out, config, operations);
        out.push_str("import retrofit2.Response\nimport retrofit2.http.*\n\n");
        out.push_str("/**\n * Retrofit service for the documented endpoints.\n */\ninterface ApiService {\n");

        for op in operations {
            out.push('\n');
            self.write_operation_doc(&mut out, op, config);

            let mut params: Vec<String> = Vec::new();
            for p in &op.path_params {
                params.push(format!("@Path(\"{}\") {}: {}", p.wire_name, p.ident, self.mapper.map_type(&p.ty)));
            }
            for p in &op.query {
                params.push(format!("@Query(\"{}\") {}: {}", p.wire_name, p.ident, self.mapper.map_type(&p.ty)));
            }
            for p in op.form_fields() {
                params.push(format!("@Field(\"{}\") {}: {}", p.wire_name, p.ident, self.mapper.map_type(&p.ty)));
            }
            if let Some(model) = op.request_model() {
                params.push(format!("@Body {}: {}", Self::body_ident(op), self.model_type(config, model, &shared)));
            }

            if !op.form_fields().is_empty() {
                out.push_str("    @FormUrlEncoded\n");
            }
            let _ = writeln!(out, "    {}", self.http_annotation(op));
            let returns = format!("Response<{}>", self.envelope_type(config, op, &shared));
            if params.is_empty() {
                let _ = writeln!(out, "    suspend fun {}(): {}", op.name, returns);
            } else {
                let _ = writeln!(out, "    suspend fun {}(", op.name);
                let _ = writeln!(out, "        {}", params.join(",\n        "));
                let _ = writeln!(out, "    ): {returns}");
            }
        }

        out.push_str("}\n");
        out
    }

    fn repository_file(&self, operations: &[ServiceOperation], config: &RenderConfig) -> String {
        let (_, shared) = referenced_models(operations);
        let mut out = String::new();
        let _ = writeln!(out, "package {}.repository\n", config.package);
        self.model_imports(&mut out, config, operations);
        let _ = writeln!(out, "import {}.services.ApiService", config.package);
        out.push_str(
            r#"import kotlinx.coroutines.Dispatchers
import kotlinx.coroutines.withContext
import retrofit2.Response

/**
 * Runs [ApiService] calls on the IO dispatcher and unwraps the HTTP response.
 */
open class ApiRepository(private val apiService: ApiService) {

    private suspend fun <T> request(call: suspend () -> Response<T>): T = withContext(Dispatchers.IO) {
        val response = call()
        val body = response.body()
        if (response.isSuccessful && body != null) {
            body
        } else {
            throw IllegalStateException("HTTP ${response.code()}: ${response.message()}")
        }
    }
"#,
        );

        for op in operations {
            let mut params: Vec<String> = op
                .params()
                .map(|p| format!("{}: {}", p.ident, self.mapper.map_type(&p.ty)))
                .collect();
            let mut args: Vec<String> = op.params().map(|p| format!("{0} = {0}", p.ident)).collect();
            if let Some(model) = op.request_model() {
                let body = Self::body_ident(op);
                params.push(format!("{}: {}", body, self.model_type(config, model, &shared)));
                args.push(format!("{body} = {body}"));
            }

            out.push('\n');
            let _ = writeln!(
                out,
                "    suspend fun {}({}): {} =\n        request {{ apiService.{}({}) }}",
                op.name,
                params.join(", "),
                self.envelope_type(config, op, &shared),
                op.name,
                args.join(", ")
            );
        }

        out.push_str(
            r#"
    companion object {
        @Volatile
        private var instance: ApiRepository? = null

        fun getInstance(apiService: ApiService): ApiRepository =
            instance ?: synchronized(this) {
                instance ?: ApiRepository(apiService).also { instance = it }
            }
    }
}
"#,
        );
        out
    }

    fn client_config_file(&self, config: &RenderConfig) -> String {
        format!(
            r#"package {package}.config

import okhttp3.OkHttpClient
import okhttp3.logging.HttpLoggingInterceptor
import retrofit2.Retrofit
import retrofit2.converter.gson.GsonConverterFactory
import java.util.concurrent.TimeUnit
import {package}.services.ApiService

/**
 * OkHttp and Retrofit setup for [ApiService].
 */
object OkHttpConfig {{

    private const val BASE_URL = "{base_url}"
    private const val TIMEOUT_SECONDS = {timeout}L

    /** Logs request and response bodies when set. */
    var loggingEnabled: Boolean = {logging}

    fun createOkHttpClient(): OkHttpClient {{
        val builder = OkHttpClient.Builder()
            .connectTimeout(TIMEOUT_SECONDS, TimeUnit.SECONDS)
            .readTimeout(TIMEOUT_SECONDS, TimeUnit.SECONDS)
            .writeTimeout(TIMEOUT_SECONDS, TimeUnit.SECONDS)

        if (loggingEnabled) {{
            builder.addInterceptor(HttpLoggingInterceptor().apply {{
                level = HttpLoggingInterceptor.Level.BODY
            }})
        }}

        return builder.build()
    }}

    fun createRetrofit(): Retrofit =
        Retrofit.Builder()
            .baseUrl(BASE_URL)
            .client(createOkHttpClient())
            .addConverterFactory(GsonConverterFactory.create())
            .build()

    fun createApiService(): ApiService = createRetrofit().create(ApiService::class.java)
}}
"#,
            package = config.package,
            base_url = config
                .base_url
                .replace('\\', "\\\\")
                .replace('"', "\\\"")
                .replace('$', "\\$"),
            timeout = config.timeout_seconds,
            logging = config.http_logging,
        )
    }
}

impl Renderer for KotlinRenderer {
    fn id(&self) -> &'static str {
        "kotlin"
    }

    fn name(&self) -> &'static str {
        "Kotlin Parcelize"
    }

    fn file_extension(&self) -> &'static str {
        "kt"
    }

    fn type_suffix(&self) -> &'static str {
        "Bean"
    }

    fn keywords(&self) -> &'static [&'static str] {
        KOTLIN_KEYWORDS
    }

    fn model_dir(&self) -> &'static str {
        "entities"
    }

    fn render_bundle(
        &self,
        bundle: &TypeBundle,
        category_folder: &str,
        config: &RenderConfig,
    ) -> Result<String, RenderError> {
        check_references(bundle)?;

        let mut out = String::new();
        let _ = writeln!(out, "package {}", self.package_of(config, category_folder, bundle));
        out.push_str("\nimport android.os.Parcelable\nimport kotlinx.parcelize.Parcelize\n\n");

        if config.generate_docs {
            self.write_root_doc(&mut out, bundle, config);
        }
        self.write_class(&mut out, &bundle.name, &bundle.root);

        for nested in bundle.nested.iter() {
            out.push('\n');
            if config.generate_docs {
                let _ = writeln!(out, "/**\n * {}\n */", nested.name);
            }
            self.write_class(&mut out, &nested.name, &nested.schema);
        }

        Ok(out)
    }

    fn shared_artifacts(&self, config: &RenderConfig) -> Vec<SharedArtifact> {
        let content = format!(
            r#"package {package}.entities

import android.os.Parcelable
import kotlinx.parcelize.Parcelize

/**
 * Envelope wrapping every API response.
 */
@Parcelize
data class ResponseData<out T : Parcelable>(
    var code: Int,
    var msg: String,
    val data: T?,
    var hasNext: Int = 0
) : Parcelable {{
    companion object {{
        const val REQUEST_CODE_SUCCESS = 1
    }}

    val success: Boolean
        get() = code == REQUEST_CODE_SUCCESS
}}
"#,
            package = config.package
        );

        vec![SharedArtifact {
            path: format!("{}/ResponseData.{}", self.model_dir(), self.file_extension()),
            content,
        }]
    }

    fn render_services(
        &self,
        operations: &[ServiceOperation],
        config: &RenderConfig,
    ) -> Result<Vec<SharedArtifact>, RenderError> {
        if operations.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![
            SharedArtifact {
                path: "services/ApiService.kt".to_string(),
                content: self.service_file(operations, config),
            },
            SharedArtifact {
                path: "repository/ApiRepository.kt".to_string(),
                content: self.repository_file(operations, config),
            },
            SharedArtifact {
                path: "config/OkHttpConfig.kt".to_string(),
                content: self.client_config_file(config),
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::EndpointKey;
    use crate::ir::{Direction, NestedTypeDef, NestedTypes};
    use crate::renderer::DocLinks;

    fn bundle() -> TypeBundle {
        let mut root = TypeSchema::new();
        root.insert("id", FieldType::primitive(Primitive::Int));
        root.insert("class", FieldType::primitive(Primitive::String).as_nullable());
        root.insert("tags", FieldType::array(FieldType::reference("TagsBean")));

        let mut tags = TypeSchema::new();
        tags.insert("label", FieldType::primitive(Primitive::String));
        let mut nested = NestedTypes::new();
        nested.register(NestedTypeDef::new("TagsBean", tags));

        TypeBundle {
            name: "InfoBean".to_string(),
            root,
            nested,
            category: "User".to_string(),
            direction: Direction::Response,
            origin: EndpointKey::new("/user/info", "GET"),
            title: "User info".to_string(),
            page_id: "9".to_string(),
            sample: Some("{\n  \"id\": 1\n}".to_string()),
        }
    }

    #[test]
    fn test_type_mapping() {
        let mapper = KotlinTypeMapper::new();
        assert_eq!(mapper.map_type(&FieldType::untyped()), "Any?");
        assert_eq!(
            mapper.map_type(&FieldType::array(FieldType::primitive(Primitive::Long))),
            "MutableList<Long>"
        );
        assert_eq!(
            mapper.map_type(&FieldType::reference("UserBean").as_nullable()),
            "UserBean?"
        );
        assert_eq!(mapper.map_type(&FieldType::primitive(Primitive::File)), "Any");
    }

    #[test]
    fn test_property_names() {
        let mapper = KotlinTypeMapper::new();
        assert_eq!(mapper.property_name("userName"), "userName");
        assert_eq!(mapper.property_name("val"), "`val`");
        assert_eq!(mapper.property_name("user-name"), "`user-name`");
        assert_eq!(mapper.property_name("1st"), "`1st`");
    }

    #[test]
    fn test_render_bundle() {
        let config = RenderConfig::new()
            .with_package("com.acme.api")
            .with_doc_links(Some(DocLinks::new("https://doc.acme.com", "3")));
        let content = KotlinRenderer::new()
            .render_bundle(&bundle(), "user", &config)
            .unwrap();

        assert!(content.starts_with("package com.acme.api.entities.user.response\n"));
        assert!(content.contains(" * User info (InfoBean)"));
        assert!(content.contains(" * Docs: https://doc.acme.com/web/#/3/9"));
        assert!(content.contains(" *   \"id\": 1"));
        assert!(content.contains("data class InfoBean(\n    var id: Int,\n    var `class`: String?,\n    var tags: MutableList<TagsBean>\n) : Parcelable"));
        assert!(content.contains("data class TagsBean(\n    var label: String\n) : Parcelable"));
    }

    #[test]
    fn test_render_without_docs() {
        let config = RenderConfig::new().with_generate_docs(false);
        let content = KotlinRenderer::new()
            .render_bundle(&bundle(), "user", &config)
            .unwrap();
        assert!(!content.contains("/**"));
    }

    #[test]
    fn test_empty_nested_class() {
        let mut b = bundle();
        b.nested.register(NestedTypeDef::new("MetaBean", TypeSchema::new()));
        let content = KotlinRenderer::new()
            .render_bundle(&b, "user", &RenderConfig::new())
            .unwrap();
        assert!(content.contains("@Parcelize\nclass MetaBean : Parcelable"));
    }

    #[test]
    fn test_render_rejects_dangling_reference() {
        let mut b = bundle();
        b.nested = NestedTypes::new();
        let err = KotlinRenderer::new()
            .render_bundle(&b, "user", &RenderConfig::new())
            .unwrap_err();
        assert_eq!(err, RenderError::missing_reference("InfoBean", "TagsBean"));
    }

    fn operations() -> Vec<ServiceOperation> {
        use crate::endpoint::EndpointDescriptor;
        use crate::envelope::RequestPayload;
        use crate::request::ParamRecord;
        use crate::service::OperationBuilder;

        let mut builder = OperationBuilder::new(KOTLIN_KEYWORDS);
        let profile = builder
            .build(
                &EndpointDescriptor::new("GET", "/v1/user/{userId}/profile", "User profile")
                    .with_category("User"),
                None,
                None,
                Some(ModelRef::new("ProfileBean", "user", Direction::Response)),
            )
            .unwrap();
        let form = RequestPayload::Params(vec![
            ParamRecord::new("sku", "string", true),
            ParamRecord::new("count", "int", false),
        ]);
        let create = builder
            .build(
                &EndpointDescriptor::new("POST", "/v1/order/create", ""),
                Some(&form),
                Some(ModelRef::new("CreateBean", "order", Direction::Request)),
                Some(ModelRef::new("CreateBean", "order", Direction::Response)),
            )
            .unwrap();
        let json = RequestPayload::Object(
            serde_json::json!({"items": [{"id": 1}]}).as_object().cloned().unwrap(),
        );
        let update = builder
            .build(
                &EndpointDescriptor::new("DELETE", "/v1/order/{id}", "Delete order"),
                Some(&json),
                Some(ModelRef::new("CreateBean", "order", Direction::Request)),
                None,
            )
            .unwrap();
        vec![profile, create, update]
    }

    #[test]
    fn test_render_service_interface() {
        let config = RenderConfig::new().with_package("com.shop.api").with_services(true);
        let files = KotlinRenderer::new().render_services(&operations(), &config).unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["services/ApiService.kt", "repository/ApiRepository.kt", "config/OkHttpConfig.kt"]
        );

        let service = &files[0].content;
        assert!(service.starts_with("package com.shop.api.services\n"));
        assert!(service.contains("import com.shop.api.entities.user.response.ProfileBean\n"));
        assert!(service.contains("import com.shop.api.entities.ResponseData\n"));
        assert!(service.contains("import android.os.Parcelable\n"));
        assert!(!service.contains("import com.shop.api.entities.order.response.CreateBean"));

        assert!(service.contains("     * User profile\n     * Category: User\n     * API: GET /v1/user/{userId}/profile\n"));
        assert!(service.contains(
            "    @GET(\"/v1/user/{userId}/profile\")\n    suspend fun profile(\n        @Path(\"userId\") userId: String\n    ): Response<ResponseData<ProfileBean>>"
        ));
        assert!(service.contains(
            "    @FormUrlEncoded\n    @POST(\"/v1/order/create\")\n    suspend fun create(\n        @Field(\"sku\") sku: String,\n        @Field(\"count\") count: Int?\n    ): Response<ResponseData<com.shop.api.entities.order.response.CreateBean>>"
        ));
        assert!(service.contains(
            "    @HTTP(method = \"DELETE\", path = \"/v1/order/{id}\", hasBody = true)\n    suspend fun order(\n        @Path(\"id\") id: String,\n        @Body body: com.shop.api.entities.order.request.CreateBean\n    ): Response<ResponseData<Parcelable>>"
        ));
    }

    #[test]
    fn test_render_repository_and_client_config() {
        let config = RenderConfig::new()
            .with_package("com.shop.api")
            .with_services(true)
            .with_client("https://shop.example.com/", 15, false);
        let files = KotlinRenderer::new().render_services(&operations(), &config).unwrap();

        let repository = &files[1].content;
        assert!(repository.starts_with("package com.shop.api.repository\n"));
        assert!(repository.contains("import com.shop.api.services.ApiService\n"));
        assert!(repository.contains("open class ApiRepository(private val apiService: ApiService)"));
        assert!(repository.contains(
            "    suspend fun create(sku: String, count: Int?): ResponseData<com.shop.api.entities.order.response.CreateBean> =\n        request { apiService.create(sku = sku, count = count) }"
        ));
        assert!(repository.contains("fun getInstance(apiService: ApiService): ApiRepository"));

        let client = &files[2].content;
        assert!(client.starts_with("package com.shop.api.config\n"));
        assert!(client.contains("private const val BASE_URL = \"https://shop.example.com/\""));
        assert!(client.contains("private const val TIMEOUT_SECONDS = 15L"));
        assert!(client.contains("var loggingEnabled: Boolean = false"));
    }

    #[test]
    fn test_render_services_without_operations() {
        let files = KotlinRenderer::new()
            .render_services(&[], &RenderConfig::new().with_services(true))
            .unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_paths() {
        let renderer = KotlinRenderer::new();
        assert_eq!(
            renderer.artifact_path("user", Direction::Request, "LoginRequestBean"),
            "entities/user/request/LoginRequestBean.kt"
        );
        let shared = renderer.shared_artifacts(&RenderConfig::new());
        assert_eq!(shared[0].path, "entities/ResponseData.kt");
        assert!(shared[0].content.starts_with("package com.example.api.entities\n"));
    }
}
