//! Dart renderer producing `json_serializable` model classes.
//!
//! Dart field names are camelCase; when that differs from the JSON key the
//! field carries a `@JsonKey(name: ...)` annotation. With client generation
//! enabled the renderer also emits a Dio `ApiService`, an `ApiRepository`
//! and a `DioConfig` class.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use convert_case::{Case, Casing};

use super::{check_references, referenced_models, RenderConfig, Renderer, SharedArtifact};
use crate::error::RenderError;
use crate::ir::{Direction, FieldKind, FieldType, Primitive, TypeBundle, TypeSchema};
use crate::service::{ModelRef, ServiceOperation, ServiceParam};

/// Dio has a shorthand method for these.
const DIO_METHODS: [&str; 6] = ["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD"];

const DART_KEYWORDS: &[&str] = &[
    "abstract", "as", "assert", "async", "await", "break", "case", "catch", "class", "const",
    "continue", "default", "do", "dynamic", "else", "enum", "export", "extends", "external",
    "factory", "false", "final", "finally", "for", "get", "if", "implements", "import", "in",
    "is", "library", "new", "null", "operator", "part", "rethrow", "return", "set", "static",
    "super", "switch", "this", "throw", "true", "try", "typedef", "var", "void", "while", "with",
    "yield",
];

/// Maps field types to Dart type expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct DartTypeMapper;

impl DartTypeMapper {
    pub fn new() -> Self {
        Self
    }

    /// Map a field type. `dynamic` is never marked nullable.
    pub fn map_type(&self, ty: &FieldType) -> String {
        let base = self.map_kind(&ty.kind);
        if ty.nullable && base != "dynamic" {
            format!("{base}?")
        } else {
            base
        }
    }

    fn map_kind(&self, kind: &FieldKind) -> String {
        match kind {
            FieldKind::Primitive(p) => match p {
                Primitive::String => "String",
                Primitive::Int | Primitive::Long => "int",
                Primitive::Float | Primitive::Double => "double",
                Primitive::Boolean => "bool",
                Primitive::Object => "Map<String, dynamic>",
                Primitive::File | Primitive::Any => "dynamic",
            }
            .to_string(),
            FieldKind::Array(element) => format!("List<{}>", self.map_type(element)),
            FieldKind::Reference(name) => name.clone(),
        }
    }

    /// camelCase field name, suffixed with `Field` when it is a keyword.
    pub fn field_name(&self, key: &str) -> String {
        let words: Vec<&str> = key
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let mut name = words.join("_").to_case(Case::Camel);
        if name.is_empty() {
            name = "field".to_string();
        }
        if DART_KEYWORDS.contains(&name.to_lowercase().as_str()) {
            name.push_str("Field");
        }
        if !name.chars().next().is_some_and(char::is_alphabetic) {
            name.insert(0, 'a');
        }
        name
    }
}

/// Renders Dart model classes.
#[derive(Debug, Clone, Default)]
pub struct DartRenderer {
    mapper: DartTypeMapper,
}

impl DartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn write_class(&self, out: &mut String, name: &str, schema: &TypeSchema) {
        out.push_str("@JsonSerializable()\n");
        let _ = writeln!(out, "class {name} {{");

        if schema.is_empty() {
            let _ = writeln!(out, "  {name}();");
        } else {
            let _ = writeln!(out, "  {name}({{");
            for (key, ty) in schema.iter() {
                let required = if ty.nullable { "" } else { "required " };
                let _ = writeln!(out, "    {required}this.{},", self.mapper.field_name(key));
            }
            out.push_str("  });\n");
        }

        for (key, ty) in schema.iter() {
            let field = self.mapper.field_name(key);
            out.push('\n');
            if field != key {
                let _ = writeln!(out, "  @JsonKey(name: '{}')", key.replace('\'', "\\'"));
            }
            let _ = writeln!(out, "  final {} {field};", self.mapper.map_type(ty));
        }

        let _ = writeln!(
            out,
            "\n  factory {name}.fromJson(Map<String, dynamic> json) =>\n      _${name}FromJson(json);"
        );
        let _ = writeln!(out, "\n  Map<String, dynamic> toJson() => _${name}ToJson(this);");
        out.push_str("}\n");
    }

    /// Import prefix for models whose name another referenced model shares.
    fn model_prefix(direction: Direction) -> &'static str {
        match direction {
            Direction::Request => "request_models",
            Direction::Response => "response_models",
        }
    }

    fn model_type(&self, model: &ModelRef, shared: &BTreeSet<&str>) -> String {
        if shared.contains(model.name.as_str()) {
            format!("{}.{}", Self::model_prefix(model.direction), model.name)
        } else {
            model.name.clone()
        }
    }

    fn envelope_type(&self, op: &ServiceOperation, shared: &BTreeSet<&str>) -> String {
        let data = op
            .response
            .as_ref()
            .map_or_else(|| "dynamic".to_string(), |m| self.model_type(m, shared));
        format!("ResponseData<{data}>")
    }

    /// Model imports relative to a file one directory below the output root.
    fn model_imports(&self, out: &mut String, operations: &[ServiceOperation]) {
        let (models, shared) = referenced_models(operations);
        let _ = writeln!(out, "import '../{}/response_data.dart';", self.model_dir());
        let imports: BTreeSet<String> = models
            .iter()
            .map(|m| {
                let path = self.artifact_path(&m.folder, m.direction, &m.name);
                if shared.contains(m.name.as_str()) {
                    format!("import '../{}' as {};", path, Self::model_prefix(m.direction))
                } else {
                    format!("import '../{path}';")
                }
            })
            .collect();
        for import in imports {
            let _ = writeln!(out, "{import}");
        }
    }

    fn body_ident(op: &ServiceOperation) -> &'static str {
        if op.params().any(|p| p.ident == "body") {
            "requestBody"
        } else {
            "body"
        }
    }

    /// Named parameter list, `{...}`, or empty when there are none.
    fn signature(&self, op: &ServiceOperation, shared: &BTreeSet<&str>) -> String {
        let mut params: Vec<String> = op
            .params()
            .map(|p| {
                let ty = self.mapper.map_type(&p.ty);
                if p.ty.nullable || ty == "dynamic" {
                    format!("{} {}", ty, p.ident)
                } else {
                    format!("required {} {}", ty, p.ident)
                }
            })
            .collect();
        if let Some(model) = op.request_model() {
            params.push(format!("required {} {}", self.model_type(model, shared), Self::body_ident(op)));
        }
        if params.is_empty() {
            String::new()
        } else {
            format!("{{{}}}", params.join(", "))
        }
    }

    /// Map literal; nullable entries are only added when set.
    fn map_literal(&self, params: &[ServiceParam]) -> String {
        let entries: Vec<String> = params
            .iter()
            .map(|p| {
                let key = dart_string(&p.wire_name);
                if p.ty.nullable {
                    format!("if ({0} != null) {1}: {0}", p.ident, key)
                } else {
                    format!("{}: {}", key, p.ident)
                }
            })
            .collect();
        format!("{{{}}}", entries.join(", "))
    }

    fn request_path(&self, op: &ServiceOperation) -> String {
        let mut path = op
            .path
            .replace('\\', "\\\\")
            .replace('\'', "\\'")
            .replace('$', "\\$");
        for p in &op.path_params {
            path = path.replace(&format!("{{{}}}", p.wire_name), &format!("${{{}}}", p.ident));
        }
        format!("'{path}'")
    }

    fn write_call(&self, out: &mut String, op: &ServiceOperation, shared: &BTreeSet<&str>) {
        let shorthand = DIO_METHODS.contains(&op.http_method.as_str());
        let dio_method = if shorthand {
            op.http_method.to_lowercase()
        } else {
            "request".to_string()
        };

        let mut args = vec![self.request_path(op)];
        if !op.query.is_empty() {
            args.push(format!("queryParameters: {}", self.map_literal(&op.query)));
        }
        if !op.form_fields().is_empty() {
            args.push(format!("data: {}", self.map_literal(op.form_fields())));
        } else if op.request_model().is_some() {
            args.push(format!("data: {}.toJson()", Self::body_ident(op)));
        }

        let mut options = Vec::new();
        if !shorthand {
            options.push(format!("method: {}", dart_string(&op.http_method)));
        }
        if !op.form_fields().is_empty() {
            options.push("contentType: Headers.formUrlEncodedContentType".to_string());
        }
        if !options.is_empty() {
            args.push(format!("options: Options({})", options.join(", ")));
        }

        let envelope = self.envelope_type(op, shared);
        let convert = match &op.response {
            Some(model) => format!(
                "(json) => {}.fromJson(json as Map<String, dynamic>)",
                self.model_type(model, shared)
            ),
            None => "(json) => json".to_string(),
        };

        let _ = writeln!(out, "    final response = await dio.{dio_method}(");
        for arg in args {
            let _ = writeln!(out, "      {arg},");
        }
        out.push_str("    );\n");
        let _ = writeln!(out, "    return {envelope}.fromJson(");
        out.push_str("      response.data as Map<String, dynamic>,\n");
        let _ = writeln!(out, "      {convert},");
        out.push_str("    );\n");
    }

    fn service_file(&self, operations: &[ServiceOperation], config: &RenderConfig) -> String {
        let (_, shared) = referenced_models(operations);
        let mut out = String::from("import 'package:dio/dio.dart';\n\n");
        self.model_imports(&mut out, operations);
        out.push_str("\n/// Dio service for the documented endpoints.\nclass ApiService {\n  ApiService(this.dio);\n\n  final Dio dio;\n");

        for op in operations {
            out.push('\n');
            if config.generate_docs {
                if !op.title.is_empty() {
                    let _ = writeln!(out, "  /// {}", op.title);
                }
                if !op.description.is_empty() {
                    let _ = writeln!(out, "  /// {}", op.description);
                }
                if !op.category.is_empty() {
                    let _ = writeln!(out, "  /// Category: {}", op.category);
                }
                let _ = writeln!(out, "  /// API: {} {}", op.http_method, op.path);
            }
            let _ = writeln!(
                out,
                "  Future<{}> {}({}) async {{",
                self.envelope_type(op, &shared),
                op.name,
                self.signature(op, &shared)
            );
            self.write_call(&mut out, op, &shared);
            out.push_str("  }\n");
        }

        out.push_str("}\n");
        out
    }

    fn repository_file(&self, operations: &[ServiceOperation]) -> String {
        let (_, shared) = referenced_models(operations);
        let mut out = String::new();
        self.model_imports(&mut out, operations);
        out.push_str("import '../services/api_service.dart';\n\n");
        out.push_str("/// Repository delegating to [ApiService].\nclass ApiRepository {\n  ApiRepository(this.apiService);\n\n  final ApiService apiService;\n");

        for op in operations {
            let mut args: Vec<String> = op.params().map(|p| format!("{0}: {0}", p.ident)).collect();
            if op.request_model().is_some() {
                let body = Self::body_ident(op);
                args.push(format!("{body}: {body}"));
            }
            out.push('\n');
            let _ = writeln!(
                out,
                "  Future<{}> {}({}) =>\n      apiService.{}({});",
                self.envelope_type(op, &shared),
                op.name,
                self.signature(op, &shared),
                op.name,
                args.join(", ")
            );
        }

        out.push_str("}\n");
        out
    }

    fn client_config_file(&self, config: &RenderConfig) -> String {
        let logging = if config.http_logging {
            "\n    dio.interceptors.add(LogInterceptor(requestBody: true, responseBody: true));"
        } else {
            ""
        };
        format!(
            r#"import 'package:dio/dio.dart';

/// Dio client setup for the generated ApiService.
class DioConfig {{
  static const String baseUrl = {base_url};
  static const int timeoutSeconds = {timeout};

  static Dio createDio() {{
    final dio = Dio(BaseOptions(
      baseUrl: baseUrl,
      connectTimeout: const Duration(seconds: timeoutSeconds),
      receiveTimeout: const Duration(seconds: timeoutSeconds),
      sendTimeout: const Duration(seconds: timeoutSeconds),
    ));{logging}
    return dio;
  }}
}}
"#,
            base_url = dart_string(&config.base_url),
            timeout = config.timeout_seconds,
        )
    }
}

/// Single-quoted Dart string literal without interpolation.
fn dart_string(text: &str) -> String {
    format!(
        "'{}'",
        text.replace('\\', "\\\\").replace('\'', "\\'").replace('$', "\\$")
    )
}

impl Renderer for DartRenderer {
    fn id(&self) -> &'static str {
        "dart"
    }

    fn name(&self) -> &'static str {
        "Dart json_serializable"
    }

    fn file_extension(&self) -> &'static str {
        "dart"
    }

    fn type_suffix(&self) -> &'static str {
        ""
    }

    fn keywords(&self) -> &'static [&'static str] {
        DART_KEYWORDS
    }

    fn model_dir(&self) -> &'static str {
        "models"
    }

    fn file_stem(&self, type_name: &str) -> String {
        type_name.to_case(Case::Snake)
    }

    fn render_bundle(
        &self,
        bundle: &TypeBundle,
        _category_folder: &str,
        config: &RenderConfig,
    ) -> Result<String, RenderError> {
        check_references(bundle)?;

        let mut out = String::new();
        out.push_str("import 'package:json_annotation/json_annotation.dart';\n\n");
        let _ = writeln!(out, "part '{}.g.dart';\n", self.file_stem(&bundle.name));

        if config.generate_docs {
            let title = bundle.title.trim();
            if !title.is_empty() {
                let _ = writeln!(out, "/// {title}");
            }
            if let Some(url) = config.page_url(&bundle.page_id) {
                let _ = writeln!(out, "/// Docs: {url}");
            }
            if let Some(sample) = bundle.sample.as_deref() {
                out.push_str("///\n/// Sample response:\n/// ```json\n");
                for line in sample.lines() {
                    let _ = writeln!(out, "/// {line}");
                }
                out.push_str("/// ```\n");
            }
        }
        self.write_class(&mut out, &bundle.name, &bundle.root);

        for nested in bundle.nested.iter() {
            out.push('\n');
            self.write_class(&mut out, &nested.name, &nested.schema);
        }

        Ok(out)
    }

    fn shared_artifacts(&self, _config: &RenderConfig) -> Vec<SharedArtifact> {
        let content = r#"import 'package:json_annotation/json_annotation.dart';

part 'response_data.g.dart';

/// Envelope wrapping every API response.
@JsonSerializable(genericArgumentFactories: true)
class ResponseData<T> {
  ResponseData({
    required this.code,
    required this.msg,
    this.data,
    this.hasNext = 0,
  });

  final int code;
  final String msg;
  final T? data;
  final int hasNext;

  factory ResponseData.fromJson(
    Map<String, dynamic> json,
    T Function(Object?) fromJsonT,
  ) =>
      _$ResponseDataFromJson(json, fromJsonT);

  Map<String, dynamic> toJson(Object? Function(T) toJsonT) =>
      _$ResponseDataToJson(this, toJsonT);
}
"#;

        vec![SharedArtifact {
            path: format!("{}/response_data.{}", self.model_dir(), self.file_extension()),
            content: content.to_string(),
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
                path: "services/api_service.dart".to_string(),
                content: self.service_file(operations, config),
            },
            SharedArtifact {
                path: "repositories/api_repository.dart".to_string(),
                content: self.repository_file(operations),
            },
            SharedArtifact {
                path: "config/dio_config.dart".to_string(),
                content: self.client_config_file(config),
            },
        ])
    }
}
