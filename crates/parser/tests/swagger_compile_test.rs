//! Integration test for the Swagger compiler

use modeldef_common::{ActionName, ConnectorDefinition, EndpointRef, HttpMethod, ModelDefError};
use modeldef_parser::swagger::{CompileWarning, SkipReason, SwaggerParser};
use modeldef_parser::{CompileOptions, EndpointFilter, FilterDecision};
use serde_json::{json, Value};

// Trimmed-down booking API in the shape vendors publish
const BOOKING_SPEC: &str = r##"{
    "swagger": "2.0",
    "info": {"title": "Booking", "version": "v1"},
    "host": "api.apaleo.com",
    "paths": {
        "/booking/v1/blocks": {
            "get": {
                "operationId": "BookingBlocksGet",
                "summary": "Returns a list of blocks",
                "description": "Get the list of blocks.<br>You must have at least one of these scopes: 'blocks.read, setup.read'.",
                "parameters": [
                    {"name": "propertyIds", "in": "query", "type": "array", "description": "Filter by property"},
                    {"name": "pageSize", "in": "query", "type": "integer", "example": 50}
                ],
                "responses": {
                    "200": {"description": "OK", "schema": {"$ref": "#/definitions/BlockList"}},
                    "204": {"description": "No Content"}
                },
                "security": [{"oauth2": ["blocks.read", "setup.read"]}]
            },
            "post": {
                "operationId": "BookingBlocksPost",
                "summary": "Create a block",
                "description": "Requires blocks.create scope",
                "parameters": [
                    {"name": "Idempotency-Key", "in": "header", "type": "string", "example": "abc-123"},
                    {"name": "Content-Type", "in": "header", "type": "string", "required": true},
                    {
                        "name": "body",
                        "in": "body",
                        "required": true,
                        "schema": {"$ref": "#/definitions/CreateBlockModel"},
                        "example": {"groupId": "BLK-GRP-1", "ratePlans": []}
                    }
                ],
                "responses": {
                    "201": {
                        "description": "Created",
                        "headers": {"Location": {"type": "string"}},
                        "examples": {"application/json": {"id": "BLK-1"}}
                    }
                }
            }
        },
        "/booking/v1/blocks/{id}": {
            "parameters": [{"name": "id", "in": "path", "required": true, "type": "string"}],
            "get": {
                "operationId": "BookingBlocksByIdGet",
                "parameters": [{"name": "id", "in": "path", "required": true, "type": "string", "example": "BLK-1"}],
                "responses": {"200": {"schema": {"$ref": "#/definitions/Missing"}}}
            },
            "options": {"summary": "CORS preflight"},
            "x-codegen": {"skip": true}
        },
        "/booking/v1/blocks/$count": {
            "get": {"operationId": "BookingBlocksCountGet", "responses": {"200": {"description": "OK"}}}
        }
    },
    "definitions": {
        "BlockList": {
            "type": "object",
            "properties": {
                "blocks": {"type": "array", "items": {"$ref": "#/definitions/BlockItem"}},
                "count": {"type": "integer", "format": "int64"}
            }
        },
        "BlockItem": {
            "type": "object",
            "properties": {"id": {"type": "string"}}
        },
        "CreateBlockModel": {
            "type": "object",
            "required": ["groupId", "ratePlans"],
            "properties": {
                "groupId": {"type": "string", "description": "Group the block belongs to"},
                "ratePlans": {"type": "array", "items": {"$ref": "#/definitions/RatePlan"}},
                "status": {"type": "string", "enum": ["Tentative", "Definite"]}
            }
        },
        "RatePlan": {
            "type": "object",
            "properties": {
                "id": {"type": "string"},
                "grossDailyRate": {"$ref": "#/definitions/Money"}
            }
        },
        "Money": {
            "type": "object",
            "properties": {"amount": {"type": "number"}}
        }
    }
}"##;

fn options() -> CompileOptions {
    CompileOptions::new("apaleo", "conn_def::apaleo", "https://api.apaleo.com")
}

fn find<'a>(definitions: &'a [ConnectorDefinition], path: &str, method: HttpMethod) -> &'a ConnectorDefinition {
    definitions
        .iter()
        .find(|d| d.path == path && d.action == method)
        .unwrap()
}

#[test]
fn test_compile_booking_spec() {
    let parser = SwaggerParser::from_json(BOOKING_SPEC).unwrap();
    let report = parser.compile(&options()).unwrap();

    assert_eq!(report.definitions.len(), 4);

    let keys: Vec<&str> = report.definitions.iter().map(|d| d.key.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "api::apaleo::v1::blocks::getMany::/booking/v1/blocks",
            "api::apaleo::v1::blocks::create::/booking/v1/blocks",
            "api::apaleo::v1::blocks::getOne::/booking/v1/blocks/{id}",
            "api::apaleo::v1::blocks::getCount::/booking/v1/blocks/$count",
        ]
    );

    assert_eq!(
        report.skipped.iter().map(|s| (s.method.as_str(), &s.reason)).collect::<Vec<_>>(),
        vec![("options", &SkipReason::UnsupportedMethod("options".to_string()))]
    );
}

#[test]
fn test_get_many_end_to_end() {
    let report = SwaggerParser::from_json(BOOKING_SPEC)
        .unwrap()
        .compile(&options())
        .unwrap();
    let list = find(&report.definitions, "/booking/v1/blocks", HttpMethod::Get);

    assert_eq!(list.action_name, ActionName::GetMany);
    assert_eq!(list.name, "BookingBlocksGet");
    assert_eq!(list.title, "Returns a list of blocks");
    assert_eq!(list.model_name, "ApaleoBlocks");

    let record = serde_json::to_value(list).unwrap();
    assert_eq!(record["actionName"], "getMany");
    assert_eq!(
        record["schemas"]["queryParams"],
        json!({
            "type": "object",
            "properties": {
                "propertyIds": {"type": "array", "path": null},
                "pageSize": {"type": "integer", "path": null}
            },
            "required": [],
            "path": null
        })
    );
    assert_eq!(record["samples"]["queryParams"], json!({"pageSize": 50}));
    assert_eq!(
        record["responses"],
        json!([
            {
                "statusCode": 200,
                "schema": {
                    "type": "object",
                    "properties": {
                        "blocks": {"type": "array", "items": {"$ref": "#/definitions/BlockItem"}},
                        "count": {"type": "integer", "format": "int64"}
                    }
                },
                "description": "OK"
            },
            {"statusCode": 204, "description": "No Content"}
        ])
    );
}

#[test]
fn test_create_body_headers_and_samples() {
    let report = SwaggerParser::from_json(BOOKING_SPEC)
        .unwrap()
        .compile(&options())
        .unwrap();
    let create = find(&report.definitions, "/booking/v1/blocks", HttpMethod::Post);
    let record = serde_json::to_value(create).unwrap();

    assert_eq!(
        record["schemas"]["headers"]["properties"],
        json!({
            "Idempotency-Key": {"type": "string", "path": "$.idempotencykey"},
            "Content-Type": {"type": "string", "path": "$.contenttype"}
        })
    );
    assert_eq!(record["schemas"]["headers"]["required"], json!(["Content-Type"]));

    assert_eq!(
        record["schemas"]["body"],
        json!({
            "type": "object",
            "properties": {
                "groupId": {"type": "string", "path": "$.groupId", "description": "Group the block belongs to"},
                "ratePlans": {
                    "type": "array",
                    "path": "$.ratePlans",
                    "items": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "string", "path": "$.id"},
                            "grossDailyRate": {"type": "string", "path": "$.grossDailyRate"}
                        }
                    }
                },
                "status": {"type": "string", "path": "$.status", "enum": ["Tentative", "Definite"]}
            },
            "required": ["groupId", "ratePlans"],
            "path": null
        })
    );

    assert_eq!(
        record["samples"]["headers"],
        json!({
            "idempotency-key": [{"$binary": {"base64": "YWJjLTEyMw==", "subType": "00"}}],
            "content-type": [{"$binary": {"base64": "YXBwbGljYXRpb24vanNvbg==", "subType": "00"}}]
        })
    );
    assert_eq!(
        record["samples"]["body"],
        json!({"groupId": "BLK-GRP-1", "ratePlans": []})
    );
    assert_eq!(
        record["responses"][0],
        json!({
            "statusCode": 201,
            "body": {"id": "BLK-1"},
            "headers": {"Location": "string"},
            "description": "Created"
        })
    );
    assert_eq!(
        create.knowledge,
        "**Create a block**\n\
         Requires blocks.create scope\n\
         \n\
         **Parameters**\n\
         - `Idempotency-Key` (string, header, optional): \n\
         - `Content-Type` (string, header, *required*): \n\
         - `body` (, body, *required*): "
    );
}

#[test]
fn test_path_params_and_unresolved_reference() {
    let report = SwaggerParser::from_json(BOOKING_SPEC)
        .unwrap()
        .compile(&options())
        .unwrap();
    let one = find(&report.definitions, "/booking/v1/blocks/{id}", HttpMethod::Get);
    let record = serde_json::to_value(one).unwrap();

    assert_eq!(record["samples"]["pathParams"], json!({"id": "BLK-1"}));
    assert_eq!(record["schemas"]["pathParams"]["required"], json!(["id"]));
    assert_eq!(record["responses"][0]["schema"], json!({}));
    assert_eq!(
        report.warnings,
        vec![CompileWarning::UnresolvedReference {
            path: "/booking/v1/blocks/{id}".to_string(),
            method: "get".to_string(),
            reference: "#/definitions/Missing".to_string(),
        }]
    );
}

#[test]
fn test_compilation_is_idempotent() {
    let parser = SwaggerParser::from_json(BOOKING_SPEC).unwrap();
    let strip = |definitions: Vec<ConnectorDefinition>| -> Vec<Value> {
        definitions
            .into_iter()
            .map(|d| {
                let mut value = serde_json::to_value(d).unwrap();
                let record = value.as_object_mut().unwrap();
                record.remove("createdAt");
                record.remove("updatedAt");
                value
            })
            .collect()
    };

    let first = strip(parser.compile(&options()).unwrap().definitions);
    let second = strip(parser.compile(&options()).unwrap().definitions);
    assert_eq!(first, second);
}

#[test]
fn test_scope_filter() {
    let filter = EndpointFilter::new().with_scopes(vec!["setup.read".to_string()]);
    let report = SwaggerParser::from_json(BOOKING_SPEC)
        .unwrap()
        .compile(&options().with_filter(filter))
        .unwrap();

    assert_eq!(report.definitions.len(), 1);
    assert_eq!(report.definitions[0].action_name, ActionName::GetMany);
    assert!(report.skipped.iter().any(|s| {
        s.method == "post"
            && s.reason
                == SkipReason::Filtered(FilterDecision::MissingScopes(vec!["setup.read".to_string()]))
    }));
}

#[test]
fn test_endpoint_list_filter() {
    let filter = EndpointFilter::new()
        .with_endpoints(vec![EndpointRef::new("/booking/v1/blocks/$count", "GET")]);
    let report = SwaggerParser::from_json(BOOKING_SPEC)
        .unwrap()
        .compile(&options().with_filter(filter))
        .unwrap();

    assert_eq!(report.definitions.len(), 1);
    assert_eq!(report.definitions[0].action_name, ActionName::GetCount);
    assert_eq!(report.skipped.len(), 4);
}

#[test]
fn test_malformed_spec() {
    let result = SwaggerParser::from_json(r#"{"swagger": "2.0", "info": {"version": "v1"}}"#);
    assert!(matches!(result, Err(ModelDefError::MalformedSpec(_))));
}
