use serde_json::{json, Value};

use super::Resource;

fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{name}") })
}

fn json_body(schema: Value) -> Value {
    json!({ "application/json": { "schema": schema } })
}

fn error(description: &str) -> Value {
    json!({
        "description": description,
        "content": json_body(schema_ref("ErrorResponse"))
    })
}

fn id_parameter(label: &str) -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "description": format!("Identifier of the {label}"),
        "schema": { "type": "integer", "format": "int64", "minimum": 1 }
    })
}

/// OpenAPI paths and schemas for the five endpoints of `R`.
///
/// Paths are relative to the module mount point; the router prefixes them
/// with `/api/{NAME}`.
pub fn fragment<R: Resource>() -> Value {
    let tag = R::SCHEMA;
    let label = R::LABEL;
    let read = R::SCHEMA.to_string();
    let create = format!("Create{}", R::SCHEMA);
    let update = format!("Update{}", R::SCHEMA);

    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": format!("List {}", R::NAME),
                    "tags": [tag],
                    "responses": {
                        "200": {
                            "description": format!("All {}", R::NAME),
                            "content": json_body(json!({ "type": "array", "items": schema_ref(&read) }))
                        },
                        "500": error("Internal server error")
                    }
                },
                "post": {
                    "summary": format!("Create a {label}"),
                    "tags": [tag],
                    "requestBody": { "required": true, "content": json_body(schema_ref(&create)) },
                    "responses": {
                        "201": {
                            "description": format!("Created {label}"),
                            "content": json_body(schema_ref(&read))
                        },
                        "400": error("Invalid payload"),
                        "500": error("Internal server error")
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": format!("Get a {label}"),
                    "tags": [tag],
                    "parameters": [id_parameter(label)],
                    "responses": {
                        "200": {
                            "description": format!("The {label}"),
                            "content": json_body(schema_ref(&read))
                        },
                        "404": error("Not found"),
                        "500": error("Internal server error")
                    }
                },
                "put": {
                    "summary": format!("Replace a {label}"),
                    "tags": [tag],
                    "parameters": [id_parameter(label)],
                    "requestBody": { "required": true, "content": json_body(schema_ref(&update)) },
                    "responses": {
                        "204": { "description": "Updated" },
                        "400": error("Invalid id or payload"),
                        "500": error("Internal server error")
                    }
                },
                "delete": {
                    "summary": format!("Delete a {label}"),
                    "tags": [tag],
                    "parameters": [id_parameter(label)],
                    "responses": {
                        "204": { "description": "Deleted" },
                        "400": error("Invalid id"),
                        "404": error("Not found"),
                        "500": error("Internal server error")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": format!("{} health check", R::SCHEMA),
                    "tags": [tag],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": { "text/plain": { "schema": { "type": "string" } } }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": R::schemas()
        }
    })
}
