use indexmap::IndexMap;

use crate::{
    codegen::go::{doc_lines, naming, resolve::{ResolveError, Resolver}},
    model::{Decl, FieldDecl, GoFile, StructDecl},
    parse::types::Schema,
};

/// Compiles the document's named component schemas into the `dtos` file,
/// one struct per schema.
///
/// Schemas are emitted most-recently-declared first. Fields keep their
/// original property names in the JSON tag; a property outside the schema's
/// `required` list is tagged `omitempty`.
pub fn compile_schemas(schemas: &IndexMap<String, Schema>) -> Result<GoFile, SchemaError> {
    let resolver = Resolver::new(schemas);
    let mut decls = Vec::new();
    for (name, schema) in schemas.iter().rev() {
        let mut fields = Vec::new();
        for (property, node) in &schema.properties {
            // `$schema` is a JSON Schema meta-property, not data.
            if property == "$schema" {
                continue;
            }
            let ty = resolver
                .resolve(node)
                .map_err(|source| SchemaError::Property {
                    schema: name.clone(),
                    property: property.clone(),
                    source,
                })?;
            let tag = if schema.required.contains(property) {
                format!("json:\"{property}\"")
            } else {
                format!("json:\"{property},omitempty\"")
            };
            fields.push(FieldDecl {
                name: naming::exported(property),
                ty: ty.type_expr(None),
                tag: Some(tag),
            });
        }
        decls.push(Decl::Struct(StructDecl {
            doc: schema.description.as_deref().map(doc_lines).unwrap_or_default(),
            name: naming::exported(name),
            embeds: Vec::new(),
            fields,
        }));
    }
    Ok(GoFile {
        package: "dtos".into(),
        decls,
    })
}

#[derive(Debug, miette::Diagnostic, thiserror::Error)]
pub enum SchemaError {
    #[error("invalid property type {schema}.{property}")]
    Property {
        schema: String,
        property: String,
        #[source]
        source: ResolveError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use crate::model::TypeExpr;

    fn schemas(yaml: &str) -> IndexMap<String, Schema> {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn structs(file: &GoFile) -> Vec<&StructDecl> {
        file.decls
            .iter()
            .map(|decl| match decl {
                Decl::Struct(decl) => decl,
                Decl::Func(decl) => panic!("unexpected function {}", decl.name),
            })
            .collect()
    }

    #[test]
    fn schemas_are_emitted_newest_first() {
        let schemas = schemas(indoc! {"
            Pet:
              type: object
            Order:
              type: object
            User:
              type: object
        "});
        let file = compile_schemas(&schemas).unwrap();
        let names: Vec<&str> = structs(&file).iter().map(|decl| decl.name.as_str()).collect();

        assert_eq!(names, ["User", "Order", "Pet"]);
    }

    #[test]
    fn required_properties_drop_omitempty() {
        let schemas = schemas(indoc! {"
            User:
              type: object
              required: [id]
              properties:
                id:
                  type: string
                name:
                  type: string
        "});
        let file = compile_schemas(&schemas).unwrap();
        let fields = &structs(&file)[0].fields;

        assert_eq!(fields[0].name, "Id");
        assert_eq!(fields[0].tag.as_deref(), Some("json:\"id\""));
        assert_eq!(fields[1].name, "Name");
        assert_eq!(fields[1].tag.as_deref(), Some("json:\"name,omitempty\""));
    }

    #[test]
    fn tags_keep_original_property_names() {
        let schemas = schemas(indoc! {"
            User:
              type: object
              properties:
                first_name:
                  type: string
        "});
        let file = compile_schemas(&schemas).unwrap();
        let fields = &structs(&file)[0].fields;

        assert_eq!(fields[0].name, "FirstName");
        assert_eq!(fields[0].tag.as_deref(), Some("json:\"first_name,omitempty\""));
    }

    #[test]
    fn meta_properties_are_skipped() {
        let schemas = schemas(indoc! {"
            Config:
              type: object
              properties:
                $schema:
                  type: string
                value:
                  type: string
        "});
        let file = compile_schemas(&schemas).unwrap();
        let fields = &structs(&file)[0].fields;

        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "Value");
    }

    #[test]
    fn property_types_resolve_through_references() {
        let schemas = schemas(indoc! {"
            Pet:
              type: object
              properties:
                owner:
                  $ref: '#/components/schemas/User'
                tags:
                  type: array
                  items:
                    type: string
            User:
              type: object
        "});
        let file = compile_schemas(&schemas).unwrap();
        let pet = structs(&file)[1];

        assert_eq!(pet.fields[0].ty, TypeExpr::named("User"));
        assert_eq!(pet.fields[1].ty, TypeExpr::named("string").slice());
    }

    #[test]
    fn descriptions_become_doc_comments() {
        let schemas = schemas(indoc! {"
            Pet:
              type: object
              description: A pet available for adoption.
        "});
        let file = compile_schemas(&schemas).unwrap();

        assert_eq!(structs(&file)[0].doc, ["A pet available for adoption."]);
    }

    #[test]
    fn scalar_schemas_become_empty_structs() {
        let schemas = schemas("PetName: {type: string}");
        let file = compile_schemas(&schemas).unwrap();
        let decl = structs(&file)[0];

        assert_eq!(decl.name, "PetName");
        assert!(decl.fields.is_empty());
    }

    #[test]
    fn bad_property_types_name_their_location() {
        let schemas = schemas(indoc! {"
            Pet:
              type: object
              properties:
                age:
                  type: number
                  format: big
        "});
        let err = compile_schemas(&schemas).unwrap_err();

        assert_eq!(err.to_string(), "invalid property type Pet.age");
    }
}
