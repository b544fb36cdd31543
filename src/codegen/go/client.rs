use crate::{
    codegen::go::{
        Packages,
        operation::{self, Compiled, MethodDescriptor, OperationError},
        resolve::Resolver,
    },
    model::{Decl, Expr, FuncDecl, GoFile, Param, Stmt, StructDecl, TypeExpr},
    parse::types::{Document, Method},
};

/// The assembled client: its struct, its constructor, and one method per
/// generated operation, in document path order with verbs in their fixed
/// iteration order.
#[derive(Clone, Debug)]
pub struct ClientDefinition {
    pub client: StructDecl,
    pub constructor: FuncDecl,
    pub methods: Vec<MethodDescriptor>,
    /// One entry per skipped operation.
    pub warnings: Vec<String>,
}

impl ClientDefinition {
    /// Lowers the definition into the `client.go` source file.
    pub fn into_file(self, packages: &Packages) -> GoFile {
        let mut decls = vec![
            Decl::Struct(self.client),
            Decl::Func(self.constructor),
        ];
        decls.extend(
            self.methods
                .into_iter()
                .map(|method| Decl::Func(lower_method(method, packages))),
        );
        GoFile {
            package: "client".into(),
            decls,
        }
    }
}

/// Walks every path and verb in the document and compiles each defined
/// operation into a client method.
pub fn assemble(document: &Document, packages: &Packages) -> Result<ClientDefinition, ClientError> {
    let resolver = Resolver::new(document.schemas());
    let server = document
        .servers
        .first()
        .map(|server| server.url.as_str())
        .filter(|url| !url.is_empty());

    let mut methods = Vec::new();
    let mut warnings = Vec::new();
    for (path, item) in &document.paths {
        for (method, operation) in item.operations() {
            match operation::compile_operation(method, path, operation, &resolver, packages) {
                Ok(Compiled::Method(descriptor)) => methods.push(descriptor),
                Ok(Compiled::Skipped(skip)) => {
                    warnings.push(format!("{method} {path}: {}", skip.message()));
                }
                Err(source) => {
                    return Err(ClientError::Method {
                        method,
                        path: path.clone(),
                        source,
                    });
                }
            }
        }
    }

    Ok(ClientDefinition {
        client: client_struct(packages),
        constructor: constructor(server, packages),
        methods,
        warnings,
    })
}

fn client_struct(packages: &Packages) -> StructDecl {
    StructDecl {
        doc: Vec::new(),
        name: "Client".into(),
        embeds: vec![TypeExpr::qual(&packages.sdk, "Client").pointer()],
        fields: Vec::new(),
    }
}

/// `NewClient(endpoint string, opts ...opt.Option[sdk.Config])`, defaulting
/// an empty endpoint to the document's first server URL when one is
/// declared.
fn constructor(server: Option<&str>, packages: &Packages) -> FuncDecl {
    let mut body = Vec::new();
    if let Some(url) = server {
        body.push(Stmt::If {
            cond: Expr::ident("endpoint").binary("==", Expr::str("")),
            body: vec![Stmt::Assign {
                target: Expr::ident("endpoint"),
                value: Expr::str(url),
            }],
        });
    }
    body.push(Stmt::define(
        &["c", "err"],
        Expr::qual(&packages.sdk, "New")
            .call_variadic(vec![Expr::ident("endpoint"), Expr::ident("opts")]),
    ));
    body.push(Stmt::If {
        cond: Expr::ident("err").binary("!=", Expr::Nil),
        body: vec![Stmt::Return(vec![
            Expr::Nil,
            Expr::qual(&packages.errors, "Wrapf").call(vec![
                Expr::ident("err"),
                Expr::str("failed to create client from endpoint %s"),
                Expr::ident("endpoint"),
            ]),
        ])],
    });
    body.push(Stmt::Return(vec![
        Expr::struct_lit(
            TypeExpr::named("Client"),
            vec![("Client".into(), Expr::ident("c"))],
        )
        .addr(),
        Expr::Nil,
    ]));

    FuncDecl {
        doc: vec![
            "NewClient creates a new client from the given string endpoint, and optional options."
                .into(),
        ],
        receiver: None,
        name: "NewClient".into(),
        params: vec![
            Param::new("endpoint", TypeExpr::named("string")),
            Param::variadic(
                "opts",
                TypeExpr::qual(&packages.opt, "Option")
                    .generic(vec![TypeExpr::qual(&packages.sdk, "Config")]),
            ),
        ],
        results: vec![TypeExpr::named("Client").pointer(), TypeExpr::named("error")],
        body,
    }
}

fn lower_method(method: MethodDescriptor, packages: &Packages) -> FuncDecl {
    let result = method.result_type(&packages.dtos);
    FuncDecl {
        doc: method.doc,
        receiver: Some(Param::new("c", TypeExpr::named("Client").pointer())),
        name: method.name,
        params: method.arguments,
        results: vec![result, TypeExpr::named("error")],
        body: method.body,
    }
}

#[derive(Debug, miette::Diagnostic, thiserror::Error)]
pub enum ClientError {
    #[error("failed to generate client {method} method for {path}")]
    Method {
        method: Method,
        path: String,
        #[source]
        source: OperationError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn document(yaml: &str) -> Document {
        Document::from_yaml(yaml).unwrap()
    }

    const PETSTORE: &str = indoc! {"
        openapi: 3.0.0
        info:
          title: Swagger Petstore
          version: 1.0.0
        servers:
          - url: https://petstore.example.com/v1
        paths:
          /pets:
            post:
              operationId: createPet
              requestBody:
                content:
                  application/json:
                    schema:
                      $ref: '#/components/schemas/Pet'
              responses:
                '200':
                  content:
                    application/json:
                      schema:
                        $ref: '#/components/schemas/Pet'
            get:
              operationId: listPets
              responses:
                '200':
                  content:
                    application/json:
                      schema:
                        type: array
                        items:
                          $ref: '#/components/schemas/Pet'
          /pets/{petId}:
            get:
              operationId: getPet
              parameters:
                - name: petId
                  in: path
                  required: true
              responses:
                '200':
                  content:
                    application/json:
                      schema:
                        $ref: '#/components/schemas/Pet'
        components:
          schemas:
            Pet:
              type: object
              properties:
                name:
                  type: string
    "};

    #[test]
    fn methods_follow_path_then_verb_order() {
        let document = document(PETSTORE);
        let packages = Packages::new("swagger-petstore");
        let definition = assemble(&document, &packages).unwrap();

        let names: Vec<&str> = definition
            .methods
            .iter()
            .map(|method| method.name.as_str())
            .collect();
        assert_eq!(names, ["ListPets", "CreatePet", "GetPet"]);
        assert!(definition.warnings.is_empty());
    }

    #[test]
    fn the_constructor_defaults_to_the_first_server() {
        let document = document(PETSTORE);
        let packages = Packages::new("swagger-petstore");
        let definition = assemble(&document, &packages).unwrap();

        assert_eq!(
            definition.constructor.body[0],
            Stmt::If {
                cond: Expr::ident("endpoint").binary("==", Expr::str("")),
                body: vec![Stmt::Assign {
                    target: Expr::ident("endpoint"),
                    value: Expr::str("https://petstore.example.com/v1"),
                }],
            }
        );
    }

    #[test]
    fn no_server_means_no_default() {
        let document = document(indoc! {"
            openapi: 3.0.0
            info:
              title: Bare
              version: 1.0.0
            paths: {}
        "});
        let packages = Packages::new("bare");
        let definition = assemble(&document, &packages).unwrap();

        assert!(matches!(
            definition.constructor.body[0],
            Stmt::Define { .. }
        ));
        assert!(definition.methods.is_empty());
    }

    #[test]
    fn skipped_operations_become_warnings() {
        let document = document(indoc! {"
            openapi: 3.0.0
            info:
              title: Skips
              version: 1.0.0
            paths:
              /pets:
                patch:
                  operationId: patchPet
                  requestBody:
                    content:
                      application/xml: {}
                  responses:
                    '200':
                      content:
                        application/json:
                          schema:
                            $ref: '#/components/schemas/Pet'
            components:
              schemas:
                Pet:
                  type: object
        "});
        let packages = Packages::new("skips");
        let definition = assemble(&document, &packages).unwrap();

        assert!(definition.methods.is_empty());
        assert_eq!(
            definition.warnings,
            ["PATCH /pets: no request body found for operation with content type application/json"]
        );
    }

    #[test]
    fn operation_failures_name_the_verb_and_path() {
        let document = document(indoc! {"
            openapi: 3.0.0
            info:
              title: Broken
              version: 1.0.0
            paths:
              /pets:
                get:
                  responses:
                    '200':
                      content:
                        application/json:
                          schema:
                            type: string
        "});
        let packages = Packages::new("broken");
        let err = assemble(&document, &packages).unwrap_err();

        assert_eq!(
            err.to_string(),
            "failed to generate client GET method for /pets"
        );
    }

    #[test]
    fn lowering_produces_the_client_file() {
        let document = document(PETSTORE);
        let packages = Packages::new("swagger-petstore");
        let definition = assemble(&document, &packages).unwrap();
        let file = definition.into_file(&packages);

        assert_eq!(file.package, "client");
        let Decl::Struct(client) = &file.decls[0] else {
            panic!("expected the client struct first");
        };
        assert_eq!(client.name, "Client");
        assert_eq!(
            client.embeds,
            [TypeExpr::qual(&packages.sdk, "Client").pointer()]
        );

        let Decl::Func(constructor) = &file.decls[1] else {
            panic!("expected the constructor second");
        };
        assert_eq!(constructor.name, "NewClient");

        let Decl::Func(get_pet) = &file.decls[4] else {
            panic!("expected a method");
        };
        assert_eq!(get_pet.name, "GetPet");
        assert_eq!(
            get_pet.receiver,
            Some(Param::new("c", TypeExpr::named("Client").pointer()))
        );
        assert_eq!(
            get_pet.results,
            [
                TypeExpr::qual(&packages.dtos, "Pet").pointer(),
                TypeExpr::named("error"),
            ]
        );
    }
}
