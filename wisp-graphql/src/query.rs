use async_graphql::{BatchResponse, Executor, Request, Response, ServerError, Variables};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use wisp::{Params, ServiceError};

use crate::options::GraphQLOptions;

/// One GraphQL query as it arrives over the wire.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GraphQLQuery {
    pub query: String,
    #[serde(default, rename = "operationName", skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<VariablesInput>,
    /// Accepted for wire compatibility; the context comes from the
    /// options' `ContextBuilder`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl GraphQLQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            operation_name: None,
            variables: None,
            context: None,
        }
    }

    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    pub fn variables(mut self, variables: VariablesInput) -> Self {
        self.variables = Some(variables);
        self
    }
}

/// Variables either as a JSON-encoded string (query-string transport) or as
/// a JSON object.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum VariablesInput {
    Encoded(String),
    Object(Map<String, Value>),
}

impl VariablesInput {
    fn into_variables(self) -> Result<Variables, ServiceError> {
        let json = match self {
            VariablesInput::Encoded(raw) => serde_json::from_str::<Value>(&raw)
                .map_err(|_| ServiceError::BadRequest("Variables are invalid JSON.".to_string()))?,
            VariablesInput::Object(map) => Value::Object(map),
        };
        Ok(Variables::from_json(json))
    }
}

/// A single query or an ordered batch of them.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum GraphQLData {
    Batch(Vec<GraphQLQuery>),
    Single(GraphQLQuery),
}

impl GraphQLData {
    fn into_parts(self) -> (Vec<GraphQLQuery>, bool) {
        match self {
            GraphQLData::Batch(queries) => (queries, true),
            GraphQLData::Single(query) => (vec![query], false),
        }
    }
}

/// What happens when executing one query fails before the schema could
/// produce a response (context construction, parameter formatting).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// Answer that query with `{ "errors": [...] }`; the rest of the batch
    /// still succeeds.
    #[default]
    Embed,
    /// Fail the whole call.
    Propagate,
}

struct PreparedQuery {
    query: String,
    operation_name: Option<String>,
    variables: Option<Variables>,
}

/// Execute `data` against the resolved options.
///
/// All variables are decoded up front, so one malformed item rejects the
/// whole call with a client error. The items then run concurrently and the
/// responses keep the input order.
pub async fn run_queries<E: Executor>(
    options: &GraphQLOptions<E>,
    data: GraphQLData,
    params: &Params,
    mode: FailureMode,
) -> Result<BatchResponse, ServiceError> {
    let (queries, is_batch) = data.into_parts();

    let prepared = queries
        .into_iter()
        .map(|q| {
            Ok(PreparedQuery {
                query: q.query,
                operation_name: q.operation_name,
                variables: q.variables.map(VariablesInput::into_variables).transpose()?,
            })
        })
        .collect::<Result<Vec<_>, ServiceError>>()?;

    let outcomes = join_all(prepared.into_iter().map(|q| run_query(options, q, params))).await;

    let mut responses = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            Ok(response) => responses.push(response),
            Err(err) if mode == FailureMode::Embed => {
                tracing::warn!(error = %err.message, "graphql query failed");
                responses.push(Response::from_errors(vec![(options.format_error)(err)]));
            }
            Err(err) => return Err(ServiceError::GeneralError(err.message)),
        }
    }

    if is_batch {
        return Ok(BatchResponse::Batch(responses));
    }

    responses
        .into_iter()
        .next()
        .map(BatchResponse::Single)
        .ok_or_else(|| ServiceError::GeneralError("Query produced no response".to_string()))
}

async fn run_query<E: Executor>(
    options: &GraphQLOptions<E>,
    prepared: PreparedQuery,
    params: &Params,
) -> Result<Response, ServerError> {
    let data = options.context.build(params).await.map_err(into_server_error)?;

    let mut request = Request::new(prepared.query);
    if let Some(variables) = prepared.variables {
        request = request.variables(variables);
    }
    if let Some(name) = prepared.operation_name {
        request = request.operation_name(name);
    }
    request.data = data;

    if let Some(format_params) = &options.format_params {
        request = format_params(request).map_err(into_server_error)?;
    }

    let mut response = options.schema.execute(request).await;
    response.errors = response
        .errors
        .into_iter()
        .map(|err| (options.format_error)(err))
        .collect();

    if let Some(format_response) = &options.format_response {
        response = format_response(response);
    }

    Ok(response)
}

fn into_server_error(err: async_graphql::Error) -> ServerError {
    let mut server_error = ServerError::new(err.message, None);
    server_error.extensions = err.extensions;
    server_error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context_builder::ContextFn;
    use crate::test_support::{schema, BuildNumber};
    use async_graphql::Data;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn to_json(response: &BatchResponse) -> Value {
        serde_json::to_value(response).unwrap()
    }

    fn query(text: &str) -> GraphQLQuery {
        GraphQLQuery::new(text)
    }

    #[tokio::test]
    async fn test_single_query_returns_single_response() {
        let options = GraphQLOptions::new(schema());

        let result = run_queries(
            &options,
            GraphQLData::Single(query("{ testString }")),
            &Params::new(),
            FailureMode::Embed,
        )
        .await
        .unwrap();

        assert!(matches!(result, BatchResponse::Single(_)));
        assert_eq!(to_json(&result), json!({ "data": { "testString": "it works" } }));
    }

    #[tokio::test]
    async fn test_batch_keeps_input_order() {
        let options = GraphQLOptions::new(schema());
        let batch = GraphQLData::Batch(vec![
            query("{ testArgument(echo: \"one\") }"),
            query("{ testArgument(echo: \"two\") }"),
            query("{ testArgument(echo: \"three\") }"),
        ]);

        let result = run_queries(&options, batch, &Params::new(), FailureMode::Embed)
            .await
            .unwrap();

        assert_eq!(
            to_json(&result),
            json!([
                { "data": { "testArgument": "hello one" } },
                { "data": { "testArgument": "hello two" } },
                { "data": { "testArgument": "hello three" } },
            ])
        );
    }

    #[tokio::test]
    async fn test_encoded_variables_are_decoded() {
        let options = GraphQLOptions::new(schema());
        let q = query("query test($echo: String!) { testArgument(echo: $echo) }")
            .variables(VariablesInput::Encoded(r#"{"echo":"world"}"#.to_string()));

        let result = run_queries(&options, GraphQLData::Single(q), &Params::new(), FailureMode::Embed)
            .await
            .unwrap();

        assert_eq!(to_json(&result), json!({ "data": { "testArgument": "hello world" } }));
    }

    #[tokio::test]
    async fn test_malformed_variables_are_a_client_error() {
        let options = GraphQLOptions::new(schema());
        let batch = GraphQLData::Batch(vec![
            query("{ testString }"),
            query("query test($echo: String!) { testArgument(echo: $echo) }")
                .variables(VariablesInput::Encoded("{ not json".to_string())),
        ]);

        let err = run_queries(&options, batch, &Params::new(), FailureMode::Embed)
            .await
            .unwrap_err();

        assert_eq!(err, ServiceError::BadRequest("Variables are invalid JSON.".into()));
        assert_eq!(err.code(), 400);
    }

    #[tokio::test]
    async fn test_operation_name_selects_operation() {
        let options = GraphQLOptions::new(schema());
        let q = query("query a { testString } query b { testArgument(echo: \"b\") }")
            .operation_name("b");

        let result = run_queries(&options, GraphQLData::Single(q), &Params::new(), FailureMode::Embed)
            .await
            .unwrap();

        assert_eq!(to_json(&result), json!({ "data": { "testArgument": "hello b" } }));
    }

    #[tokio::test]
    async fn test_every_batch_item_gets_its_own_context() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = builds.clone();
        let options = GraphQLOptions::new(schema()).with_context(ContextFn(move |_: &Params| {
            let mut data = Data::default();
            data.insert(BuildNumber(counter.fetch_add(1, Ordering::SeqCst) + 1));
            Ok(data)
        }));

        let batch = GraphQLData::Batch(vec![
            query("{ buildNumber }"),
            query("{ buildNumber }"),
            query("{ buildNumber }"),
        ]);
        let result = run_queries(&options, batch, &Params::new(), FailureMode::Embed)
            .await
            .unwrap();

        let mut seen: Vec<i64> = to_json(&result)
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["data"]["buildNumber"].as_i64().unwrap())
            .collect();
        seen.sort();

        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(builds.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_embed_turns_failures_into_error_records() {
        let options = GraphQLOptions::new(schema())
            .with_format_params(|request: Request| {
                if request.query.contains("forbidden") {
                    Err("forbidden query".into())
                } else {
                    Ok(request)
                }
            })
            .with_format_error(|mut err: ServerError| {
                err.message = format!("formatted: {}", err.message);
                err
            });

        let batch = GraphQLData::Batch(vec![
            query("{ testString }"),
            query("query forbidden { testString }"),
        ]);
        let result = run_queries(&options, batch, &Params::new(), FailureMode::Embed)
            .await
            .unwrap();

        let json = to_json(&result);
        assert_eq!(json[0], json!({ "data": { "testString": "it works" } }));
        assert_eq!(json[1]["errors"][0]["message"], "formatted: forbidden query");
        assert!(json[1].get("data").map_or(true, Value::is_null));
    }

    #[tokio::test]
    async fn test_propagate_fails_the_whole_call() {
        let options = GraphQLOptions::new(schema())
            .with_context(ContextFn(|_: &Params| Err("no context".into())));

        let err = run_queries(
            &options,
            GraphQLData::Batch(vec![query("{ testString }")]),
            &Params::new(),
            FailureMode::Propagate,
        )
        .await
        .unwrap_err();

        assert_eq!(err, ServiceError::GeneralError("no context".into()));
    }

    #[tokio::test]
    async fn test_format_error_applies_to_execution_errors() {
        let options = GraphQLOptions::new(schema()).with_format_error(|mut err: ServerError| {
            err.message = err.message.to_uppercase();
            err
        });

        let result = run_queries(
            &options,
            GraphQLData::Single(query("{ testError }")),
            &Params::new(),
            FailureMode::Embed,
        )
        .await
        .unwrap();

        assert_eq!(to_json(&result)["errors"][0]["message"], "SECRET");
    }

    #[tokio::test]
    async fn test_format_error_can_replace_the_error() {
        let options = GraphQLOptions::new(schema()).with_format_error(|err: ServerError| {
            ServerError::new("redacted", err.locations.first().copied())
        });

        let result = run_queries(
            &options,
            GraphQLData::Single(query("{ testError }")),
            &Params::new(),
            FailureMode::Embed,
        )
        .await
        .unwrap();

        let json = to_json(&result);
        assert_eq!(json["errors"][0]["message"], "redacted");
        assert_eq!(json["errors"][0]["locations"][0]["line"], 1);
    }

    #[tokio::test]
    async fn test_format_response_runs_last() {
        let options = GraphQLOptions::new(schema()).with_format_response(|response: Response| {
            response.extension("formatted", async_graphql::Value::Boolean(true))
        });

        let result = run_queries(
            &options,
            GraphQLData::Single(query("{ testString }")),
            &Params::new(),
            FailureMode::Embed,
        )
        .await
        .unwrap();

        assert_eq!(to_json(&result)["extensions"]["formatted"], true);
    }

    #[test]
    fn test_data_deserializes_single_and_batch() {
        let single: GraphQLData =
            serde_json::from_value(json!({ "query": "{ a }", "operationName": "A" })).unwrap();
        assert!(matches!(single, GraphQLData::Single(ref q) if q.operation_name.as_deref() == Some("A")));

        let batch: GraphQLData =
            serde_json::from_value(json!([{ "query": "{ a }" }, { "query": "{ b }" }])).unwrap();
        assert!(matches!(batch, GraphQLData::Batch(ref qs) if qs.len() == 2));

        let encoded: GraphQLQuery =
            serde_json::from_value(json!({ "query": "{ a }", "variables": "{\"x\":1}" })).unwrap();
        assert!(matches!(encoded.variables, Some(VariablesInput::Encoded(_))));

        let object: GraphQLQuery =
            serde_json::from_value(json!({ "query": "{ a }", "variables": { "x": 1 } })).unwrap();
        assert!(matches!(object.variables, Some(VariablesInput::Object(_))));
    }
}
