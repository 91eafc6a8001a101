use async_graphql::{Context, EmptySubscription, Object, Result, Schema};

pub type TestSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(Clone, Copy)]
pub struct BuildNumber(pub usize);

#[derive(Clone)]
pub struct Greeting(pub String);

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn test_string(&self) -> &str {
        "it works"
    }

    async fn test_argument(&self, echo: String) -> String {
        format!("hello {}", echo)
    }

    async fn build_number(&self, ctx: &Context<'_>) -> Result<usize> {
        Ok(ctx.data::<BuildNumber>()?.0)
    }

    async fn greeting(&self, ctx: &Context<'_>) -> Result<String> {
        Ok(ctx.data::<Greeting>()?.0.clone())
    }

    async fn test_error(&self) -> Result<String> {
        Err("secret".into())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn test_mutation(&self, echo: String) -> String {
        format!("not really a mutation, but who cares: {}", echo)
    }
}

pub fn schema() -> TestSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription).finish()
}
