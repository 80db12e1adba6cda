use farmer_advisory::Orchestrator;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use std::sync::Arc;

mod handlers;
mod middleware;
mod router;

async fn function_handler(
    orchestrator: Arc<Orchestrator>,
    event: Request,
) -> Result<Response<Body>, Error> {
    router::route_request(&orchestrator, &event).await
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    let orchestrator = Arc::new(Orchestrator::from_env().await);

    run(service_fn(move |event| {
        function_handler(orchestrator.clone(), event)
    }))
    .await
}
