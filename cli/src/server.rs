#[cfg(feature = "server")]
pub mod http {
    use axum::{
        extract::{Query, State},
        http::StatusCode,
        response::{IntoResponse, Json},
        routing::{get, post},
        Router,
    };
    use optik::{Engine, FormData, OptikError, RuleTables};
    use serde::{Deserialize, Serialize};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use tower_http::cors::CorsLayer;
    use tracing::{error, info};

    type SharedEngine = Arc<RwLock<Engine>>;
    type ApiError = (StatusCode, Json<ErrorResponse>);

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct ThicknessParams {
        power: f64,
        index: f64,
        diameter: f64,
        min_thickness: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    struct ImprovementParams {
        power: f64,
        index: f64,
        diameter: f64,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct ImprovementResponse {
        improvement_percent: f64,
    }

    #[derive(Debug, Serialize)]
    struct ErrorResponse {
        error: String,
    }

    pub fn router(engine: Engine) -> Router {
        let shared_engine: SharedEngine = Arc::new(RwLock::new(engine));

        Router::new()
            .route("/health", get(health_check))
            .route("/thickness", get(thickness))
            .route("/improvement", get(improvement))
            .route("/quote", post(quote))
            .route("/recommendations", post(recommendations))
            .route("/rules", get(get_rules).put(put_rules))
            .layer(CorsLayer::permissive())
            .with_state(shared_engine)
    }

    pub async fn start_server(engine: Engine, host: &str, port: u16) -> anyhow::Result<()> {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "optik=info,tower_http=info".into()),
            )
            .init();

        let app = router(engine);

        let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
        info!("Optik server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    async fn health_check() -> impl IntoResponse {
        Json(serde_json::json!({
            "status": "ok",
            "service": "optik",
            "version": env!("CARGO_PKG_VERSION")
        }))
    }

    async fn thickness(
        State(engine): State<SharedEngine>,
        Query(params): Query<ThicknessParams>,
    ) -> Result<impl IntoResponse, ApiError> {
        let engine = engine.read().await;
        let result = engine
            .estimate_thickness(
                params.power,
                params.index,
                params.diameter,
                params.min_thickness,
            )
            .map_err(|e| reject("Thickness estimate failed", e))?;
        Ok(Json(result))
    }

    async fn improvement(
        State(engine): State<SharedEngine>,
        Query(params): Query<ImprovementParams>,
    ) -> Result<impl IntoResponse, ApiError> {
        let engine = engine.read().await;
        let improvement_percent = engine
            .estimate_improvement_percent(params.power, params.index, params.diameter)
            .map_err(|e| reject("Improvement estimate failed", e))?;
        Ok(Json(ImprovementResponse {
            improvement_percent,
        }))
    }

    async fn quote(
        State(engine): State<SharedEngine>,
        body: String,
    ) -> Result<impl IntoResponse, ApiError> {
        let form = FormData::from_json(&body).map_err(|e| reject("Invalid request", e))?;
        let engine = engine.read().await;
        let quote = engine
            .quote(&form)
            .map_err(|e| reject("Quote failed", e))?;

        info!(
            "Quoted {} recommendation(s), {} special order(s)",
            quote.recommendations.len(),
            quote.special_orders.len()
        );
        Ok(Json(quote))
    }

    async fn recommendations(
        State(engine): State<SharedEngine>,
        body: String,
    ) -> Result<impl IntoResponse, ApiError> {
        let form = FormData::from_json(&body).map_err(|e| reject("Invalid request", e))?;
        let engine = engine.read().await;
        let recommendations = engine
            .generate_recommendations(&form)
            .map_err(|e| reject("Recommendation failed", e))?;
        Ok(Json(recommendations))
    }

    async fn get_rules(State(engine): State<SharedEngine>) -> impl IntoResponse {
        let engine = engine.read().await;
        Json(engine.tables().clone())
    }

    async fn put_rules(
        State(engine): State<SharedEngine>,
        body: String,
    ) -> Result<impl IntoResponse, ApiError> {
        let tables = RuleTables::from_json(&body, "PUT /rules")
            .map_err(|e| reject("Rule tables rejected", e))?;

        // The write lock waits for in-flight calculations to finish
        let mut engine = engine.write().await;
        engine
            .set_tables(tables)
            .map_err(|e| reject("Rule tables rejected", e))?;

        info!("Rule tables replaced");
        Ok(Json(engine.tables().clone()))
    }

    fn reject(context: &str, err: OptikError) -> ApiError {
        let status = match err {
            OptikError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        error!("{}: {}", context, err);
        (
            status,
            Json(ErrorResponse {
                error: format!("{}: {}", context, err),
            }),
        )
    }

}

#[cfg(not(feature = "server"))]
pub mod http {
    pub async fn start_server(
        _engine: optik::Engine,
        _host: &str,
        _port: u16,
    ) -> anyhow::Result<()> {
        anyhow::bail!("Server feature not enabled. Recompile with --features server")
    }
}
