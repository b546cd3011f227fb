use actix_web::{get, HttpResponse};
use agenthub_llm_sdk::model_metadata::get_all_models;
use shared_types::ModelInfo;

#[get("/models")]
pub async fn list_models() -> HttpResponse {
    let models: Vec<ModelInfo> = get_all_models()
        .iter()
        .map(|model| ModelInfo {
            id: model.model_id.to_string(),
            name: model.name.to_string(),
            description: model.description.to_string(),
            max_tokens: model.max_tokens,
            cost: model.cost_tier.as_str().to_string(),
        })
        .collect();

    HttpResponse::Ok().json(models)
}
