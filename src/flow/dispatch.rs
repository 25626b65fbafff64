//! Maps a resolved call to exactly one REST client operation.

use serde_json::Value;
use tracing::debug;

use crate::{
    Result,
    client::{HttpMethod, RestClient},
    flow::{actions::ResolvedCall, normalize},
};

/// Issue the call. One attempt, no retry.
pub async fn dispatch(
    client: &dyn RestClient,
    call: &ResolvedCall,
) -> Result<Value> {
    debug!(operation = call.operation(), "dispatching igc call");

    match call {
        ResolvedCall::Search {
            query,
        } => client.search(query).await,
        ResolvedCall::GetAssetById {
            rid,
        } => client.get_asset_by_id(rid).await,
        ResolvedCall::GetAssetPropertiesById {
            rid,
            asset_type,
            properties,
            page_size,
            full_detail,
        } => client.get_asset_properties_by_id(rid, asset_type, properties, *page_size, *full_detail).await,
        ResolvedCall::GetByUrl {
            path,
        } => normalize::from_response(client.make_request(HttpMethod::GET, path, None).await?),
        ResolvedCall::Create {
            asset_type,
            details,
        } => client.create(asset_type, details).await,
        ResolvedCall::Update {
            rid,
            details,
        } => client.update(rid, details).await,
        ResolvedCall::Delete {
            rid,
        } => client.delete_asset_by_id(rid).await,
    }
}
