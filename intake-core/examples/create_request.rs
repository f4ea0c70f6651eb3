use std::sync::Arc;

use intake_core::models::Priority;
use intake_core::requests::WorkRequests;
use intake_store::config::StoreConfig;
use intake_store::quickbase::QuickbaseClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Realm settings from environment
    let realm = std::env::var("INTAKE_REALM_HOSTNAME")
        .expect("INTAKE_REALM_HOSTNAME environment variable must be set");
    let app_token = std::env::var("INTAKE_APP_TOKEN")
        .expect("INTAKE_APP_TOKEN environment variable must be set");

    // Create client
    let store = Arc::new(QuickbaseClient::new(StoreConfig::new(realm, app_token))?);

    // Create a work request and print the ids that key the session
    let request = WorkRequests::new(store)
        .create("Fix leak in the break room", Priority::High)
        .await?;

    println!("Created work request {}", request.id);
    println!("  requester: {}", request.requester_email);
    println!("  form:      {}", request.form_id);

    Ok(())
}
