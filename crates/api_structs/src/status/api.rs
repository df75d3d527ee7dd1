pub mod get_service_health {
    use serde::{Deserialize, Serialize};

    #[derive(Deserialize, Serialize)]
    pub struct APIResponse {
        pub message: String,
    }
}
