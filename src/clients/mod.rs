pub mod api_client;
pub mod credentials;
pub mod transport;

pub use api_client::ApiClient;
pub use credentials::{CredentialProvider, EnvToken, StaticToken};
pub use transport::{ApiRequest, ApiResponse, HttpMethod, HttpTransport, Transport};
