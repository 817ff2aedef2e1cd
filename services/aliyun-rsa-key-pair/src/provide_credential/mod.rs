mod generate_session_access_key;
pub use generate_session_access_key::GenerateSessionAccessKeyProvider;
