// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{MatchedPair, NewUser, Participant, Role, Secret, User, UserChanges, UserSummary};
pub use requests::{CreateSecretRequest, ListUsersQuery, LoginRequest, RegisterRequest, UpdateUserRequest};
pub use responses::{
    AuthPayload, Envelope, HealthResponse, MatchPayload, PairView, PreferencesPayload, UserPayload,
};
