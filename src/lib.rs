pub mod booking_code;
pub mod config;
pub mod domain {
    pub mod booking;
    pub mod field;
    pub mod slot;
}
pub mod http {
    pub mod handlers {
        pub mod auth;
        pub mod bookings;
        pub mod fields;
        pub mod ops;
    }
    pub mod middleware {
        pub mod auth;
    }
}
pub mod repo {
    pub mod bookings_repo;
    pub mod fields_repo;
    pub mod refresh_tokens_repo;
    pub mod users_repo;
}
pub mod service {
    pub mod auth_service;
    pub mod booking_service;
    pub mod expiry_sweep;
}

#[derive(Clone)]
pub struct AppState {
    pub booking_service: service::booking_service::BookingService,
    pub auth_service: service::auth_service::AuthService,
    pub bookings_repo: repo::bookings_repo::BookingsRepo,
    pub fields_repo: repo::fields_repo::FieldsRepo,
    pub users_repo: repo::users_repo::UsersRepo,
    pub pool: sqlx::PgPool,
}
