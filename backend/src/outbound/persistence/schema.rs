//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Admin and business accounts.
    app_users (id) {
        id -> Uuid,
        username -> Varchar,
        password_hash -> Text,
        /// `admin` or `business`.
        user_type -> Varchar,
        business_name -> Nullable<Varchar>,
        call_rate_paise -> Int4,
        auto_print -> Bool,
        is_active -> Bool,
        logo_url -> Nullable<Text>,
        webhook_url -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per accepted call event.
    orders (id) {
        id -> Uuid,
        business_id -> Uuid,
        caller_number -> Text,
        caller_name -> Text,
        order_details -> Text,
        quantity -> Int4,
        call_duration_secs -> Int4,
        call_status -> Text,
        transcript -> Text,
        /// `new`, `printed` or `completed`.
        status -> Varchar,
        webhook_payload -> Jsonb,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    print_settings (business_id) {
        business_id -> Uuid,
        printer_type -> Varchar,
        paper_size -> Varchar,
        include_timestamp -> Bool,
        include_customer_info -> Bool,
        include_business_logo -> Bool,
        print_copies -> Int2,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(orders -> app_users (business_id));
diesel::joinable!(print_settings -> app_users (business_id));

diesel::allow_tables_to_appear_in_same_query!(app_users, orders, print_settings);
