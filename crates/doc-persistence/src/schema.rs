//! Esquema Diesel (mantenido a mano, equivalente a `diesel print-schema`).

diesel::table! {
    documentation_artifacts (id) {
        id -> Uuid,
        documentation_type -> Text,
        title -> Text,
        description -> Text,
        status -> Text,
        content_markdown -> Nullable<Text>,
        content_json -> Nullable<Jsonb>,
        file_size_bytes -> Nullable<BigInt>,
        generation_duration_seconds -> Nullable<Double>,
        last_generated_at -> Nullable<Timestamptz>,
        version_number -> Nullable<Integer>,
        previous_version_id -> Nullable<Uuid>,
        changes_summary -> Nullable<Text>,
        error_message -> Nullable<Text>,
        generated_by -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    documentation_versions (id) {
        id -> Uuid,
        artifact_id -> Uuid,
        documentation_type -> Text,
        version_number -> Integer,
        content_markdown -> Text,
        content_json -> Jsonb,
        file_size_bytes -> BigInt,
        changes_summary -> Nullable<Text>,
        generated_at -> Timestamptz,
    }
}

diesel::table! {
    change_log_entries (id) {
        id -> Uuid,
        bereich -> Text,
        doku_aktualisiert -> Bool,
        aenderung_beschreibung -> Text,
        betroffene_entitaet -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(documentation_versions -> documentation_artifacts (artifact_id));

diesel::allow_tables_to_appear_in_same_query!(documentation_artifacts, documentation_versions, change_log_entries,);
