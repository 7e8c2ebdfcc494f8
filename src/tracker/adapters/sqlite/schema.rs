//! Diesel schema for tracker persistence.

diesel::table! {
    /// Servers ever seen in the roster.
    servers (id) {
        /// Internal server identifier.
        id -> Integer,
        /// Stable roster GUID.
        guid -> Text,
        /// Display name.
        name -> Text,
        /// Free-text description.
        description -> Text,
        /// Emulator tag.
        emu -> Text,
        /// Host name or IP literal.
        host -> Text,
        /// UDP port.
        port -> Integer,
        /// Connection type label.
        #[sql_name = "type"]
        connection_type -> Text,
        /// Status label published by the roster.
        status -> Text,
        /// Optional website URL.
        website_url -> Nullable<Text>,
        /// Optional Discord URL.
        discord_url -> Nullable<Text>,
        /// Whether the server appeared in the latest roster.
        is_listed -> Bool,
        /// Creation time, seconds since the Unix epoch.
        created_at -> BigInt,
        /// Last roster update time, seconds since the Unix epoch.
        updated_at -> BigInt,
        /// Latest successful probe time, seconds since the Unix epoch.
        last_seen -> Nullable<BigInt>,
        /// Outcome of the latest probe.
        is_online -> Nullable<Bool>,
    }
}

diesel::table! {
    /// Append-only probe outcomes.
    statuses (id) {
        /// Internal record identifier.
        id -> BigInt,
        /// Probed server.
        server_id -> Integer,
        /// Probe time, seconds since the Unix epoch.
        created_at -> BigInt,
        /// Whether the server answered.
        status -> Bool,
        /// Round-trip time in milliseconds.
        rtt -> Nullable<BigInt>,
        /// Failure description.
        message -> Nullable<Text>,
    }
}

diesel::joinable!(statuses -> servers (server_id));
diesel::allow_tables_to_appear_in_same_query!(servers, statuses);
